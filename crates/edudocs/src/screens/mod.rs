//! # Screens
//!
//! Headless view-models for the four pages. A screen reads its stores' published state,
//! derives the visible rows through a [`ListQuery`](resource_store::ListQuery), and checks
//! the caller-side preconditions (required fields, role, dependents) before it forwards
//! an operation. A failed check is announced through the notifier and never reaches a
//! store.
//!
//! Store failures are announced by the store itself, so screens only add notices for
//! their own checks.

pub mod categories;
pub mod dashboard;
pub mod documents;
pub mod settings;

pub use categories::CategoriesScreen;
pub use dashboard::DashboardScreen;
pub use documents::DocumentsScreen;
pub use settings::SettingsScreen;

use resource_store::{FailureKind, Notification, Notifier};
use std::fmt::Display;
use tracing::warn;

/// Announces a failed caller-side check and hands the error back.
fn reject<E: Display>(notifier: &dyn Notifier, title: &str, err: E) -> E {
    warn!(title, error = %err, "Rejected");
    notifier.notify(Notification::error(title, err.to_string()));
    err
}

/// Announces `result`'s error if it is a validation failure.
fn announce<T, E: Display>(
    notifier: &dyn Notifier,
    title: &str,
    result: Result<T, E>,
    kind: impl Fn(&E) -> FailureKind,
) -> Result<T, E> {
    result.map_err(|err| {
        if kind(&err) == FailureKind::Validation {
            reject(notifier, title, err)
        } else {
            err
        }
    })
}

fn required(value: &str, field: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        Err(format!("{field} is required"))
    } else {
        Ok(())
    }
}

fn within(value: u32, min: u32, max: u32, field: &str) -> Result<(), String> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(format!("{field} must be between {min} and {max}"))
    }
}
