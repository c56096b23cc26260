//! # Resource Traits
//!
//! [`Resource`] is the contract every collection entity (Category, Document, ...) satisfies
//! to be mirrored by a [`ResourceActor`](crate::ResourceActor). [`Singleton`] is the
//! equivalent for single server-side documents such as settings.
//!
//! Associated types keep each store type-safe: a category store only accepts a
//! `CategoryCreate`, and a document action can never be sent to the category endpoint.
//!
//! The provided methods decide the notification texts. Override them when the default
//! wording (`"<Label> created"`, `"<Label> updated"`, ...) does not fit the resource.

use std::fmt::{Debug, Display};
use std::hash::Hash;

/// Which store operation a notification or log line refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Fetch,
    Create,
    Update,
    Delete,
    Action,
}

impl Operation {
    pub fn verb(self) -> &'static str {
        match self {
            Operation::Fetch => "load",
            Operation::Create => "create",
            Operation::Update => "update",
            Operation::Delete => "delete",
            Operation::Action => "update",
        }
    }

    fn past_tense(self) -> &'static str {
        match self {
            Operation::Fetch => "loaded",
            Operation::Create => "created",
            Operation::Update | Operation::Action => "updated",
            Operation::Delete => "deleted",
        }
    }
}

/// Trait that any entity must implement to be mirrored by a `ResourceActor`.
pub trait Resource: Clone + Debug + Send + Sync + 'static {
    /// Server-assigned identifier.
    type Id: Eq + Hash + Clone + Send + Sync + Display + Debug + 'static;

    /// Payload for the create endpoint.
    type Create: Send + Sync + Debug + 'static;

    /// Payload for the update endpoint.
    type Update: Send + Sync + Debug + 'static;

    /// Resource-specific operations that return the updated entity (toggle, flag, ...).
    /// Use `std::convert::Infallible` for resources without actions.
    type Action: Clone + Send + Sync + Debug + 'static;

    /// Singular, capitalised name used in notifications ("Category").
    const LABEL: &'static str;

    /// Plural, lower-case name used in notifications and logs ("categories").
    const COLLECTION: &'static str;

    fn id(&self) -> &Self::Id;

    /// Human-readable name for notification descriptions.
    fn display_name(&self) -> String {
        self.id().to_string()
    }

    /// Title of the success notification for a finished operation.
    fn success_title(op: Operation) -> String {
        format!("{} {}", Self::LABEL, op.past_tense())
    }

    /// Title of the success notification for an action, given the updated entity.
    fn action_title(_action: &Self::Action, _updated: &Self) -> String {
        Self::success_title(Operation::Action)
    }

    /// Title of the error notification for a failed operation.
    fn failure_title(op: Operation) -> String {
        match op {
            Operation::Fetch => format!("Failed to load {}", Self::COLLECTION),
            _ => format!("Failed to {} {}", op.verb(), Self::LABEL.to_lowercase()),
        }
    }
}

/// Trait for single documents mirrored by a `SingletonActor`.
pub trait Singleton: Clone + Debug + Send + Sync + 'static {
    /// Partial update payload. Read-only singletons use `std::convert::Infallible`.
    type Update: Send + Sync + Debug + 'static;

    /// Name used in notifications ("System settings").
    const LABEL: &'static str;
}
