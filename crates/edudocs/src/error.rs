//! Per-resource errors. Each wraps [`StoreError`] and adds the checks its screen makes
//! before a request is sent.

use crate::model::{CategoryId, DocumentId, Role};
use resource_store::{FailureKind, StoreError};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CategoryError {
    #[error("\"{name}\" still contains {count} document(s) and cannot be deleted")]
    HasDocuments { name: String, count: u32 },
    #[error("Category {0} not found")]
    NotFound(CategoryId),
    #[error("{0}")]
    Invalid(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DocumentError {
    #[error("Document {0} not found")]
    NotFound(DocumentId),
    #[error("{0}")]
    Invalid(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SettingsError {
    #[error("{section} are not available to the {role} role")]
    Forbidden { section: &'static str, role: Role },
    #[error("{0}")]
    Invalid(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DashboardError {
    #[error("There is no dashboard for the {0} role")]
    Unavailable(Role),
    #[error(transparent)]
    Store(#[from] StoreError),
}

macro_rules! failure_kind {
    ($($error:ident),*) => {$(
        impl $error {
            /// Caller-side checks are validation failures; the rest comes from the store.
            pub fn kind(&self) -> FailureKind {
                match self {
                    $error::Store(e) => e.kind(),
                    _ => FailureKind::Validation,
                }
            }
        }
    )*};
}

failure_kind!(CategoryError, DocumentError, SettingsError, DashboardError);
