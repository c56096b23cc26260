//! # Store Errors
//!
//! This module defines the error types shared by every store and client.
//! A failed operation always resolves to exactly one [`StoreError`], whatever
//! layer it failed in, so callers can match on a single type.

use crate::envelope::ApiError;

/// The three ways an operation can fail, independent of which store ran it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// A caller-side precondition was not met; nothing was sent.
    Validation,
    /// The server answered but reported `success: false`.
    Structural,
    /// The request never produced a usable envelope.
    Transport,
    /// The store itself is gone or the response was discarded.
    Internal,
}

/// Errors returned by store operations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StoreError {
    /// Rejected before reaching the network.
    #[error("{0}")]
    Rejected(String),
    /// The server declined the operation.
    #[error("{0}")]
    Declined(String),
    #[error(transparent)]
    Transport(#[from] ApiError),
    /// A newer request for the same collection made this response obsolete.
    #[error("response superseded by a newer request")]
    Superseded,
    #[error("Store closed")]
    StoreClosed,
    #[error("Store dropped response channel")]
    StoreDropped,
}

impl StoreError {
    pub fn kind(&self) -> FailureKind {
        match self {
            StoreError::Rejected(_) => FailureKind::Validation,
            StoreError::Declined(_) => FailureKind::Structural,
            StoreError::Transport(_) => FailureKind::Transport,
            StoreError::Superseded | StoreError::StoreClosed | StoreError::StoreDropped => {
                FailureKind::Internal
            }
        }
    }

    pub fn is_superseded(&self) -> bool {
        matches!(self, StoreError::Superseded)
    }
}
