//! # Store Messages
//!
//! Requests sent from clients to store actors, and the completions that spawned API
//! calls send back to their actor.
//!
//! The request variants map onto the store operations: `Fetch` (list), `Create`, `Update`,
//! `Delete`, `Action` (resource-specific update), and `ClearError`. Every variant carries
//! a one-shot channel for the outcome.

use crate::entity::{Resource, Singleton};
use crate::envelope::ApiResult;
use crate::error::StoreError;
use crate::state::Token;
use tokio::sync::oneshot;

/// Type alias for the one-shot response channel used by stores.
pub type Response<T> = oneshot::Sender<Result<T, StoreError>>;

/// Requests handled by a [`ResourceActor`](crate::ResourceActor).
#[derive(Debug)]
pub enum ResourceRequest<T: Resource> {
    Fetch {
        respond_to: Response<()>,
    },
    Create {
        params: T::Create,
        respond_to: Response<T>,
    },
    Update {
        id: T::Id,
        update: T::Update,
        respond_to: Response<T>,
    },
    Delete {
        id: T::Id,
        respond_to: Response<()>,
    },
    Action {
        id: T::Id,
        action: T::Action,
        respond_to: Response<T>,
    },
    ClearError {
        respond_to: Response<()>,
    },
}

/// Requests handled by a [`SingletonActor`](crate::SingletonActor).
#[derive(Debug)]
pub enum SingletonRequest<V: Singleton> {
    Load { respond_to: Response<V> },
    Save { update: V::Update, respond_to: Response<V> },
    ClearError { respond_to: Response<()> },
}

/// A finished API call on its way back to the owning collection actor.
pub(crate) enum Settled<T: Resource> {
    Fetched {
        token: Token,
        result: ApiResult<Vec<T>>,
        respond_to: Response<()>,
    },
    Created {
        token: Token,
        result: ApiResult<T>,
        respond_to: Response<T>,
    },
    Updated {
        token: Token,
        id: T::Id,
        result: ApiResult<T>,
        respond_to: Response<T>,
    },
    Deleted {
        token: Token,
        id: T::Id,
        result: ApiResult<()>,
        respond_to: Response<()>,
    },
    Acted {
        token: Token,
        id: T::Id,
        action: T::Action,
        result: ApiResult<T>,
        respond_to: Response<T>,
    },
}

/// A finished API call on its way back to the owning singleton actor.
pub(crate) enum SingletonSettled<V: Singleton> {
    Loaded {
        token: Token,
        result: ApiResult<V>,
        respond_to: Response<V>,
    },
    Saved {
        token: Token,
        result: ApiResult<V>,
        respond_to: Response<V>,
    },
}
