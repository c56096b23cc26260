//! # API Traits
//!
//! The stores never talk HTTP themselves. They call an endpoint binding that implements
//! [`ResourceApi`] (collections) or [`SingletonApi`] (single documents). Production code
//! binds these to REST endpoints; tests bind them to [`mock`](crate::mock) fakes.
//!
//! Every method has a default that answers [`ApiError::Unsupported`], so read-only
//! resources only implement what the server offers.

use crate::entity::{Resource, Singleton};
use crate::envelope::{ApiError, ApiResult};
use async_trait::async_trait;

/// Endpoint binding for one collection resource.
#[async_trait]
pub trait ResourceApi<T: Resource>: Send + Sync {
    async fn list(&self) -> ApiResult<Vec<T>>;

    async fn create(&self, _params: T::Create) -> ApiResult<T> {
        Err(ApiError::Unsupported(format!("create {}", T::COLLECTION)))
    }

    async fn update(&self, _id: T::Id, _update: T::Update) -> ApiResult<T> {
        Err(ApiError::Unsupported(format!("update {}", T::COLLECTION)))
    }

    async fn delete(&self, _id: T::Id) -> ApiResult<()> {
        Err(ApiError::Unsupported(format!("delete {}", T::COLLECTION)))
    }

    async fn perform(&self, _id: T::Id, _action: T::Action) -> ApiResult<T> {
        Err(ApiError::Unsupported(format!("actions on {}", T::COLLECTION)))
    }
}

/// Endpoint binding for one singleton resource.
#[async_trait]
pub trait SingletonApi<V: Singleton>: Send + Sync {
    async fn get(&self) -> ApiResult<V>;

    async fn update(&self, _update: V::Update) -> ApiResult<V> {
        Err(ApiError::Unsupported(format!("update {}", V::LABEL)))
    }
}
