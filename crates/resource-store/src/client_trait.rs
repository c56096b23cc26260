//! # StoreClient Trait
//!
//! Provides a common interface for resource-specific clients, adding default `fetch_all`,
//! `refresh` and `clear_error` methods plus state accessors on top of a generic
//! [`ResourceClient`].
use crate::{Resource, ResourceClient, StoreError, StoreState};
use async_trait::async_trait;

/// Trait for resource-specific clients to inherit the standard store operations.
///
/// # Example
///
/// ```rust
/// use resource_store::{Resource, ResourceClient, StoreClient, StoreError};
///
/// #[derive(Clone, Debug)] struct Tag { id: u32 }
/// impl Resource for Tag {
///     type Id = u32; type Create = (); type Update = (); type Action = std::convert::Infallible;
///     const LABEL: &'static str = "Tag";
///     const COLLECTION: &'static str = "tags";
///     fn id(&self) -> &u32 { &self.id }
/// }
///
/// #[derive(Debug, thiserror::Error)]
/// enum TagError {
///     #[error(transparent)]
///     Store(#[from] StoreError),
/// }
///
/// struct TagClient { inner: ResourceClient<Tag> }
///
/// impl StoreClient<Tag> for TagClient {
///     type Error = TagError;
///     fn inner(&self) -> &ResourceClient<Tag> { &self.inner }
/// }
///
/// async fn usage(client: TagClient) {
///     // fetch_all(), refresh() and clear_error() are provided automatically!
///     let _ = client.refresh().await;
///     let _ = client.items();
/// }
/// ```
#[async_trait]
pub trait StoreClient<T: Resource>: Send + Sync {
    /// The resource-specific error type.
    type Error: From<StoreError> + Send + Sync;

    /// Access the inner generic ResourceClient.
    fn inner(&self) -> &ResourceClient<T>;

    #[tracing::instrument(skip(self), fields(entity_type = T::LABEL))]
    async fn fetch_all(&self) -> Result<(), Self::Error> {
        tracing::debug!("Sending request");
        self.inner().fetch_all().await.map_err(Self::Error::from)
    }

    /// Re-runs the fetch. Clients with secondary data override this.
    async fn refresh(&self) -> Result<(), Self::Error> {
        self.fetch_all().await
    }

    async fn clear_error(&self) -> Result<(), Self::Error> {
        self.inner().clear_error().await.map_err(Self::Error::from)
    }

    fn state(&self) -> StoreState<Vec<T>> {
        self.inner().state()
    }

    fn items(&self) -> Vec<T> {
        self.inner().items()
    }

    fn get(&self, id: &T::Id) -> Option<T> {
        self.inner().get(id)
    }
}
