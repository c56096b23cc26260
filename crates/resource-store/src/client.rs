//! # Generic Clients
//!
//! Type-safe handles for talking to store actors. Mutating calls travel over the request
//! channel; reads are served from the `watch` channel the actor publishes to after every
//! change, so any number of views can observe a store without messaging it.

use crate::entity::{Resource, Singleton};
use crate::error::StoreError;
use crate::message::{ResourceRequest, SingletonRequest};
use crate::state::StoreState;
use tokio::sync::{mpsc, oneshot, watch};

/// A type-safe client for a `ResourceActor`.
///
/// Cheap to clone: it holds a request sender and a state receiver.
pub struct ResourceClient<T: Resource> {
    sender: mpsc::Sender<ResourceRequest<T>>,
    state: watch::Receiver<StoreState<Vec<T>>>,
}

impl<T: Resource> Clone for ResourceClient<T> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
            state: self.state.clone(),
        }
    }
}

impl<T: Resource> ResourceClient<T> {
    pub fn new(
        sender: mpsc::Sender<ResourceRequest<T>>,
        state: watch::Receiver<StoreState<Vec<T>>>,
    ) -> Self {
        Self { sender, state }
    }

    async fn request<R>(
        &self,
        build: impl FnOnce(oneshot::Sender<Result<R, StoreError>>) -> ResourceRequest<T>,
    ) -> Result<R, StoreError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(build(respond_to))
            .await
            .map_err(|_| StoreError::StoreClosed)?;
        response.await.map_err(|_| StoreError::StoreDropped)?
    }

    /// Replaces the collection with the server's list.
    pub async fn fetch_all(&self) -> Result<(), StoreError> {
        self.request(|respond_to| ResourceRequest::Fetch { respond_to })
            .await
    }

    pub async fn create(&self, params: T::Create) -> Result<T, StoreError> {
        self.request(|respond_to| ResourceRequest::Create { params, respond_to })
            .await
    }

    pub async fn update(&self, id: T::Id, update: T::Update) -> Result<T, StoreError> {
        self.request(|respond_to| ResourceRequest::Update {
            id,
            update,
            respond_to,
        })
        .await
    }

    pub async fn delete(&self, id: T::Id) -> Result<(), StoreError> {
        self.request(|respond_to| ResourceRequest::Delete { id, respond_to })
            .await
    }

    pub async fn perform_action(&self, id: T::Id, action: T::Action) -> Result<T, StoreError> {
        self.request(|respond_to| ResourceRequest::Action {
            id,
            action,
            respond_to,
        })
        .await
    }

    pub async fn clear_error(&self) -> Result<(), StoreError> {
        self.request(|respond_to| ResourceRequest::ClearError { respond_to })
            .await
    }

    /// The latest published state.
    pub fn state(&self) -> StoreState<Vec<T>> {
        self.state.borrow().clone()
    }

    pub fn items(&self) -> Vec<T> {
        self.state.borrow().data.clone()
    }

    pub fn get(&self, id: &T::Id) -> Option<T> {
        self.state
            .borrow()
            .data
            .iter()
            .find(|item| item.id() == id)
            .cloned()
    }

    pub fn is_loading(&self) -> bool {
        self.state.borrow().is_loading
    }

    pub fn error(&self) -> Option<String> {
        self.state.borrow().error.clone()
    }

    /// A receiver that is notified on every state change.
    pub fn subscribe(&self) -> watch::Receiver<StoreState<Vec<T>>> {
        self.state.clone()
    }
}

/// A type-safe client for a `SingletonActor`.
pub struct SingletonClient<V: Singleton> {
    sender: mpsc::Sender<SingletonRequest<V>>,
    state: watch::Receiver<StoreState<Option<V>>>,
}

impl<V: Singleton> Clone for SingletonClient<V> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
            state: self.state.clone(),
        }
    }
}

impl<V: Singleton> SingletonClient<V> {
    pub fn new(
        sender: mpsc::Sender<SingletonRequest<V>>,
        state: watch::Receiver<StoreState<Option<V>>>,
    ) -> Self {
        Self { sender, state }
    }

    async fn request<R>(
        &self,
        build: impl FnOnce(oneshot::Sender<Result<R, StoreError>>) -> SingletonRequest<V>,
    ) -> Result<R, StoreError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(build(respond_to))
            .await
            .map_err(|_| StoreError::StoreClosed)?;
        response.await.map_err(|_| StoreError::StoreDropped)?
    }

    pub async fn load(&self) -> Result<V, StoreError> {
        self.request(|respond_to| SingletonRequest::Load { respond_to })
            .await
    }

    pub async fn save(&self, update: V::Update) -> Result<V, StoreError> {
        self.request(|respond_to| SingletonRequest::Save { update, respond_to })
            .await
    }

    pub async fn clear_error(&self) -> Result<(), StoreError> {
        self.request(|respond_to| SingletonRequest::ClearError { respond_to })
            .await
    }

    pub fn state(&self) -> StoreState<Option<V>> {
        self.state.borrow().clone()
    }

    pub fn value(&self) -> Option<V> {
        self.state.borrow().data.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.state.borrow().is_loading
    }

    pub fn error(&self) -> Option<String> {
        self.state.borrow().error.clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<StoreState<Option<V>>> {
        self.state.clone()
    }
}
