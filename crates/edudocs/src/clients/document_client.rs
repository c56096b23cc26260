//! # Document Client
//!
//! Wraps a `ResourceClient<Document>` and exposes CRUD plus the moderation actions
//! (flag, unflag, archive, restore).
use crate::error::DocumentError;
use crate::model::{Document, DocumentAction, DocumentCreate, DocumentId, DocumentUpdate};
use async_trait::async_trait;
use resource_store::{ResourceClient, StoreClient};
use tracing::instrument;

#[derive(Clone)]
pub struct DocumentClient {
    inner: ResourceClient<Document>,
}

impl DocumentClient {
    pub fn new(inner: ResourceClient<Document>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl StoreClient<Document> for DocumentClient {
    type Error = DocumentError;

    fn inner(&self) -> &ResourceClient<Document> {
        &self.inner
    }
}

impl DocumentClient {
    #[instrument(skip(self))]
    pub async fn create_document(&self, params: DocumentCreate) -> Result<Document, DocumentError> {
        Ok(self.inner.create(params).await?)
    }

    #[instrument(skip(self))]
    pub async fn update_document(
        &self,
        id: DocumentId,
        update: DocumentUpdate,
    ) -> Result<Document, DocumentError> {
        Ok(self.inner.update(id, update).await?)
    }

    #[instrument(skip(self))]
    pub async fn delete_document(&self, id: DocumentId) -> Result<(), DocumentError> {
        Ok(self.inner.delete(id).await?)
    }

    #[instrument(skip(self))]
    pub async fn flag(&self, id: DocumentId, reason: String) -> Result<Document, DocumentError> {
        self.act(id, DocumentAction::Flag { reason }).await
    }

    #[instrument(skip(self))]
    pub async fn unflag(&self, id: DocumentId) -> Result<Document, DocumentError> {
        self.act(id, DocumentAction::Unflag).await
    }

    #[instrument(skip(self))]
    pub async fn archive(&self, id: DocumentId) -> Result<Document, DocumentError> {
        self.act(id, DocumentAction::Archive).await
    }

    #[instrument(skip(self))]
    pub async fn restore(&self, id: DocumentId) -> Result<Document, DocumentError> {
        self.act(id, DocumentAction::Restore).await
    }

    async fn act(&self, id: DocumentId, action: DocumentAction) -> Result<Document, DocumentError> {
        Ok(self.inner.perform_action(id, action).await?)
    }
}
