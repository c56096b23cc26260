use super::{reject, required};
use crate::clients::{CategoryClient, DocumentClient};
use crate::error::{CategoryError, DocumentError};
use crate::model::{
    Category, CategoryId, Document, DocumentCreate, DocumentFacet, DocumentId, DocumentSort,
    DocumentStatus, DocumentUpdate,
};
use resource_store::{Direction, ListQuery, Notifier, StoreClient, StoreError, StoreState};
use std::sync::Arc;
use tracing::warn;

pub const MAX_FLAG_REASON_LEN: usize = 500;

/// The documents page. It also mirrors the categories to resolve names and to check
/// that new documents are filed under an existing category.
pub struct DocumentsScreen {
    documents: DocumentClient,
    categories: CategoryClient,
    notifier: Arc<dyn Notifier>,
    query: ListQuery<Document>,
}

impl DocumentsScreen {
    pub fn new(
        documents: DocumentClient,
        categories: CategoryClient,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            documents,
            categories,
            notifier,
            query: ListQuery::new().sort_by(DocumentSort::CreatedAt, Direction::Descending),
        }
    }

    /// Loads documents and categories concurrently.
    pub async fn mount(&self) -> Result<(), DocumentError> {
        let (documents, categories) =
            tokio::join!(self.documents.fetch_all(), self.categories.fetch_all());
        match documents {
            Err(DocumentError::Store(StoreError::Superseded)) | Ok(()) => {}
            Err(e) => return Err(e),
        }
        if let Err(e) = categories {
            // The page still works without category names.
            if !matches!(e, CategoryError::Store(StoreError::Superseded)) {
                warn!(error = %e, "Categories unavailable");
            }
        }
        Ok(())
    }

    pub async fn refresh(&self) -> Result<(), DocumentError> {
        self.mount().await
    }

    pub fn state(&self) -> StoreState<Vec<Document>> {
        self.documents.state()
    }

    pub fn visible(&self) -> Vec<Document> {
        self.query.apply(&self.documents.items())
    }

    pub fn categories(&self) -> Vec<Category> {
        self.categories.items()
    }

    /// The document's category name, falling back to its id.
    pub fn category_name(&self, document: &Document) -> String {
        document
            .category_name
            .clone()
            .or_else(|| {
                self.categories
                    .get(&document.category_id)
                    .map(|c| c.name)
            })
            .unwrap_or_else(|| document.category_id.to_string())
    }

    pub fn query(&self) -> &ListQuery<Document> {
        &self.query
    }

    pub fn search(&mut self, text: impl Into<String>) {
        self.query.search = text.into();
    }

    pub fn filter_category(&mut self, category: Option<CategoryId>) {
        self.query
            .set_facet(DocumentFacet::Category, category.map(|c| c.0));
    }

    pub fn filter_status(&mut self, status: Option<DocumentStatus>) {
        self.query
            .set_facet(DocumentFacet::Status, status.map(|s| s.to_string()));
    }

    pub fn filter_flagged(&mut self, flagged: Option<bool>) {
        let value = flagged.map(|f| if f { "flagged" } else { "clean" }.to_string());
        self.query.set_facet(DocumentFacet::Flagged, value);
    }

    pub fn filter_file_type(&mut self, file_type: Option<String>) {
        self.query.set_facet(
            DocumentFacet::FileType,
            file_type.map(|t| t.to_lowercase()),
        );
    }

    pub fn sort_by(&mut self, field: DocumentSort, direction: Direction) {
        self.query.sort = Some((field, direction));
    }

    pub async fn create(&self, form: DocumentCreate) -> Result<Document, DocumentError> {
        let checked = required(&form.title, "Title")
            .and_then(|_| required(&form.file_name, "File"))
            .map_err(DocumentError::Invalid)
            .and_then(|_| self.check_category(&form.category_id));
        if let Err(err) = checked {
            return Err(reject(&*self.notifier, "Cannot upload document", err));
        }
        let created = self.documents.create_document(form).await?;
        self.refresh_categories().await;
        Ok(created)
    }

    pub async fn update(
        &self,
        id: DocumentId,
        update: DocumentUpdate,
    ) -> Result<Document, DocumentError> {
        let mut checked = self.find(&id).map(|_| ());
        if let Some(title) = &update.title {
            checked = checked.and_then(|_| required(title, "Title").map_err(DocumentError::Invalid));
        }
        if let Some(category_id) = &update.category_id {
            checked = checked.and_then(|_| self.check_category(category_id));
        }
        if let Err(err) = checked {
            return Err(reject(&*self.notifier, "Cannot update document", err));
        }
        let moved = update.category_id.is_some();
        let updated = self.documents.update_document(id, update).await?;
        if moved {
            self.refresh_categories().await;
        }
        Ok(updated)
    }

    pub async fn delete(&self, id: DocumentId) -> Result<(), DocumentError> {
        if let Err(err) = self.find(&id) {
            return Err(reject(&*self.notifier, "Cannot delete document", err));
        }
        self.documents.delete_document(id).await?;
        self.refresh_categories().await;
        Ok(())
    }

    /// Flags a document for review. A reason is required.
    pub async fn flag(&self, id: DocumentId, reason: &str) -> Result<Document, DocumentError> {
        let reason = reason.trim();
        let checked = self.find(&id).and_then(|_| {
            if reason.is_empty() {
                Err(DocumentError::Invalid(
                    "Please provide a reason for flagging this document".into(),
                ))
            } else if reason.chars().count() > MAX_FLAG_REASON_LEN {
                Err(DocumentError::Invalid(format!(
                    "The reason must be at most {MAX_FLAG_REASON_LEN} characters"
                )))
            } else {
                Ok(())
            }
        });
        if let Err(err) = checked {
            return Err(reject(&*self.notifier, "Cannot flag document", err));
        }
        self.documents.flag(id, reason.to_string()).await
    }

    pub async fn unflag(&self, id: DocumentId) -> Result<Document, DocumentError> {
        if let Err(err) = self.find(&id) {
            return Err(reject(&*self.notifier, "Cannot unflag document", err));
        }
        self.documents.unflag(id).await
    }

    /// Archives a live document or restores an archived one.
    pub async fn toggle_archive(&self, id: DocumentId) -> Result<Document, DocumentError> {
        let document = self
            .find(&id)
            .map_err(|err| reject(&*self.notifier, "Cannot archive document", err))?;
        if document.is_archived() {
            self.documents.restore(id).await
        } else {
            self.documents.archive(id).await
        }
    }

    pub async fn clear_error(&self) -> Result<(), DocumentError> {
        self.documents.clear_error().await
    }

    /// Document counts live on the categories, so they are reloaded after a document
    /// moves in or out of one. The categories screen's delete guard reads these counts.
    async fn refresh_categories(&self) {
        match self.categories.fetch_all().await {
            Ok(()) | Err(CategoryError::Store(StoreError::Superseded)) => {}
            Err(e) => warn!(error = %e, "Category counts not refreshed"),
        }
    }

    fn find(&self, id: &DocumentId) -> Result<Document, DocumentError> {
        self.documents
            .get(id)
            .ok_or_else(|| DocumentError::NotFound(id.clone()))
    }

    /// Only checked once categories are loaded.
    fn check_category(&self, id: &CategoryId) -> Result<(), DocumentError> {
        let categories = self.categories.items();
        if categories.is_empty() || categories.iter().any(|c| &c.id == id) {
            Ok(())
        } else {
            Err(DocumentError::Invalid(format!("Unknown category {id}")))
        }
    }
}
