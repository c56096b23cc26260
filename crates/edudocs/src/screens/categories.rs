use super::{reject, required};
use crate::clients::CategoryClient;
use crate::error::CategoryError;
use crate::model::{Category, CategoryCreate, CategoryFacet, CategoryId, CategorySort, CategoryUpdate};
use resource_store::{Direction, ListQuery, Notifier, StoreClient, StoreError, StoreState};
use std::sync::Arc;

const MAX_NAME_LEN: usize = 100;

/// The categories page.
pub struct CategoriesScreen {
    client: CategoryClient,
    notifier: Arc<dyn Notifier>,
    query: ListQuery<Category>,
}

impl CategoriesScreen {
    pub fn new(client: CategoryClient, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            client,
            notifier,
            query: ListQuery::new().sort_by(CategorySort::Name, Direction::Ascending),
        }
    }

    /// Loads the categories. Called when the page opens.
    pub async fn mount(&self) -> Result<(), CategoryError> {
        match self.client.fetch_all().await {
            // A newer fetch owns the state.
            Err(CategoryError::Store(StoreError::Superseded)) => Ok(()),
            other => other,
        }
    }

    pub async fn refresh(&self) -> Result<(), CategoryError> {
        self.mount().await
    }

    pub fn state(&self) -> StoreState<Vec<Category>> {
        self.client.state()
    }

    /// The rows to display: searched, filtered and sorted.
    pub fn visible(&self) -> Vec<Category> {
        self.query.apply(&self.client.items())
    }

    pub fn query(&self) -> &ListQuery<Category> {
        &self.query
    }

    pub fn search(&mut self, text: impl Into<String>) {
        self.query.search = text.into();
    }

    /// `Some(true)` shows only active categories, `None` shows all.
    pub fn filter_active(&mut self, active: Option<bool>) {
        let value = active.map(|a| if a { "active" } else { "inactive" }.to_string());
        self.query.set_facet(CategoryFacet::Status, value);
    }

    pub fn sort_by(&mut self, field: CategorySort, direction: Direction) {
        self.query.sort = Some((field, direction));
    }

    pub async fn create(&self, form: CategoryCreate) -> Result<Category, CategoryError> {
        if let Err(err) = self.validate_name(&form.name, None) {
            return Err(reject(&*self.notifier, "Cannot create category", err));
        }
        self.client.create_category(form).await
    }

    pub async fn update(
        &self,
        id: CategoryId,
        update: CategoryUpdate,
    ) -> Result<Category, CategoryError> {
        let checked = self
            .find(&id)
            .and_then(|_| match &update.name {
                Some(name) => self.validate_name(name, Some(&id)),
                None => Ok(()),
            });
        if let Err(err) = checked {
            return Err(reject(&*self.notifier, "Cannot update category", err));
        }
        self.client.update_category(id, update).await
    }

    /// Flips the active flag of a loaded category.
    pub async fn toggle_status(&self, id: CategoryId) -> Result<Category, CategoryError> {
        let current = self
            .find(&id)
            .map_err(|err| reject(&*self.notifier, "Cannot update category", err))?;
        self.client.toggle_status(id, !current.is_active).await
    }

    /// Deletes a category that holds no documents. Categories with documents are refused
    /// here and the store is never asked.
    ///
    /// The check uses the counts from the last category fetch. The documents screen
    /// refetches them after each upload, move or delete; anything the server learned
    /// from elsewhere is still caught by its own refusal.
    pub async fn delete(&self, id: CategoryId) -> Result<(), CategoryError> {
        let checked = self.find(&id).and_then(|category| {
            if category.has_documents() {
                Err(CategoryError::HasDocuments {
                    name: category.name,
                    count: category.document_count,
                })
            } else {
                Ok(())
            }
        });
        if let Err(err) = checked {
            return Err(reject(&*self.notifier, "Cannot delete category", err));
        }
        self.client.delete_category(id).await
    }

    pub async fn clear_error(&self) -> Result<(), CategoryError> {
        self.client.clear_error().await
    }

    fn find(&self, id: &CategoryId) -> Result<Category, CategoryError> {
        self.client
            .get(id)
            .ok_or_else(|| CategoryError::NotFound(id.clone()))
    }

    fn validate_name(&self, name: &str, own_id: Option<&CategoryId>) -> Result<(), CategoryError> {
        required(name, "Category name").map_err(CategoryError::Invalid)?;
        let name = name.trim();
        if name.chars().count() > MAX_NAME_LEN {
            return Err(CategoryError::Invalid(format!(
                "Category name must be at most {MAX_NAME_LEN} characters"
            )));
        }
        let taken = self
            .client
            .items()
            .iter()
            .any(|c| Some(&c.id) != own_id && c.name.trim().eq_ignore_ascii_case(name));
        if taken {
            return Err(CategoryError::Invalid(format!(
                "A category named \"{name}\" already exists"
            )));
        }
        Ok(())
    }
}
