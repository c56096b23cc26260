//! # Category Client
//!
//! Wraps a `ResourceClient<Category>` and exposes the category operations, including the
//! active/inactive toggle.
use crate::error::CategoryError;
use crate::model::{Category, CategoryAction, CategoryCreate, CategoryId, CategoryUpdate};
use async_trait::async_trait;
use resource_store::{ResourceClient, StoreClient};
use tracing::{debug, instrument};

#[derive(Clone)]
pub struct CategoryClient {
    inner: ResourceClient<Category>,
}

impl CategoryClient {
    pub fn new(inner: ResourceClient<Category>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl StoreClient<Category> for CategoryClient {
    type Error = CategoryError;

    fn inner(&self) -> &ResourceClient<Category> {
        &self.inner
    }
}

impl CategoryClient {
    #[instrument(skip(self))]
    pub async fn create_category(&self, params: CategoryCreate) -> Result<Category, CategoryError> {
        debug!("Sending request");
        Ok(self.inner.create(params).await?)
    }

    #[instrument(skip(self))]
    pub async fn update_category(
        &self,
        id: CategoryId,
        update: CategoryUpdate,
    ) -> Result<Category, CategoryError> {
        Ok(self.inner.update(id, update).await?)
    }

    /// Sets the active flag to `active`. The success notice says which way it went.
    #[instrument(skip(self))]
    pub async fn toggle_status(
        &self,
        id: CategoryId,
        active: bool,
    ) -> Result<Category, CategoryError> {
        Ok(self
            .inner
            .perform_action(id, CategoryAction::SetActive(active))
            .await?)
    }

    /// Deletes without checking for documents; the categories screen guards this.
    #[instrument(skip(self))]
    pub async fn delete_category(&self, id: CategoryId) -> Result<(), CategoryError> {
        Ok(self.inner.delete(id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use resource_store::mock::{MockApi, RecordingNotifier};
    use resource_store::{ResourceActor, Severity, StoreError};
    use std::sync::Arc;

    fn science(active: bool) -> Category {
        let at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        Category {
            id: "c2".into(),
            name: "Science".into(),
            description: String::new(),
            color: None,
            is_active: active,
            document_count: 3,
            created_at: at,
            updated_at: at,
        }
    }

    fn start(api: &MockApi<Category>) -> (CategoryClient, RecordingNotifier) {
        let notifier = RecordingNotifier::new();
        let (actor, inner) = ResourceActor::new(10);
        tokio::spawn(actor.run(Arc::new(api.clone()), Arc::new(notifier.clone())));
        (CategoryClient::new(inner), notifier)
    }

    #[tokio::test]
    async fn test_toggle_status_round_trip() {
        let api = MockApi::<Category>::new();
        let (client, notifier) = start(&api);

        api.expect_list().return_ok(vec![science(true)]);
        client.fetch_all().await.unwrap();

        api.expect_action("c2".into()).return_ok(science(false));
        client.toggle_status("c2".into(), false).await.unwrap();
        assert!(!client.get(&"c2".into()).unwrap().is_active);
        assert_eq!(notifier.last().unwrap().title, "Category deactivated");

        api.expect_action("c2".into()).return_ok(science(true));
        client.toggle_status("c2".into(), true).await.unwrap();
        assert!(client.get(&"c2".into()).unwrap().is_active);
        assert_eq!(notifier.last().unwrap().title, "Category activated");

        assert_eq!(notifier.count(Severity::Success), 2);
        api.verify();
    }

    #[tokio::test]
    async fn test_toggle_notice_follows_the_returned_status() {
        let api = MockApi::<Category>::new();
        let (client, notifier) = start(&api);

        // Asked to activate, the server keeps the category inactive.
        api.expect_action("c2".into()).return_ok(science(false));
        let updated = client.toggle_status("c2".into(), true).await.unwrap();
        assert!(!updated.is_active);
        assert_eq!(notifier.last().unwrap().title, "Category deactivated");
    }

    #[tokio::test]
    async fn test_store_errors_are_wrapped() {
        let api = MockApi::<Category>::new();
        let (client, _) = start(&api);

        api.expect_delete("c2".into())
            .return_declined("Category is referenced by documents");
        let err = client.delete_category("c2".into()).await.unwrap_err();
        assert_eq!(
            err,
            CategoryError::Store(StoreError::Declined(
                "Category is referenced by documents".into()
            ))
        );
    }
}
