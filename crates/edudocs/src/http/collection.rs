use super::HttpApi;
use crate::model::{ActivityLog, Category, CategoryAction, Document, DocumentAction};
use async_trait::async_trait;
use reqwest::Method;
use resource_store::{ApiResult, Resource, ResourceApi};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};
use std::marker::PhantomData;
use std::sync::Arc;

/// Where a collection lives on the server and how its actions are sent.
///
/// Collections follow the usual layout: `GET` and `POST` on `PATH`, `PUT` and `DELETE`
/// on `PATH/{id}`, and `PATCH PATH/{id}/{suffix}` for actions.
pub trait RestResource: Resource + DeserializeOwned {
    const PATH: &'static str;

    /// Path suffix and JSON body of an action.
    fn action_route(action: &Self::Action) -> (&'static str, Value);
}

impl RestResource for Category {
    const PATH: &'static str = "/categories";

    fn action_route(action: &CategoryAction) -> (&'static str, Value) {
        match action {
            CategoryAction::SetActive(active) => ("toggle-active", json!({ "isActive": active })),
        }
    }
}

impl RestResource for Document {
    const PATH: &'static str = "/documents";

    fn action_route(action: &DocumentAction) -> (&'static str, Value) {
        match action {
            DocumentAction::Flag { reason } => {
                ("flag", json!({ "isFlagged": true, "reason": reason }))
            }
            DocumentAction::Unflag => ("flag", json!({ "isFlagged": false })),
            DocumentAction::Archive => ("archive", json!({ "archived": true })),
            DocumentAction::Restore => ("archive", json!({ "archived": false })),
        }
    }
}

impl RestResource for ActivityLog {
    const PATH: &'static str = "/admin/activity-logs";

    fn action_route(action: &Self::Action) -> (&'static str, Value) {
        match *action {}
    }
}

/// [`ResourceApi`] over a REST collection.
pub struct RestCollection<T> {
    http: Arc<HttpApi>,
    _entity: PhantomData<fn() -> T>,
}

impl<T> RestCollection<T> {
    pub fn new(http: Arc<HttpApi>) -> Self {
        Self {
            http,
            _entity: PhantomData,
        }
    }
}

/// Ids are server data and get percent-encoded as a single path segment.
fn item_path<T: RestResource>(id: &T::Id) -> String {
    format!("{}/{}", T::PATH, urlencoding::encode(&id.to_string()))
}

#[async_trait]
impl<T> ResourceApi<T> for RestCollection<T>
where
    T: RestResource,
    T::Create: Serialize,
    T::Update: Serialize,
{
    async fn list(&self) -> ApiResult<Vec<T>> {
        self.http.get(T::PATH).await
    }

    async fn create(&self, params: T::Create) -> ApiResult<T> {
        self.http.send(Method::POST, T::PATH, Some(&params)).await
    }

    async fn update(&self, id: T::Id, update: T::Update) -> ApiResult<T> {
        self.http
            .send(Method::PUT, &item_path::<T>(&id), Some(&update))
            .await
    }

    async fn delete(&self, id: T::Id) -> ApiResult<()> {
        self.http
            .send_unit::<()>(Method::DELETE, &item_path::<T>(&id), None)
            .await
    }

    async fn perform(&self, id: T::Id, action: T::Action) -> ApiResult<T> {
        let (suffix, body) = T::action_route(&action);
        let path = format!("{}/{}", item_path::<T>(&id), suffix);
        self.http.send(Method::PATCH, &path, Some(&body)).await
    }
}
