use super::HttpApi;
use crate::model::{
    AdminStats, NotificationSettings, SecuritySettings, SystemSettings, TeacherStats,
};
use async_trait::async_trait;
use reqwest::Method;
use resource_store::{ApiResult, Singleton, SingletonApi};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::marker::PhantomData;
use std::sync::Arc;

/// Where a single server document lives. Read with `GET`, saved with `PUT`.
pub trait RestSingleton: Singleton + DeserializeOwned {
    const PATH: &'static str;
}

impl RestSingleton for SystemSettings {
    const PATH: &'static str = "/settings/system";
}

impl RestSingleton for SecuritySettings {
    const PATH: &'static str = "/settings/security";
}

impl RestSingleton for NotificationSettings {
    const PATH: &'static str = "/settings/notifications";
}

impl RestSingleton for AdminStats {
    const PATH: &'static str = "/dashboard/admin-stats";
}

impl RestSingleton for TeacherStats {
    const PATH: &'static str = "/dashboard/teacher-stats";
}

/// [`SingletonApi`] over a REST document.
pub struct RestDocument<V> {
    http: Arc<HttpApi>,
    _value: PhantomData<fn() -> V>,
}

impl<V> RestDocument<V> {
    pub fn new(http: Arc<HttpApi>) -> Self {
        Self {
            http,
            _value: PhantomData,
        }
    }
}

#[async_trait]
impl<V> SingletonApi<V> for RestDocument<V>
where
    V: RestSingleton,
    V::Update: Serialize,
{
    async fn get(&self) -> ApiResult<V> {
        self.http.get(V::PATH).await
    }

    async fn update(&self, update: V::Update) -> ApiResult<V> {
        self.http.send(Method::PUT, V::PATH, Some(&update)).await
    }
}
