use crate::clients::DashboardClient;
use crate::error::DashboardError;
use crate::model::{DashboardStats, Role};
use resource_store::StoreError;

/// The dashboard page: the statistics for the signed-in role.
pub struct DashboardScreen {
    client: DashboardClient,
}

impl DashboardScreen {
    pub fn new(client: DashboardClient) -> Self {
        Self { client }
    }

    pub async fn mount(&self) -> Result<(), DashboardError> {
        match self.client.load().await {
            Ok(_) | Err(DashboardError::Store(StoreError::Superseded)) => Ok(()),
            Err(e) => Err(e),
        }
    }

    pub async fn refresh(&self) -> Result<(), DashboardError> {
        self.mount().await
    }

    pub fn role(&self) -> Role {
        self.client.role()
    }

    pub fn stats(&self) -> Option<DashboardStats> {
        self.client.stats()
    }

    pub fn is_loading(&self) -> bool {
        self.client.is_loading()
    }

    pub fn error(&self) -> Option<String> {
        self.client.error()
    }

    pub async fn clear_error(&self) -> Result<(), DashboardError> {
        self.client.clear_error().await
    }
}
