//! # Dashboard Client
//!
//! Admins and teachers see different statistics from different endpoints. The client
//! picks the store for the configured role.
use crate::error::DashboardError;
use crate::model::{AdminStats, DashboardStats, Role, TeacherStats};
use resource_store::SingletonClient;
use tracing::instrument;

#[derive(Clone)]
pub struct DashboardClient {
    role: Role,
    admin: SingletonClient<AdminStats>,
    teacher: SingletonClient<TeacherStats>,
}

impl DashboardClient {
    pub fn new(
        role: Role,
        admin: SingletonClient<AdminStats>,
        teacher: SingletonClient<TeacherStats>,
    ) -> Self {
        Self {
            role,
            admin,
            teacher,
        }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    #[instrument(skip(self), fields(role = %self.role))]
    pub async fn load(&self) -> Result<DashboardStats, DashboardError> {
        match self.role {
            Role::Admin => Ok(DashboardStats::Admin(self.admin.load().await?)),
            Role::Teacher => Ok(DashboardStats::Teacher(self.teacher.load().await?)),
            Role::Student => Err(DashboardError::Unavailable(self.role)),
        }
    }

    /// The last loaded statistics, if any.
    pub fn stats(&self) -> Option<DashboardStats> {
        match self.role {
            Role::Admin => self.admin.value().map(DashboardStats::Admin),
            Role::Teacher => self.teacher.value().map(DashboardStats::Teacher),
            Role::Student => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        match self.role {
            Role::Admin => self.admin.is_loading(),
            Role::Teacher => self.teacher.is_loading(),
            Role::Student => false,
        }
    }

    pub fn error(&self) -> Option<String> {
        match self.role {
            Role::Admin => self.admin.error(),
            Role::Teacher => self.teacher.error(),
            Role::Student => None,
        }
    }

    pub async fn clear_error(&self) -> Result<(), DashboardError> {
        match self.role {
            Role::Admin => self.admin.clear_error().await?,
            Role::Teacher => self.teacher.clear_error().await?,
            Role::Student => {}
        }
        Ok(())
    }
}
