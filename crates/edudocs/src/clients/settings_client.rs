//! # Settings Client
//!
//! The settings page spans several stores: system and security settings plus the activity
//! log for admins, notification preferences for teachers. Every call checks the role
//! first, so a forbidden section never produces a request.
use crate::error::SettingsError;
use crate::model::{
    ActivityLog, NotificationSettings, NotificationSettingsUpdate, Role, SecuritySettings,
    SecuritySettingsUpdate, SystemSettings, SystemSettingsUpdate,
};
use async_trait::async_trait;
use resource_store::{ResourceClient, SingletonClient, StoreClient};
use tracing::{debug, instrument};

/// Read-only access to the activity log store.
#[derive(Clone)]
pub struct ActivityLogClient {
    inner: ResourceClient<ActivityLog>,
}

impl ActivityLogClient {
    pub fn new(inner: ResourceClient<ActivityLog>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl StoreClient<ActivityLog> for ActivityLogClient {
    type Error = SettingsError;

    fn inner(&self) -> &ResourceClient<ActivityLog> {
        &self.inner
    }
}

#[derive(Clone)]
pub struct SettingsClient {
    role: Role,
    system: SingletonClient<SystemSettings>,
    security: SingletonClient<SecuritySettings>,
    notifications: SingletonClient<NotificationSettings>,
    logs: ActivityLogClient,
}

impl SettingsClient {
    pub fn new(
        role: Role,
        system: SingletonClient<SystemSettings>,
        security: SingletonClient<SecuritySettings>,
        notifications: SingletonClient<NotificationSettings>,
        logs: ActivityLogClient,
    ) -> Self {
        Self {
            role,
            system,
            security,
            notifications,
            logs,
        }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    fn require(&self, section: &'static str, allowed: Role) -> Result<(), SettingsError> {
        if self.role == allowed {
            Ok(())
        } else {
            debug!(section, role = %self.role, "Section not available");
            Err(SettingsError::Forbidden {
                section,
                role: self.role,
            })
        }
    }

    #[instrument(skip(self), fields(role = %self.role))]
    pub async fn load_system(&self) -> Result<SystemSettings, SettingsError> {
        self.require("System settings", Role::Admin)?;
        Ok(self.system.load().await?)
    }

    #[instrument(skip(self), fields(role = %self.role))]
    pub async fn save_system(
        &self,
        update: SystemSettingsUpdate,
    ) -> Result<SystemSettings, SettingsError> {
        self.require("System settings", Role::Admin)?;
        Ok(self.system.save(update).await?)
    }

    #[instrument(skip(self), fields(role = %self.role))]
    pub async fn load_security(&self) -> Result<SecuritySettings, SettingsError> {
        self.require("Security settings", Role::Admin)?;
        Ok(self.security.load().await?)
    }

    #[instrument(skip(self), fields(role = %self.role))]
    pub async fn save_security(
        &self,
        update: SecuritySettingsUpdate,
    ) -> Result<SecuritySettings, SettingsError> {
        self.require("Security settings", Role::Admin)?;
        Ok(self.security.save(update).await?)
    }

    #[instrument(skip(self), fields(role = %self.role))]
    pub async fn load_notifications(&self) -> Result<NotificationSettings, SettingsError> {
        self.require("Notification settings", Role::Teacher)?;
        Ok(self.notifications.load().await?)
    }

    #[instrument(skip(self), fields(role = %self.role))]
    pub async fn save_notifications(
        &self,
        update: NotificationSettingsUpdate,
    ) -> Result<NotificationSettings, SettingsError> {
        self.require("Notification settings", Role::Teacher)?;
        Ok(self.notifications.save(update).await?)
    }

    #[instrument(skip(self), fields(role = %self.role))]
    pub async fn fetch_activity_logs(&self) -> Result<(), SettingsError> {
        self.require("Activity logs", Role::Admin)?;
        self.logs.fetch_all().await
    }

    /// Loads every section the role can see, the activity log included. All loads run
    /// concurrently; the first failure is returned.
    #[instrument(skip(self), fields(role = %self.role))]
    pub async fn refresh(&self) -> Result<(), SettingsError> {
        match self.role {
            Role::Admin => {
                let (system, security, logs) = tokio::join!(
                    self.load_system(),
                    self.load_security(),
                    self.fetch_activity_logs()
                );
                system?;
                security?;
                logs
            }
            Role::Teacher => self.load_notifications().await.map(|_| ()),
            Role::Student => Err(SettingsError::Forbidden {
                section: "Settings",
                role: self.role,
            }),
        }
    }

    pub async fn clear_error(&self) -> Result<(), SettingsError> {
        self.system.clear_error().await?;
        self.security.clear_error().await?;
        self.notifications.clear_error().await?;
        self.logs.clear_error().await
    }

    pub fn system(&self) -> Option<SystemSettings> {
        self.system.value()
    }

    pub fn security(&self) -> Option<SecuritySettings> {
        self.security.value()
    }

    pub fn notifications(&self) -> Option<NotificationSettings> {
        self.notifications.value()
    }

    pub fn activity_logs(&self) -> Vec<ActivityLog> {
        self.logs.items()
    }

    pub fn is_loading(&self) -> bool {
        self.system.is_loading()
            || self.security.is_loading()
            || self.notifications.is_loading()
            || self.logs.state().is_loading
    }

    /// The first error among the role's sections.
    pub fn error(&self) -> Option<String> {
        self.system
            .error()
            .or_else(|| self.security.error())
            .or_else(|| self.notifications.error())
            .or_else(|| self.logs.state().error)
    }
}
