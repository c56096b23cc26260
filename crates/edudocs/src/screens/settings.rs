use super::{announce, reject, required, within};
use crate::clients::SettingsClient;
use crate::error::SettingsError;
use crate::model::{
    ActivityFacet, ActivityLog, ActivitySort, NotificationSettings, NotificationSettingsUpdate,
    Role, SecuritySettings, SecuritySettingsUpdate, SystemSettings, SystemSettingsUpdate,
};
use resource_store::{Direction, ListQuery, Notifier, StoreError};
use std::sync::Arc;

/// The settings page, with the activity log for admins.
pub struct SettingsScreen {
    client: SettingsClient,
    notifier: Arc<dyn Notifier>,
    log_query: ListQuery<ActivityLog>,
}

impl SettingsScreen {
    pub fn new(client: SettingsClient, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            client,
            notifier,
            log_query: ListQuery::new().sort_by(ActivitySort::CreatedAt, Direction::Descending),
        }
    }

    /// Loads every section the role may see.
    pub async fn mount(&self) -> Result<(), SettingsError> {
        let result = match self.client.refresh().await {
            Err(SettingsError::Store(StoreError::Superseded)) => Ok(()),
            other => other,
        };
        announce(&*self.notifier, "Settings unavailable", result, SettingsError::kind)
    }

    pub async fn refresh(&self) -> Result<(), SettingsError> {
        self.mount().await
    }

    pub fn role(&self) -> Role {
        self.client.role()
    }

    pub fn system(&self) -> Option<SystemSettings> {
        self.client.system()
    }

    pub fn security(&self) -> Option<SecuritySettings> {
        self.client.security()
    }

    pub fn notifications(&self) -> Option<NotificationSettings> {
        self.client.notifications()
    }

    pub fn is_loading(&self) -> bool {
        self.client.is_loading()
    }

    pub fn error(&self) -> Option<String> {
        self.client.error()
    }

    pub async fn save_system(
        &self,
        update: SystemSettingsUpdate,
    ) -> Result<SystemSettings, SettingsError> {
        if let Err(reason) = validate_system(&update) {
            return Err(reject(
                &*self.notifier,
                "Invalid system settings",
                SettingsError::Invalid(reason),
            ));
        }
        let result = self.client.save_system(update).await;
        announce(&*self.notifier, "Cannot save settings", result, SettingsError::kind)
    }

    pub async fn save_security(
        &self,
        update: SecuritySettingsUpdate,
    ) -> Result<SecuritySettings, SettingsError> {
        if let Err(reason) = validate_security(&update) {
            return Err(reject(
                &*self.notifier,
                "Invalid security settings",
                SettingsError::Invalid(reason),
            ));
        }
        let result = self.client.save_security(update).await;
        announce(&*self.notifier, "Cannot save settings", result, SettingsError::kind)
    }

    pub async fn save_notifications(
        &self,
        update: NotificationSettingsUpdate,
    ) -> Result<NotificationSettings, SettingsError> {
        let result = self.client.save_notifications(update).await;
        announce(&*self.notifier, "Cannot save settings", result, SettingsError::kind)
    }

    /// The activity log rows to display.
    pub fn activity_logs(&self) -> Vec<ActivityLog> {
        self.log_query.apply(&self.client.activity_logs())
    }

    pub fn search_logs(&mut self, text: impl Into<String>) {
        self.log_query.search = text.into();
    }

    pub fn filter_log_action(&mut self, action: Option<String>) {
        self.log_query.set_facet(ActivityFacet::Action, action);
    }

    pub fn sort_logs(&mut self, field: ActivitySort, direction: Direction) {
        self.log_query.sort = Some((field, direction));
    }

    pub async fn clear_error(&self) -> Result<(), SettingsError> {
        self.client.clear_error().await
    }
}

fn validate_system(update: &SystemSettingsUpdate) -> Result<(), String> {
    if let Some(name) = &update.site_name {
        required(name, "Site name")?;
    }
    if let Some(size) = update.max_upload_size_mb {
        within(size, 1, 1024, "Maximum upload size (MB)")?;
    }
    if let Some(types) = &update.allowed_file_types {
        if types.iter().all(|t| t.trim().is_empty()) {
            return Err("At least one file type must be allowed".to_string());
        }
    }
    if let Some(language) = &update.default_language {
        required(language, "Default language")?;
    }
    Ok(())
}

fn validate_security(update: &SecuritySettingsUpdate) -> Result<(), String> {
    if let Some(minutes) = update.session_timeout_minutes {
        within(minutes, 5, 1440, "Session timeout (minutes)")?;
    }
    if let Some(length) = update.password_min_length {
        within(length, 6, 64, "Minimum password length")?;
    }
    if let Some(attempts) = update.max_login_attempts {
        within(attempts, 1, 20, "Maximum login attempts")?;
    }
    Ok(())
}
