//! Settings pages. Each page is a separate server document with a partial update.

use resource_store::Singleton;
use serde::{Deserialize, Serialize};

/// Site-wide options. Admin only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemSettings {
    pub site_name: String,
    pub max_upload_size_mb: u32,
    #[serde(default)]
    pub allowed_file_types: Vec<String>,
    #[serde(default)]
    pub maintenance_mode: bool,
    pub default_language: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemSettingsUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub site_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_upload_size_mb: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowed_file_types: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maintenance_mode: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_language: Option<String>,
}

impl Singleton for SystemSettings {
    type Update = SystemSettingsUpdate;
    const LABEL: &'static str = "System settings";
}

/// Login and session policy. Admin only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecuritySettings {
    pub session_timeout_minutes: u32,
    pub password_min_length: u32,
    #[serde(default)]
    pub require_two_factor: bool,
    pub max_login_attempts: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SecuritySettingsUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_timeout_minutes: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password_min_length: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub require_two_factor: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_login_attempts: Option<u32>,
}

impl Singleton for SecuritySettings {
    type Update = SecuritySettingsUpdate;
    const LABEL: &'static str = "Security settings";
}

/// Personal notification preferences. Teacher only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationSettings {
    pub email_notifications: bool,
    pub new_document_alerts: bool,
    pub weekly_digest: bool,
    pub flagged_content_alerts: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationSettingsUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_notifications: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_document_alerts: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weekly_digest: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flagged_content_alerts: Option<bool>,
}

impl Singleton for NotificationSettings {
    type Update = NotificationSettingsUpdate;
    const LABEL: &'static str = "Notification settings";
}
