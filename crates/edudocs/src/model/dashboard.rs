use super::ReadOnly;
use resource_store::Singleton;
use serde::{Deserialize, Serialize};

/// Platform-wide counters shown to admins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminStats {
    pub total_users: u32,
    pub total_documents: u32,
    pub total_categories: u32,
    #[serde(default)]
    pub flagged_documents: u32,
    #[serde(default)]
    pub total_downloads: u64,
    #[serde(default)]
    pub recent_uploads: u32,
}

impl Singleton for AdminStats {
    type Update = ReadOnly;
    const LABEL: &'static str = "Dashboard statistics";
}

/// A teacher's own upload counters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeacherStats {
    pub my_documents: u32,
    #[serde(default)]
    pub my_downloads: u64,
    #[serde(default)]
    pub draft_documents: u32,
    #[serde(default)]
    pub published_documents: u32,
}

impl Singleton for TeacherStats {
    type Update = ReadOnly;
    const LABEL: &'static str = "Dashboard statistics";
}

/// The dashboard variant for the signed-in role.
#[derive(Debug, Clone, PartialEq)]
pub enum DashboardStats {
    Admin(AdminStats),
    Teacher(TeacherStats),
}

impl DashboardStats {
    /// Label/value rows in display order.
    pub fn rows(&self) -> Vec<(&'static str, String)> {
        match self {
            DashboardStats::Admin(s) => vec![
                ("Users", s.total_users.to_string()),
                ("Documents", s.total_documents.to_string()),
                ("Categories", s.total_categories.to_string()),
                ("Flagged documents", s.flagged_documents.to_string()),
                ("Downloads", s.total_downloads.to_string()),
                ("Uploads this week", s.recent_uploads.to_string()),
            ],
            DashboardStats::Teacher(s) => vec![
                ("My documents", s.my_documents.to_string()),
                ("Published", s.published_documents.to_string()),
                ("Drafts", s.draft_documents.to_string()),
                ("Downloads", s.my_downloads.to_string()),
            ],
        }
    }
}
