use super::category::CategoryId;
use chrono::{DateTime, Utc};
use resource_store::{Filterable, Resource, SortKey};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Server-assigned identifier of a [`Document`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(pub String);

impl From<&str> for DocumentId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl Display for DocumentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentStatus {
    Draft,
    Published,
    Archived,
}

impl DocumentStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            DocumentStatus::Draft => "draft",
            DocumentStatus::Published => "published",
            DocumentStatus::Archived => "archived",
        }
    }
}

impl Display for DocumentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

/// An uploaded teaching document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: DocumentId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub category_id: CategoryId,
    #[serde(default)]
    pub category_name: Option<String>,
    pub file_name: String,
    pub file_type: String,
    /// Bytes.
    pub file_size: u64,
    pub uploaded_by: String,
    pub status: DocumentStatus,
    #[serde(default)]
    pub is_flagged: bool,
    #[serde(default)]
    pub flag_reason: Option<String>,
    #[serde(default)]
    pub download_count: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Document {
    pub fn is_archived(&self) -> bool {
        self.status == DocumentStatus::Archived
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentCreate {
    pub title: String,
    pub description: String,
    pub category_id: CategoryId,
    pub file_name: String,
    pub file_type: String,
    pub file_size: u64,
    pub status: DocumentStatus,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<CategoryId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<DocumentStatus>,
}

/// Moderation actions on a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentAction {
    /// `PATCH /documents/{id}/flag`
    Flag { reason: String },
    Unflag,
    /// `PATCH /documents/{id}/archive`
    Archive,
    Restore,
}

impl Resource for Document {
    type Id = DocumentId;
    type Create = DocumentCreate;
    type Update = DocumentUpdate;
    type Action = DocumentAction;
    const LABEL: &'static str = "Document";
    const COLLECTION: &'static str = "documents";

    fn id(&self) -> &DocumentId {
        &self.id
    }

    fn display_name(&self) -> String {
        self.title.clone()
    }

    fn action_title(action: &DocumentAction, _updated: &Self) -> String {
        match action {
            DocumentAction::Flag { .. } => "Document flagged",
            DocumentAction::Unflag => "Document unflagged",
            DocumentAction::Archive => "Document archived",
            DocumentAction::Restore => "Document restored",
        }
        .to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentSort {
    Title,
    CreatedAt,
    UpdatedAt,
    FileSize,
    Downloads,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFacet {
    Category,
    Status,
    /// "flagged" or "clean"
    Flagged,
    FileType,
}

impl Filterable for Document {
    type SortField = DocumentSort;
    type Facet = DocumentFacet;

    fn search_fields(&self) -> Vec<&str> {
        vec![
            self.title.as_str(),
            self.description.as_str(),
            self.file_name.as_str(),
            self.uploaded_by.as_str(),
        ]
    }

    fn facet_value(&self, facet: DocumentFacet) -> String {
        match facet {
            DocumentFacet::Category => self.category_id.to_string(),
            DocumentFacet::Status => self.status.to_string(),
            DocumentFacet::Flagged if self.is_flagged => "flagged".to_string(),
            DocumentFacet::Flagged => "clean".to_string(),
            DocumentFacet::FileType => self.file_type.to_lowercase(),
        }
    }

    fn sort_key(&self, field: DocumentSort) -> SortKey {
        match field {
            DocumentSort::Title => self.title.as_str().into(),
            DocumentSort::CreatedAt => self.created_at.into(),
            DocumentSort::UpdatedAt => self.updated_at.into(),
            DocumentSort::FileSize => SortKey::Number(self.file_size as f64),
            DocumentSort::Downloads => SortKey::Number(f64::from(self.download_count)),
        }
    }
}
