use chrono::{DateTime, Utc};
use resource_store::{Filterable, Resource, SortKey};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Server-assigned identifier of a [`Category`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryId(pub String);

impl From<&str> for CategoryId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl Display for CategoryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(&self.0)
    }
}

/// A subject area that documents are filed under.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub color: Option<String>,
    pub is_active: bool,
    #[serde(default)]
    pub document_count: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Category {
    /// Categories that still hold documents cannot be deleted.
    pub fn has_documents(&self) -> bool {
        self.document_count > 0
    }
}

/// Payload for creating a category.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryCreate {
    pub name: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    pub is_active: bool,
}

impl CategoryCreate {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            color: None,
            is_active: true,
        }
    }
}

/// Partial update; absent fields are left alone by the server.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryAction {
    /// `PATCH /categories/{id}/toggle-active`
    SetActive(bool),
}

impl Resource for Category {
    type Id = CategoryId;
    type Create = CategoryCreate;
    type Update = CategoryUpdate;
    type Action = CategoryAction;
    const LABEL: &'static str = "Category";
    const COLLECTION: &'static str = "categories";

    fn id(&self) -> &CategoryId {
        &self.id
    }

    fn display_name(&self) -> String {
        self.name.clone()
    }

    /// Titled from the returned category, since the server has the last word on the flag.
    fn action_title(_action: &CategoryAction, updated: &Self) -> String {
        if updated.is_active {
            "Category activated".to_string()
        } else {
            "Category deactivated".to_string()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategorySort {
    Name,
    DocumentCount,
    CreatedAt,
    UpdatedAt,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryFacet {
    /// "active" or "inactive"
    Status,
}

impl Filterable for Category {
    type SortField = CategorySort;
    type Facet = CategoryFacet;

    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str(), self.description.as_str()]
    }

    fn facet_value(&self, facet: CategoryFacet) -> String {
        match facet {
            CategoryFacet::Status if self.is_active => "active".to_string(),
            CategoryFacet::Status => "inactive".to_string(),
        }
    }

    fn sort_key(&self, field: CategorySort) -> SortKey {
        match field {
            CategorySort::Name => self.name.as_str().into(),
            CategorySort::DocumentCount => SortKey::Number(f64::from(self.document_count)),
            CategorySort::CreatedAt => self.created_at.into(),
            CategorySort::UpdatedAt => self.updated_at.into(),
        }
    }
}
