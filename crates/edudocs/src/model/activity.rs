use super::ReadOnly;
use chrono::{DateTime, Utc};
use resource_store::{Filterable, Resource, SortKey};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActivityLogId(pub String);

impl Display for ActivityLogId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(&self.0)
    }
}

/// One audited user action. Read-only; admins see these on the settings page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityLog {
    pub id: ActivityLogId,
    pub user_name: String,
    pub action: String,
    pub target: String,
    #[serde(default)]
    pub details: Option<String>,
    #[serde(default)]
    pub ip_address: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Resource for ActivityLog {
    type Id = ActivityLogId;
    type Create = ReadOnly;
    type Update = ReadOnly;
    type Action = ReadOnly;
    const LABEL: &'static str = "Activity log";
    const COLLECTION: &'static str = "activity logs";

    fn id(&self) -> &ActivityLogId {
        &self.id
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivitySort {
    CreatedAt,
    UserName,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityFacet {
    Action,
}

impl Filterable for ActivityLog {
    type SortField = ActivitySort;
    type Facet = ActivityFacet;

    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![
            self.user_name.as_str(),
            self.action.as_str(),
            self.target.as_str(),
        ];
        if let Some(details) = &self.details {
            fields.push(details.as_str());
        }
        fields
    }

    fn facet_value(&self, facet: ActivityFacet) -> String {
        match facet {
            ActivityFacet::Action => self.action.clone(),
        }
    }

    fn sort_key(&self, field: ActivitySort) -> SortKey {
        match field {
            ActivitySort::CreatedAt => self.created_at.into(),
            ActivitySort::UserName => self.user_name.as_str().into(),
        }
    }
}
