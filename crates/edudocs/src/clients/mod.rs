//! # Resource Clients
//!
//! Typed wrappers around the generic store clients. Each exposes the operations of one
//! resource under domain names and maps failures into the resource's error type.

pub mod category_client;
pub mod dashboard_client;
pub mod document_client;
pub mod settings_client;

pub use category_client::CategoryClient;
pub use dashboard_client::DashboardClient;
pub use document_client::DocumentClient;
pub use settings_client::{ActivityLogClient, SettingsClient};
