//! # Domain Model
//!
//! Wire types of the document-management API. Every entity implements
//! [`Resource`](resource_store::Resource) or [`Singleton`](resource_store::Singleton) so a
//! store can mirror it, and list entities implement
//! [`Filterable`](resource_store::Filterable) for the screens' search and sort.
//!
//! JSON uses camelCase field names and RFC 3339 timestamps.

pub mod activity;
pub mod category;
pub mod dashboard;
pub mod document;
pub mod role;
pub mod settings;

pub use activity::*;
pub use category::*;
pub use dashboard::*;
pub use document::*;
pub use role::*;
pub use settings::*;

use serde::Serialize;

/// Payload type of operations a resource does not offer. It has no values, so such
/// requests cannot be built.
#[derive(Debug, Clone, Serialize)]
pub enum ReadOnly {}
