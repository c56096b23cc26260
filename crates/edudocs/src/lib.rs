//! # EduDocs
//!
//! Client core of an educational document-management application: categories,
//! documents, dashboard statistics, settings and activity logs, mirrored from a REST API
//! by [`resource_store`] actors.
//!
//! ## Layers
//!
//! - **[model]**: wire types, each a `Resource` or `Singleton`.
//! - **[http]**: reqwest bindings of the store API traits.
//! - **[clients]**: typed wrappers (e.g. [`CategoryClient`](clients::CategoryClient)) over the generic store clients.
//! - **[screens]**: headless page models with search, filters, sort and caller-side checks.
//! - **[lifecycle]**: starts, wires and stops all stores.
//! - **[config]**: environment configuration.

pub mod clients;
pub mod config;
pub mod error;
pub mod http;
pub mod lifecycle;
pub mod model;
pub mod screens;
