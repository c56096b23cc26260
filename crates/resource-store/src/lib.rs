//! # Resource Store
//!
//! Client-side mirrors of server collections, built on the **Actor Model**. Each
//! collection (categories, documents, ...) is owned by one [`ResourceActor`] that fetches
//! it, applies server-confirmed mutations, and publishes `{ data, is_loading, error }`
//! for views to read.
//!
//! ## Architecture Overview
//!
//! 1. **Entity Layer** ([`Resource`], [`Singleton`]) - what is mirrored and how it is named
//! 2. **Binding Layer** ([`ResourceApi`], [`SingletonApi`]) - how the server is reached
//! 3. **Runtime Layer** ([`ResourceActor`], [`SingletonActor`]) - sequencing and reconciliation
//! 4. **Interface Layer** ([`ResourceClient`], [`StoreClient`]) - type-safe requests and reads
//!
//! ## Reconciliation
//!
//! The store never guesses. A mutation changes the mirror only after the server confirmed
//! it, and only with the entity the server returned. A failed call leaves the mirror as it
//! was, sets `error`, and emits one error [`Notification`]. Every successful mutation emits
//! one success notification.
//!
//! Responses can arrive in any order. Sequence tokens decide what still applies: see
//! [`state`] for the rules.
//!
//! ## Quick Start
//!
//! ```rust
//! use resource_store::mock::{MockApi, RecordingNotifier};
//! use resource_store::{Resource, ResourceActor, Severity};
//! use std::sync::Arc;
//!
//! #[derive(Clone, Debug, PartialEq)]
//! struct Room { id: u32, name: String }
//!
//! impl Resource for Room {
//!     type Id = u32;
//!     type Create = String;
//!     type Update = String;
//!     type Action = std::convert::Infallible;
//!     const LABEL: &'static str = "Room";
//!     const COLLECTION: &'static str = "rooms";
//!     fn id(&self) -> &u32 { &self.id }
//!     fn display_name(&self) -> String { self.name.clone() }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let api = MockApi::<Room>::new();
//!     api.expect_list().return_ok(vec![Room { id: 1, name: "Lab".into() }]);
//!     api.expect_create().return_ok(Room { id: 2, name: "Library".into() });
//!
//!     let notifier = RecordingNotifier::new();
//!     let (actor, client) = ResourceActor::new(10);
//!     tokio::spawn(actor.run(Arc::new(api), Arc::new(notifier.clone())));
//!
//!     client.fetch_all().await.unwrap();
//!     client.create("Library".into()).await.unwrap();
//!
//!     assert_eq!(client.items().len(), 2);
//!     assert_eq!(notifier.last().unwrap().description, "\"Library\" has been created.");
//!     assert_eq!(notifier.count(Severity::Success), 1);
//! }
//! ```
//!
//! ## Testing
//!
//! The [`mock`] module scripts endpoint responses in memory, including when each one
//! resolves, so races between requests can be tested deterministically.

pub mod actor;
pub mod api;
pub mod client;
pub mod client_trait;
pub mod entity;
pub mod envelope;
pub mod error;
pub mod filter;
pub mod message;
pub mod mock;
pub mod notify;
pub mod singleton;
pub mod state;
pub mod tracing;

// Re-export core types for convenience
pub use actor::ResourceActor;
pub use api::{ResourceApi, SingletonApi};
pub use client::{ResourceClient, SingletonClient};
pub use client_trait::StoreClient;
pub use entity::{Operation, Resource, Singleton};
pub use envelope::{ApiError, ApiResult, Envelope};
pub use error::{FailureKind, StoreError};
pub use filter::{Direction, Filterable, ListQuery, SortKey};
pub use message::{ResourceRequest, Response, SingletonRequest};
pub use notify::{ChannelNotifier, Notification, Notifier, Severity, TracingNotifier};
pub use singleton::SingletonActor;
pub use state::{StoreState, Token};
