//! # System Lifecycle
//!
//! [`AppSystem`] creates one store per resource, starts each with its endpoint binding
//! and the shared notifier, and hands out the typed clients and the screens built on them.
//!
//! ## Wiring
//!
//! Stores are created without dependencies and receive them when they start
//! (`actor.run(api, notifier)`), so the same wiring runs against REST bindings in
//! production and against [`mock`](resource_store::mock) APIs in tests:
//!
//! ```rust,ignore
//! let system = AppSystem::connect(&config, Arc::new(TracingNotifier))?;     // REST
//! let system = AppSystem::with_apis(apis, Role::Admin, 10, notifier);        // anything else
//! ```
//!
//! ## Graceful Shutdown
//!
//! A store stops once all of its clients are dropped and its in-flight requests have
//! settled. [`AppSystem::shutdown`] drops the system's clients and awaits every store, so
//! screens (which hold client clones) must be dropped first.

pub mod app_system;

pub use app_system::*;
