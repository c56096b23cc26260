//! # Observability & Tracing
//!
//! Every store logs through `tracing` with structured fields instead of module paths:
//! `entity_type` names the store, `token` the request sequence number, `id` the entity.
//!
//! ```bash
//! RUST_LOG=info edudocs categories    # one line per reconciled response
//! RUST_LOG=debug edudocs categories   # request payloads and superseded fetches
//! ```
//!
//! With `RUST_LOG=debug` a create against the category store reads:
//!
//! ```text
//! DEBUG Create entity_type="Category" token=3 params=CategoryCreate { name: "Physics", .. }
//! INFO Created entity_type="Category" token=3 id=cat-7 size=5
//! ```
//!
//! A fetch overtaken by a newer fetch, or by a reconciled mutation, shows up as
//! `DEBUG Fetch superseded` and changes nothing.

use tracing_subscriber::EnvFilter;

/// Initializes the global subscriber: `RUST_LOG` filtering (default `info`), compact
/// lines, no module targets.
///
/// Calling it twice is harmless, which lets tests and binaries share it.
pub fn setup_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false) // entity_type identifies the store
        .compact()
        .try_init();
}
