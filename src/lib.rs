//! Pantry Tracker core
//!
//! Backend-facing core of a single-page pantry tracker. It handles:
//! - Inventory bookkeeping (add/remove with quantity accounting)
//! - Item image lifecycle (upload on first add, delete with the last unit)
//! - Search filtering over the in-memory item list
//! - Firestore / Cloud Storage REST access behind a narrow store contract
//!
//! The rendering layer (list, search box, add modal, webcam widget) lives
//! outside this crate and drives it through [`app::AppState`].

pub mod app;
pub mod capture;
pub mod config;
pub mod inventory;
pub mod store;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub use app::AppState;
pub use config::Config;
pub use inventory::{filter_items, InventoryRepo, Item};

/// Initialize tracing/logging
pub fn init_tracing(log_level: &str) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();
}
