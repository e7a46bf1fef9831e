//! Inventory bookkeeping over the remote store

pub mod filter;
pub mod repo;

pub use filter::filter_items;
pub use repo::{InventoryError, InventoryRepo, Item};
