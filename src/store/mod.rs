//! Data store modules for the hosted Firebase backend

pub mod firebase;
pub mod memory;
pub mod remote;

pub use firebase::FirebaseClient;
pub use memory::MemoryStore;
pub use remote::{JsonMap, RemoteStore, StoreError};
