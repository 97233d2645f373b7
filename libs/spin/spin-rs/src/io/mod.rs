//! Everything that leaves the process: durable storage and the platform store.

pub mod provider;
pub mod store;

pub use provider::{ProviderError, PurchaseProvider};
pub use store::{DiskStore, SpinDb, Store};
