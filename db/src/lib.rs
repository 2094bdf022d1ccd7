//! Persistence for the Signet admin surface.

pub mod storage;

pub use storage::{MemoryStorage, MongoDbStorage, ProvisionerStore, Storage, StoreError};
