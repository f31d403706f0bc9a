//! Document-store backends for kyoka patients and authorization requests

pub mod error;
pub mod redb_store;
pub mod sqlite_store;

pub use error::{Result, StoreError};
pub use redb_store::RedbStore;
pub use sqlite_store::SqliteStore;
