//! `jengamart-store` — catalog and user storage.
//!
//! Two implementations of the catalog contracts: [`SqliteStore`] for real
//! deployments and [`InMemoryStore`] for tests and quick dev runs. Both
//! honor the same native-order guarantee: products come back in insertion
//! order (UUIDv7 ids make that the primary-key order).

pub mod catalog_store;
pub mod memory;
pub mod seed;
pub mod sqlite;
pub mod users;

pub use catalog_store::CatalogStore;
pub use memory::{InMemoryStore, InMemoryUserStore};
pub use seed::seed_catalog;
pub use sqlite::SqliteStore;
pub use users::{User, UserStore};
