//! `jengamart-core` — shared identifiers and the error model.
//!
//! Everything here is deterministic and free of IO; the storefront crates
//! (catalog, store, auth, api) build on these types.

pub mod error;
pub mod id;

pub use error::{DomainError, DomainResult, StoreError};
pub use id::{CategoryId, ProductId, UserId};
