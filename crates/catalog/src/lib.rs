//! `jengamart-catalog` — catalog domain and the search-and-suggestion core.
//!
//! This crate contains the storefront's search flow: the product/category
//! model, the approximate string matcher behind the "did you mean"
//! suggestion, the search service orchestrating both against a
//! [`CatalogReader`], and the category grouping used for display. It is
//! deterministic domain logic (no HTTP, no storage).

pub mod grouping;
pub mod matcher;
pub mod product;
pub mod search;

pub use grouping::{CategoryGroup, group_by_category};
pub use matcher::{SIMILARITY_CUTOFF, best_match, close_matches, sequence_ratio};
pub use product::{Category, Product, ProductDraft};
pub use search::{CatalogReader, CatalogSearch, ProductFilter, SearchRequest, SearchResult, Suggestion};
