//! The catalog search flow: filter first, suggest on a miss.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

use jengamart_core::{CategoryId, StoreError};

use crate::matcher::{SIMILARITY_CUTOFF, best_match};
use crate::product::{Category, Product};

/// Read contract the search flow requires from a catalog store.
///
/// Implementations live in the store crate; tests supply stubs.
#[async_trait]
pub trait CatalogReader: Send + Sync {
    /// Products matching the filter, in the store's native (insertion)
    /// order. Both filter parts optional, AND-composed; the name part is a
    /// case-insensitive unanchored substring.
    async fn list_products(&self, filter: &ProductFilter) -> Result<Vec<Product>, StoreError>;

    /// Every product name in scope, for the matcher only.
    async fn list_candidate_names(
        &self,
        category_id: Option<CategoryId>,
    ) -> Result<Vec<String>, StoreError>;

    /// All categories, ordered by name.
    async fn list_categories(&self) -> Result<Vec<Category>, StoreError>;
}

#[async_trait]
impl<S: CatalogReader + ?Sized> CatalogReader for Arc<S> {
    async fn list_products(&self, filter: &ProductFilter) -> Result<Vec<Product>, StoreError> {
        (**self).list_products(filter).await
    }

    async fn list_candidate_names(
        &self,
        category_id: Option<CategoryId>,
    ) -> Result<Vec<String>, StoreError> {
        (**self).list_candidate_names(category_id).await
    }

    async fn list_categories(&self) -> Result<Vec<Category>, StoreError> {
        (**self).list_categories().await
    }
}

/// Store-level product filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductFilter {
    pub name_contains: Option<String>,
    pub category_id: Option<CategoryId>,
}

/// A shopper's search as it arrives: free-text query plus an optional
/// category scope.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchRequest {
    pub query: String,
    pub category_id: Option<CategoryId>,
}

/// A "did you mean" alternative. `redirect` is the request that would be
/// issued by accepting it: same category scope, query replaced by the
/// matched name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    pub text: String,
    pub redirect: SearchRequest,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub items: Vec<Product>,
    pub suggestion: Option<Suggestion>,
}

/// Stateless search service over a [`CatalogReader`].
#[derive(Debug, Clone)]
pub struct CatalogSearch<S> {
    store: S,
}

impl<S: CatalogReader> CatalogSearch<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Run the two-phase flow: filter, then suggest only when a non-empty
    /// query matched nothing. The candidate pool keeps the request's
    /// category scope, so a suggestion never points outside it.
    pub async fn search(&self, request: &SearchRequest) -> Result<SearchResult, StoreError> {
        let query = request.query.trim();
        let filter = ProductFilter {
            name_contains: (!query.is_empty()).then(|| query.to_string()),
            category_id: request.category_id,
        };

        let items = self.store.list_products(&filter).await?;
        if !items.is_empty() || query.is_empty() {
            return Ok(SearchResult { items, suggestion: None });
        }

        let candidates = self.store.list_candidate_names(request.category_id).await?;
        let suggestion = best_match(
            query,
            candidates.iter().map(String::as_str),
            SIMILARITY_CUTOFF,
        )
        .map(|text| Suggestion {
            text: text.to_string(),
            redirect: SearchRequest {
                query: text.to_string(),
                category_id: request.category_id,
            },
        });

        if let Some(ref s) = suggestion {
            debug!(query, suggestion = %s.text, "no direct match, offering alternative");
        }

        Ok(SearchResult { items, suggestion })
    }
}
