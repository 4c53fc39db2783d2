//! Full catalog store contract: the read side plus admin mutations.

use async_trait::async_trait;

use jengamart_catalog::{CatalogReader, Category, Product};
use jengamart_core::{CategoryId, ProductId, StoreError};

/// Everything a catalog store can do. The read half is the search flow's
/// [`CatalogReader`]; the rest serves the storefront pages and the admin
/// dashboard.
#[async_trait]
pub trait CatalogStore: CatalogReader {
    async fn get_product(&self, id: ProductId) -> Result<Option<Product>, StoreError>;

    async fn insert_product(&self, product: Product) -> Result<(), StoreError>;

    /// Replace the stored row; `false` when no row has that id.
    async fn update_product(&self, product: Product) -> Result<bool, StoreError>;

    /// Remove and return the row, so the caller can release its image
    /// reference.
    async fn delete_product(&self, id: ProductId) -> Result<Option<Product>, StoreError>;

    /// Exact-name duplicate check; `exclude` skips the row being edited.
    async fn product_name_exists(
        &self,
        name: &str,
        exclude: Option<ProductId>,
    ) -> Result<bool, StoreError>;

    async fn list_featured(&self) -> Result<Vec<Product>, StoreError>;

    /// Up to `limit` other products from the same category.
    async fn related_products(
        &self,
        category_id: CategoryId,
        exclude: ProductId,
        limit: usize,
    ) -> Result<Vec<Product>, StoreError>;

    /// Resolve ids to products, keeping the ids' order; unknown ids are
    /// silently dropped.
    async fn products_by_ids(&self, ids: &[ProductId]) -> Result<Vec<Product>, StoreError>;

    /// Return the category with this name, creating it first if absent.
    async fn upsert_category(&self, name: &str) -> Result<Category, StoreError>;

    /// Flip the featured flag on every product; returns rows touched.
    async fn set_all_featured(&self, featured: bool) -> Result<u64, StoreError>;

    /// Scale every price by `percent` (e.g. `10.0` raises prices 10%);
    /// returns rows touched.
    async fn adjust_all_prices(&self, percent: f64) -> Result<u64, StoreError>;
}
