//! In-memory stores for tests and database-less dev runs.

use std::sync::RwLock;

use async_trait::async_trait;

use jengamart_catalog::{CatalogReader, Category, Product, ProductFilter};
use jengamart_core::{CategoryId, ProductId, StoreError, UserId};

use crate::catalog_store::CatalogStore;
use crate::users::{User, UserStore};

fn poisoned() -> StoreError {
    StoreError::backend(anyhow::anyhow!("store lock poisoned"))
}

#[derive(Debug, Default)]
struct CatalogData {
    // Vecs keep insertion order, the native order of the store.
    products: Vec<Product>,
    categories: Vec<Category>,
}

/// Catalog store backed by process memory.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    inner: RwLock<CatalogData>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CatalogReader for InMemoryStore {
    async fn list_products(&self, filter: &ProductFilter) -> Result<Vec<Product>, StoreError> {
        let data = self.inner.read().map_err(|_| poisoned())?;
        let needle = filter.name_contains.as_ref().map(|n| n.to_lowercase());
        Ok(data
            .products
            .iter()
            .filter(|p| match &needle {
                Some(needle) => p.name.to_lowercase().contains(needle),
                None => true,
            })
            .filter(|p| filter.category_id.is_none_or(|c| p.category_id == c))
            .cloned()
            .collect())
    }

    async fn list_candidate_names(
        &self,
        category_id: Option<CategoryId>,
    ) -> Result<Vec<String>, StoreError> {
        let data = self.inner.read().map_err(|_| poisoned())?;
        Ok(data
            .products
            .iter()
            .filter(|p| category_id.is_none_or(|c| p.category_id == c))
            .map(|p| p.name.clone())
            .collect())
    }

    async fn list_categories(&self) -> Result<Vec<Category>, StoreError> {
        let data = self.inner.read().map_err(|_| poisoned())?;
        let mut categories = data.categories.clone();
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(categories)
    }
}

#[async_trait]
impl CatalogStore for InMemoryStore {
    async fn get_product(&self, id: ProductId) -> Result<Option<Product>, StoreError> {
        let data = self.inner.read().map_err(|_| poisoned())?;
        Ok(data.products.iter().find(|p| p.id == id).cloned())
    }

    async fn insert_product(&self, product: Product) -> Result<(), StoreError> {
        let mut data = self.inner.write().map_err(|_| poisoned())?;
        data.products.push(product);
        Ok(())
    }

    async fn update_product(&self, product: Product) -> Result<bool, StoreError> {
        let mut data = self.inner.write().map_err(|_| poisoned())?;
        match data.products.iter_mut().find(|p| p.id == product.id) {
            Some(slot) => {
                *slot = product;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_product(&self, id: ProductId) -> Result<Option<Product>, StoreError> {
        let mut data = self.inner.write().map_err(|_| poisoned())?;
        let index = data.products.iter().position(|p| p.id == id);
        Ok(index.map(|i| data.products.remove(i)))
    }

    async fn product_name_exists(
        &self,
        name: &str,
        exclude: Option<ProductId>,
    ) -> Result<bool, StoreError> {
        let data = self.inner.read().map_err(|_| poisoned())?;
        Ok(data
            .products
            .iter()
            .any(|p| p.name == name && exclude != Some(p.id)))
    }

    async fn list_featured(&self) -> Result<Vec<Product>, StoreError> {
        let data = self.inner.read().map_err(|_| poisoned())?;
        Ok(data.products.iter().filter(|p| p.featured).cloned().collect())
    }

    async fn related_products(
        &self,
        category_id: CategoryId,
        exclude: ProductId,
        limit: usize,
    ) -> Result<Vec<Product>, StoreError> {
        let data = self.inner.read().map_err(|_| poisoned())?;
        Ok(data
            .products
            .iter()
            .filter(|p| p.category_id == category_id && p.id != exclude)
            .take(limit)
            .cloned()
            .collect())
    }

    async fn products_by_ids(&self, ids: &[ProductId]) -> Result<Vec<Product>, StoreError> {
        let data = self.inner.read().map_err(|_| poisoned())?;
        Ok(ids
            .iter()
            .filter_map(|id| data.products.iter().find(|p| p.id == *id).cloned())
            .collect())
    }

    async fn upsert_category(&self, name: &str) -> Result<Category, StoreError> {
        let mut data = self.inner.write().map_err(|_| poisoned())?;
        if let Some(existing) = data.categories.iter().find(|c| c.name == name) {
            return Ok(existing.clone());
        }
        let category = Category { id: CategoryId::new(), name: name.to_string() };
        data.categories.push(category.clone());
        Ok(category)
    }

    async fn set_all_featured(&self, featured: bool) -> Result<u64, StoreError> {
        let mut data = self.inner.write().map_err(|_| poisoned())?;
        for product in &mut data.products {
            product.featured = featured;
        }
        Ok(data.products.len() as u64)
    }

    async fn adjust_all_prices(&self, percent: f64) -> Result<u64, StoreError> {
        let mut data = self.inner.write().map_err(|_| poisoned())?;
        let factor = 1.0 + percent / 100.0;
        for product in &mut data.products {
            product.price *= factor;
        }
        Ok(data.products.len() as u64)
    }
}

/// User store backed by process memory.
#[derive(Debug, Default)]
pub struct InMemoryUserStore {
    inner: RwLock<Vec<User>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn create_user(&self, user: User) -> Result<(), StoreError> {
        let mut users = self.inner.write().map_err(|_| poisoned())?;
        users.push(user);
        Ok(())
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, StoreError> {
        let users = self.inner.read().map_err(|_| poisoned())?;
        Ok(users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let users = self.inner.read().map_err(|_| poisoned())?;
        Ok(users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let users = self.inner.read().map_err(|_| poisoned())?;
        Ok(users.iter().find(|u| u.username == username).cloned())
    }

    async fn grant_admin(&self, id: UserId) -> Result<bool, StoreError> {
        let mut users = self.inner.write().map_err(|_| poisoned())?;
        match users.iter_mut().find(|u| u.id == id) {
            Some(user) => {
                user.is_admin = true;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
