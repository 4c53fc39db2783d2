//! Service wiring: stores, search, sessions and carts.

use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, RwLock};

use tracing::{info, warn};

use jengamart_auth::SessionKeys;
use jengamart_catalog::{CatalogReader, CatalogSearch};
use jengamart_core::{ProductId, UserId};
use jengamart_store::{
    CatalogStore, InMemoryStore, InMemoryUserStore, SqliteStore, UserStore, seed_catalog,
};

/// Startup configuration, read from the environment.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub session_secret: String,
    /// SQLite URL; absent means in-memory stores.
    pub database_url: Option<String>,
    /// Existing account to promote to admin at startup.
    pub admin_email: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let session_secret = std::env::var("SESSION_SECRET").unwrap_or_else(|_| {
            warn!("SESSION_SECRET not set; using insecure dev default");
            "dev-secret".to_string()
        });
        Self {
            session_secret,
            database_url: std::env::var("DATABASE_URL").ok(),
            admin_email: std::env::var("JENGAMART_ADMIN_EMAIL").ok(),
        }
    }
}

/// A shopper's cart. Quantity is fixed at one per product, so the cart is
/// the set of product ids.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cart {
    pub product_ids: Vec<ProductId>,
}

/// Per-user carts, held in process memory for the session's lifetime.
#[derive(Debug, Default)]
pub struct CartStore {
    inner: RwLock<HashMap<UserId, BTreeSet<ProductId>>>,
}

impl CartStore {
    // Cart contents stay consistent under poisoning; recover the guard
    // instead of panicking in a request handler.
    pub fn get(&self, user: UserId) -> Cart {
        let carts = self.inner.read().unwrap_or_else(|e| e.into_inner());
        Cart {
            product_ids: carts
                .get(&user)
                .map(|items| items.iter().copied().collect())
                .unwrap_or_default(),
        }
    }

    pub fn add(&self, user: UserId, product: ProductId) -> Cart {
        let mut carts = self.inner.write().unwrap_or_else(|e| e.into_inner());
        let items = carts.entry(user).or_default();
        items.insert(product);
        Cart { product_ids: items.iter().copied().collect() }
    }

    /// Removing an absent item is a no-op.
    pub fn remove(&self, user: UserId, product: ProductId) -> Cart {
        let mut carts = self.inner.write().unwrap_or_else(|e| e.into_inner());
        let items = carts.entry(user).or_default();
        items.remove(&product);
        Cart { product_ids: items.iter().copied().collect() }
    }
}

pub struct AppServices {
    pub catalog: Arc<dyn CatalogStore>,
    pub users: Arc<dyn UserStore>,
    pub search: CatalogSearch<Arc<dyn CatalogReader>>,
    pub carts: CartStore,
    pub keys: SessionKeys,
}

pub async fn build_services(config: AppConfig) -> anyhow::Result<AppServices> {
    let keys = SessionKeys::from_secret(config.session_secret.as_bytes());

    let (catalog, reader, users): (
        Arc<dyn CatalogStore>,
        Arc<dyn CatalogReader>,
        Arc<dyn UserStore>,
    ) = match &config.database_url {
        Some(url) => {
            let store = Arc::new(SqliteStore::connect(url).await?);
            (store.clone(), store.clone(), store)
        }
        None => {
            info!("DATABASE_URL not set; using in-memory stores");
            let store = Arc::new(InMemoryStore::new());
            (store.clone(), store, Arc::new(InMemoryUserStore::new()))
        }
    };

    seed_catalog(&*catalog).await?;

    if let Some(email) = &config.admin_email {
        match users.find_by_email(email).await? {
            Some(user) => {
                users.grant_admin(user.id).await?;
                info!(email, "promoted bootstrap admin account");
            }
            None => warn!(email, "admin bootstrap account not found; register it first"),
        }
    }

    Ok(AppServices {
        search: CatalogSearch::new(reader),
        catalog,
        users,
        carts: CartStore::default(),
        keys,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cart_deduplicates_and_removes() {
        let carts = CartStore::default();
        let user = UserId::new();
        let a = ProductId::new();
        let b = ProductId::new();

        carts.add(user, a);
        carts.add(user, b);
        carts.add(user, a);
        assert_eq!(carts.get(user).product_ids.len(), 2);

        carts.remove(user, a);
        assert_eq!(carts.get(user).product_ids, vec![b]);
        carts.remove(user, a);
        assert_eq!(carts.get(user).product_ids, vec![b]);
    }

    #[test]
    fn cart_survives_a_poisoned_lock() {
        let carts = CartStore::default();
        let user = UserId::new();
        let product = ProductId::new();
        carts.add(user, product);

        // Panic while holding the write guard to poison the lock.
        let _ = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _guard = carts.inner.write().unwrap();
            panic!("poisoning");
        }));

        assert_eq!(carts.get(user).product_ids, vec![product]);
        carts.add(user, ProductId::new());
        assert_eq!(carts.get(user).product_ids.len(), 2);
    }
}
