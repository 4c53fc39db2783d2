//! SQLite-backed catalog and user store.
//!
//! Ids are stored as their canonical UUID text. UUIDv7 text sorts by
//! creation time, so `ORDER BY id` is insertion order, which is the native
//! order the read contract promises.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::Row;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions, SqliteRow};
use tracing::info;

use jengamart_catalog::{CatalogReader, Category, Product, ProductFilter};
use jengamart_core::{CategoryId, ProductId, StoreError, UserId};

use crate::catalog_store::CatalogStore;
use crate::users::{User, UserStore};

const SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS categories (
        id   TEXT PRIMARY KEY,
        name TEXT NOT NULL UNIQUE
    )",
    "CREATE TABLE IF NOT EXISTS products (
        id          TEXT PRIMARY KEY,
        name        TEXT NOT NULL,
        category_id TEXT NOT NULL REFERENCES categories(id),
        price       REAL NOT NULL,
        description TEXT,
        image_file  TEXT,
        featured    INTEGER NOT NULL DEFAULT 0
    )",
    "CREATE TABLE IF NOT EXISTS users (
        id            TEXT PRIMARY KEY,
        username      TEXT NOT NULL UNIQUE,
        email         TEXT NOT NULL UNIQUE,
        password_hash TEXT NOT NULL,
        is_admin      INTEGER NOT NULL DEFAULT 0,
        created_at    TEXT NOT NULL
    )",
];

const PRODUCT_COLUMNS: &str = "id, name, category_id, price, description, image_file, featured";

pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Connect and run the schema migration.
    pub async fn connect(url: &str) -> Result<Self, StoreError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect(url)
            .await
            .map_err(StoreError::backend)?;
        let store = Self { pool };
        store.migrate().await?;
        info!(url, "connected to sqlite");
        Ok(store)
    }

    /// A private in-memory database. Pooled on a single connection, since
    /// every `:memory:` connection is its own database.
    pub async fn connect_in_memory() -> Result<Self, StoreError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .map_err(StoreError::backend)?;
        let store = Self { pool };
        store.migrate().await?;
        Ok(store)
    }

    async fn migrate(&self) -> Result<(), StoreError> {
        for statement in SCHEMA {
            sqlx::query(statement)
                .execute(&self.pool)
                .await
                .map_err(StoreError::backend)?;
        }
        Ok(())
    }
}

/// Make a user-supplied substring safe for LIKE: `%`, `_` and the escape
/// character itself must match literally, as they do in the in-memory store.
fn escape_like(needle: &str) -> String {
    needle
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

fn product_from_row(row: &SqliteRow) -> Result<Product, StoreError> {
    let id: String = row.try_get("id").map_err(StoreError::backend)?;
    let category_id: String = row.try_get("category_id").map_err(StoreError::backend)?;
    Ok(Product {
        id: id.parse::<ProductId>().map_err(StoreError::backend)?,
        name: row.try_get("name").map_err(StoreError::backend)?,
        category_id: category_id
            .parse::<CategoryId>()
            .map_err(StoreError::backend)?,
        price: row.try_get("price").map_err(StoreError::backend)?,
        description: row.try_get("description").map_err(StoreError::backend)?,
        image_file: row.try_get("image_file").map_err(StoreError::backend)?,
        featured: row.try_get("featured").map_err(StoreError::backend)?,
    })
}

fn category_from_row(row: &SqliteRow) -> Result<Category, StoreError> {
    let id: String = row.try_get("id").map_err(StoreError::backend)?;
    Ok(Category {
        id: id.parse::<CategoryId>().map_err(StoreError::backend)?,
        name: row.try_get("name").map_err(StoreError::backend)?,
    })
}

fn user_from_row(row: &SqliteRow) -> Result<User, StoreError> {
    let id: String = row.try_get("id").map_err(StoreError::backend)?;
    let created_at: String = row.try_get("created_at").map_err(StoreError::backend)?;
    Ok(User {
        id: id.parse::<UserId>().map_err(StoreError::backend)?,
        username: row.try_get("username").map_err(StoreError::backend)?,
        email: row.try_get("email").map_err(StoreError::backend)?,
        password_hash: row.try_get("password_hash").map_err(StoreError::backend)?,
        is_admin: row.try_get("is_admin").map_err(StoreError::backend)?,
        created_at: DateTime::parse_from_rfc3339(&created_at)
            .map_err(StoreError::backend)?
            .with_timezone(&Utc),
    })
}

#[async_trait]
impl CatalogReader for SqliteStore {
    async fn list_products(&self, filter: &ProductFilter) -> Result<Vec<Product>, StoreError> {
        let sql = format!(
            "SELECT {PRODUCT_COLUMNS} FROM products
             WHERE (?1 IS NULL OR lower(name) LIKE '%' || lower(?1) || '%' ESCAPE '\\')
               AND (?2 IS NULL OR category_id = ?2)
             ORDER BY id"
        );
        let rows = sqlx::query(&sql)
            .bind(filter.name_contains.as_deref().map(escape_like))
            .bind(filter.category_id.map(|c| c.to_string()))
            .fetch_all(&self.pool)
            .await
            .map_err(StoreError::backend)?;
        rows.iter().map(product_from_row).collect()
    }

    async fn list_candidate_names(
        &self,
        category_id: Option<CategoryId>,
    ) -> Result<Vec<String>, StoreError> {
        let rows = sqlx::query(
            "SELECT name FROM products WHERE (?1 IS NULL OR category_id = ?1) ORDER BY id",
        )
        .bind(category_id.map(|c| c.to_string()))
        .fetch_all(&self.pool)
        .await
        .map_err(StoreError::backend)?;
        rows.iter()
            .map(|row| row.try_get("name").map_err(StoreError::backend))
            .collect()
    }

    async fn list_categories(&self) -> Result<Vec<Category>, StoreError> {
        let rows = sqlx::query("SELECT id, name FROM categories ORDER BY name")
            .fetch_all(&self.pool)
            .await
            .map_err(StoreError::backend)?;
        rows.iter().map(category_from_row).collect()
    }
}

#[async_trait]
impl CatalogStore for SqliteStore {
    async fn get_product(&self, id: ProductId) -> Result<Option<Product>, StoreError> {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?1");
        let row = sqlx::query(&sql)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(StoreError::backend)?;
        row.as_ref().map(product_from_row).transpose()
    }

    async fn insert_product(&self, product: Product) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO products (id, name, category_id, price, description, image_file, featured)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        )
        .bind(product.id.to_string())
        .bind(&product.name)
        .bind(product.category_id.to_string())
        .bind(product.price)
        .bind(&product.description)
        .bind(&product.image_file)
        .bind(product.featured)
        .execute(&self.pool)
        .await
        .map_err(StoreError::backend)?;
        Ok(())
    }

    async fn update_product(&self, product: Product) -> Result<bool, StoreError> {
        let result = sqlx::query(
            "UPDATE products
             SET name = ?2, category_id = ?3, price = ?4, description = ?5,
                 image_file = ?6, featured = ?7
             WHERE id = ?1",
        )
        .bind(product.id.to_string())
        .bind(&product.name)
        .bind(product.category_id.to_string())
        .bind(product.price)
        .bind(&product.description)
        .bind(&product.image_file)
        .bind(product.featured)
        .execute(&self.pool)
        .await
        .map_err(StoreError::backend)?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_product(&self, id: ProductId) -> Result<Option<Product>, StoreError> {
        let existing = self.get_product(id).await?;
        if existing.is_some() {
            sqlx::query("DELETE FROM products WHERE id = ?1")
                .bind(id.to_string())
                .execute(&self.pool)
                .await
                .map_err(StoreError::backend)?;
        }
        Ok(existing)
    }

    async fn product_name_exists(
        &self,
        name: &str,
        exclude: Option<ProductId>,
    ) -> Result<bool, StoreError> {
        let row = sqlx::query(
            "SELECT 1 FROM products WHERE name = ?1 AND (?2 IS NULL OR id <> ?2) LIMIT 1",
        )
        .bind(name)
        .bind(exclude.map(|id| id.to_string()))
        .fetch_optional(&self.pool)
        .await
        .map_err(StoreError::backend)?;
        Ok(row.is_some())
    }

    async fn list_featured(&self) -> Result<Vec<Product>, StoreError> {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE featured = 1 ORDER BY id");
        let rows = sqlx::query(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(StoreError::backend)?;
        rows.iter().map(product_from_row).collect()
    }

    async fn related_products(
        &self,
        category_id: CategoryId,
        exclude: ProductId,
        limit: usize,
    ) -> Result<Vec<Product>, StoreError> {
        let sql = format!(
            "SELECT {PRODUCT_COLUMNS} FROM products
             WHERE category_id = ?1 AND id <> ?2
             ORDER BY id LIMIT ?3"
        );
        let rows = sqlx::query(&sql)
            .bind(category_id.to_string())
            .bind(exclude.to_string())
            .bind(limit as i64)
            .fetch_all(&self.pool)
            .await
            .map_err(StoreError::backend)?;
        rows.iter().map(product_from_row).collect()
    }

    async fn products_by_ids(&self, ids: &[ProductId]) -> Result<Vec<Product>, StoreError> {
        // Carts are small; resolve one by one to keep the ids' order.
        let mut products = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(product) = self.get_product(*id).await? {
                products.push(product);
            }
        }
        Ok(products)
    }

    async fn upsert_category(&self, name: &str) -> Result<Category, StoreError> {
        sqlx::query("INSERT INTO categories (id, name) VALUES (?1, ?2) ON CONFLICT(name) DO NOTHING")
            .bind(CategoryId::new().to_string())
            .bind(name)
            .execute(&self.pool)
            .await
            .map_err(StoreError::backend)?;
        let row = sqlx::query("SELECT id, name FROM categories WHERE name = ?1")
            .bind(name)
            .fetch_one(&self.pool)
            .await
            .map_err(StoreError::backend)?;
        category_from_row(&row)
    }

    async fn set_all_featured(&self, featured: bool) -> Result<u64, StoreError> {
        let result = sqlx::query("UPDATE products SET featured = ?1")
            .bind(featured)
            .execute(&self.pool)
            .await
            .map_err(StoreError::backend)?;
        Ok(result.rows_affected())
    }

    async fn adjust_all_prices(&self, percent: f64) -> Result<u64, StoreError> {
        let result = sqlx::query("UPDATE products SET price = price * (1.0 + ?1 / 100.0)")
            .bind(percent)
            .execute(&self.pool)
            .await
            .map_err(StoreError::backend)?;
        Ok(result.rows_affected())
    }
}

#[async_trait]
impl UserStore for SqliteStore {
    async fn create_user(&self, user: User) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO users (id, username, email, password_hash, is_admin, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        )
        .bind(user.id.to_string())
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.is_admin)
        .bind(user.created_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(StoreError::backend)?;
        Ok(())
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, StoreError> {
        let row = sqlx::query("SELECT * FROM users WHERE id = ?1")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(StoreError::backend)?;
        row.as_ref().map(user_from_row).transpose()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let row = sqlx::query("SELECT * FROM users WHERE email = ?1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(StoreError::backend)?;
        row.as_ref().map(user_from_row).transpose()
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let row = sqlx::query("SELECT * FROM users WHERE username = ?1")
            .bind(username)
            .fetch_optional(&self.pool)
            .await
            .map_err(StoreError::backend)?;
        row.as_ref().map(user_from_row).transpose()
    }

    async fn grant_admin(&self, id: UserId) -> Result<bool, StoreError> {
        let result = sqlx::query("UPDATE users SET is_admin = 1 WHERE id = ?1")
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(StoreError::backend)?;
        Ok(result.rows_affected() > 0)
    }
}
