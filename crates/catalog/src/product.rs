use serde::{Deserialize, Serialize};

use jengamart_core::{CategoryId, DomainError, DomainResult, ProductId};

/// A catalog product. Belongs to exactly one category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub category_id: CategoryId,
    /// Non-negative, finite. Stored as REAL by the SQLite store.
    pub price: f64,
    pub description: Option<String>,
    /// Reference into the image-asset collaborator; lifecycle is theirs.
    pub image_file: Option<String>,
    pub featured: bool,
}

/// A catalog category. Display name is unique.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
}

/// Validated input for creating or replacing a product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductDraft {
    pub name: String,
    pub category_id: CategoryId,
    pub price: f64,
    pub description: Option<String>,
    pub image_file: Option<String>,
    pub featured: bool,
}

impl ProductDraft {
    pub fn validate(&self) -> DomainResult<()> {
        if self.name.trim().is_empty() {
            return Err(DomainError::validation("name cannot be empty"));
        }
        if !self.price.is_finite() {
            return Err(DomainError::validation("price must be a finite number"));
        }
        if self.price < 0.0 {
            return Err(DomainError::validation("price cannot be negative"));
        }
        Ok(())
    }

    /// Validate and materialize a product under the given id.
    pub fn into_product(self, id: ProductId) -> DomainResult<Product> {
        self.validate()?;
        Ok(Product {
            id,
            name: self.name.trim().to_string(),
            category_id: self.category_id,
            price: self.price,
            description: self.description,
            image_file: self.image_file,
            featured: self.featured,
        })
    }
}
