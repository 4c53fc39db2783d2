//! Request DTOs and JSON mapping helpers.

use serde::Deserialize;
use serde_json::{Value, json};

use jengamart_catalog::{Category, CategoryGroup, Product, Suggestion};
use jengamart_store::User;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct ProductPayload {
    pub name: String,
    pub category_id: String,
    pub price: f64,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image_file: Option<String>,
    #[serde(default)]
    pub featured: bool,
}

#[derive(Debug, Deserialize)]
pub struct CategoryPayload {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct BulkFeaturedRequest {
    pub featured: bool,
}

#[derive(Debug, Deserialize)]
pub struct BulkPricesRequest {
    /// Percentage change, e.g. `10.0` raises every price by 10%.
    pub percent: f64,
}

pub fn product_to_json(product: &Product) -> Value {
    json!({
        "id": product.id.to_string(),
        "name": product.name,
        "category_id": product.category_id.to_string(),
        "price": product.price,
        "description": product.description,
        "image_file": product.image_file,
        "featured": product.featured,
    })
}

pub fn category_to_json(category: &Category) -> Value {
    json!({
        "id": category.id.to_string(),
        "name": category.name,
    })
}

pub fn group_to_json(group: &CategoryGroup) -> Value {
    json!({
        "category": category_to_json(&group.category),
        "products": group.products.iter().map(product_to_json).collect::<Vec<_>>(),
    })
}

pub fn suggestion_to_json(suggestion: &Suggestion) -> Value {
    json!({
        "text": suggestion.text,
        "redirect": {
            "search": suggestion.redirect.query,
            "category": suggestion.redirect.category_id.map(|c| c.to_string()),
        },
    })
}

pub fn user_to_json(user: &User) -> Value {
    json!({
        "id": user.id.to_string(),
        "username": user.username,
        "email": user.email,
        "is_admin": user.is_admin,
        "created_at": user.created_at.to_rfc3339(),
    })
}

pub fn cart_to_json(items: &[Product]) -> Value {
    let total: f64 = items.iter().map(|p| p.price).sum();
    json!({
        "items": items.iter().map(product_to_json).collect::<Vec<_>>(),
        "total": total,
    })
}
