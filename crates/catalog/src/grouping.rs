//! Category grouping for display.

use serde::{Deserialize, Serialize};

use crate::product::{Category, Product};

/// A category together with the products that belong to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryGroup {
    pub category: Category,
    pub products: Vec<Product>,
}

/// Partition `products` into one group per entry of `categories`, keeping
/// the categories' order and each product's input order within its group.
/// Categories with no products stay as empty groups. A product referencing
/// a category not in the list is skipped.
pub fn group_by_category(products: &[Product], categories: &[Category]) -> Vec<CategoryGroup> {
    let mut groups: Vec<CategoryGroup> = categories
        .iter()
        .map(|category| CategoryGroup {
            category: category.clone(),
            products: Vec::new(),
        })
        .collect();

    for product in products {
        if let Some(group) = groups
            .iter_mut()
            .find(|g| g.category.id == product.category_id)
        {
            group.products.push(product.clone());
        }
    }

    groups
}
