//! Initial hardware catalog, loaded into an empty store at startup.

use tracing::info;

use jengamart_catalog::{Product, ProductFilter};
use jengamart_core::{ProductId, StoreError};

use crate::catalog_store::CatalogStore;

struct SeedProduct {
    name: &'static str,
    category: &'static str,
    price: f64,
    featured: bool,
}

const fn item(name: &'static str, category: &'static str, price: f64) -> SeedProduct {
    SeedProduct { name, category, price, featured: false }
}

const fn featured(name: &'static str, category: &'static str, price: f64) -> SeedProduct {
    SeedProduct { name, category, price, featured: true }
}

const SEED: &[SeedProduct] = &[
    featured("Bamburi Nguvu Cement 50kg", "CEMENT", 885.0),
    item("Bamburi Fundi Cement 50kg", "CEMENT", 790.0),
    item("Bamburi Tembo Cement 50kg", "CEMENT", 850.0),
    item("Simba Cement 32.5R 50kg", "CEMENT", 950.0),
    featured("Deformed Steel Bar D8 (12m)", "STEEL", 450.0),
    item("Deformed Steel Bar D10 (12m)", "STEEL", 600.0),
    item("Deformed Steel Bar D12 (12m)", "STEEL", 900.0),
    item("High Tensile Steel 16mm", "STEEL", 145.0),
    featured("Cypress Timber 4x2", "WOOD", 55.0),
    item("Pine Timber 4x2", "WOOD", 38.0),
    item("Cypress Timber 2x2", "WOOD", 28.0),
    item("PVC Pipe 32mm (6m)", "PLUMBING", 350.0),
    item("PVC Pipe 110mm (6m)", "PLUMBING", 2730.0),
    item("HDPE Coupling 50mm", "PLUMBING", 550.0),
    item("PVC Electrical Conduit 20mm (4m)", "ELECTRICAL", 120.0),
    item("Flexible Conduit 25mm (roll)", "ELECTRICAL", 2500.0),
    item("Fine Sand", "AGGREGATES", 3609.0),
    item("Ballast / Coarse Aggregate", "AGGREGATES", 4467.0),
];

/// Seed the catalog if it is empty. Returns the number of products added
/// (zero when the store already has data).
pub async fn seed_catalog<S>(store: &S) -> Result<u64, StoreError>
where
    S: CatalogStore + ?Sized,
{
    let existing = store.list_products(&ProductFilter::default()).await?;
    if !existing.is_empty() {
        return Ok(0);
    }

    for entry in SEED {
        let category = store.upsert_category(entry.category).await?;
        store
            .insert_product(Product {
                id: ProductId::new(),
                name: entry.name.to_string(),
                category_id: category.id,
                price: entry.price,
                description: None,
                image_file: Some("placeholder.jpg".to_string()),
                featured: entry.featured,
            })
            .await?;
    }

    info!(products = SEED.len(), "seeded catalog");
    Ok(SEED.len() as u64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemoryStore;
    use jengamart_catalog::CatalogReader;

    #[tokio::test]
    async fn seeds_an_empty_store_once() {
        let store = InMemoryStore::new();
        assert_eq!(seed_catalog(&store).await.unwrap(), 18);
        assert_eq!(seed_catalog(&store).await.unwrap(), 0);

        let categories = store.list_categories().await.unwrap();
        let names: Vec<&str> = categories.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(
            names,
            ["AGGREGATES", "CEMENT", "ELECTRICAL", "PLUMBING", "STEEL", "WOOD"]
        );

        let all = store.list_products(&ProductFilter::default()).await.unwrap();
        assert_eq!(all.len(), 18);
        assert_eq!(store.list_featured().await.unwrap().len(), 3);
    }
}
