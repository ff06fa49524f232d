//! Product listing with per-product sales statistics.

use futures::future::try_join_all;

use crate::errors::AppError;
use crate::models::product::{Product, ProductStat, ProductWithStats};
use crate::store::{Collection, Filter, FindOptions, Store, StoreError};

/// List every product with the stats whose `productId` matches its `_id`.
pub async fn list_with_stats(store: &Store) -> Result<Vec<ProductWithStats>, AppError> {
    let products: Vec<Product> = store
        .find_as(Collection::Products, &Filter::All, &FindOptions::default())
        .await?;

    let with_stats = try_join_all(products.into_iter().map(|product| async move {
        let stat = fetch_stats(store, &product.id).await?;
        Ok::<_, StoreError>(ProductWithStats { product, stat })
    }))
    .await?;

    tracing::debug!(products = with_stats.len(), "Listed products with stats");
    Ok(with_stats)
}

async fn fetch_stats(store: &Store, product_id: &str) -> Result<Vec<ProductStat>, StoreError> {
    store
        .find_as(
            Collection::ProductStats,
            &Filter::eq("productId", product_id),
            &FindOptions::default(),
        )
        .await
}
