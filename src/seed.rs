//! Development fixtures: load a JSON file of documents into the store.
//!
//! The file holds one array per collection:
//! `{"products": [], "productStats": [], "users": [], "transactions": []}`.

use std::path::Path;

use serde::Deserialize;

use crate::store::{Collection, Document, Store, StoreError};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SeedData {
    pub products: Vec<Document>,
    pub product_stats: Vec<Document>,
    pub users: Vec<Document>,
    pub transactions: Vec<Document>,
}

#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    #[error("Failed to read seed file {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("Failed to parse seed file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Documents written per collection.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SeedSummary {
    pub products: usize,
    pub product_stats: usize,
    pub users: usize,
    pub transactions: usize,
}

pub async fn load_file(store: &Store, path: &Path) -> Result<SeedSummary, SeedError> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| SeedError::Read {
            path: path.display().to_string(),
            source,
        })?;
    let data: SeedData = serde_json::from_str(&raw)?;
    Ok(load(store, data).await?)
}

pub async fn load(store: &Store, data: SeedData) -> Result<SeedSummary, StoreError> {
    let summary = SeedSummary {
        products: store.insert_many(Collection::Products, data.products).await?,
        product_stats: store
            .insert_many(Collection::ProductStats, data.product_stats)
            .await?,
        users: store.insert_many(Collection::Users, data.users).await?,
        transactions: store
            .insert_many(Collection::Transactions, data.transactions)
            .await?,
    };

    tracing::info!(
        products = summary.products,
        product_stats = summary.product_stats,
        users = summary.users,
        transactions = summary.transactions,
        "Seeded store"
    );
    Ok(summary)
}
