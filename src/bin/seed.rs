//! Seed script for development: loads a JSON fixture into the configured store.
//!
//! Usage: `cargo run --bin seed [path]` (default `data/seed.json`)
//!
//! Reads `STORAGE_MODE` and `DATABASE_URL` (and `.env`). Seeding the in-memory
//! store only validates the fixture, since the data is gone when the process exits.

use std::path::PathBuf;

use dashboard_api::config::{AppConfig, StorageMode};
use dashboard_api::{db, seed};

const DEFAULT_SEED_FILE: &str = "data/seed.json";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "dashboard_api=info".into()),
        )
        .init();

    let path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_SEED_FILE));

    let config = AppConfig::from_env()?;
    let store = db::connect_store(&config).await?;

    println!("=== Dashboard Seed Script ===");
    let summary = seed::load_file(&store, &path).await?;

    println!("[done] products:      {}", summary.products);
    println!("[done] product stats: {}", summary.product_stats);
    println!("[done] users:         {}", summary.users);
    println!("[done] transactions:  {}", summary.transactions);

    if config.storage_mode == StorageMode::InMemory {
        println!("\nSTORAGE_MODE is in_memory: fixture validated, nothing persisted.");
    }
    println!("\n=== Seed complete! ===");

    Ok(())
}
