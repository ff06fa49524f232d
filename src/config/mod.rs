use std::env;
use std::path::PathBuf;
use std::str::FromStr;

/// Where documents are kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StorageMode {
    #[default]
    InMemory,
    Postgres,
}

impl FromStr for StorageMode {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_lowercase().as_str() {
            "in_memory" | "inmemory" | "memory" => Ok(Self::InMemory),
            "postgres" | "postgresql" | "pg" => Ok(Self::Postgres),
            _ => Err(ConfigError::InvalidStorageMode(value.to_string())),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid STORAGE_MODE: {0} (expected in_memory or postgres)")]
    InvalidStorageMode(String),

    #[error("DATABASE_URL must be set when STORAGE_MODE=postgres")]
    MissingDatabaseUrl,
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub storage_mode: StorageMode,
    pub database_url: Option<String>,
    pub database_max_connections: u32,
    pub host: String,
    pub port: u16,
    /// Allowed CORS origin. Any origin when unset.
    pub frontend_url: Option<String>,
    /// JSON fixture loaded into the store at startup.
    pub seed_file: Option<PathBuf>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable lookup.
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let storage_mode = match var("STORAGE_MODE") {
            Some(mode) => mode.parse()?,
            None => StorageMode::default(),
        };

        let database_url = var("DATABASE_URL").filter(|url| !url.is_empty());
        if storage_mode == StorageMode::Postgres && database_url.is_none() {
            return Err(ConfigError::MissingDatabaseUrl);
        }

        Ok(Self {
            storage_mode,
            database_url,
            database_max_connections: var("DATABASE_MAX_CONNECTIONS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(10),
            host: var("BACKEND_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: var("BACKEND_PORT")
                .and_then(|v| v.parse().ok())
                .unwrap_or(5001),
            frontend_url: var("FRONTEND_URL").filter(|url| !url.is_empty()),
            seed_file: var("SEED_FILE").filter(|p| !p.is_empty()).map(PathBuf::from),
        })
    }
}
