//! Document store: JSON documents grouped in collections, queried with
//! filter/sort/skip/limit primitives.
//!
//! Two backends share the same semantics. [`PostgresStore`] keeps documents in
//! a JSONB table, [`MemoryStore`] keeps them in process for development and tests.

pub mod memory;
pub mod postgres;
pub mod query;

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

pub use memory::MemoryStore;
pub use postgres::PostgresStore;
pub use query::{Filter, FindOptions, Pattern, SortDirection, SortSpec};

/// A stored document. Every stored document carries a string `_id`.
pub type Document = Map<String, Value>;

/// Field holding the document identifier.
pub const ID_FIELD: &str = "_id";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Products,
    ProductStats,
    Users,
    Transactions,
}

impl Collection {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Products => "products",
            Self::ProductStats => "productstats",
            Self::Users => "users",
            Self::Transactions => "transactions",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Malformed document: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Invalid query options: {0}")]
    InvalidOptions(String),
}

/// Store handle shared through application state.
#[derive(Debug, Clone)]
pub enum Store {
    Memory(MemoryStore),
    Postgres(PostgresStore),
}

impl Store {
    pub async fn find(
        &self,
        collection: Collection,
        filter: &Filter,
        options: &FindOptions,
    ) -> Result<Vec<Document>, StoreError> {
        options.validate()?;
        match self {
            Self::Memory(store) => Ok(store.find(collection, filter, options).await),
            Self::Postgres(store) => store.find(collection, filter, options).await,
        }
    }

    /// Find documents and decode each one into `T`.
    pub async fn find_as<T: DeserializeOwned>(
        &self,
        collection: Collection,
        filter: &Filter,
        options: &FindOptions,
    ) -> Result<Vec<T>, StoreError> {
        self.find(collection, filter, options)
            .await?
            .into_iter()
            .map(|doc| serde_json::from_value(Value::Object(doc)).map_err(StoreError::from))
            .collect()
    }

    pub async fn count(&self, collection: Collection, filter: &Filter) -> Result<u64, StoreError> {
        match self {
            Self::Memory(store) => Ok(store.count(collection, filter).await),
            Self::Postgres(store) => store.count(collection, filter).await,
        }
    }

    /// Insert documents, replacing any existing document with the same `_id`.
    /// Returns the number of documents written.
    pub async fn insert_many(
        &self,
        collection: Collection,
        documents: Vec<Document>,
    ) -> Result<usize, StoreError> {
        let documents: Vec<Document> = documents.into_iter().map(with_id).collect();
        match self {
            Self::Memory(store) => Ok(store.insert_many(collection, documents).await),
            Self::Postgres(store) => store.insert_many(collection, documents).await,
        }
    }

    pub async fn ping(&self) -> Result<(), StoreError> {
        match self {
            Self::Memory(_) => Ok(()),
            Self::Postgres(store) => store.ping().await,
        }
    }
}

/// Read the `_id` of a document as text. Non-string ids are rendered as JSON.
pub fn document_id(document: &Document) -> Option<String> {
    match document.get(ID_FIELD)? {
        Value::String(id) => Some(id.clone()),
        Value::Null => None,
        other => Some(other.to_string()),
    }
}

fn with_id(mut document: Document) -> Document {
    if document_id(&document).is_none() {
        document.insert(
            ID_FIELD.to_string(),
            Value::String(uuid::Uuid::new_v4().simple().to_string()),
        );
    }
    document
}
