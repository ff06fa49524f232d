//! In-process document store.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;
use tokio::sync::RwLock;

use super::query::{Filter, FindOptions, SortDirection};
use super::{document_id, Collection, Document};

/// Documents per collection, in insertion order.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    collections: Arc<RwLock<HashMap<Collection, Vec<Document>>>>,
}

impl MemoryStore {
    pub async fn find(
        &self,
        collection: Collection,
        filter: &Filter,
        options: &FindOptions,
    ) -> Vec<Document> {
        let collections = self.collections.read().await;
        let Some(documents) = collections.get(&collection) else {
            return Vec::new();
        };

        let mut matched: Vec<&Document> = documents
            .iter()
            .filter(|doc| matches_filter(doc, filter))
            .collect();

        // Stable sort, so ties keep insertion order.
        if let Some(sort) = &options.sort {
            matched.sort_by(|a, b| {
                let ordering = compare_values(a.get(&sort.field), b.get(&sort.field));
                match sort.direction {
                    SortDirection::Ascending => ordering,
                    SortDirection::Descending => ordering.reverse(),
                }
            });
        }

        let skip = usize::try_from(options.skip).unwrap_or(0);
        let limit = options
            .limit
            .map(|limit| usize::try_from(limit).unwrap_or(0))
            .unwrap_or(usize::MAX);

        matched
            .into_iter()
            .skip(skip)
            .take(limit)
            .cloned()
            .collect()
    }

    pub async fn count(&self, collection: Collection, filter: &Filter) -> u64 {
        let collections = self.collections.read().await;
        collections
            .get(&collection)
            .map(|documents| documents.iter().filter(|doc| matches_filter(doc, filter)).count())
            .unwrap_or(0) as u64
    }

    /// Documents must already carry an `_id`. An existing document with the
    /// same `_id` is replaced in place.
    pub async fn insert_many(&self, collection: Collection, documents: Vec<Document>) -> usize {
        let mut collections = self.collections.write().await;
        let stored = collections.entry(collection).or_default();
        let written = documents.len();

        for document in documents {
            let id = document_id(&document);
            match stored.iter().position(|existing| document_id(existing) == id) {
                Some(index) => stored[index] = document,
                None => stored.push(document),
            }
        }

        written
    }
}

fn matches_filter(document: &Document, filter: &Filter) -> bool {
    match filter {
        Filter::All => true,
        Filter::Eq { field, value } => document.get(field) == Some(value),
        Filter::Matches { field, pattern } => pattern.matches(document.get(field)),
        Filter::Or(filters) => filters.iter().any(|f| matches_filter(document, f)),
    }
}

/// Rank of a JSON type in Postgres `jsonb` ordering. A missing field is SQL
/// NULL, which `NULLS FIRST` puts ahead of a JSON `null`.
fn type_rank(value: Option<&Value>) -> u8 {
    match value {
        None => 0,
        Some(Value::Null) => 1,
        Some(Value::String(_)) => 2,
        Some(Value::Number(_)) => 3,
        Some(Value::Bool(_)) => 4,
        Some(Value::Array(_)) => 5,
        Some(Value::Object(_)) => 6,
    }
}

fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        (Some(Value::Number(x)), Some(Value::Number(y))) => {
            let x = x.as_f64().unwrap_or(f64::NAN);
            let y = y.as_f64().unwrap_or(f64::NAN);
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Some(Value::Bool(x)), Some(Value::Bool(y))) => x.cmp(y),
        (Some(x @ Value::Array(_)), Some(y @ Value::Array(_)))
        | (Some(x @ Value::Object(_)), Some(y @ Value::Object(_))) => {
            x.to_string().cmp(&y.to_string())
        }
        _ => type_rank(a).cmp(&type_rank(b)),
    }
}
