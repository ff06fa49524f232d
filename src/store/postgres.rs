//! Postgres-backed document store. Documents live as JSONB rows in a single
//! `documents` table keyed by `(collection, id)`; `seq` records insertion order.

use sqlx::types::Json;
use sqlx::{PgPool, Postgres, QueryBuilder};

use super::query::{Filter, FindOptions, SortDirection};
use super::{document_id, Collection, Document, StoreError};

#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find(
        &self,
        collection: Collection,
        filter: &Filter,
        options: &FindOptions,
    ) -> Result<Vec<Document>, StoreError> {
        let mut builder =
            QueryBuilder::<Postgres>::new("SELECT body FROM documents WHERE collection = ");
        builder.push_bind(collection.as_str());
        builder.push(" AND ");
        push_filter(&mut builder, filter);

        builder.push(" ORDER BY ");
        if let Some(sort) = &options.sort {
            builder.push("body -> ");
            builder.push_bind(sort.field.clone());
            builder.push(match sort.direction {
                SortDirection::Ascending => " ASC NULLS FIRST, ",
                SortDirection::Descending => " DESC NULLS LAST, ",
            });
        }
        builder.push("seq ASC");

        if let Some(limit) = options.limit {
            builder.push(" LIMIT ");
            builder.push_bind(limit);
        }
        builder.push(" OFFSET ");
        builder.push_bind(options.skip);

        let rows = builder
            .build_query_scalar::<Json<Document>>()
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(|Json(doc)| doc).collect())
    }

    pub async fn count(&self, collection: Collection, filter: &Filter) -> Result<u64, StoreError> {
        let mut builder =
            QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM documents WHERE collection = ");
        builder.push_bind(collection.as_str());
        builder.push(" AND ");
        push_filter(&mut builder, filter);

        let count = builder
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await?;
        Ok(u64::try_from(count).unwrap_or_default())
    }

    /// Upsert every document in one transaction.
    pub async fn insert_many(
        &self,
        collection: Collection,
        documents: Vec<Document>,
    ) -> Result<usize, StoreError> {
        let mut tx = self.pool.begin().await?;
        let mut written = 0;

        for document in documents {
            let Some(id) = document_id(&document) else {
                return Err(StoreError::InvalidOptions(
                    "document is missing an _id".to_string(),
                ));
            };

            sqlx::query(
                r#"
                INSERT INTO documents (collection, id, body)
                VALUES ($1, $2, $3)
                ON CONFLICT (collection, id) DO UPDATE SET body = EXCLUDED.body
                "#,
            )
            .bind(collection.as_str())
            .bind(&id)
            .bind(Json(&document))
            .execute(&mut *tx)
            .await?;
            written += 1;
        }

        tx.commit().await?;
        Ok(written)
    }

    pub async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

/// Append `filter` as a boolean SQL expression over the `body` column.
fn push_filter(builder: &mut QueryBuilder<'_, Postgres>, filter: &Filter) {
    match filter {
        Filter::All => {
            builder.push("TRUE");
        }
        Filter::Eq { field, value } => {
            builder.push("body -> ");
            builder.push_bind(field.clone());
            builder.push(" = ");
            builder.push_bind(Json(value.clone()));
        }
        Filter::Matches { field, pattern } => {
            builder.push("(jsonb_typeof(body -> ");
            builder.push_bind(field.clone());
            builder.push(") = 'string' AND body ->> ");
            builder.push_bind(field.clone());
            builder.push(" ~* ");
            builder.push_bind(pattern.as_str().to_string());
            builder.push(")");
        }
        Filter::Or(filters) if filters.is_empty() => {
            builder.push("FALSE");
        }
        Filter::Or(filters) => {
            builder.push("(");
            for (index, nested) in filters.iter().enumerate() {
                if index > 0 {
                    builder.push(" OR ");
                }
                push_filter(builder, nested);
            }
            builder.push(")");
        }
    }
}
