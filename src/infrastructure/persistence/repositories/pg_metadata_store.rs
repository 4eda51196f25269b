use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use sqlx::postgres::PgRow;
use sqlx::types::Json;
use sqlx::{PgPool, Row};
use tracing::instrument;

use crate::application::ports::{Item, ItemKey, MetadataStore, MetadataStoreError};

/// Single-table item store: every record kind shares `items`, distinguished
/// by its key prefixes.
pub struct PgMetadataStore {
    pool: PgPool,
}

impl PgMetadataStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Removes rows whose expiry has passed. Reads already hide them.
    #[instrument(skip(self))]
    pub async fn purge_expired(&self) -> Result<u64, MetadataStoreError> {
        let result = sqlx::query(
            "DELETE FROM items WHERE expires_at IS NOT NULL AND expires_at <= NOW()",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| MetadataStoreError::QueryFailed(e.to_string()))?;

        Ok(result.rows_affected())
    }
}

#[async_trait]
impl MetadataStore for PgMetadataStore {
    #[instrument(skip(self), fields(pk = %key.partition, sk = %key.sort))]
    async fn get_item(&self, key: &ItemKey) -> Result<Option<Item>, MetadataStoreError> {
        let row = sqlx::query(
            r#"
            SELECT pk, sk, gsi1_pk, gsi1_sk, gsi2_pk, gsi2_sk, attributes, expires_at
            FROM items
            WHERE pk = $1 AND sk = $2
              AND (expires_at IS NULL OR expires_at > NOW())
            "#,
        )
        .bind(&key.partition)
        .bind(&key.sort)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| MetadataStoreError::QueryFailed(e.to_string()))?;

        row.as_ref().map(item_from_row).transpose()
    }

    #[instrument(skip(self, item), fields(pk = %item.key.partition, sk = %item.key.sort))]
    async fn put_item(&self, item: &Item) -> Result<(), MetadataStoreError> {
        sqlx::query(
            r#"
            INSERT INTO items (pk, sk, gsi1_pk, gsi1_sk, gsi2_pk, gsi2_sk, attributes, expires_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (pk, sk) DO UPDATE SET
                gsi1_pk = EXCLUDED.gsi1_pk,
                gsi1_sk = EXCLUDED.gsi1_sk,
                gsi2_pk = EXCLUDED.gsi2_pk,
                gsi2_sk = EXCLUDED.gsi2_sk,
                attributes = EXCLUDED.attributes,
                expires_at = EXCLUDED.expires_at
            "#,
        )
        .bind(&item.key.partition)
        .bind(&item.key.sort)
        .bind(item.gsi1.as_ref().map(|k| k.partition.as_str()))
        .bind(item.gsi1.as_ref().map(|k| k.sort.as_str()))
        .bind(item.gsi2.as_ref().map(|k| k.partition.as_str()))
        .bind(item.gsi2.as_ref().map(|k| k.sort.as_str()))
        .bind(Json(&item.attributes))
        .bind(item.expires_at)
        .execute(&self.pool)
        .await
        .map_err(|e| MetadataStoreError::QueryFailed(e.to_string()))?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn query_partition(&self, partition: &str) -> Result<Vec<Item>, MetadataStoreError> {
        let rows = sqlx::query(
            r#"
            SELECT pk, sk, gsi1_pk, gsi1_sk, gsi2_pk, gsi2_sk, attributes, expires_at
            FROM items
            WHERE pk = $1
              AND (expires_at IS NULL OR expires_at > NOW())
            ORDER BY sk ASC
            "#,
        )
        .bind(partition)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| MetadataStoreError::QueryFailed(e.to_string()))?;

        rows.iter().map(item_from_row).collect()
    }
}

fn item_from_row(row: &PgRow) -> Result<Item, MetadataStoreError> {
    let malformed = |e: sqlx::Error| MetadataStoreError::MalformedItem(e.to_string());

    let key = ItemKey::new(
        row.try_get::<String, _>("pk").map_err(malformed)?,
        row.try_get::<String, _>("sk").map_err(malformed)?,
    );
    let gsi1 = index_key(
        row.try_get("gsi1_pk").map_err(malformed)?,
        row.try_get("gsi1_sk").map_err(malformed)?,
    );
    let gsi2 = index_key(
        row.try_get("gsi2_pk").map_err(malformed)?,
        row.try_get("gsi2_sk").map_err(malformed)?,
    );
    let Json(attributes) = row
        .try_get::<Json<Map<String, Value>>, _>("attributes")
        .map_err(malformed)?;
    let expires_at: Option<DateTime<Utc>> = row.try_get("expires_at").map_err(malformed)?;

    Ok(Item {
        key,
        gsi1,
        gsi2,
        attributes,
        expires_at,
    })
}

fn index_key(partition: Option<String>, sort: Option<String>) -> Option<ItemKey> {
    match (partition, sort) {
        (Some(partition), Some(sort)) => Some(ItemKey::new(partition, sort)),
        _ => None,
    }
}
