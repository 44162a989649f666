//! Repository for the `characters` and `items` tables.
//!
//! Both tables share the same columns; every method takes the
//! [`RecordKind`] that names the table. Table names come from a closed
//! enum, values are always bound as parameters.

use roster_core::record::{ListOrder, RecordKind};
use roster_core::types::DbId;
use sqlx::PgPool;

use crate::models::record::{CreateRecord, ImageUpdate, Record, UpdateRecord};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, description, image_url, created_at";

/// Provides CRUD operations for records.
pub struct RecordRepo;

impl RecordRepo {
    /// List every record ordered by `id` in the given direction.
    pub async fn list(
        pool: &PgPool,
        kind: RecordKind,
        order: ListOrder,
    ) -> Result<Vec<Record>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM {table} ORDER BY id {dir}",
            table = kind.table(),
            dir = order.sql(),
        );
        sqlx::query_as::<_, Record>(&query).fetch_all(pool).await
    }

    /// Find a record by its ID.
    pub async fn find_by_id(
        pool: &PgPool,
        kind: RecordKind,
        id: DbId,
    ) -> Result<Option<Record>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM {} WHERE id = $1", kind.table());
        sqlx::query_as::<_, Record>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Insert a new record, returning the created row.
    pub async fn create(
        pool: &PgPool,
        kind: RecordKind,
        input: &CreateRecord,
    ) -> Result<Record, sqlx::Error> {
        let query = format!(
            "INSERT INTO {} (name, description, image_url)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}",
            kind.table()
        );
        sqlx::query_as::<_, Record>(&query)
            .bind(&input.name)
            .bind(&input.description)
            .bind(&input.image_url)
            .fetch_one(pool)
            .await
    }

    /// Replace name and description, and the image when requested.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        kind: RecordKind,
        id: DbId,
        input: &UpdateRecord,
    ) -> Result<Option<Record>, sqlx::Error> {
        let (replace_image, image_url) = match &input.image {
            ImageUpdate::Keep => (false, None),
            ImageUpdate::Replace(url) => (true, url.as_deref()),
        };
        let query = format!(
            "UPDATE {} SET
                name = $2,
                description = $3,
                image_url = CASE WHEN $4 THEN $5 ELSE image_url END
             WHERE id = $1
             RETURNING {COLUMNS}",
            kind.table()
        );
        sqlx::query_as::<_, Record>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(replace_image)
            .bind(image_url)
            .fetch_optional(pool)
            .await
    }

    /// Update only the `name` column.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update_name(
        pool: &PgPool,
        kind: RecordKind,
        id: DbId,
        name: &str,
    ) -> Result<Option<Record>, sqlx::Error> {
        let query = format!(
            "UPDATE {} SET name = $2 WHERE id = $1 RETURNING {COLUMNS}",
            kind.table()
        );
        sqlx::query_as::<_, Record>(&query)
            .bind(id)
            .bind(name)
            .fetch_optional(pool)
            .await
    }

    /// Permanently delete a record by ID. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, kind: RecordKind, id: DbId) -> Result<bool, sqlx::Error> {
        let query = format!("DELETE FROM {} WHERE id = $1", kind.table());
        let result = sqlx::query(&query).bind(id).execute(pool).await?;
        Ok(result.rows_affected() > 0)
    }

    /// Number of rows in the table.
    pub async fn count(pool: &PgPool, kind: RecordKind) -> Result<i64, sqlx::Error> {
        let query = format!("SELECT COUNT(*) FROM {}", kind.table());
        sqlx::query_scalar::<_, i64>(&query).fetch_one(pool).await
    }
}
