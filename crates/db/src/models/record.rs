//! Record entity model and DTOs.

use roster_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `characters` or `items` table.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct Record {
    pub id: DbId,
    pub name: String,
    /// NOT NULL in the database; defaults to `''`.
    pub description: String,
    /// Public file URL or `data:` URI, depending on the image store.
    pub image_url: Option<String>,
    pub created_at: Timestamp,
}

/// DTO for creating a new record.
#[derive(Debug, Clone, Default)]
pub struct CreateRecord {
    pub name: String,
    pub description: String,
    pub image_url: Option<String>,
}

/// What a full update does with the image column.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ImageUpdate {
    /// Leave `image_url` as it is.
    #[default]
    Keep,
    /// Overwrite `image_url`, possibly clearing it.
    Replace(Option<String>),
}

/// DTO for a full update of an existing record.
#[derive(Debug, Clone, Default)]
pub struct UpdateRecord {
    pub name: String,
    pub description: String,
    pub image: ImageUpdate,
}
