//! The record store handle injected into HTTP handlers.
//!
//! Handlers never touch a pool directly; they receive an
//! `Arc<dyn RecordStore>` so tests can substitute
//! [`crate::memory::MemoryRecordStore`] for the Postgres-backed store.

use async_trait::async_trait;
use roster_core::record::{ListOrder, RecordKind};
use roster_core::types::DbId;

use crate::models::record::{CreateRecord, Record, UpdateRecord};
use crate::repositories::RecordRepo;
use crate::DbPool;

/// Storage operations for the configured record kind.
///
/// Each method is a single statement; there is no multi-step transaction.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// The record kind (and therefore table) this store serves.
    fn kind(&self) -> RecordKind;

    /// All records, ordered by `id` in the configured direction.
    async fn list(&self) -> Result<Vec<Record>, sqlx::Error>;

    async fn find_by_id(&self, id: DbId) -> Result<Option<Record>, sqlx::Error>;

    async fn create(&self, input: &CreateRecord) -> Result<Record, sqlx::Error>;

    /// `None` when no record has this `id`.
    async fn update(&self, id: DbId, input: &UpdateRecord)
        -> Result<Option<Record>, sqlx::Error>;

    /// `None` when no record has this `id`.
    async fn update_name(&self, id: DbId, name: &str) -> Result<Option<Record>, sqlx::Error>;

    /// `true` if a row was removed.
    async fn delete(&self, id: DbId) -> Result<bool, sqlx::Error>;

    async fn health_check(&self) -> Result<(), sqlx::Error>;
}

/// [`RecordStore`] over a PostgreSQL pool.
#[derive(Debug, Clone)]
pub struct PgRecordStore {
    pool: DbPool,
    kind: RecordKind,
    order: ListOrder,
}

impl PgRecordStore {
    pub fn new(pool: DbPool, kind: RecordKind, order: ListOrder) -> Self {
        Self { pool, kind, order }
    }
}

#[async_trait]
impl RecordStore for PgRecordStore {
    fn kind(&self) -> RecordKind {
        self.kind
    }

    async fn list(&self) -> Result<Vec<Record>, sqlx::Error> {
        RecordRepo::list(&self.pool, self.kind, self.order).await
    }

    async fn find_by_id(&self, id: DbId) -> Result<Option<Record>, sqlx::Error> {
        RecordRepo::find_by_id(&self.pool, self.kind, id).await
    }

    async fn create(&self, input: &CreateRecord) -> Result<Record, sqlx::Error> {
        RecordRepo::create(&self.pool, self.kind, input).await
    }

    async fn update(
        &self,
        id: DbId,
        input: &UpdateRecord,
    ) -> Result<Option<Record>, sqlx::Error> {
        RecordRepo::update(&self.pool, self.kind, id, input).await
    }

    async fn update_name(&self, id: DbId, name: &str) -> Result<Option<Record>, sqlx::Error> {
        RecordRepo::update_name(&self.pool, self.kind, id, name).await
    }

    async fn delete(&self, id: DbId) -> Result<bool, sqlx::Error> {
        RecordRepo::delete(&self.pool, self.kind, id).await
    }

    async fn health_check(&self) -> Result<(), sqlx::Error> {
        crate::health_check(&self.pool).await
    }
}
