//! In-process [`RecordStore`] used by tests and local experiments.
//!
//! Mirrors the Postgres semantics the handlers rely on: ids are assigned
//! once, in increasing order, and never reused.

use std::collections::BTreeMap;

use async_trait::async_trait;
use roster_core::record::{ListOrder, RecordKind};
use roster_core::types::DbId;
use tokio::sync::Mutex;

use crate::models::record::{CreateRecord, ImageUpdate, Record, UpdateRecord};
use crate::store::RecordStore;

#[derive(Debug, Default)]
struct Rows {
    last_id: DbId,
    by_id: BTreeMap<DbId, Record>,
}

#[derive(Debug, Default)]
pub struct MemoryRecordStore {
    kind: RecordKind,
    order: ListOrder,
    rows: Mutex<Rows>,
}

impl MemoryRecordStore {
    pub fn new(kind: RecordKind, order: ListOrder) -> Self {
        Self {
            kind,
            order,
            rows: Mutex::default(),
        }
    }

    pub async fn count(&self) -> usize {
        self.rows.lock().await.by_id.len()
    }
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    fn kind(&self) -> RecordKind {
        self.kind
    }

    async fn list(&self) -> Result<Vec<Record>, sqlx::Error> {
        let rows = self.rows.lock().await;
        let records = rows.by_id.values().cloned();
        Ok(match self.order {
            ListOrder::Asc => records.collect(),
            ListOrder::Desc => records.rev().collect(),
        })
    }

    async fn find_by_id(&self, id: DbId) -> Result<Option<Record>, sqlx::Error> {
        Ok(self.rows.lock().await.by_id.get(&id).cloned())
    }

    async fn create(&self, input: &CreateRecord) -> Result<Record, sqlx::Error> {
        let mut rows = self.rows.lock().await;
        rows.last_id += 1;
        let record = Record {
            id: rows.last_id,
            name: input.name.clone(),
            description: input.description.clone(),
            image_url: input.image_url.clone(),
            created_at: chrono::Utc::now(),
        };
        rows.by_id.insert(record.id, record.clone());
        Ok(record)
    }

    async fn update(
        &self,
        id: DbId,
        input: &UpdateRecord,
    ) -> Result<Option<Record>, sqlx::Error> {
        let mut rows = self.rows.lock().await;
        let Some(record) = rows.by_id.get_mut(&id) else {
            return Ok(None);
        };
        record.name = input.name.clone();
        record.description = input.description.clone();
        if let ImageUpdate::Replace(url) = &input.image {
            record.image_url = url.clone();
        }
        Ok(Some(record.clone()))
    }

    async fn update_name(&self, id: DbId, name: &str) -> Result<Option<Record>, sqlx::Error> {
        let mut rows = self.rows.lock().await;
        Ok(rows.by_id.get_mut(&id).map(|record| {
            record.name = name.to_string();
            record.clone()
        }))
    }

    async fn delete(&self, id: DbId) -> Result<bool, sqlx::Error> {
        Ok(self.rows.lock().await.by_id.remove(&id).is_some())
    }

    async fn health_check(&self) -> Result<(), sqlx::Error> {
        Ok(())
    }
}
