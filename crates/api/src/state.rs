use std::sync::Arc;

use roster_core::storage::{DiskImageStore, ImageStorageKind, ImageStore, InlineImageStore};
use roster_db::store::RecordStore;

use crate::config::ServerConfig;
use crate::views::Views;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Record storage; a Postgres-backed store in production.
    pub records: Arc<dyn RecordStore>,
    /// Image storage strategy, `None` when uploads are disabled.
    pub images: Option<Arc<dyn ImageStore>>,
    /// Compiled page templates.
    pub views: Arc<Views>,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
}

impl AppState {
    /// Assemble the state for `config` around an already-connected record store.
    pub fn new(config: ServerConfig, records: Arc<dyn RecordStore>) -> Result<Self, tera::Error> {
        let images = image_store(&config);
        let views = Views::new(records.kind(), images.is_some())?;
        Ok(Self {
            records,
            images,
            views: Arc::new(views),
            config: Arc::new(config),
        })
    }
}

/// Build the image strategy selected by `IMAGE_STORAGE`.
pub fn image_store(config: &ServerConfig) -> Option<Arc<dyn ImageStore>> {
    match config.image_storage {
        ImageStorageKind::None => None,
        ImageStorageKind::Disk => Some(Arc::new(DiskImageStore::new(
            config.upload_dir.clone(),
            config.upload_url_prefix.clone(),
        ))),
        ImageStorageKind::Inline => Some(Arc::new(InlineImageStore)),
    }
}
