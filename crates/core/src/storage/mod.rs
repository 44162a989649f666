//! Image storage strategies.
//!
//! An uploaded image is persisted as an opaque string in the record's
//! `image_url` column. How that string is produced is up to the configured
//! [`ImageStore`]:
//!
//! - [`DiskImageStore`] writes the file under an upload directory and
//!   returns its public URL.
//! - [`InlineImageStore`] returns a `data:` URI with the bytes base64-encoded.

mod disk;
mod inline;

use std::str::FromStr;

use async_trait::async_trait;

use crate::error::CoreError;

pub use disk::{disk_file_name, DiskImageStore};
pub use inline::{data_uri, InlineImageStore};

/// Configured image handling mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImageStorageKind {
    /// Uploads are ignored and the image column is never written.
    #[default]
    None,
    Disk,
    Inline,
}

impl FromStr for ImageStorageKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "none" | "off" => Ok(Self::None),
            "disk" | "file" => Ok(Self::Disk),
            "inline" | "base64" | "data-uri" => Ok(Self::Inline),
            other => Err(CoreError::Validation(format!(
                "Unknown image storage '{other}'. Must be one of: none, disk, inline"
            ))),
        }
    }
}

/// A file received in a multipart form.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    /// Client-supplied file name, possibly including path components.
    pub file_name: String,
    /// Client-supplied MIME type, if any.
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    /// Browsers submit a nameless, zero-length part when no file was chosen.
    pub fn is_empty(&self) -> bool {
        self.file_name.is_empty() || self.bytes.is_empty()
    }
}

/// Strategy for turning an upload into the value stored in `image_url`.
#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Persist `upload` and return the reference to store with the record.
    async fn store(&self, upload: ImageUpload) -> Result<String, CoreError>;

    /// Release whatever `image_url` refers to. References this store did
    /// not produce are ignored.
    async fn discard(&self, image_url: &str) -> Result<(), CoreError>;
}
