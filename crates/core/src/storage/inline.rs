use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use super::{ImageStore, ImageUpload};
use crate::error::CoreError;

/// Embeds uploads directly in the record as base64 `data:` URIs.
#[derive(Debug, Clone, Copy, Default)]
pub struct InlineImageStore;

#[async_trait]
impl ImageStore for InlineImageStore {
    async fn store(&self, upload: ImageUpload) -> Result<String, CoreError> {
        let mime = match upload.content_type.as_deref() {
            Some(ct) if !ct.trim().is_empty() => ct.trim().to_string(),
            _ => mime_guess::from_path(&upload.file_name)
                .first_or_octet_stream()
                .to_string(),
        };
        Ok(data_uri(&mime, &upload.bytes))
    }

    // The data lives in the row itself; nothing to release.
    async fn discard(&self, _image_url: &str) -> Result<(), CoreError> {
        Ok(())
    }
}

/// Build a `data:{mime};base64,{payload}` URI.
pub fn data_uri(mime: &str, bytes: &[u8]) -> String {
    format!("data:{mime};base64,{}", STANDARD.encode(bytes))
}
