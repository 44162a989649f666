use std::path::PathBuf;

use async_trait::async_trait;

use super::{ImageStore, ImageUpload};
use crate::error::CoreError;

/// Stores uploads as files in a local directory served under a URL prefix.
#[derive(Debug, Clone)]
pub struct DiskImageStore {
    dir: PathBuf,
    url_prefix: String,
}

impl DiskImageStore {
    /// `url_prefix` is the public path the directory is mounted at, e.g.
    /// `/uploads`. A trailing slash is ignored.
    pub fn new(dir: impl Into<PathBuf>, url_prefix: impl Into<String>) -> Self {
        let url_prefix = url_prefix.into();
        Self {
            dir: dir.into(),
            url_prefix: url_prefix.trim_end_matches('/').to_string(),
        }
    }

    /// Map a stored URL back to a file inside the upload directory.
    ///
    /// Returns `None` for URLs outside the prefix or names that would
    /// escape the directory.
    pub fn path_for_url(&self, image_url: &str) -> Option<PathBuf> {
        let name = image_url
            .strip_prefix(self.url_prefix.as_str())?
            .strip_prefix('/')?;
        if name.is_empty() || name == "." || name == ".." || name.contains(['/', '\\']) {
            return None;
        }
        Some(self.dir.join(name))
    }
}

#[async_trait]
impl ImageStore for DiskImageStore {
    async fn store(&self, upload: ImageUpload) -> Result<String, CoreError> {
        tokio::fs::create_dir_all(&self.dir).await?;

        let name = disk_file_name(chrono::Utc::now().timestamp_millis(), &upload.file_name);
        let dest = self.dir.join(&name);
        tokio::fs::write(&dest, &upload.bytes).await?;
        tracing::debug!(path = %dest.display(), bytes = upload.bytes.len(), "Stored uploaded image");

        Ok(format!("{}/{name}", self.url_prefix))
    }

    async fn discard(&self, image_url: &str) -> Result<(), CoreError> {
        let Some(path) = self.path_for_url(image_url) else {
            return Ok(());
        };
        if tokio::fs::try_exists(&path).await? {
            tokio::fs::remove_file(&path).await?;
            tracing::debug!(path = %path.display(), "Removed image file");
        }
        Ok(())
    }
}

/// Generate the on-disk name for an upload: `{timestamp_millis}-{basename}`.
///
/// Only the final path component of `original` is kept, and every byte
/// outside `[A-Za-z0-9._-]` becomes `_` so the name is usable verbatim in
/// a URL path. An empty name falls back to `upload`.
///
/// ```
/// use roster_core::storage::disk_file_name;
///
/// assert_eq!(disk_file_name(1700000000000, "aria.png"), "1700000000000-aria.png");
/// assert_eq!(disk_file_name(5, "../../etc/passwd"), "5-passwd");
/// assert_eq!(disk_file_name(6, "my pic #1?.png"), "6-my_pic__1_.png");
/// ```
pub fn disk_file_name(timestamp_millis: i64, original: &str) -> String {
    let base = original
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .trim();
    let base = match base {
        "" | "." | ".." => "upload".to_string(),
        other => other
            .chars()
            .map(|c| match c {
                'A'..='Z' | 'a'..='z' | '0'..='9' | '.' | '_' | '-' => c,
                _ => '_',
            })
            .collect(),
    };
    format!("{timestamp_millis}-{base}")
}
