use crate::constants::uploads::{ALLOWED_IMAGE_EXTENSIONS, FILENAME_TIMESTAMP_FORMAT};
use anyhow::{Context, Result};
use chrono::Utc;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::info;

/// Stores uploaded item photos on disk. The database only ever sees the
/// bare filename returned by [`ImageService::save_upload`]; the HTTP layer
/// serves the directory at `/images/{filename}`.
pub struct ImageService {
    images_dir: PathBuf,
}

impl ImageService {
    #[must_use]
    pub fn new(images_path: &str) -> Self {
        Self {
            images_dir: PathBuf::from(images_path),
        }
    }

    #[must_use]
    pub fn images_dir(&self) -> &Path {
        &self.images_dir
    }

    /// Whether a filename carries one of the accepted photo extensions.
    #[must_use]
    pub fn is_allowed(original_name: &str) -> bool {
        Path::new(original_name)
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| ALLOWED_IMAGE_EXTENSIONS.contains(&e.to_lowercase().as_str()))
    }

    /// Persists an uploaded photo and returns the stored filename.
    ///
    /// The original name is reduced to its final path component and
    /// stripped of anything outside `[A-Za-z0-9._-]`, then prefixed with a
    /// microsecond timestamp so concurrent uploads of the same filename
    /// never collide.
    pub async fn save_upload(&self, original_name: &str, bytes: &[u8]) -> Result<String> {
        if !Self::is_allowed(original_name) {
            anyhow::bail!(
                "Unsupported image type (allowed: {})",
                ALLOWED_IMAGE_EXTENSIONS.join(", ")
            );
        }

        let base = Self::sanitize(original_name);
        let stamp = Utc::now().format(FILENAME_TIMESTAMP_FORMAT);
        let filename = format!("{stamp}_{base}");

        if !self.images_dir.exists() {
            fs::create_dir_all(&self.images_dir).await?;
        }

        let file_path = self.images_dir.join(&filename);

        fs::write(&file_path, bytes)
            .await
            .with_context(|| format!("Failed to write image to {}", file_path.display()))?;

        info!(path = %file_path.display(), size = bytes.len(), "Stored uploaded image");

        Ok(filename)
    }

    fn sanitize(original_name: &str) -> String {
        let base = Path::new(original_name)
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("upload");

        let cleaned: String = base
            .chars()
            .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
            .collect();

        if cleaned.trim_matches('.').is_empty() {
            "upload".to_string()
        } else {
            cleaned
        }
    }
}
