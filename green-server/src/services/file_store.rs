//! File storage
//!
//! [`FileStore`] turns uploaded bytes into a public URL. [`LocalFileStore`]
//! writes under a directory served at `public_base_url`.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use uuid::Uuid;

use crate::utils::{AppError, AppResult};

/// Maximum file size (5MB)
pub const MAX_FILE_SIZE: usize = 5 * 1024 * 1024;

/// Client-supplied description of an upload
#[derive(Debug, Clone, Default)]
pub struct FileMetadata {
    pub original_name: Option<String>,
    pub content_type: Option<String>,
}

#[async_trait]
pub trait FileStore: Send + Sync {
    /// Store the bytes and return the URL they are reachable at
    async fn upload_file(&self, data: &[u8], metadata: &FileMetadata) -> AppResult<String>;
}

#[derive(Debug, Clone)]
pub struct LocalFileStore {
    root: PathBuf,
    public_base_url: String,
}

impl LocalFileStore {
    pub fn new(root: impl Into<PathBuf>, public_base_url: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            public_base_url: public_base_url.into(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Extension from the original name, else one guessed from the content type
    fn extension_for(metadata: &FileMetadata) -> Option<String> {
        let from_name = metadata
            .original_name
            .as_deref()
            .and_then(|name| Path::new(name).extension())
            .and_then(|ext| ext.to_str())
            .filter(|ext| !ext.is_empty())
            .map(str::to_lowercase);

        from_name.or_else(|| {
            metadata
                .content_type
                .as_deref()
                .and_then(mime_guess::get_mime_extensions_str)
                .and_then(|exts| exts.first())
                .map(|ext| ext.to_string())
        })
    }

    fn validate(data: &[u8]) -> AppResult<()> {
        if data.is_empty() {
            return Err(AppError::validation("Empty file provided"));
        }
        if data.len() > MAX_FILE_SIZE {
            return Err(AppError::validation(format!(
                "File too large. Maximum size is {} bytes ({}MB)",
                MAX_FILE_SIZE,
                MAX_FILE_SIZE / 1024 / 1024
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl FileStore for LocalFileStore {
    async fn upload_file(&self, data: &[u8], metadata: &FileMetadata) -> AppResult<String> {
        Self::validate(data)?;

        let id = Uuid::new_v4();
        let key = match Self::extension_for(metadata) {
            Some(ext) => format!("{id}.{ext}"),
            None => id.to_string(),
        };

        fs::create_dir_all(&self.root)
            .await
            .map_err(|e| AppError::storage(format!("Failed to create upload directory: {e}")))?;
        fs::write(self.root.join(&key), data)
            .await
            .map_err(|e| AppError::storage(format!("Failed to write file: {e}")))?;

        tracing::info!(
            key = %key,
            size = data.len(),
            original_name = ?metadata.original_name,
            "File stored"
        );
        Ok(format!(
            "{}/{}",
            self.public_base_url.trim_end_matches('/'),
            key
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta(name: Option<&str>, content_type: Option<&str>) -> FileMetadata {
        FileMetadata {
            original_name: name.map(String::from),
            content_type: content_type.map(String::from),
        }
    }

    #[test]
    fn test_extension_prefers_original_name() {
        let ext = LocalFileStore::extension_for(&meta(Some("Cake.PNG"), Some("image/jpeg")));
        assert_eq!(ext.as_deref(), Some("png"));
    }

    #[test]
    fn test_extension_guessed_from_content_type() {
        let ext = LocalFileStore::extension_for(&meta(None, Some("image/png")));
        assert_eq!(ext.as_deref(), Some("png"));

        assert_eq!(LocalFileStore::extension_for(&meta(Some("README"), None)), None);
    }

    #[test]
    fn test_validate_size_bounds() {
        assert!(LocalFileStore::validate(&[]).is_err());
        assert!(LocalFileStore::validate(&[0u8; 16]).is_ok());
        assert!(LocalFileStore::validate(&vec![0u8; MAX_FILE_SIZE + 1]).is_err());
    }
}
