use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::info;

/// A file received in a multipart form
#[derive(Debug, Clone, Default)]
pub struct UploadedFile {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Extension of the original name including the dot, or empty
    pub fn extension(&self) -> String {
        Path::new(&self.file_name)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| format!(".{}", e))
            .unwrap_or_default()
    }
}

#[async_trait]
pub trait FileHandler: Send + Sync {
    /// Stores the file and returns its public name; `None` when there is nothing to store
    async fn upload(&self, file: Option<&UploadedFile>) -> std::io::Result<Option<String>>;
}

/// Writes uploads into a local directory served under `/images`
pub struct LocalFileHandler {
    dir: PathBuf,
}

impl LocalFileHandler {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

#[async_trait]
impl FileHandler for LocalFileHandler {
    async fn upload(&self, file: Option<&UploadedFile>) -> std::io::Result<Option<String>> {
        let Some(file) = file.filter(|f| !f.is_empty()) else {
            return Ok(None);
        };

        let file_name = format!("n{}{}", uuid::Uuid::new_v4(), file.extension());
        tokio::fs::create_dir_all(&self.dir).await?;
        tokio::fs::write(self.dir.join(&file_name), &file.bytes).await?;

        info!("Stored upload '{}' as {}", file.file_name, file_name);
        Ok(Some(file_name))
    }
}
