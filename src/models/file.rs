//! Local file helper for callers feeding `transfer`.
//!
//! The coordinator itself only sees bytes plus a declared content type; this
//! entry type is a convenience for resolving a path into both.

use serde::{Deserialize, Serialize};

/// A resolved local file selected for upload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileEntry {
    pub file_name: String,
    pub file_path: String,
    pub file_size: u64,
    /// Declared content type, guessed from the extension where possible.
    pub content_type: Option<String>,
}

impl FileEntry {
    /// Resolve a path into a file entry, reading its size from the
    /// filesystem and guessing the content type from the extension.
    pub fn from_path(path: &str) -> std::io::Result<Self> {
        let meta = std::fs::metadata(path)?;
        if !meta.is_file() {
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("not a regular file: {}", path),
            ));
        }
        let file_name = std::path::Path::new(path)
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string());
        Ok(Self {
            content_type: guess_content_type(&file_name).map(str::to_string),
            file_name,
            file_path: path.to_string(),
            file_size: meta.len(),
        })
    }

    /// Read the whole file body.
    ///
    /// Uses spawn_blocking to avoid blocking the tokio runtime.
    pub async fn read_bytes(&self) -> std::io::Result<Vec<u8>> {
        let path = self.file_path.clone();
        tokio::task::spawn_blocking(move || std::fs::read(&path))
            .await
            .map_err(|e| std::io::Error::other(format!("spawn_blocking join error: {}", e)))?
    }
}

/// Guess a content type for common video containers by extension.
/// Unknown extensions return `None`; the coordinator falls back to the
/// configured default.
pub fn guess_content_type(file_name: &str) -> Option<&'static str> {
    let ext = std::path::Path::new(file_name)
        .extension()?
        .to_str()?
        .to_ascii_lowercase();
    match ext.as_str() {
        "mp4" | "m4v" => Some("video/mp4"),
        "mov" => Some("video/quicktime"),
        "webm" => Some("video/webm"),
        "mkv" => Some("video/x-matroska"),
        "avi" => Some("video/x-msvideo"),
        _ => None,
    }
}
