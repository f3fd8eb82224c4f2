//! Display metadata for files offered in the selection list.

use serde::Serialize;
use std::io;
use std::path::Path;

/// A file's name and byte size, as shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileEntry {
    pub name: String,
    pub size_bytes: u64,
}

impl FileEntry {
    pub fn new(name: impl Into<String>, size_bytes: u64) -> Self {
        Self {
            name: name.into(),
            size_bytes,
        }
    }

    /// Stat `path` and build its entry.
    pub fn from_path(path: &Path) -> io::Result<Self> {
        let size_bytes = std::fs::metadata(path)?.len();
        Ok(Self::new(file_name(path), size_bytes))
    }

    pub fn formatted_size(&self) -> String {
        format_size(self.size_bytes)
    }
}

/// Final path component as a lossy string (empty for `/` or `..`).
pub fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// File stem as a lossy string.
pub fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Human-readable byte count: `512B`, `1.5KB`, `2.4MB`, `4.7GB`, `1.0TB`.
pub fn format_size(bytes: u64) -> String {
    let mut size = bytes as f64;
    for unit in ["B", "KB", "MB", "GB"] {
        if size < 1024.0 {
            return if unit == "B" {
                format!("{}B", size as u64)
            } else {
                format!("{size:.1}{unit}")
            };
        }
        size /= 1024.0;
    }
    format!("{size:.1}TB")
}
