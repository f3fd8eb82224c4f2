//! Output writers: serialise extracted text to `.txt`, `.md`, or `.json`.
//!
//! Every writer owns one [`OutputFormat`] and applies its extension to the
//! destination it is given, so callers pass extension-less or source paths
//! (`/books/novel.epub` → `/books/novel.md`).
//!
//! Files are written atomically through [`write_atomic`]: a crash mid-write
//! leaves the previous file (or nothing), never a truncated one.

pub mod json;
pub mod markdown;
pub mod plain_text;

use crate::error::VellumError;
use crate::file::file_stem;
use crate::format::OutputFormat;
use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

pub use json::JsonWriter;
pub use markdown::MarkdownWriter;
pub use plain_text::PlainTextWriter;

/// Writes converted content in one output format.
pub trait OutputWriter {
    fn format(&self) -> OutputFormat;

    /// Write `content` to `destination` with this format's extension.
    /// Returns the number of bytes written.
    fn save(&self, content: &str, destination: &Path) -> Result<u64, VellumError>;

    /// Write one file per item as `{stem}_page_{n}.{ext}` (1-indexed) next to
    /// `destination`. Returns the total number of bytes written.
    fn save_multiple(
        &self,
        contents: &[String],
        destination: &Path,
        source_name: &str,
    ) -> Result<u64, VellumError>;
}

/// Builds a writer.
pub type WriterFactory = Box<dyn Fn() -> Box<dyn OutputWriter>>;

/// Maps each [`OutputFormat`] to a writer factory.
#[derive(Default)]
pub struct WriterRegistry {
    factories: HashMap<OutputFormat, WriterFactory>,
}

impl std::fmt::Debug for WriterRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut formats: Vec<_> = self.factories.keys().collect();
        formats.sort_by_key(|f| f.extension());
        f.debug_struct("WriterRegistry")
            .field("formats", &formats)
            .finish()
    }
}

impl WriterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Plain text, Markdown, and JSON writers.
    pub fn with_defaults() -> Self {
        Self::new()
            .with(OutputFormat::PlainText, || Box::new(PlainTextWriter))
            .with(OutputFormat::Markdown, || Box::new(MarkdownWriter))
            .with(OutputFormat::Json, || Box::new(JsonWriter))
    }

    pub fn register<F>(&mut self, format: OutputFormat, factory: F)
    where
        F: Fn() -> Box<dyn OutputWriter> + 'static,
    {
        self.factories.insert(format, Box::new(factory));
    }

    pub fn with<F>(mut self, format: OutputFormat, factory: F) -> Self
    where
        F: Fn() -> Box<dyn OutputWriter> + 'static,
    {
        self.register(format, factory);
        self
    }

    pub fn supports(&self, format: OutputFormat) -> bool {
        self.factories.contains_key(&format)
    }

    /// Build the writer for `format`.
    pub fn create(&self, format: OutputFormat) -> Result<Box<dyn OutputWriter>, VellumError> {
        let factory = self
            .factories
            .get(&format)
            .ok_or(VellumError::NoWriterRegistered { format })?;
        Ok(factory())
    }
}

/// `{dir}/{stem}_page_{n}.{ext}` for a destination `{dir}/{stem}.*`.
pub fn page_path(destination: &Path, page: usize, extension: &str) -> PathBuf {
    let name = format!("{}_page_{}.{}", file_stem(destination), page, extension);
    match destination.parent() {
        Some(parent) => parent.join(name),
        None => PathBuf::from(name),
    }
}

/// Write `bytes` to `path` via a sibling temp file and rename.
///
/// Returns the byte count written.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<u64, VellumError> {
    let fail = |source: std::io::Error| VellumError::OutputWriteFailed {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(fail)?;
    }

    let extension = path
        .extension()
        .map(|e| format!("{}.tmp", e.to_string_lossy()))
        .unwrap_or_else(|| "tmp".to_string());
    let tmp_path = path.with_extension(extension);

    let mut file = std::fs::File::create(&tmp_path).map_err(fail)?;
    file.write_all(bytes).map_err(fail)?;
    file.sync_all().map_err(fail)?;
    drop(file);

    std::fs::rename(&tmp_path, path).map_err(|e| {
        let _ = std::fs::remove_file(&tmp_path);
        fail(e)
    })?;

    debug!("Wrote {} ({} bytes)", path.display(), bytes.len());
    Ok(bytes.len() as u64)
}
