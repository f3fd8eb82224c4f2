//! Document readers: turn a source file into text, page by page.
//!
//! ## Data Flow
//!
//! ```text
//! .pdf  ──▶ pdfium text layer ──┬──▶ postprocess ──▶ pages
//!                               └─ blank page ──▶ ocr (tesseract)
//! .epub ──▶ zip + OPF spine ──▶ html_to_text ──▶ postprocess ──▶ chapters
//! ```
//!
//! 1. [`pdf`]: text layer via pdfium; blank pages fall back to [`ocr`]
//! 2. [`epub`]: spine documents in reading order
//! 3. [`postprocess`]: deterministic cleanup shared by both readers
//!
//! Readers are looked up by extension in a [`ReaderRegistry`] that the
//! caller builds and hands to the controller, so tests can register fakes.

pub mod epub;
pub mod ocr;
pub mod pdf;
pub mod postprocess;

use crate::config::ConverterConfig;
use crate::error::VellumError;
use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

pub use epub::EpubReader;
pub use pdf::PdfReader;

/// Extracts text from one source document.
///
/// `progress(current, total)` is called after each page or chapter. It may
/// be called zero times (empty document) and carries no timing guarantees.
pub trait DocumentReader {
    /// All items joined with a blank line.
    fn extract_content(&self, progress: &mut dyn FnMut(usize, usize)) -> Result<String, VellumError> {
        Ok(self.extract_content_per_item(progress)?.join("\n\n"))
    }

    /// One string per page (PDF) or chapter (EPUB), in reading order.
    fn extract_content_per_item(
        &self,
        progress: &mut dyn FnMut(usize, usize),
    ) -> Result<Vec<String>, VellumError>;
}

/// Builds a reader for a source path.
pub type ReaderFactory = Box<dyn Fn(&Path) -> Box<dyn DocumentReader>>;

/// Maps lowercase extensions (with leading dot, e.g. `.pdf`) to reader factories.
#[derive(Default)]
pub struct ReaderRegistry {
    factories: BTreeMap<String, ReaderFactory>,
}

impl std::fmt::Debug for ReaderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReaderRegistry")
            .field("extensions", &self.factories.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl ReaderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// `.pdf` and `.epub` readers sharing `config`.
    pub fn with_defaults(config: &ConverterConfig) -> Self {
        let pdf_config = config.clone();
        let epub_config = config.clone();
        Self::new()
            .with(".pdf", move |path| {
                Box::new(PdfReader::new(path, pdf_config.clone())) as Box<dyn DocumentReader>
            })
            .with(".epub", move |path| {
                Box::new(EpubReader::new(path, epub_config.clone())) as Box<dyn DocumentReader>
            })
    }

    /// Register `factory` for `extension`, replacing any previous one.
    pub fn register<F>(&mut self, extension: &str, factory: F)
    where
        F: Fn(&Path) -> Box<dyn DocumentReader> + 'static,
    {
        self.factories
            .insert(normalise_extension(extension), Box::new(factory));
    }

    /// Builder-style [`register`](Self::register).
    pub fn with<F>(mut self, extension: &str, factory: F) -> Self
    where
        F: Fn(&Path) -> Box<dyn DocumentReader> + 'static,
    {
        self.register(extension, factory);
        self
    }

    /// Registered extensions, sorted.
    pub fn extensions(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }

    pub fn supports(&self, path: &Path) -> bool {
        extension_key(path).is_some_and(|ext| self.factories.contains_key(&ext))
    }

    /// Build the reader for `path`.
    ///
    /// A missing registration is a configuration bug, not a user mistake:
    /// every path reaching this point has already been filtered by
    /// [`supports`](Self::supports).
    pub fn reader_for(&self, path: &Path) -> Result<Box<dyn DocumentReader>, VellumError> {
        let extension = extension_key(path).unwrap_or_default();
        let factory = self
            .factories
            .get(&extension)
            .ok_or_else(|| VellumError::NoReaderRegistered {
                extension: extension.clone(),
            })?;
        Ok(factory(path))
    }

    /// Supported regular files directly inside `dir`, sorted by name.
    pub fn compatible_files(&self, dir: &Path) -> io::Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        for entry in std::fs::read_dir(dir)? {
            let path = entry?.path();
            if path.is_file() && self.supports(&path) {
                files.push(path);
            }
        }
        files.sort();
        debug!("Found {} compatible files in {}", files.len(), dir.display());
        Ok(files)
    }
}

/// `.PDF` → `.pdf`, `epub` → `.epub`.
fn normalise_extension(extension: &str) -> String {
    let lower = extension.trim().to_ascii_lowercase();
    if lower.starts_with('.') {
        lower
    } else {
        format!(".{lower}")
    }
}

/// Lowercase extension of `path` with a leading dot.
pub fn extension_key(path: &Path) -> Option<String> {
    path.extension()
        .map(|e| format!(".{}", e.to_string_lossy().to_ascii_lowercase()))
}
