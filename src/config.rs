//! Configuration for the extraction backends.
//!
//! Everything the user decides per run (source, format, merge mode, files)
//! is asked interactively. [`ConverterConfig`] only holds the knobs of the
//! readers: OCR, pdfium location, and text cleanup.
//!
//! # Design choice: builder over constructor
//! The builder lets callers set only what they care about and rely on
//! documented defaults for the rest; `build()` validates the combination.

use crate::error::VellumError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Reader configuration.
///
/// Built via [`ConverterConfig::builder()`] or using
/// [`ConverterConfig::default()`].
///
/// # Example
/// ```rust
/// use vellum::ConverterConfig;
///
/// let config = ConverterConfig::builder()
///     .ocr_language("eng+deu")
///     .max_rendered_pixels(1600)
///     .build()
///     .unwrap();
/// assert!(config.ocr_enabled);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConverterConfig {
    /// Run OCR on PDF pages without a text layer. Default: true.
    ///
    /// Scanned documents carry only page images; without OCR those pages
    /// come out empty.
    pub ocr_enabled: bool,

    /// Program invoked for OCR. Default: `tesseract` (looked up on `PATH`).
    pub tesseract_command: PathBuf,

    /// Tesseract language code(s), e.g. `eng` or `eng+fra`. Default: `eng`.
    pub ocr_language: String,

    /// Longest edge, in pixels, of a page rendered for OCR. Default: 2000.
    ///
    /// Caps memory regardless of physical page size; an A0 poster would
    /// otherwise rasterise to tens of thousands of pixels per side.
    pub max_rendered_pixels: u32,

    /// Path to libpdfium (file or containing directory).
    /// If None, the working directory and then the system library are tried.
    pub pdfium_library: Option<PathBuf>,

    /// Normalise whitespace and strip invisible characters. Default: true.
    pub clean_text: bool,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            ocr_enabled: true,
            tesseract_command: PathBuf::from("tesseract"),
            ocr_language: "eng".to_string(),
            max_rendered_pixels: 2000,
            pdfium_library: None,
            clean_text: true,
        }
    }
}

impl ConverterConfig {
    /// Create a new builder for `ConverterConfig`.
    pub fn builder() -> ConverterConfigBuilder {
        ConverterConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`ConverterConfig`].
#[derive(Debug)]
pub struct ConverterConfigBuilder {
    config: ConverterConfig,
}

impl ConverterConfigBuilder {
    pub fn ocr_enabled(mut self, v: bool) -> Self {
        self.config.ocr_enabled = v;
        self
    }

    pub fn tesseract_command(mut self, program: impl Into<PathBuf>) -> Self {
        self.config.tesseract_command = program.into();
        self
    }

    pub fn ocr_language(mut self, lang: impl Into<String>) -> Self {
        self.config.ocr_language = lang.into();
        self
    }

    pub fn max_rendered_pixels(mut self, px: u32) -> Self {
        self.config.max_rendered_pixels = px.max(100);
        self
    }

    pub fn pdfium_library(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.pdfium_library = Some(path.into());
        self
    }

    pub fn clean_text(mut self, v: bool) -> Self {
        self.config.clean_text = v;
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ConverterConfig, VellumError> {
        let c = &self.config;
        if c.ocr_enabled && c.ocr_language.trim().is_empty() {
            return Err(VellumError::InvalidConfig(
                "OCR language must not be empty".into(),
            ));
        }
        if c.ocr_enabled && c.tesseract_command.as_os_str().is_empty() {
            return Err(VellumError::InvalidConfig(
                "Tesseract command must not be empty".into(),
            ));
        }
        Ok(self.config)
    }
}
