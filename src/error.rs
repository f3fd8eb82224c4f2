//! Error types for the vellum library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`VellumError`] is **fatal**: the run cannot continue (corrupt document,
//!   missing reader registration, output directory not writable). Returned as
//!   `Err(VellumError)` from [`crate::ConverterController::run`].
//!
//! * [`ProgressError`] is **non-fatal**: the progress display could not be
//!   updated. Extraction never depends on the display, so the controller
//!   drops these inside the progress callback.
//!
//! User mistakes (empty path, unsupported file, nothing selected) are neither:
//! they travel as [`crate::ActionResult::Error`] and are recovered by the
//! workflow's error state.

use crate::format::OutputFormat;
use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the vellum library.
#[derive(Debug, Error)]
pub enum VellumError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// A source file could not be read.
    #[error("Failed to read '{path}': {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// No reader is registered for an extension that passed validation.
    #[error("No document reader registered for '{extension}' files")]
    NoReaderRegistered { extension: String },

    // ── PDF errors ────────────────────────────────────────────────────────
    /// PDF header/trailer/xref is corrupt and cannot be parsed.
    #[error("PDF '{path}' is corrupt: {detail}\nTry repairing with: qpdf input.pdf output.pdf")]
    CorruptPdf { path: PathBuf, detail: String },

    /// PDF is encrypted; vellum does not prompt for passwords.
    #[error("PDF '{path}' is encrypted and requires a password.\nDecrypt it first, e.g. qpdf --decrypt input.pdf output.pdf")]
    PasswordRequired { path: PathBuf },

    /// pdfium could not produce the text layer of a page.
    #[error("Text extraction failed for page {page}: {detail}")]
    TextExtractionFailed { page: usize, detail: String },

    /// pdfium-render returned an error while rasterising a page for OCR.
    #[error("Rasterisation failed for page {page}: {detail}")]
    RasterisationFailed { page: usize, detail: String },

    /// Could not bind to a pdfium library.
    #[error(
        "Failed to bind to pdfium library: {0}\n\n\
Vellum needs the pdfium shared library to read PDF files.\n\
  • Place libpdfium next to the vellum binary, or\n\
  • Set PDFIUM_LIB_PATH=/path/to/libpdfium (or pass --pdfium-lib).\n"
    )]
    PdfiumBindingFailed(String),

    // ── EPUB errors ───────────────────────────────────────────────────────
    /// The EPUB container or its package document is malformed.
    #[error("EPUB '{path}' is corrupt: {detail}")]
    CorruptEpub { path: PathBuf, detail: String },

    // ── OCR errors ────────────────────────────────────────────────────────
    /// The tesseract executable could not be started.
    #[error("OCR engine '{program}' is not available.\nInstall tesseract or rerun with --no-ocr.")]
    OcrUnavailable { program: String },

    /// tesseract ran but did not recognise the page.
    #[error("OCR failed for page {page}: {detail}")]
    OcrFailed { page: usize, detail: String },

    // ── Output errors ─────────────────────────────────────────────────────
    /// No writer is registered for the chosen output format.
    #[error("No output writer registered for {format}")]
    NoWriterRegistered { format: OutputFormat },

    /// Could not create or write an output file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON encoding of an output record failed.
    #[error("Failed to serialise JSON output: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The progress display failed outside the extraction callback.
    #[error(transparent)]
    Progress(#[from] ProgressError),

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// A non-fatal error raised by a progress display.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProgressError {
    /// The task id was never handed out by this tracker.
    #[error("unknown progress task {0}")]
    UnknownTask(usize),

    /// The display backend refused the update.
    #[error("progress display failed: {0}")]
    Display(String),
}
