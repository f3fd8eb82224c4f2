//! # vellum
//!
//! Convert PDF and EPUB documents to plain text, Markdown, or JSON from an
//! interactive terminal workflow.
//!
//! ## Workflow
//!
//! ```text
//! source ─▶ format ─▶ merge mode ─▶ files ─▶ processing ─▶ complete
//!    ▲                                                        │
//!    └────────────────────── again? ◀─────────────────────────┘
//! ```
//!
//! The [`ConverterController`] drives a [`WorkflowStateMachine`] through
//! these steps. It asks a [`UserInterface`] for every decision, extracts text
//! with a [`DocumentReader`] chosen by file extension, and writes it with the
//! [`OutputWriter`] of the chosen [`OutputFormat`]. Three [`MergeMode`]s
//! decide how many files come out: one per document, one merged file, or one
//! per page/chapter.
//!
//! ## Extraction
//!
//! | Input | Backend | Fallback |
//! |-------|---------|----------|
//! | `.pdf`  | pdfium text layer | tesseract OCR for pages without text |
//! | `.epub` | zip + OPF spine, HTML → text | none |
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use vellum::{ConverterConfig, ConverterController, ReaderRegistry, TerminalUi, WriterRegistry};
//!
//! fn main() -> Result<(), vellum::VellumError> {
//!     let config = ConverterConfig::builder().ocr_language("eng").build()?;
//!     let mut controller = ConverterController::new(
//!         TerminalUi::stdio(),
//!         ReaderRegistry::with_defaults(&config),
//!         WriterRegistry::with_defaults(),
//!     );
//!     controller.run(true)?;
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | The `vellum` binary and [`TerminalUi`] (clap, crossterm, indicatif) |
//!
//! Without `cli` the library still exposes the controller, readers, and
//! writers; bring your own [`UserInterface`].

// ── Modules ──────────────────────────────────────────────────────────────

pub mod action;
pub mod config;
pub mod controller;
pub mod error;
pub mod file;
pub mod format;
pub mod output;
pub mod progress;
pub mod reader;
pub mod ui;
pub mod workflow;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use action::{ActionKind, ActionResult};
pub use config::{ConverterConfig, ConverterConfigBuilder};
pub use controller::{ConversionSummary, ConverterController};
pub use error::{ProgressError, VellumError};
pub use file::{format_size, FileEntry};
pub use format::{MergeMode, OutputFormat};
pub use output::{OutputWriter, WriterRegistry};
pub use progress::{ProgressTracker, TaskId, TaskStatus, TaskUpdate};
pub use reader::{DocumentReader, ReaderRegistry};
pub use ui::UserInterface;
pub use workflow::{WorkflowContext, WorkflowState, WorkflowStateMachine};

#[cfg(feature = "cli")]
pub use ui::TerminalUi;
