//! Shared fixtures: a scripted frontend and fake readers.
#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use tracing_subscriber::EnvFilter;
use vellum::progress::RecordingTracker;
use vellum::{
    ActionResult, ConversionSummary, DocumentReader, FileEntry, MergeMode, OutputFormat,
    ProgressError, ProgressTracker, ReaderRegistry, TaskId, TaskStatus, TaskUpdate, UserInterface,
    VellumError,
};

// ── Logging ──────────────────────────────────────────────────────────────────

/// Route controller logs into the test harness output. `RUST_LOG` overrides.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("vellum=debug")),
        )
        .with_test_writer()
        .try_init();
}

// ── Progress ─────────────────────────────────────────────────────────────────

/// When the shared tracker refuses updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailMode {
    #[default]
    Never,
    /// Refuse progress updates sent from inside extraction (0 < pct).
    MidExtraction,
    /// Refuse the final "done" update.
    OnDone,
}

/// Tracker handed out by [`ScriptedUi`]; events stay visible to the test.
pub struct SharedTracker {
    log: Rc<RefCell<RecordingTracker>>,
    fail: FailMode,
    released: Rc<Cell<bool>>,
}

impl ProgressTracker for SharedTracker {
    fn add_task(&mut self, filename: &str) -> TaskId {
        self.log.borrow_mut().add_task(filename)
    }

    fn update(&mut self, task: TaskId, update: TaskUpdate) -> Result<(), ProgressError> {
        let refuse = match self.fail {
            FailMode::Never => false,
            FailMode::MidExtraction => {
                update.status == TaskStatus::Converting && update.completed > 0
            }
            FailMode::OnDone => update.status == TaskStatus::Done,
        };
        if refuse {
            return Err(ProgressError::Display("scripted failure".into()));
        }
        self.log.borrow_mut().update(task, update)
    }
}

impl Drop for SharedTracker {
    fn drop(&mut self) {
        self.released.set(true);
    }
}

// ── Scripted frontend ────────────────────────────────────────────────────────

/// Answers prompts from queues. An exhausted queue answers `Terminate`.
#[derive(Default)]
pub struct ScriptedUi {
    pub paths: VecDeque<ActionResult<String>>,
    pub formats: VecDeque<ActionResult<OutputFormat>>,
    pub merge_modes: VecDeque<ActionResult<MergeMode>>,
    pub merged_names: VecDeque<ActionResult<String>>,
    pub selections: VecDeque<ActionResult<Vec<usize>>>,
    pub again: VecDeque<ActionResult>,

    pub errors: Vec<String>,
    pub summaries: Vec<ConversionSummary>,
    pub offered_files: Vec<Vec<FileEntry>>,
    pub headers_drawn: usize,

    pub progress: Rc<RefCell<RecordingTracker>>,
    pub tracker_released: Rc<Cell<bool>>,
    pub fail: FailMode,
}

impl ScriptedUi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn path(mut self, p: impl AsRef<Path>) -> Self {
        self.paths
            .push_back(ActionResult::Value(p.as_ref().display().to_string()));
        self
    }

    pub fn raw_path(mut self, p: &str) -> Self {
        self.paths.push_back(ActionResult::Value(p.to_string()));
        self
    }

    pub fn format(mut self, f: OutputFormat) -> Self {
        self.formats.push_back(ActionResult::Value(f));
        self
    }

    pub fn merge_mode(mut self, m: MergeMode) -> Self {
        self.merge_modes.push_back(ActionResult::Value(m));
        self
    }

    pub fn merged_name(mut self, n: &str) -> Self {
        self.merged_names.push_back(ActionResult::Value(n.to_string()));
        self
    }

    pub fn select(mut self, indices: &[usize]) -> Self {
        self.selections.push_back(ActionResult::Value(indices.to_vec()));
        self
    }

    pub fn again(mut self, answer: ActionResult) -> Self {
        self.again.push_back(answer);
        self
    }

    pub fn failing(mut self, fail: FailMode) -> Self {
        self.fail = fail;
        self
    }
}

fn next<T>(queue: &mut VecDeque<ActionResult<T>>) -> ActionResult<T> {
    queue.pop_front().unwrap_or(ActionResult::Terminate)
}

impl UserInterface for ScriptedUi {
    fn get_path_input(&mut self) -> ActionResult<String> {
        next(&mut self.paths)
    }

    fn select_output_format(&mut self) -> ActionResult<OutputFormat> {
        next(&mut self.formats)
    }

    fn select_merge_mode(&mut self) -> ActionResult<MergeMode> {
        next(&mut self.merge_modes)
    }

    fn prompt_merged_filename(&mut self) -> ActionResult<String> {
        next(&mut self.merged_names)
    }

    fn select_files(&mut self, files: &[FileEntry]) -> ActionResult<Vec<usize>> {
        self.offered_files.push(files.to_vec());
        next(&mut self.selections)
    }

    fn show_error(&mut self, message: &str) {
        self.errors.push(message.to_string());
    }

    fn show_conversion_summary(&mut self, summary: &ConversionSummary) {
        self.summaries.push(summary.clone());
    }

    fn ask_again(&mut self) -> ActionResult {
        next(&mut self.again)
    }

    fn progress_bar(&mut self) -> Box<dyn ProgressTracker> {
        self.tracker_released.set(false);
        Box::new(SharedTracker {
            log: Rc::clone(&self.progress),
            fail: self.fail,
            released: Rc::clone(&self.tracker_released),
        })
    }

    fn clear_and_show_header(&mut self) {
        self.headers_drawn += 1;
    }
}

// ── Fake readers ─────────────────────────────────────────────────────────────

/// Returns `items` pages, each named after the source file.
pub struct FakeReader {
    name: String,
    items: usize,
}

impl DocumentReader for FakeReader {
    fn extract_content_per_item(
        &self,
        progress: &mut dyn FnMut(usize, usize),
    ) -> Result<Vec<String>, VellumError> {
        (1..=self.items)
            .map(|i| {
                progress(i, self.items);
                Ok(format!("{} item {}", self.name, i))
            })
            .collect()
    }
}

/// Fails like a corrupt PDF.
pub struct BrokenReader(PathBuf);

impl DocumentReader for BrokenReader {
    fn extract_content_per_item(
        &self,
        _progress: &mut dyn FnMut(usize, usize),
    ) -> Result<Vec<String>, VellumError> {
        Err(VellumError::CorruptPdf {
            path: self.0.clone(),
            detail: "trailer not found".into(),
        })
    }
}

fn fake(path: &Path, items: usize) -> Box<dyn DocumentReader> {
    Box::new(FakeReader {
        name: vellum::file::file_name(path),
        items,
    })
}

/// `.pdf` → `pdf_pages` items, `.epub` → `epub_chapters` items.
pub fn fake_readers(pdf_pages: usize, epub_chapters: usize) -> ReaderRegistry {
    ReaderRegistry::new()
        .with(".pdf", move |p| fake(p, pdf_pages))
        .with(".epub", move |p| fake(p, epub_chapters))
}

/// `.pdf` files fail to open.
pub fn broken_pdf_readers() -> ReaderRegistry {
    ReaderRegistry::new().with(".pdf", |p| {
        Box::new(BrokenReader(p.to_path_buf())) as Box<dyn DocumentReader>
    })
}

/// Create `name` in `dir` with `size` bytes.
pub fn touch(dir: &Path, name: &str, size: usize) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, vec![b'%'; size]).unwrap();
    path
}
