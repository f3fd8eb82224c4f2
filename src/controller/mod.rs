//! The workflow driver.
//!
//! [`ConverterController`] owns the state machine, the reader and writer
//! registries, and the frontend. Each [`run`](ConverterController::run)
//! step looks up the handler for the current state, calls it, and turns the
//! returned [`ActionResult`] into a transition:
//!
//! | result      | effect                                              |
//! |-------------|-----------------------------------------------------|
//! | `Back`      | `back()` when there is history, else stay           |
//! | `Terminate` | stop                                                |
//! | `Error(m)`  | record `m` and the origin state, enter `Error`      |
//! | otherwise   | continue (handlers advance the machine themselves) |
//!
//! User mistakes never leave the loop. A [`VellumError`] from a reader or
//! writer ends the run.

pub mod processing;

pub use processing::{ConversionSummary, ProcessingRequest};

use crate::action::ActionResult;
use crate::error::VellumError;
use crate::file::{file_name, FileEntry};
use crate::format::MergeMode;
use crate::output::WriterRegistry;
use crate::reader::ReaderRegistry;
use crate::ui::UserInterface;
use crate::workflow::{WorkflowState, WorkflowStateMachine};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// A state handler.
type Handler<U> = fn(&mut ConverterController<U>) -> Result<ActionResult, VellumError>;

/// Unwrap a `Value` answer or hand any other outcome back to the run loop.
macro_rules! value_or_return {
    ($result:expr) => {
        match $result.into_value() {
            Ok(value) => value,
            Err(outcome) => return Ok(outcome),
        }
    };
}

/// Drives one frontend through the conversion workflow.
pub struct ConverterController<U: UserInterface> {
    ui: U,
    readers: ReaderRegistry,
    writers: WriterRegistry,
    machine: WorkflowStateMachine,
}

impl<U: UserInterface> ConverterController<U> {
    pub fn new(ui: U, readers: ReaderRegistry, writers: WriterRegistry) -> Self {
        Self {
            ui,
            readers,
            writers,
            machine: WorkflowStateMachine::new(),
        }
    }

    pub fn state_machine(&self) -> &WorkflowStateMachine {
        &self.machine
    }

    pub fn state_machine_mut(&mut self) -> &mut WorkflowStateMachine {
        &mut self.machine
    }

    pub fn ui(&self) -> &U {
        &self.ui
    }

    pub fn ui_mut(&mut self) -> &mut U {
        &mut self.ui
    }

    pub fn into_ui(self) -> U {
        self.ui
    }

    /// Run the workflow.
    ///
    /// With `looping = false` exactly one step runs and its continuation
    /// signal is returned. With `looping = true` steps run until one signals
    /// stop, and `false` is returned.
    pub fn run(&mut self, looping: bool) -> Result<bool, VellumError> {
        loop {
            let keep_going = self.step()?;
            if !looping || !keep_going {
                return Ok(keep_going);
            }
        }
    }

    /// Dispatch the current state's handler and apply its outcome.
    ///
    /// An `Error` outcome records the machine's state *after* the handler
    /// returned as the origin. For FILES_SELECTION, which steps back before
    /// reporting an empty selection, the retry therefore resumes at
    /// MERGE_MODE_SELECTION rather than at the checklist.
    fn step(&mut self) -> Result<bool, VellumError> {
        let state = self.machine.state();
        debug!(%state, "dispatch");
        let outcome = Self::handler_for(state)(self)?;

        match outcome {
            ActionResult::Back => {
                if self.machine.can_go_back() {
                    self.machine.back();
                }
                Ok(true)
            }
            ActionResult::Terminate => {
                info!("Workflow terminated in {}", state);
                Ok(false)
            }
            ActionResult::Error(message) => {
                let origin = self.machine.state();
                warn!(%origin, "{}", message);
                let context = self.machine.context_mut();
                context.error_message = Some(message);
                context.error_origin = Some(origin);
                self.machine.set_state(WorkflowState::Error);
                Ok(true)
            }
            ActionResult::Proceed | ActionResult::Value(()) => Ok(true),
        }
    }

    fn handler_for(state: WorkflowState) -> Handler<U> {
        match state {
            WorkflowState::SourceInput => Self::handle_source_input,
            WorkflowState::FormatSelection => Self::handle_format_selection,
            WorkflowState::MergeModeSelection => Self::handle_merge_mode_selection,
            WorkflowState::FilesSelection => Self::handle_files_selection,
            WorkflowState::Processing => Self::handle_processing,
            WorkflowState::Complete => Self::handle_complete,
            WorkflowState::Error => Self::handle_error,
        }
    }

    // ── State handlers ────────────────────────────────────────────────────

    fn handle_source_input(&mut self) -> Result<ActionResult, VellumError> {
        let raw = value_or_return!(self.ui.get_path_input());
        let raw = raw.trim();
        if raw.is_empty() {
            return Ok(ActionResult::error("please provide a source file or directory"));
        }

        let path = PathBuf::from(raw);
        if !path.exists() {
            return Ok(ActionResult::error("path not found"));
        }

        let compatible_files = if path.is_dir() {
            let files = match self.readers.compatible_files(&path) {
                Ok(files) => files,
                Err(e) => return Ok(ActionResult::error(format!("cannot read directory: {e}"))),
            };
            if files.is_empty() {
                return Ok(ActionResult::error("no compatible files found in directory"));
            }
            files
        } else if self.readers.supports(&path) {
            vec![path.clone()]
        } else {
            return Ok(ActionResult::error("selected file type is not supported"));
        };

        info!(
            "Source {} ({} compatible files)",
            path.display(),
            compatible_files.len()
        );
        let context = self.machine.context_mut();
        context.input_path = Some(path);
        context.compatible_files = compatible_files;
        self.machine.next();
        Ok(ActionResult::Proceed)
    }

    fn handle_format_selection(&mut self) -> Result<ActionResult, VellumError> {
        let format = value_or_return!(self.ui.select_output_format());
        debug!(%format, "format chosen");
        self.machine.context_mut().format = Some(format);
        self.machine.next();
        Ok(ActionResult::Proceed)
    }

    fn handle_merge_mode_selection(&mut self) -> Result<ActionResult, VellumError> {
        let mode = value_or_return!(self.ui.select_merge_mode());
        debug!(%mode, "merge mode chosen");

        let merged_filename = if mode == MergeMode::Merge {
            let name = value_or_return!(self.ui.prompt_merged_filename());
            Some(name.trim().to_string()).filter(|n| !n.is_empty())
        } else {
            None
        };

        let context = self.machine.context_mut();
        context.merge_mode = Some(mode);
        context.merged_filename = merged_filename;
        self.machine.next();
        Ok(ActionResult::Proceed)
    }

    fn handle_files_selection(&mut self) -> Result<ActionResult, VellumError> {
        let context = self.machine.context();
        let is_directory = context.input_path.as_deref().is_some_and(Path::is_dir);
        let candidates = context.compatible_files.clone();

        let selected: Vec<PathBuf> = if is_directory {
            let rows: Vec<FileEntry> = candidates
                .iter()
                .map(|p| FileEntry::from_path(p).unwrap_or_else(|_| FileEntry::new(file_name(p), 0)))
                .collect();
            let indices = value_or_return!(self.ui.select_files(&rows));
            indices
                .into_iter()
                .filter_map(|i| candidates.get(i).cloned())
                .collect()
        } else {
            candidates
        };

        if selected.is_empty() {
            self.machine.back();
            return Ok(ActionResult::error("no files selected"));
        }

        debug!("{} files selected", selected.len());
        self.machine.context_mut().files = selected;
        self.machine.next();
        Ok(ActionResult::Proceed)
    }

    fn handle_processing(&mut self) -> Result<ActionResult, VellumError> {
        let context = self.machine.context();
        let format = context.format.ok_or_else(|| {
            VellumError::Internal("processing reached without an output format".into())
        })?;
        let input_path = context.input_path.clone().ok_or_else(|| {
            VellumError::Internal("processing reached without a source path".into())
        })?;
        let files = context.files.clone();
        let merge_mode = context.merge_mode.unwrap_or_default();
        let merged_filename = context.merged_filename.clone();

        let writer = self.writers.create(format)?;
        self.ui.clear_and_show_header();

        let request = ProcessingRequest {
            files: &files,
            input_path: &input_path,
            format,
            merge_mode,
            merged_filename: merged_filename.as_deref(),
        };
        let summary = processing::process_files(&mut self.ui, &self.readers, writer.as_ref(), &request)?;

        self.ui.show_conversion_summary(&summary);
        self.machine.next();
        Ok(ActionResult::Proceed)
    }

    fn handle_complete(&mut self) -> Result<ActionResult, VellumError> {
        match self.ui.ask_again() {
            ActionResult::Proceed => {
                debug!("Starting another conversion");
                self.machine.reset();
                Ok(ActionResult::Proceed)
            }
            _ => {
                self.machine.next();
                Ok(ActionResult::Terminate)
            }
        }
    }

    fn handle_error(&mut self) -> Result<ActionResult, VellumError> {
        let message = self
            .machine
            .context()
            .error_message
            .clone()
            .unwrap_or_default();
        self.ui.show_error(&message);

        match self.ui.ask_again() {
            ActionResult::Proceed => {
                let context = self.machine.context_mut();
                let origin = context.error_origin.take();
                context.clear_error();
                match origin {
                    Some(state) => self.machine.set_state(state),
                    None => self.machine.reset(),
                }
                Ok(ActionResult::Proceed)
            }
            _ => Ok(ActionResult::Terminate),
        }
    }
}

impl<U: UserInterface + std::fmt::Debug> std::fmt::Debug for ConverterController<U> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConverterController")
            .field("ui", &self.ui)
            .field("readers", &self.readers)
            .field("writers", &self.writers)
            .field("machine", &self.machine)
            .finish()
    }
}
