use super::WorkflowState;
use crate::format::{MergeMode, OutputFormat};
use std::path::PathBuf;

/// Answers and derived data carried between workflow steps.
///
/// Created empty with the state machine and replaced wholesale by
/// [`super::WorkflowStateMachine::reset`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkflowContext {
    /// File or directory the user pointed at.
    pub input_path: Option<PathBuf>,
    pub format: Option<OutputFormat>,
    pub merge_mode: Option<MergeMode>,
    /// Files chosen for conversion, in processing order.
    pub files: Vec<PathBuf>,
    /// Supported files found under `input_path`.
    pub compatible_files: Vec<PathBuf>,
    /// Base name of the merged output; only set in [`MergeMode::Merge`].
    pub merged_filename: Option<String>,
    /// Only set while in [`WorkflowState::Error`].
    pub error_message: Option<String>,
    /// Only set while in [`WorkflowState::Error`].
    pub error_origin: Option<WorkflowState>,
}

impl WorkflowContext {
    pub fn clear_error(&mut self) {
        self.error_message = None;
        self.error_origin = None;
    }
}
