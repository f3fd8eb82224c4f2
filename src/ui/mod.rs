//! The user-facing side of the workflow.
//!
//! [`UserInterface`] is everything the controller asks of a frontend. Every
//! prompt answers with an [`ActionResult`], so BACKSPACE and quit travel the
//! same road as real answers.
//!
//! The terminal frontend ([`TerminalUi`]) lives behind the `cli` feature;
//! the library itself only needs the trait.

use crate::action::ActionResult;
use crate::controller::ConversionSummary;
use crate::file::FileEntry;
use crate::format::{MergeMode, OutputFormat};
use crate::progress::ProgressTracker;

#[cfg(feature = "cli")]
pub mod keyboard;
#[cfg(feature = "cli")]
pub mod progress_bar;
#[cfg(feature = "cli")]
pub mod style;
#[cfg(feature = "cli")]
pub mod terminal;

#[cfg(feature = "cli")]
pub use terminal::TerminalUi;

/// A frontend the controller drives.
pub trait UserInterface {
    /// Ask for a source file or directory. The raw answer is returned; the
    /// controller validates it.
    fn get_path_input(&mut self) -> ActionResult<String>;

    fn select_output_format(&mut self) -> ActionResult<OutputFormat>;

    fn select_merge_mode(&mut self) -> ActionResult<MergeMode>;

    /// Ask for the merged output's base name. An empty answer means
    /// "use the default name".
    fn prompt_merged_filename(&mut self) -> ActionResult<String>;

    /// Let the user pick files; returns indices into `files`.
    fn select_files(&mut self, files: &[FileEntry]) -> ActionResult<Vec<usize>>;

    fn show_error(&mut self, message: &str);

    fn show_conversion_summary(&mut self, summary: &ConversionSummary);

    /// Offer to start over. [`ActionResult::Proceed`] means "again".
    fn ask_again(&mut self) -> ActionResult;

    /// Acquire the progress display for one processing run.
    ///
    /// The tracker owns the display and releases it when dropped.
    fn progress_bar(&mut self) -> Box<dyn ProgressTracker>;

    /// Clear the screen and redraw the banner before processing starts.
    fn clear_and_show_header(&mut self) {}
}
