//! Progress-tracker trait for per-file conversion events.
//!
//! A [`ProgressTracker`] is acquired from
//! [`crate::ui::UserInterface::progress_bar`] before the first file is
//! converted and dropped after the last one. Implementations release their
//! display in `Drop`, so the screen is restored however the processing scope
//! is left: normal completion or an early `?` on a fatal error.
//!
//! # Example
//!
//! ```rust
//! use vellum::progress::{ProgressTracker, RecordingTracker, TaskStatus, TaskUpdate};
//! use std::time::Duration;
//!
//! let mut tracker = RecordingTracker::default();
//! let task = tracker.add_task("book.epub");
//! tracker.update(task, TaskUpdate::converting(40, Duration::from_secs(1))).unwrap();
//! tracker.update(task, TaskUpdate::done(Duration::from_secs(2))).unwrap();
//!
//! assert_eq!(tracker.updates().last().unwrap().1.status, TaskStatus::Done);
//! ```

use crate::error::ProgressError;
use std::time::Duration;

/// Handle for one row of the progress display.
pub type TaskId = usize;

/// Lifecycle of a file in the progress display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStatus {
    Pending,
    Converting,
    Done,
}

/// New state of a task row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskUpdate {
    pub status: TaskStatus,
    /// Percentage, 0–100.
    pub completed: u64,
    /// Wall-clock time since the file started converting; for
    /// [`TaskStatus::Done`] this is the final conversion time.
    pub elapsed: Duration,
}

impl TaskUpdate {
    pub fn converting(completed: u64, elapsed: Duration) -> Self {
        Self {
            status: TaskStatus::Converting,
            completed: completed.min(100),
            elapsed,
        }
    }

    pub fn done(elapsed: Duration) -> Self {
        Self {
            status: TaskStatus::Done,
            completed: 100,
            elapsed,
        }
    }
}

/// Per-file progress display.
///
/// All rows are added up front (status [`TaskStatus::Pending`]) and then
/// updated one file at a time.
pub trait ProgressTracker {
    /// Add a pending row for `filename` and return its handle.
    fn add_task(&mut self, filename: &str) -> TaskId;

    /// Replace the state of a row.
    fn update(&mut self, task: TaskId, update: TaskUpdate) -> Result<(), ProgressError>;
}

/// Integer percentage of `current` out of `total`; an empty total is complete.
pub fn percent(current: usize, total: usize) -> u64 {
    if total == 0 {
        return 100;
    }
    ((current as u64).saturating_mul(100) / total as u64).min(100)
}

/// A tracker that displays nothing.
#[derive(Debug, Default)]
pub struct NoopProgressTracker {
    tasks: usize,
}

impl ProgressTracker for NoopProgressTracker {
    fn add_task(&mut self, _filename: &str) -> TaskId {
        self.tasks += 1;
        self.tasks - 1
    }

    fn update(&mut self, task: TaskId, _update: TaskUpdate) -> Result<(), ProgressError> {
        if task < self.tasks {
            Ok(())
        } else {
            Err(ProgressError::UnknownTask(task))
        }
    }
}

/// A tracker that keeps every event in memory, for tests and headless runs.
#[derive(Debug, Default, Clone)]
pub struct RecordingTracker {
    names: Vec<String>,
    updates: Vec<(TaskId, TaskUpdate)>,
}

impl RecordingTracker {
    /// Filenames in the order their rows were added.
    pub fn tasks(&self) -> &[String] {
        &self.names
    }

    pub fn updates(&self) -> &[(TaskId, TaskUpdate)] {
        &self.updates
    }
}

impl ProgressTracker for RecordingTracker {
    fn add_task(&mut self, filename: &str) -> TaskId {
        self.names.push(filename.to_string());
        self.names.len() - 1
    }

    fn update(&mut self, task: TaskId, update: TaskUpdate) -> Result<(), ProgressError> {
        if task >= self.names.len() {
            return Err(ProgressError::UnknownTask(task));
        }
        self.updates.push((task, update));
        Ok(())
    }
}
