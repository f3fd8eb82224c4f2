//! Multi-row progress display: one `indicatif` bar per file.

use crate::error::ProgressError;
use crate::progress::{ProgressTracker, TaskId, TaskStatus, TaskUpdate};
use crate::ui::style::{dim, green, yellow};
use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::time::Duration;

/// `MM:SS`, or `HH:MM:SS` from one hour on.
pub fn format_clock(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    let (h, m, s) = (secs / 3600, (secs % 3600) / 60, secs % 60);
    if h > 0 {
        format!("{h:02}:{m:02}:{s:02}")
    } else {
        format!("{m:02}:{s:02}")
    }
}

/// Per-file progress rows. The rows are cleared when the tracker is dropped.
pub struct IndicatifTracker {
    multi: MultiProgress,
    rows: Vec<ProgressBar>,
    name_width: usize,
}

impl IndicatifTracker {
    /// Draw on stderr.
    pub fn stderr() -> Self {
        Self::with_target(ProgressDrawTarget::stderr())
    }

    /// Draw nowhere (tests, non-interactive output).
    pub fn hidden() -> Self {
        Self::with_target(ProgressDrawTarget::hidden())
    }

    fn with_target(target: ProgressDrawTarget) -> Self {
        Self {
            multi: MultiProgress::with_draw_target(target),
            rows: Vec::new(),
            name_width: 20,
        }
    }

    fn style(&self) -> ProgressStyle {
        ProgressStyle::with_template(&format!(
            "{{prefix:<{}}} {{msg:<20}} [{{bar:30.green/238}}] {{pos:>3}}%",
            self.name_width
        ))
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ")
    }
}

fn status_message(update: &TaskUpdate) -> String {
    let clock = format_clock(update.elapsed);
    match update.status {
        TaskStatus::Pending => dim("pending"),
        TaskStatus::Converting => format!("{} {}", yellow("converting"), dim(&clock)),
        TaskStatus::Done => format!("{} {}", green("done"), dim(&clock)),
    }
}

impl ProgressTracker for IndicatifTracker {
    fn add_task(&mut self, filename: &str) -> TaskId {
        self.name_width = self.name_width.max(filename.chars().count());
        let bar = self.multi.add(ProgressBar::new(100));
        bar.set_prefix(filename.to_string());
        bar.set_message(dim("pending"));
        self.rows.push(bar);

        let style = self.style();
        for row in &self.rows {
            row.set_style(style.clone());
        }
        self.rows.len() - 1
    }

    fn update(&mut self, task: TaskId, update: TaskUpdate) -> Result<(), ProgressError> {
        let bar = self.rows.get(task).ok_or(ProgressError::UnknownTask(task))?;
        bar.set_position(update.completed);
        bar.set_message(status_message(&update));
        if update.status == TaskStatus::Done {
            bar.finish();
        }
        Ok(())
    }
}

impl Drop for IndicatifTracker {
    fn drop(&mut self) {
        for row in &self.rows {
            if !row.is_finished() {
                row.abandon();
            }
        }
        let _ = self.multi.clear();
    }
}
