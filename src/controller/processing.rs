//! The PROCESSING step: convert each selected file and aggregate the results.

use crate::error::VellumError;
use crate::file::{file_name, file_stem, format_size};
use crate::format::{MergeMode, OutputFormat};
use crate::output::OutputWriter;
use crate::progress::{percent, ProgressTracker, TaskId, TaskUpdate};
use crate::reader::ReaderRegistry;
use crate::ui::UserInterface;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Default base name of a merged output for a directory source.
pub const DEFAULT_MERGED_NAME: &str = "merged_output";

/// What a processing run produced, as shown to the user.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConversionSummary {
    pub total_files: usize,
    /// Files written: one per source, one per page, or the merged file (none
    /// when every merged source came back empty).
    pub output_count: usize,
    pub merge_mode: MergeMode,
    /// `{name}.{ext}` of the merged file, when merging produced one.
    pub merged_filename: Option<String>,
    pub total_runtime: Duration,
    pub total_input_bytes: u64,
    pub total_output_bytes: u64,
    pub total_input_size: String,
    pub total_output_size: String,
    /// `{stem}.{ext}` when exactly one file was converted without merging.
    pub single_output_filename: Option<String>,
}

/// Inputs of one processing run, taken from the workflow context.
#[derive(Debug, Clone)]
pub struct ProcessingRequest<'a> {
    pub files: &'a [PathBuf],
    pub input_path: &'a Path,
    pub format: OutputFormat,
    pub merge_mode: MergeMode,
    /// User-chosen merged base name; `None` or empty selects the default.
    pub merged_filename: Option<&'a str>,
}

/// Convert every file of `request` in order.
///
/// The progress display is held for exactly the duration of this call and
/// released on every exit path, including `?` on a fatal error.
pub fn process_files<U: UserInterface + ?Sized>(
    ui: &mut U,
    readers: &ReaderRegistry,
    writer: &dyn OutputWriter,
    request: &ProcessingRequest<'_>,
) -> Result<ConversionSummary, VellumError> {
    let started = Instant::now();
    let total_input_bytes = request
        .files
        .iter()
        .map(|f| std::fs::metadata(f).map(|m| m.len()).unwrap_or(0))
        .sum();

    let mut output_count = 0;
    let mut total_output_bytes = 0;
    let mut merged_parts = Vec::new();
    let mut merged_filename = None;

    {
        let mut tracker = ui.progress_bar();
        let tasks: Vec<TaskId> = request
            .files
            .iter()
            .map(|f| tracker.add_task(&file_name(f)))
            .collect();

        for (file, &task) in request.files.iter().zip(&tasks) {
            let name = file_name(file);
            let file_started = Instant::now();
            info!("Converting {}", file.display());

            let reader = readers.reader_for(file)?;
            tracker.update(task, TaskUpdate::converting(0, Duration::ZERO))?;

            let mut on_progress = |current: usize, total: usize| {
                let update = TaskUpdate::converting(percent(current, total), file_started.elapsed());
                if let Err(e) = tracker.update(task, update) {
                    debug!("Progress update for {} dropped: {}", name, e);
                }
            };

            match request.merge_mode {
                MergeMode::PerPage => {
                    let contents = reader.extract_content_per_item(&mut on_progress)?;
                    total_output_bytes += writer.save_multiple(&contents, file, &name)?;
                    output_count += contents.len();
                }
                MergeMode::NoMerge => {
                    let content = reader.extract_content(&mut on_progress)?;
                    total_output_bytes += writer.save(&content, file)?;
                    output_count += 1;
                }
                MergeMode::Merge => {
                    let content = reader.extract_content(&mut on_progress)?;
                    if content.is_empty() {
                        debug!("{} produced no text, left out of the merge", name);
                    } else {
                        merged_parts.push(merge_section(&name, &content));
                    }
                }
            }

            let elapsed = file_started.elapsed();
            tracker.update(task, TaskUpdate::done(elapsed))?;
            debug!("Finished {} in {:.2?}", name, elapsed);
        }
    }

    if request.merge_mode == MergeMode::Merge && !merged_parts.is_empty() {
        let destination = merged_destination(request.input_path, request.merged_filename);
        total_output_bytes += writer.save(&merged_parts.join("\n\n"), &destination)?;
        output_count = 1;
        merged_filename = Some(file_name(
            &destination.with_extension(request.format.extension()),
        ));
    }

    let single_output_filename = match (request.merge_mode, request.files) {
        (MergeMode::NoMerge, [only]) => Some(format!(
            "{}.{}",
            file_stem(only),
            request.format.extension()
        )),
        _ => None,
    };

    let summary = ConversionSummary {
        total_files: request.files.len(),
        output_count,
        merge_mode: request.merge_mode,
        merged_filename,
        total_runtime: started.elapsed(),
        total_input_bytes,
        total_output_bytes,
        total_input_size: format_size(total_input_bytes),
        total_output_size: format_size(total_output_bytes),
        single_output_filename,
    };
    info!(
        "Converted {} files into {} outputs in {:.2?}",
        summary.total_files, summary.output_count, summary.total_runtime
    );
    Ok(summary)
}

/// One source's block in a merged document.
pub fn merge_section(source_name: &str, content: &str) -> String {
    format!("\n--- start source: {source_name} ---\n{content}")
}

/// Where the merged document goes (before the writer adds its extension).
///
/// Directory source: inside it, named by the user or [`DEFAULT_MERGED_NAME`].
/// File source: next to it, named by the user or `{stem}_merged`.
pub fn merged_destination(input_path: &Path, custom_name: Option<&str>) -> PathBuf {
    let custom = custom_name.map(str::trim).filter(|n| !n.is_empty());
    if input_path.is_dir() {
        input_path.join(custom.unwrap_or(DEFAULT_MERGED_NAME))
    } else {
        let parent = input_path.parent().unwrap_or_else(|| Path::new(""));
        match custom {
            Some(name) => parent.join(name),
            None => parent.join(format!("{}_merged", file_stem(input_path))),
        }
    }
}
