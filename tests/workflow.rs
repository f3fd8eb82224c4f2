//! Workflow integration tests: a scripted frontend drives the controller
//! through whole conversions into temporary directories.

mod common;

use common::{broken_pdf_readers, fake_readers, init_tracing, touch, FailMode, ScriptedUi};
use std::path::Path;
use vellum::controller::processing::{process_files, ProcessingRequest};
use vellum::output::PlainTextWriter;
use vellum::{
    format_size, ActionResult, ConverterController, MergeMode, OutputFormat, ReaderRegistry,
    TaskStatus, VellumError, WorkflowState, WriterRegistry,
};

type Controller = ConverterController<ScriptedUi>;

fn controller(ui: ScriptedUi, readers: ReaderRegistry) -> Controller {
    init_tracing();
    ConverterController::new(ui, readers, WriterRegistry::with_defaults())
}

fn read(path: impl AsRef<Path>) -> String {
    std::fs::read_to_string(path.as_ref())
        .unwrap_or_else(|e| panic!("{}: {e}", path.as_ref().display()))
}

// ── Conversion scenarios ─────────────────────────────────────────────────────

#[test]
fn two_pdfs_without_merge_write_one_text_file_each() {
    let dir = tempfile::tempdir().unwrap();
    touch(dir.path(), "a.pdf", 1000);
    touch(dir.path(), "b.pdf", 2000);

    let ui = ScriptedUi::new()
        .path(dir.path())
        .format(OutputFormat::PlainText)
        .merge_mode(MergeMode::NoMerge)
        .select(&[0, 1])
        .again(ActionResult::Terminate);
    let mut c = controller(ui, fake_readers(2, 3));

    assert!(!c.run(true).unwrap());

    assert_eq!(read(dir.path().join("a.txt")), "a.pdf item 1\n\na.pdf item 2");
    assert_eq!(read(dir.path().join("b.txt")), "b.pdf item 1\n\nb.pdf item 2");

    let ui = c.ui();
    assert_eq!(ui.summaries.len(), 1);
    let summary = &ui.summaries[0];
    assert_eq!(summary.total_files, 2);
    assert_eq!(summary.output_count, 2);
    assert_eq!(summary.total_input_bytes, 3000);
    assert_eq!(summary.total_input_size, format_size(3000));
    assert_eq!(summary.single_output_filename, None);
    assert_eq!(summary.merged_filename, None);
    assert_eq!(ui.headers_drawn, 1);

    let names: Vec<_> = ui.offered_files[0].iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["a.pdf", "b.pdf"]);
    assert_eq!(ui.offered_files[0][1].size_bytes, 2000);
}

#[test]
fn epub_per_page_json_writes_one_record_per_chapter() {
    let dir = tempfile::tempdir().unwrap();
    let book = touch(dir.path(), "book.epub", 10);

    let ui = ScriptedUi::new()
        .path(&book)
        .format(OutputFormat::Json)
        .merge_mode(MergeMode::PerPage)
        .again(ActionResult::Terminate);
    let mut c = controller(ui, fake_readers(1, 3));

    c.run(true).unwrap();

    for page in 1..=3 {
        let raw = read(dir.path().join(format!("book_page_{page}.json")));
        let v: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(v["source"], "book.epub");
        assert_eq!(v["page"], page);
        assert_eq!(v["content"], format!("book.epub item {page}"));
    }
    assert!(!dir.path().join("book_page_4.json").exists());

    let ui = c.ui();
    assert!(ui.offered_files.is_empty(), "single file input skips the checklist");
    assert_eq!(ui.summaries[0].output_count, 3);
    assert_eq!(ui.summaries[0].merge_mode, MergeMode::PerPage);
}

#[test]
fn per_page_counts_every_page_of_every_file() {
    let dir = tempfile::tempdir().unwrap();
    touch(dir.path(), "paper.pdf", 5);
    touch(dir.path(), "story.epub", 5);

    let ui = ScriptedUi::new()
        .path(dir.path())
        .format(OutputFormat::PlainText)
        .merge_mode(MergeMode::PerPage)
        .select(&[0, 1])
        .again(ActionResult::Terminate);
    let mut c = controller(ui, fake_readers(2, 3));
    c.run(true).unwrap();

    let written: Vec<_> = (1..=2)
        .map(|n| dir.path().join(format!("paper_page_{n}.txt")))
        .chain((1..=3).map(|n| dir.path().join(format!("story_page_{n}.txt"))))
        .collect();
    let mut bytes = 0;
    for path in &written {
        assert!(path.exists(), "{} missing", path.display());
        bytes += std::fs::metadata(path).unwrap().len();
    }
    assert!(!dir.path().join("paper_page_3.txt").exists());
    assert_eq!(read(dir.path().join("story_page_2.txt")), "story.epub item 2");

    let summary = &c.ui().summaries[0];
    assert_eq!(summary.total_files, 2);
    assert_eq!(summary.output_count, 5);
    assert_eq!(summary.total_output_bytes, bytes);
}

#[test]
fn single_file_without_merge_reports_output_name() {
    let dir = tempfile::tempdir().unwrap();
    let book = touch(dir.path(), "novel.epub", 10);

    let ui = ScriptedUi::new()
        .path(&book)
        .format(OutputFormat::Markdown)
        .merge_mode(MergeMode::NoMerge)
        .again(ActionResult::Terminate);
    let mut c = controller(ui, fake_readers(1, 2));
    c.run(true).unwrap();

    let md = read(dir.path().join("novel.md"));
    assert!(md.starts_with("# source: novel.epub\n\n"), "{md}");
    assert_eq!(
        c.ui().summaries[0].single_output_filename.as_deref(),
        Some("novel.md")
    );
}

#[test]
fn merge_with_custom_name_concatenates_sources() {
    let dir = tempfile::tempdir().unwrap();
    touch(dir.path(), "a.pdf", 5);
    touch(dir.path(), "b.epub", 5);

    let ui = ScriptedUi::new()
        .path(dir.path())
        .format(OutputFormat::Markdown)
        .merge_mode(MergeMode::Merge)
        .merged_name("combined")
        .select(&[0, 1])
        .again(ActionResult::Terminate);
    let mut c = controller(ui, fake_readers(1, 2));
    c.run(true).unwrap();

    let expected_body = "\n--- start source: a.pdf ---\na.pdf item 1\n\n\
                         \n--- start source: b.epub ---\nb.epub item 1\n\nb.epub item 2";
    assert_eq!(
        read(dir.path().join("combined.md")),
        format!("# source: combined\n\n{expected_body}")
    );
    assert!(!dir.path().join("a.md").exists());

    let summary = &c.ui().summaries[0];
    assert_eq!(summary.output_count, 1);
    assert_eq!(summary.merged_filename.as_deref(), Some("combined.md"));
}

#[test]
fn merge_defaults_to_merged_output_inside_directory() {
    let dir = tempfile::tempdir().unwrap();
    touch(dir.path(), "x.pdf", 5);

    let ui = ScriptedUi::new()
        .path(dir.path())
        .format(OutputFormat::PlainText)
        .merge_mode(MergeMode::Merge)
        .merged_name("")
        .select(&[0])
        .again(ActionResult::Terminate);
    let mut c = controller(ui, fake_readers(1, 1));
    c.run(true).unwrap();

    assert_eq!(
        read(dir.path().join("merged_output.txt")),
        "\n--- start source: x.pdf ---\nx.pdf item 1"
    );
    assert_eq!(
        c.ui().summaries[0].merged_filename.as_deref(),
        Some("merged_output.txt")
    );
}

#[test]
fn merge_defaults_to_stem_merged_for_single_file() {
    let dir = tempfile::tempdir().unwrap();
    let file = touch(dir.path(), "report.pdf", 5);

    let ui = ScriptedUi::new()
        .path(&file)
        .format(OutputFormat::Json)
        .merge_mode(MergeMode::Merge)
        .merged_name("   ")
        .again(ActionResult::Terminate);
    let mut c = controller(ui, fake_readers(2, 1));
    c.run(true).unwrap();

    let v: serde_json::Value =
        serde_json::from_str(&read(dir.path().join("report_merged.json"))).unwrap();
    assert_eq!(v["source"], "report_merged");
    assert_eq!(c.ui().summaries[0].output_count, 1);
}

#[test]
fn merge_leaves_out_sources_without_text() {
    let dir = tempfile::tempdir().unwrap();
    touch(dir.path(), "book.epub", 5);
    touch(dir.path(), "scan.pdf", 5);

    let ui = ScriptedUi::new()
        .path(dir.path())
        .format(OutputFormat::PlainText)
        .merge_mode(MergeMode::Merge)
        .merged_name("")
        .select(&[0, 1])
        .again(ActionResult::Terminate);
    let mut c = controller(ui, fake_readers(0, 1));
    c.run(true).unwrap();

    let merged = read(dir.path().join("merged_output.txt"));
    assert_eq!(merged, "\n--- start source: book.epub ---\nbook.epub item 1");
    assert!(!merged.contains("scan.pdf"));
    assert_eq!(c.ui().summaries[0].output_count, 1);
}

#[test]
fn merge_of_only_empty_sources_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let scan = touch(dir.path(), "scan.pdf", 5);

    let ui = ScriptedUi::new()
        .path(&scan)
        .format(OutputFormat::PlainText)
        .merge_mode(MergeMode::Merge)
        .merged_name("")
        .again(ActionResult::Terminate);
    let mut c = controller(ui, fake_readers(0, 1));
    c.run(true).unwrap();

    assert!(!dir.path().join("scan_merged.txt").exists());
    let summary = &c.ui().summaries[0];
    assert_eq!(summary.output_count, 0);
    assert_eq!(summary.merged_filename, None);
    assert_eq!(summary.total_output_bytes, 0);
}

// ── Recoverable errors ───────────────────────────────────────────────────────

#[test]
fn source_mistakes_are_reported_and_retried() {
    let dir = tempfile::tempdir().unwrap();
    let only_text = tempfile::tempdir().unwrap();
    touch(only_text.path(), "notes.txt", 3);
    let notes = touch(dir.path(), "notes.txt", 3);
    let missing = dir.path().join("missing.pdf");

    let ui = ScriptedUi::new()
        .raw_path("   ")
        .path(&missing)
        .path(only_text.path())
        .path(&notes)
        .again(ActionResult::Proceed)
        .again(ActionResult::Proceed)
        .again(ActionResult::Proceed)
        .again(ActionResult::Proceed);
    let mut c = controller(ui, fake_readers(1, 1));

    assert!(!c.run(true).unwrap());
    assert_eq!(
        c.ui().errors,
        vec![
            "please provide a source file or directory",
            "path not found",
            "no compatible files found in directory",
            "selected file type is not supported",
        ]
    );
    assert_eq!(c.state_machine().state(), WorkflowState::SourceInput);
}

#[test]
fn error_state_records_origin_and_restores_it() {
    let ui = ScriptedUi::new().raw_path("").again(ActionResult::Proceed);
    let mut c = controller(ui, fake_readers(1, 1));

    assert!(c.run(false).unwrap());
    let sm = c.state_machine();
    assert_eq!(sm.state(), WorkflowState::Error);
    assert_eq!(sm.context().error_origin, Some(WorkflowState::SourceInput));
    assert_eq!(
        sm.context().error_message.as_deref(),
        Some("please provide a source file or directory")
    );

    assert!(c.run(false).unwrap());
    let sm = c.state_machine();
    assert_eq!(sm.state(), WorkflowState::SourceInput);
    assert_eq!(sm.context().error_message, None);
    assert_eq!(sm.context().error_origin, None);
}

#[test]
fn declining_after_an_error_terminates() {
    let ui = ScriptedUi::new()
        .raw_path("")
        .again(ActionResult::Terminate);
    let mut c = controller(ui, fake_readers(1, 1));
    assert!(!c.run(true).unwrap());
    assert_eq!(c.ui().errors.len(), 1);
}

#[test]
fn empty_selection_steps_back_to_merge_mode() {
    let dir = tempfile::tempdir().unwrap();
    touch(dir.path(), "a.pdf", 5);

    let ui = ScriptedUi::new()
        .path(dir.path())
        .format(OutputFormat::PlainText)
        .merge_mode(MergeMode::NoMerge)
        .select(&[])
        .again(ActionResult::Proceed);
    let mut c = controller(ui, fake_readers(1, 1));

    for _ in 0..3 {
        assert!(c.run(false).unwrap());
    }
    assert_eq!(c.state_machine().state(), WorkflowState::FilesSelection);

    assert!(c.run(false).unwrap());
    let sm = c.state_machine();
    assert_eq!(sm.state(), WorkflowState::Error);
    assert_eq!(sm.context().error_message.as_deref(), Some("no files selected"));
    assert_eq!(sm.context().error_origin, Some(WorkflowState::MergeModeSelection));

    assert!(c.run(false).unwrap());
    assert_eq!(c.state_machine().state(), WorkflowState::MergeModeSelection);
    assert_eq!(c.ui().errors, vec!["no files selected"]);
}

#[test]
fn out_of_range_indices_are_ignored() {
    let dir = tempfile::tempdir().unwrap();
    touch(dir.path(), "a.pdf", 5);

    let ui = ScriptedUi::new()
        .path(dir.path())
        .format(OutputFormat::PlainText)
        .merge_mode(MergeMode::NoMerge)
        .select(&[7]);
    let mut c = controller(ui, fake_readers(1, 1));
    for _ in 0..4 {
        c.run(false).unwrap();
    }
    assert_eq!(
        c.state_machine().context().error_message.as_deref(),
        Some("no files selected")
    );
}

// ── Navigation ───────────────────────────────────────────────────────────────

#[test]
fn back_returns_to_previous_prompt() {
    let dir = tempfile::tempdir().unwrap();
    let file = touch(dir.path(), "a.pdf", 5);

    let mut ui = ScriptedUi::new().path(&file).path(&file);
    ui.formats.push_back(ActionResult::Back);
    ui.formats.push_back(ActionResult::Value(OutputFormat::Json));
    ui.merge_modes.push_back(ActionResult::Back);
    let mut c = controller(ui, fake_readers(1, 1));

    let mut visited = Vec::new();
    for _ in 0..5 {
        c.run(false).unwrap();
        visited.push(c.state_machine().state());
    }
    assert_eq!(
        visited,
        vec![
            WorkflowState::FormatSelection,
            WorkflowState::SourceInput,
            WorkflowState::FormatSelection,
            WorkflowState::MergeModeSelection,
            WorkflowState::FormatSelection,
        ]
    );
    assert_eq!(
        c.state_machine().history(),
        &[WorkflowState::SourceInput]
    );
}

#[test]
fn back_without_history_stays_put() {
    let mut ui = ScriptedUi::new();
    ui.paths.push_back(ActionResult::Back);
    let mut c = controller(ui, fake_readers(1, 1));

    assert!(c.run(false).unwrap());
    assert_eq!(c.state_machine().state(), WorkflowState::SourceInput);
    assert!(!c.state_machine().can_go_back());
}

#[test]
fn terminate_at_any_prompt_stops_the_loop() {
    let dir = tempfile::tempdir().unwrap();
    let file = touch(dir.path(), "a.pdf", 5);

    let ui = ScriptedUi::new().path(&file);
    let mut c = controller(ui, fake_readers(1, 1));
    assert!(!c.run(true).unwrap());
    assert_eq!(c.state_machine().state(), WorkflowState::FormatSelection);
    assert!(c.ui().summaries.is_empty());
}

#[test]
fn running_again_resets_the_workflow() {
    let dir = tempfile::tempdir().unwrap();
    let file = touch(dir.path(), "a.pdf", 5);

    let ui = ScriptedUi::new()
        .path(&file)
        .format(OutputFormat::PlainText)
        .merge_mode(MergeMode::NoMerge)
        .again(ActionResult::Proceed);
    let mut c = controller(ui, fake_readers(1, 1));

    for _ in 0..5 {
        assert!(c.run(false).unwrap());
    }
    assert_eq!(c.state_machine().state(), WorkflowState::Complete);

    assert!(c.run(false).unwrap());
    let sm = c.state_machine();
    assert_eq!(sm.state(), WorkflowState::SourceInput);
    assert!(!sm.can_go_back());
    assert_eq!(sm.context(), &vellum::WorkflowContext::default());

    // The path queue is exhausted now: the next prompt quits.
    assert!(!c.run(true).unwrap());
}

// ── Progress and fatal errors ────────────────────────────────────────────────

#[test]
fn progress_events_follow_each_file() {
    let dir = tempfile::tempdir().unwrap();
    touch(dir.path(), "a.pdf", 5);
    touch(dir.path(), "b.pdf", 5);

    let ui = ScriptedUi::new()
        .path(dir.path())
        .format(OutputFormat::PlainText)
        .merge_mode(MergeMode::NoMerge)
        .select(&[0, 1]);
    let mut c = controller(ui, fake_readers(4, 1));
    c.run(true).unwrap();

    let ui = c.ui();
    assert!(ui.tracker_released.get());
    let log = ui.progress.borrow();
    assert_eq!(log.tasks(), &["a.pdf".to_string(), "b.pdf".to_string()]);

    let first: Vec<_> = log
        .updates()
        .iter()
        .filter(|(task, _)| *task == 0)
        .map(|(_, u)| (u.status, u.completed))
        .collect();
    assert_eq!(
        first,
        vec![
            (TaskStatus::Converting, 0),
            (TaskStatus::Converting, 25),
            (TaskStatus::Converting, 50),
            (TaskStatus::Converting, 75),
            (TaskStatus::Converting, 100),
            (TaskStatus::Done, 100),
        ]
    );
    // Files are converted strictly one after another.
    let last_of_a = log.updates().iter().rposition(|(t, _)| *t == 0).unwrap();
    let first_of_b = log.updates().iter().position(|(t, _)| *t == 1).unwrap();
    assert!(last_of_a < first_of_b);
}

#[test]
fn progress_failures_inside_extraction_are_ignored() {
    let dir = tempfile::tempdir().unwrap();
    let file = touch(dir.path(), "a.pdf", 5);

    let ui = ScriptedUi::new()
        .path(&file)
        .format(OutputFormat::PlainText)
        .merge_mode(MergeMode::NoMerge)
        .failing(FailMode::MidExtraction);
    let mut c = controller(ui, fake_readers(3, 1));

    c.run(true).unwrap();
    assert_eq!(read(dir.path().join("a.txt")), "a.pdf item 1\n\na.pdf item 2\n\na.pdf item 3");
    assert_eq!(c.ui().summaries.len(), 1);
}

#[test]
fn progress_failure_outside_extraction_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let file = touch(dir.path(), "a.pdf", 5);

    let ui = ScriptedUi::new()
        .path(&file)
        .format(OutputFormat::PlainText)
        .merge_mode(MergeMode::NoMerge)
        .failing(FailMode::OnDone);
    let mut c = controller(ui, fake_readers(1, 1));

    let err = c.run(true).unwrap_err();
    assert!(matches!(err, VellumError::Progress(_)), "got {err:?}");
    assert!(c.ui().tracker_released.get());
}

#[test]
fn reader_failure_ends_the_run_and_releases_progress() {
    let dir = tempfile::tempdir().unwrap();
    let file = touch(dir.path(), "broken.pdf", 5);

    let ui = ScriptedUi::new()
        .path(&file)
        .format(OutputFormat::Markdown)
        .merge_mode(MergeMode::NoMerge)
        .again(ActionResult::Proceed);
    let mut c = controller(ui, broken_pdf_readers());

    let err = c.run(true).unwrap_err();
    assert!(matches!(err, VellumError::CorruptPdf { .. }), "got {err:?}");
    let ui = c.ui();
    assert!(ui.tracker_released.get());
    assert!(ui.errors.is_empty(), "fatal errors bypass the error state");
    assert!(!dir.path().join("broken.md").exists());
}

#[test]
fn missing_reader_registration_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let file = touch(dir.path(), "a.epub", 5);
    let files = vec![file.clone()];

    let mut ui = ScriptedUi::new();
    let request = ProcessingRequest {
        files: &files,
        input_path: &file,
        format: OutputFormat::PlainText,
        merge_mode: MergeMode::NoMerge,
        merged_filename: None,
    };
    let err = process_files(&mut ui, &ReaderRegistry::new(), &PlainTextWriter, &request)
        .unwrap_err();

    assert!(
        matches!(err, VellumError::NoReaderRegistered { ref extension } if extension == ".epub"),
        "got {err:?}"
    );
    assert!(ui.tracker_released.get());
}

#[test]
fn missing_writer_registration_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let file = touch(dir.path(), "a.pdf", 5);

    let ui = ScriptedUi::new()
        .path(&file)
        .format(OutputFormat::Json)
        .merge_mode(MergeMode::NoMerge);
    let mut c = ConverterController::new(ui, fake_readers(1, 1), WriterRegistry::new());

    let err = c.run(true).unwrap_err();
    assert!(matches!(
        err,
        VellumError::NoWriterRegistered {
            format: OutputFormat::Json
        }
    ));
}
