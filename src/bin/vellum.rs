//! CLI binary for vellum.
//!
//! Every conversion choice is made interactively; the flags only tune the
//! extraction backends.

use anyhow::{Context, Result};
use clap::Parser;
use std::io;
use std::path::PathBuf;
use std::time::Instant;
use tracing_subscriber::EnvFilter;
use vellum::ui::style::{bold, dim, red};
use vellum::{ConverterConfig, ConverterController, ReaderRegistry, TerminalUi, WriterRegistry};

const AFTER_HELP: &str = "\
Keys:
  ↑/↓        move in lists
  SPACE      toggle a file        a   select all
  ENTER      confirm              BACKSPACE   previous step
  q / :q     quit

Environment:
  PDFIUM_LIB_PATH   path to libpdfium (file or directory)
  RUST_LOG          log filter, e.g. vellum=debug";

#[derive(Parser, Debug)]
#[command(
    name = "vellum",
    version,
    about = "Convert PDF and EPUB documents to plain text, Markdown, or JSON",
    long_about = "Interactive terminal converter for PDF and EPUB documents. \
Pick a file or directory, an output format, and a merge mode; vellum extracts \
the text (with OCR for scanned PDF pages) and writes .txt, .md, or .json files \
next to the sources.",
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Do not OCR PDF pages that have no text layer.
    #[arg(long, env = "VELLUM_NO_OCR")]
    no_ocr: bool,

    /// Tesseract language code(s), e.g. eng or eng+deu.
    #[arg(long, env = "VELLUM_OCR_LANG", default_value = "eng")]
    ocr_lang: String,

    /// Tesseract executable.
    #[arg(long, env = "VELLUM_TESSERACT", default_value = "tesseract")]
    tesseract: PathBuf,

    /// Longest edge in pixels of pages rendered for OCR.
    #[arg(long, env = "VELLUM_OCR_PIXELS", default_value_t = 2000,
          value_parser = clap::value_parser!(u32).range(100..=10_000))]
    ocr_pixels: u32,

    /// Path to libpdfium (file or containing directory).
    #[arg(long, env = "PDFIUM_LIB_PATH")]
    pdfium_lib: Option<PathBuf>,

    /// Keep extracted text as-is (no whitespace cleanup).
    #[arg(long, env = "VELLUM_RAW_TEXT")]
    raw_text: bool,

    /// Enable DEBUG-level tracing logs on stderr.
    #[arg(short, long, env = "VELLUM_VERBOSE")]
    verbose: bool,
}

fn main() {
    if let Err(e) = run() {
        eprintln!("\n{} {:#}", red("✗"), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // Only errors reach stderr unless --verbose.
    let filter = if cli.verbose { "debug" } else { "error" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Build config from CLI args ───────────────────────────────────────
    let mut builder = ConverterConfig::builder()
        .ocr_enabled(!cli.no_ocr)
        .ocr_language(&cli.ocr_lang)
        .tesseract_command(&cli.tesseract)
        .max_rendered_pixels(cli.ocr_pixels)
        .clean_text(!cli.raw_text);
    if let Some(lib) = &cli.pdfium_lib {
        builder = builder.pdfium_library(lib);
    }
    let config = builder.build().context("Invalid configuration")?;

    let started = Instant::now();
    let mut controller = ConverterController::new(
        TerminalUi::stdio(),
        ReaderRegistry::with_defaults(&config),
        WriterRegistry::with_defaults(),
    );
    controller.run(true).context("Conversion failed")?;

    println!(
        "\n{} {}",
        bold("bye."),
        dim(&format!("session lasted {:.1}s", started.elapsed().as_secs_f64()))
    );
    Ok(())
}
