//! Interactive terminal frontend.
//!
//! Layout per screen: the banner, one bordered panel with the question, a
//! key hint line. Line prompts read from `input`; list prompts read single
//! keys from a [`KeySource`]. Everything is drawn to `out`, so the whole
//! frontend runs against in-memory buffers in tests.

use super::keyboard::{CrosstermKeys, Key, KeySource};
use super::progress_bar::IndicatifTracker;
use super::style::{bold, cyan, dim, green, panel, red};
use super::UserInterface;
use crate::action::ActionResult;
use crate::controller::ConversionSummary;
use crate::file::FileEntry;
use crate::format::{MergeMode, OutputFormat};
use crate::progress::ProgressTracker;
use std::io::{self, BufRead, Write};
use tracing::warn;

const LOGO: &str = r"
██╗   ██╗███████╗██╗     ██╗     ██╗   ██╗███╗   ███╗
██║   ██║██╔════╝██║     ██║     ██║   ██║████╗ ████║
██║   ██║█████╗  ██║     ██║     ██║   ██║██╔████╔██║
╚██╗ ██╔╝██╔══╝  ██║     ██║     ██║   ██║██║╚██╔╝██║
 ╚████╔╝ ███████╗███████╗███████╗╚██████╔╝██║ ╚═╝ ██║
  ╚═══╝  ╚══════╝╚══════╝╚══════╝ ╚═════╝ ╚═╝     ╚═╝";

const PROMPT: &str = ">>: ";
const QUIT_COMMAND: &str = ":q";

/// Terminal frontend over a key source, a line reader, and a writer.
pub struct TerminalUi<K, R, W> {
    keys: K,
    input: R,
    out: W,
    max_width: usize,
    /// Real terminal: clear the screen between steps and draw progress bars.
    interactive: bool,
}

impl TerminalUi<CrosstermKeys, io::StdinLock<'static>, io::Stdout> {
    /// The real terminal.
    ///
    /// Line prompts read the cooked stdin, list prompts read raw key events
    /// through crossterm. The two do not share buffers: text typed ahead of
    /// a list prompt goes to the next line prompt, and keys typed ahead of a
    /// line prompt may be consumed by crossterm instead.
    pub fn stdio() -> Self {
        Self {
            keys: CrosstermKeys,
            input: io::stdin().lock(),
            out: io::stdout(),
            max_width: 120,
            interactive: true,
        }
    }
}

impl<K: KeySource, R: BufRead, W: Write> TerminalUi<K, R, W> {
    /// A non-interactive frontend: no screen clearing, hidden progress bars.
    pub fn new(keys: K, input: R, out: W) -> Self {
        Self {
            keys,
            input,
            out,
            max_width: 120,
            interactive: false,
        }
    }

    pub fn with_max_width(mut self, width: usize) -> Self {
        self.max_width = width.max(40);
        self
    }

    pub fn writer(&self) -> &W {
        &self.out
    }

    fn width(&self) -> usize {
        if self.interactive {
            if let Ok((cols, _)) = crossterm::terminal::size() {
                return self.max_width.min(cols as usize);
            }
        }
        self.max_width
    }

    // ── Drawing ──────────────────────────────────────────────────────────

    fn clear(&mut self) -> io::Result<()> {
        if self.interactive {
            write!(self.out, "\x1b[2J\x1b[H")?;
        }
        Ok(())
    }

    fn header(&mut self) -> io::Result<()> {
        let subtitle = format!(
            "[ epub | pdf -> txt: converter ] v{}",
            env!("CARGO_PKG_VERSION")
        );
        let mut lines: Vec<String> = LOGO.lines().skip(1).map(cyan).collect();
        lines.push(String::new());
        lines.push(dim(&subtitle));
        let width = self.width();
        write!(self.out, "{}", panel(None, &lines, width))
    }

    fn screen(&mut self, title: &str, body: &[String], hint: &str) -> io::Result<()> {
        self.clear()?;
        self.header()?;
        let width = self.width();
        write!(self.out, "{}", panel(Some(title), body, width))?;
        writeln!(self.out, "  {}", dim(hint))?;
        self.out.flush()
    }

    /// Print the prompt and read one line. `None` means quit (`:q` or EOF).
    fn read_line(&mut self) -> io::Result<Option<String>> {
        write!(self.out, "{PROMPT}")?;
        self.out.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        let line = line.trim_end_matches(['\r', '\n']).to_string();
        if line.trim() == QUIT_COMMAND {
            return Ok(None);
        }
        Ok(Some(line))
    }

    fn line_prompt(&mut self, title: &str, body: &[String]) -> ActionResult<String> {
        let hint = format!("{QUIT_COMMAND} to quit");
        let answer = self
            .screen(title, body, &hint)
            .and_then(|_| self.read_line());
        match answer {
            Ok(Some(line)) => ActionResult::Value(line),
            Ok(None) => ActionResult::Terminate,
            Err(e) => io_terminate(e),
        }
    }

    /// Single-choice list: arrows move (wrapping), ENTER picks.
    fn radio_select<T: Copy>(&mut self, title: &str, options: &[(T, String, String)]) -> ActionResult<T> {
        let mut cursor = 0;
        loop {
            let body: Vec<String> = options
                .iter()
                .enumerate()
                .map(|(i, (_, name, hint))| {
                    if i == cursor {
                        format!("{} {} {}", cyan("►"), bold(name), dim(hint))
                    } else {
                        format!("  {} {}", name, dim(hint))
                    }
                })
                .collect();
            if let Err(e) = self.screen(title, &body, "↑/↓ navigate  ENTER confirm  BACKSPACE back  q quit") {
                return io_terminate(e);
            }

            match self.keys.read_key() {
                Ok(Key::Up) => cursor = (cursor + options.len() - 1) % options.len(),
                Ok(Key::Down) => cursor = (cursor + 1) % options.len(),
                Ok(Key::Enter) => return ActionResult::Value(options[cursor].0),
                Ok(Key::Backspace) => return ActionResult::Back,
                Ok(Key::Char('q' | 'Q')) | Ok(Key::Interrupt) => return ActionResult::Terminate,
                Ok(_) => {}
                Err(e) => return io_terminate(e),
            }
        }
    }

    fn write_panel(&mut self, title: &str, lines: &[String]) {
        let width = self.width();
        let drawn = write!(self.out, "{}", panel(Some(title), lines, width)).and_then(|_| self.out.flush());
        if let Err(e) = drawn {
            warn!("Cannot write to terminal: {}", e);
        }
    }
}

fn io_terminate<T>(e: io::Error) -> ActionResult<T> {
    warn!("Terminal input failed: {}", e);
    ActionResult::Terminate
}

/// The "output created" line of the summary.
fn output_description(summary: &ConversionSummary) -> String {
    match (summary.merge_mode, &summary.merged_filename, &summary.single_output_filename) {
        (MergeMode::Merge, Some(name), _) => format!("1 merged file ({name})"),
        (MergeMode::PerPage, _, _) => format!("{} pages/chapters", summary.output_count),
        (MergeMode::NoMerge, _, Some(name)) => name.clone(),
        _ => format!("{} files", summary.output_count),
    }
}

/// Label-aligned rows of the summary panel.
pub fn summary_lines(summary: &ConversionSummary) -> Vec<String> {
    let rows = [
        ("files processed:", summary.total_files.to_string()),
        ("output created:", output_description(summary)),
        (
            "total runtime:",
            format!("{:.2}s", summary.total_runtime.as_secs_f64()),
        ),
        ("input size:", summary.total_input_size.clone()),
        ("output size:", summary.total_output_size.clone()),
    ];
    rows.into_iter()
        .map(|(label, value)| format!("{label:<20} {}", green(&value)))
        .collect()
}

impl<K: KeySource, R: BufRead, W: Write> UserInterface for TerminalUi<K, R, W> {
    fn get_path_input(&mut self) -> ActionResult<String> {
        self.line_prompt(
            "source",
            &[format!(
                "provide a file or directory path {}",
                dim("(e.g. source.pdf or /data)")
            )],
        )
    }

    fn select_output_format(&mut self) -> ActionResult<OutputFormat> {
        let options: Vec<_> = OutputFormat::ALL
            .iter()
            .map(|f| (*f, f.display_name().to_string(), f.display_hint()))
            .collect();
        self.radio_select("select output format", &options)
    }

    fn select_merge_mode(&mut self) -> ActionResult<MergeMode> {
        let options: Vec<_> = MergeMode::ALL
            .iter()
            .map(|m| (*m, m.display_name().to_string(), m.display_hint().to_string()))
            .collect();
        self.radio_select("select merge mode", &options)
    }

    fn prompt_merged_filename(&mut self) -> ActionResult<String> {
        self.line_prompt(
            "merged file name",
            &[format!(
                "name of the merged file {}",
                dim("(without extension, ENTER for default)")
            )],
        )
    }

    fn select_files(&mut self, files: &[FileEntry]) -> ActionResult<Vec<usize>> {
        if files.is_empty() {
            return ActionResult::Value(Vec::new());
        }
        let mut cursor = 0;
        let mut selected = vec![false; files.len()];
        let name_width = files.iter().map(|f| f.name.chars().count()).max().unwrap_or(0);

        loop {
            let body: Vec<String> = files
                .iter()
                .enumerate()
                .map(|(i, f)| {
                    let marker = if i == cursor { cyan("►") } else { " ".to_string() };
                    let checkbox = if selected[i] { green("✔") } else { "❏".to_string() };
                    let name = format!("{:<name_width$}", f.name);
                    let name = if i == cursor { bold(&name) } else { name };
                    format!("{marker} {checkbox} {name}  {}", dim(&f.formatted_size()))
                })
                .collect();
            let hint = "↑/↓ navigate  SPACE toggle  a all  ENTER confirm  BACKSPACE back  q quit";
            if let Err(e) = self.screen("select files for conversion", &body, hint) {
                return io_terminate(e);
            }

            match self.keys.read_key() {
                Ok(Key::Up) => cursor = (cursor + files.len() - 1) % files.len(),
                Ok(Key::Down) => cursor = (cursor + 1) % files.len(),
                Ok(Key::Space) => selected[cursor] = !selected[cursor],
                Ok(Key::Char('a' | 'A')) => {
                    let all = selected.iter().all(|s| *s);
                    selected.iter_mut().for_each(|s| *s = !all);
                }
                Ok(Key::Enter) => {
                    let indices = selected
                        .iter()
                        .enumerate()
                        .filter_map(|(i, s)| s.then_some(i))
                        .collect();
                    return ActionResult::Value(indices);
                }
                Ok(Key::Backspace) => return ActionResult::Back,
                Ok(Key::Char('q' | 'Q')) | Ok(Key::Interrupt) => return ActionResult::Terminate,
                Ok(_) => {}
                Err(e) => return io_terminate(e),
            }
        }
    }

    fn show_error(&mut self, message: &str) {
        self.write_panel("error", &[red(message)]);
    }

    fn show_conversion_summary(&mut self, summary: &ConversionSummary) {
        self.write_panel("conversion complete", &summary_lines(summary));
    }

    fn ask_again(&mut self) -> ActionResult {
        let hint = format!("{} convert more files  {} quit", bold("ENTER"), bold("q"));
        if let Err(e) = writeln!(self.out, "  {hint}").and_then(|_| self.out.flush()) {
            return io_terminate(e);
        }
        loop {
            match self.keys.read_key() {
                Ok(Key::Enter) => return ActionResult::Proceed,
                Ok(Key::Char('q' | 'Q')) | Ok(Key::Interrupt) => return ActionResult::Terminate,
                Ok(_) => {}
                Err(e) => return io_terminate(e),
            }
        }
    }

    fn progress_bar(&mut self) -> Box<dyn ProgressTracker> {
        if self.interactive {
            Box::new(IndicatifTracker::stderr())
        } else {
            Box::new(IndicatifTracker::hidden())
        }
    }

    fn clear_and_show_header(&mut self) {
        if let Err(e) = self.clear().and_then(|_| self.header()) {
            warn!("Cannot write to terminal: {}", e);
        }
    }
}
