//! ANSI colour helpers and bordered panels.

use once_cell::sync::Lazy;
use regex::Regex;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

pub fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
pub fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
pub fn yellow(s: &str) -> String {
    format!("\x1b[33m{s}\x1b[0m")
}
pub fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
pub fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
pub fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

static RE_ANSI: Lazy<Regex> = Lazy::new(|| Regex::new(r"\x1b\[[0-9;]*m").unwrap());

/// Printed width of `s`, ignoring colour codes.
pub fn visible_width(s: &str) -> usize {
    RE_ANSI.replace_all(s, "").chars().count()
}

/// Draw `lines` inside a rounded box, optionally titled, at least `width`
/// columns wide.
pub fn panel(title: Option<&str>, lines: &[String], width: usize) -> String {
    let content_width = lines
        .iter()
        .map(|l| visible_width(l))
        .chain(title.map(|t| visible_width(t) + 2))
        .max()
        .unwrap_or(0)
        .max(width.saturating_sub(4));

    let mut out = String::new();
    match title {
        Some(t) => {
            let fill = content_width.saturating_sub(visible_width(t) + 1);
            out.push_str(&format!("╭─ {} {}╮\n", bold(t), "─".repeat(fill)));
        }
        None => out.push_str(&format!("╭{}╮\n", "─".repeat(content_width + 2))),
    }
    for line in lines {
        let pad = content_width - visible_width(line);
        out.push_str(&format!("│ {}{} │\n", line, " ".repeat(pad)));
    }
    out.push_str(&format!("╰{}╯\n", "─".repeat(content_width + 2)));
    out
}
