//! Output format and merge-mode choices offered by the workflow.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Serialisation format of the produced files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    /// `.txt`: extracted text as-is.
    PlainText,
    /// `.md`: text under a `# source:` heading.
    Markdown,
    /// `.json`: `{"source", "content"}` records.
    Json,
}

impl OutputFormat {
    /// Every format, in menu order.
    pub const ALL: [OutputFormat; 3] = [
        OutputFormat::PlainText,
        OutputFormat::Markdown,
        OutputFormat::Json,
    ];

    /// File extension without the leading dot.
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::PlainText => "txt",
            OutputFormat::Markdown => "md",
            OutputFormat::Json => "json",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            OutputFormat::PlainText => "plain text",
            OutputFormat::Markdown => "markdown",
            OutputFormat::Json => "json",
        }
    }

    pub fn display_hint(self) -> String {
        format!("(.{})", self.extension())
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// How extracted text is aggregated into output files.
///
/// | Mode | Inputs → outputs |
/// |------|------------------|
/// | `NoMerge` | 1 : 1 |
/// | `Merge` | N : 1 |
/// | `PerPage` | 1 : pages/chapters |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MergeMode {
    #[default]
    NoMerge,
    Merge,
    PerPage,
}

impl MergeMode {
    /// Every mode, in menu order.
    pub const ALL: [MergeMode; 3] = [MergeMode::NoMerge, MergeMode::Merge, MergeMode::PerPage];

    pub fn display_name(self) -> &'static str {
        match self {
            MergeMode::NoMerge => "no merge",
            MergeMode::Merge => "merge",
            MergeMode::PerPage => "file per page",
        }
    }

    pub fn display_hint(self) -> &'static str {
        match self {
            MergeMode::NoMerge => "(separate file per document)",
            MergeMode::Merge => "(combine all into single file)",
            MergeMode::PerPage => "(one file per page/chapter)",
        }
    }
}

impl fmt::Display for MergeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}
