use super::{page_path, write_atomic, OutputWriter};
use crate::error::VellumError;
use crate::file::file_name;
use crate::format::OutputFormat;
use std::path::Path;

/// Writes content under a `# source: …` heading.
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkdownWriter;

impl OutputWriter for MarkdownWriter {
    fn format(&self) -> OutputFormat {
        OutputFormat::Markdown
    }

    fn save(&self, content: &str, destination: &Path) -> Result<u64, VellumError> {
        let document = format!("# source: {}\n\n{}", file_name(destination), content);
        let path = destination.with_extension(self.format().extension());
        write_atomic(&path, document.as_bytes())
    }

    fn save_multiple(
        &self,
        contents: &[String],
        destination: &Path,
        source_name: &str,
    ) -> Result<u64, VellumError> {
        let mut total = 0;
        for (index, content) in contents.iter().enumerate() {
            let page = index + 1;
            let document = format!("# source: {source_name} (page {page})\n\n{content}");
            let path = page_path(destination, page, self.format().extension());
            total += write_atomic(&path, document.as_bytes())?;
        }
        Ok(total)
    }
}
