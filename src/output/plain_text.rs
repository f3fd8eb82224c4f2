use super::{page_path, write_atomic, OutputWriter};
use crate::error::VellumError;
use crate::format::OutputFormat;
use std::path::Path;

/// Writes content unchanged as UTF-8 `.txt`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextWriter;

impl OutputWriter for PlainTextWriter {
    fn format(&self) -> OutputFormat {
        OutputFormat::PlainText
    }

    fn save(&self, content: &str, destination: &Path) -> Result<u64, VellumError> {
        let path = destination.with_extension(self.format().extension());
        write_atomic(&path, content.as_bytes())
    }

    fn save_multiple(
        &self,
        contents: &[String],
        destination: &Path,
        _source_name: &str,
    ) -> Result<u64, VellumError> {
        let mut total = 0;
        for (index, content) in contents.iter().enumerate() {
            let path = page_path(destination, index + 1, self.format().extension());
            total += write_atomic(&path, content.as_bytes())?;
        }
        Ok(total)
    }
}
