use super::{page_path, write_atomic, OutputWriter};
use crate::error::VellumError;
use crate::file::file_name;
use crate::format::OutputFormat;
use serde::Serialize;
use std::path::Path;

/// Writes `{"source", "content"}` records with 4-space indentation.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonWriter;

#[derive(Serialize)]
struct DocumentRecord<'a> {
    source: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct PageRecord<'a> {
    source: &'a str,
    page: usize,
    content: &'a str,
}

/// Serialise with a 4-space indent.
fn to_json<T: Serialize>(value: &T) -> Result<Vec<u8>, VellumError> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut ser)?;
    Ok(buf)
}

impl OutputWriter for JsonWriter {
    fn format(&self) -> OutputFormat {
        OutputFormat::Json
    }

    fn save(&self, content: &str, destination: &Path) -> Result<u64, VellumError> {
        let source = file_name(destination);
        let bytes = to_json(&DocumentRecord {
            source: &source,
            content,
        })?;
        let path = destination.with_extension(self.format().extension());
        write_atomic(&path, &bytes)
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
            let bytes = to_json(&PageRecord {
                source: source_name,
                page,
                content,
            })?;
            let path = page_path(destination, page, self.format().extension());
            total += write_atomic(&path, &bytes)?;
        }
        Ok(total)
    }
}
