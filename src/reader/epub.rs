//! EPUB reader: one text item per spine document.
//!
//! An EPUB is a zip archive. `META-INF/container.xml` names the package
//! document (OPF); its manifest maps ids to files and its spine lists the
//! ids in reading order. Only (X)HTML documents become chapters.

use super::postprocess::{clean_text, html_to_text};
use super::DocumentReader;
use crate::config::ConverterConfig;
use crate::error::VellumError;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use zip::ZipArchive;

const CONTAINER_PATH: &str = "META-INF/container.xml";

/// Reads one EPUB file.
#[derive(Debug, Clone)]
pub struct EpubReader {
    path: PathBuf,
    config: ConverterConfig,
}

impl EpubReader {
    pub fn new(path: &Path, config: ConverterConfig) -> Self {
        Self {
            path: path.to_path_buf(),
            config,
        }
    }

    fn corrupt(&self, detail: impl Into<String>) -> VellumError {
        VellumError::CorruptEpub {
            path: self.path.clone(),
            detail: detail.into(),
        }
    }

    fn read_entry(&self, archive: &mut ZipArchive<File>, name: &str) -> Result<String, VellumError> {
        let mut entry = archive
            .by_name(name)
            .map_err(|e| self.corrupt(format!("missing '{name}': {e}")))?;
        let mut bytes = Vec::new();
        entry
            .read_to_end(&mut bytes)
            .map_err(|e| self.corrupt(format!("cannot read '{name}': {e}")))?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

impl DocumentReader for EpubReader {
    fn extract_content_per_item(
        &self,
        progress: &mut dyn FnMut(usize, usize),
    ) -> Result<Vec<String>, VellumError> {
        let file = File::open(&self.path).map_err(|source| VellumError::ReadFailed {
            path: self.path.clone(),
            source,
        })?;
        let mut archive = ZipArchive::new(file).map_err(|e| self.corrupt(e.to_string()))?;

        let container = self.read_entry(&mut archive, CONTAINER_PATH)?;
        let opf_path = rootfile_path(&container)
            .ok_or_else(|| self.corrupt("container.xml names no rootfile"))?;
        let opf = self.read_entry(&mut archive, &opf_path)?;
        let chapters = spine_documents(&opf, &opf_path);

        let total = chapters.len();
        info!("EPUB loaded: {} ({} chapters)", self.path.display(), total);

        let mut items = Vec::with_capacity(total);
        for (index, href) in chapters.iter().enumerate() {
            debug!("Reading chapter {} ({})", index + 1, href);
            let html = self.read_entry(&mut archive, href)?;
            let text = html_to_text(&html);
            items.push(if self.config.clean_text {
                clean_text(&text)
            } else {
                text
            });
            progress(index + 1, total);
        }

        Ok(items)
    }
}

// ── Package document parsing ─────────────────────────────────────────────────

static RE_ROOTFILE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?is)<rootfile\b([^>]*)>").unwrap());
static RE_ITEM: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?is)<item\b([^>]*)>").unwrap());
static RE_ITEMREF: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?is)<itemref\b([^>]*)>").unwrap());
static RE_ATTR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"([A-Za-z_:][-A-Za-z0-9_:.]*)\s*=\s*(?:"([^"]*)"|'([^']*)')"#).unwrap());

/// Attributes of one tag, keyed by lowercase name.
fn attributes(tag_body: &str) -> HashMap<String, String> {
    RE_ATTR
        .captures_iter(tag_body)
        .map(|c| {
            let value = c.get(2).or_else(|| c.get(3)).map_or("", |m| m.as_str());
            (c[1].to_ascii_lowercase(), value.to_string())
        })
        .collect()
}

/// `full-path` of the first rootfile in `container.xml`.
fn rootfile_path(container: &str) -> Option<String> {
    RE_ROOTFILE
        .captures_iter(container)
        .filter_map(|c| attributes(&c[1]).remove("full-path"))
        .find(|p| !p.is_empty())
}

/// Archive paths of the spine's (X)HTML documents, in reading order.
fn spine_documents(opf: &str, opf_path: &str) -> Vec<String> {
    let mut manifest = HashMap::new();
    for caps in RE_ITEM.captures_iter(opf) {
        let mut attrs = attributes(&caps[1]);
        let (Some(id), Some(href)) = (attrs.remove("id"), attrs.remove("href")) else {
            continue;
        };
        let media_type = attrs.remove("media-type").unwrap_or_default();
        manifest.insert(id, (href, media_type));
    }

    let base = match opf_path.rfind('/') {
        Some(i) => &opf_path[..=i],
        None => "",
    };

    RE_ITEMREF
        .captures_iter(opf)
        .filter_map(|c| attributes(&c[1]).remove("idref"))
        .filter_map(|idref| manifest.get(&idref))
        .filter(|(href, media_type)| is_html(href, media_type))
        .map(|(href, _)| resolve_href(base, href))
        .collect()
}

fn is_html(href: &str, media_type: &str) -> bool {
    let media_type = media_type.to_ascii_lowercase();
    if media_type.is_empty() {
        let href = href.to_ascii_lowercase();
        return href.ends_with(".xhtml") || href.ends_with(".html") || href.ends_with(".htm");
    }
    media_type == "application/xhtml+xml" || media_type == "text/html"
}

/// Join `href` onto the OPF directory, dropping fragments and `..` segments.
fn resolve_href(base: &str, href: &str) -> String {
    let href = href.split('#').next().unwrap_or_default();
    let joined = format!("{base}{}", percent_decode(href));
    let mut parts: Vec<&str> = Vec::new();
    for segment in joined.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                parts.pop();
            }
            s => parts.push(s),
        }
    }
    parts.join("/")
}

fn percent_decode(input: &str) -> String {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            let hex = std::str::from_utf8(&bytes[i + 1..i + 3]).ok();
            if let Some(b) = hex.and_then(|h| u8::from_str_radix(h, 16).ok()) {
                out.push(b);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}
