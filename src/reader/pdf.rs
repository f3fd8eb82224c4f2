//! PDF reader: text layer via pdfium, OCR for pages without one.
//!
//! ## Why cap pixels, not DPI?
//!
//! Page sizes vary wildly: an A0 poster at 150 DPI would produce a
//! 12,000 × 17,000 px image. `max_rendered_pixels` caps the longest edge
//! regardless of physical size. Tesseract does well around 2,000 px.

use super::ocr::TesseractOcr;
use super::postprocess::clean_text;
use super::DocumentReader;
use crate::config::ConverterConfig;
use crate::error::VellumError;
use pdfium_render::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Reads one PDF file.
#[derive(Debug, Clone)]
pub struct PdfReader {
    path: PathBuf,
    config: ConverterConfig,
}

impl PdfReader {
    pub fn new(path: &Path, config: ConverterConfig) -> Self {
        Self {
            path: path.to_path_buf(),
            config,
        }
    }

    fn ocr_page(&self, page: &PdfPage<'_>, number: usize) -> Result<String, VellumError> {
        let px = self.config.max_rendered_pixels as i32;
        let render_config = PdfRenderConfig::new()
            .set_target_width(px)
            .set_maximum_height(px);

        let bitmap = page
            .render_with_config(&render_config)
            .map_err(|e| VellumError::RasterisationFailed {
                page: number,
                detail: format!("{:?}", e),
            })?;
        let image = bitmap.as_image();
        debug!(
            "Rendered page {} → {}x{} px for OCR",
            number,
            image.width(),
            image.height()
        );

        TesseractOcr::new(&self.config.tesseract_command, &self.config.ocr_language)
            .recognise(&image, number)
    }
}

impl DocumentReader for PdfReader {
    fn extract_content_per_item(
        &self,
        progress: &mut dyn FnMut(usize, usize),
    ) -> Result<Vec<String>, VellumError> {
        let pdfium = bind_pdfium(self.config.pdfium_library.as_deref())?;

        let document = pdfium.load_pdf_from_file(&self.path, None).map_err(|e| {
            let err_str = format!("{:?}", e);
            if err_str.contains("Password") || err_str.contains("password") {
                VellumError::PasswordRequired {
                    path: self.path.clone(),
                }
            } else {
                VellumError::CorruptPdf {
                    path: self.path.clone(),
                    detail: err_str,
                }
            }
        })?;

        let pages = document.pages();
        let total = pages.len() as usize;
        info!("PDF loaded: {} ({} pages)", self.path.display(), total);

        let mut items = Vec::with_capacity(total);
        for (index, page) in pages.iter().enumerate() {
            let number = index + 1;
            let mut text = page
                .text()
                .map_err(|e| VellumError::TextExtractionFailed {
                    page: number,
                    detail: format!("{:?}", e),
                })?
                .all();

            if text.trim().is_empty() {
                if self.config.ocr_enabled {
                    debug!("Page {} has no text layer, running OCR", number);
                    text = self.ocr_page(&page, number)?;
                } else {
                    warn!("Page {} has no text layer and OCR is disabled", number);
                }
            }

            items.push(if self.config.clean_text {
                clean_text(&text)
            } else {
                text
            });
            progress(number, total);
        }

        Ok(items)
    }
}

/// Bind to libpdfium: the configured location, else the working directory,
/// else the system library.
fn bind_pdfium(configured: Option<&Path>) -> Result<Pdfium, VellumError> {
    let bindings = match configured {
        Some(path) => {
            let library = if path.is_dir() {
                Pdfium::pdfium_platform_library_name_at_path(path)
            } else {
                path.to_path_buf()
            };
            debug!("Binding pdfium at {}", library.display());
            Pdfium::bind_to_library(&library)
        }
        None => {
            let local = Pdfium::pdfium_platform_library_name_at_path("./");
            Pdfium::bind_to_library(&local).or_else(|_| Pdfium::bind_to_system_library())
        }
    }
    .map_err(|e| VellumError::PdfiumBindingFailed(e.to_string()))?;

    Ok(Pdfium::new(bindings))
}
