//! OCR fallback: recognise a rendered page image with tesseract.
//!
//! The page is written to a temporary PNG and `tesseract <png> stdout -l
//! <lang>` is run on it. The temp file lives only for the duration of the
//! call.

use crate::error::VellumError;
use image::DynamicImage;
use std::io::ErrorKind;
use std::path::Path;
use std::process::Command;
use tracing::debug;

/// Runs an external tesseract binary.
#[derive(Debug, Clone)]
pub struct TesseractOcr<'a> {
    program: &'a Path,
    language: &'a str,
}

impl<'a> TesseractOcr<'a> {
    pub fn new(program: &'a Path, language: &'a str) -> Self {
        Self { program, language }
    }

    /// Recognise `image`. `page` is 1-based and only used in errors.
    pub fn recognise(&self, image: &DynamicImage, page: usize) -> Result<String, VellumError> {
        let png = tempfile::Builder::new()
            .prefix("vellum-ocr-")
            .suffix(".png")
            .tempfile()
            .map_err(|e| VellumError::OcrFailed {
                page,
                detail: format!("cannot create temp image: {e}"),
            })?;

        image
            .save_with_format(png.path(), image::ImageFormat::Png)
            .map_err(|e| VellumError::OcrFailed {
                page,
                detail: format!("cannot encode page image: {e}"),
            })?;

        self.recognise_file(png.path(), page)
    }

    /// Recognise an image already on disk.
    pub fn recognise_file(&self, image_path: &Path, page: usize) -> Result<String, VellumError> {
        debug!(
            "Running {} on page {} ({})",
            self.program.display(),
            page,
            self.language
        );

        let output = Command::new(self.program)
            .arg(image_path)
            .arg("stdout")
            .arg("-l")
            .arg(self.language)
            .output()
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound | ErrorKind::PermissionDenied => VellumError::OcrUnavailable {
                    program: self.program.display().to_string(),
                },
                _ => VellumError::OcrFailed {
                    page,
                    detail: format!("cannot start {}: {e}", self.program.display()),
                },
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(VellumError::OcrFailed {
                page,
                detail: format!("{} exited with {}: {}", self.program.display(), output.status, stderr.trim()),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}
