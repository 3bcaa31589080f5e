//! Pdfium-backed page rendering.
//!
//! The Pdfium shared library is looked up in this order:
//!
//! 1. an explicit path given by the caller
//! 2. the `PDFDECK_PDFIUM_LIB` environment variable
//! 3. the directory of the running executable
//! 4. the current directory
//! 5. the system library search path
//!
//! An explicit path (1 or 2) that fails to load is an error; no fallback is
//! attempted.

use image::{DynamicImage, RgbaImage};
use pdfium_render::prelude::{PdfBitmapFormat, PdfRenderConfig, Pdfium};
use std::path::{Path, PathBuf};

use super::{PageRenderer, RenderTarget};
use crate::collection::PageReference;
use crate::error::{DeckError, Result};
use crate::io::PdfReader;

/// Environment variable naming the Pdfium library file.
pub const PDFIUM_LIB_ENV: &str = "PDFDECK_PDFIUM_LIB";

/// Renders pages with Pdfium.
pub struct PdfiumRenderer {
    pdfium: Pdfium,
}

impl PdfiumRenderer {
    /// Bind Pdfium using the default search order.
    ///
    /// # Errors
    ///
    /// Returns [`DeckError::PdfiumUnavailable`] if no library can be loaded.
    pub fn new() -> Result<Self> {
        Self::with_library(None)
    }

    /// Bind Pdfium, trying `library` first when given.
    pub fn with_library(library: Option<&Path>) -> Result<Self> {
        let explicit = library
            .map(Path::to_path_buf)
            .or_else(|| std::env::var_os(PDFIUM_LIB_ENV).map(PathBuf::from));

        let pdfium = bind_pdfium(explicit.as_deref())?;
        Ok(Self { pdfium })
    }

    fn with_page<T>(
        &self,
        page: &PageReference,
        f: impl FnOnce(&pdfium_render::prelude::PdfPage<'_>) -> Result<T>,
    ) -> Result<T> {
        PdfReader::check_path_exists(&page.source_path)?;

        let fail = |reason: String| {
            DeckError::render_failed(page.source_path.clone(), page.page_index, reason)
        };

        let document = self
            .pdfium
            .load_pdf_from_file(&page.source_path, None)
            .map_err(|e| fail(e.to_string()))?;

        let pages = document.pages();
        let page_count = pages.len() as usize;
        let index = u16::try_from(page.page_index)
            .ok()
            .filter(|&i| (i as usize) < page_count)
            .ok_or_else(|| {
                DeckError::page_out_of_range(page.source_path.clone(), page.page_index, page_count)
            })?;

        let pdf_page = pages.get(index).map_err(|e| fail(e.to_string()))?;
        f(&pdf_page)
    }
}

impl PageRenderer for PdfiumRenderer {
    fn page_size(&self, page: &PageReference) -> Result<(f32, f32)> {
        self.with_page(page, |p| Ok((p.width().value, p.height().value)))
    }

    fn render(&self, page: &PageReference, target: RenderTarget) -> Result<DynamicImage> {
        let image = self.with_page(page, |p| {
            let (width, height) = target.output_size(p.width().value, p.height().value);

            let config = PdfRenderConfig::new()
                .set_target_width(width as i32)
                .set_maximum_width(width as i32)
                .set_maximum_height(height as i32)
                .set_format(PdfBitmapFormat::BGRA);

            let bitmap = p.render_with_config(&config).map_err(|e| {
                DeckError::render_failed(page.source_path.clone(), page.page_index, e.to_string())
            })?;

            let width = bitmap.width().max(0) as u32;
            let height = bitmap.height().max(0) as u32;
            let pixels = bgra_to_rgba(&bitmap.as_raw_bytes(), width as usize, height as usize);

            RgbaImage::from_raw(width, height, pixels)
                .map(DynamicImage::ImageRgba8)
                .ok_or_else(|| {
                    DeckError::render_failed(
                        page.source_path.clone(),
                        page.page_index,
                        "bitmap size does not match its pixel data",
                    )
                })
        })?;

        tracing::debug!(
            page = %page,
            width = image.width(),
            height = image.height(),
            "rendered page"
        );

        Ok(image)
    }
}

/// Repack a BGRA bitmap with arbitrary row stride into tightly packed RGBA.
fn bgra_to_rgba(src: &[u8], width: usize, height: usize) -> Vec<u8> {
    let stride = if height == 0 { 0 } else { src.len() / height };
    let mut pixels = Vec::with_capacity(width.saturating_mul(height).saturating_mul(4));

    for y in 0..height {
        let base = y.saturating_mul(stride);
        for x in 0..width {
            let idx = base.saturating_add(x.saturating_mul(4));
            let b = src.get(idx).copied().unwrap_or(255);
            let g = src.get(idx + 1).copied().unwrap_or(255);
            let r = src.get(idx + 2).copied().unwrap_or(255);
            let a = src.get(idx + 3).copied().unwrap_or(255);
            pixels.extend_from_slice(&[r, g, b, a]);
        }
    }

    pixels
}

/// Library files to try before the system search path.
fn library_candidates() -> Vec<PathBuf> {
    let mut candidates = Vec::new();

    if let Ok(exe) = std::env::current_exe()
        && let Some(dir) = exe.parent()
    {
        candidates.push(Pdfium::pdfium_platform_library_name_at_path(dir));
    }
    candidates.push(Pdfium::pdfium_platform_library_name_at_path(Path::new(".")));

    candidates
}

fn bind_pdfium(explicit: Option<&Path>) -> Result<Pdfium> {
    if let Some(path) = explicit {
        let bindings = Pdfium::bind_to_library(path).map_err(|e| DeckError::PdfiumUnavailable {
            reason: format!("{e} (tried {})", path.display()),
        })?;
        tracing::debug!(library = %path.display(), "bound pdfium");
        return Ok(Pdfium::new(bindings));
    }

    for path in library_candidates() {
        if let Ok(bindings) = Pdfium::bind_to_library(&path) {
            tracing::debug!(library = %path.display(), "bound pdfium");
            return Ok(Pdfium::new(bindings));
        }
    }

    let bindings = Pdfium::bind_to_system_library().map_err(|e| DeckError::PdfiumUnavailable {
        reason: format!(
            "{e} ({} not found next to the executable, in the current directory, or on the system path)",
            Pdfium::pdfium_platform_library_name().to_string_lossy()
        ),
    })?;
    tracing::debug!("bound system pdfium");

    Ok(Pdfium::new(bindings))
}
