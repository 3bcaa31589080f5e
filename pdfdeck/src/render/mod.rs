//! Rasterizing pages for previews.
//!
//! Every call renders from the source file; nothing is cached. Two sizing
//! modes exist: a fixed width (thumbnails) and a bounding box that the page
//! is fitted into without distortion (full-screen view).
//!
//! # Examples
//!
//! ```no_run
//! use pdfdeck::collection::PageReference;
//! use pdfdeck::render::{PageRenderer, PdfiumRenderer, RenderTarget};
//!
//! # fn example() -> pdfdeck::Result<()> {
//! let renderer = PdfiumRenderer::new()?;
//! let page = PageReference::new("report.pdf", 0);
//!
//! let preview = renderer.render(&page, RenderTarget::Fit { width: 1280, height: 800 })?;
//! preview.save("preview.png").ok();
//! # Ok(())
//! # }
//! ```

pub mod pdfium;

use image::{DynamicImage, ImageError, ImageFormat};
use std::path::Path;

use crate::collection::PageReference;
use crate::error::{DeckError, Result};

pub use pdfium::{PDFIUM_LIB_ENV, PdfiumRenderer};

/// Width of list thumbnails, in pixels.
pub const THUMBNAIL_WIDTH: u32 = 140;

/// File name for the preview of the page at 1-based `position`.
pub fn preview_file_name(position: usize) -> String {
    format!("page_{position}.png")
}

/// How large a rendered page should be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderTarget {
    /// Scale the page to exactly this many pixels wide.
    Width(u32),

    /// Scale the page to the largest size that fits inside the box.
    Fit {
        /// Box width in pixels.
        width: u32,
        /// Box height in pixels.
        height: u32,
    },
}

impl RenderTarget {
    /// Scale factor (pixels per point) for a page of the given size.
    ///
    /// Returns `0.0` for pages without area.
    pub fn scale_for(&self, page_width: f32, page_height: f32) -> f32 {
        if page_width <= 0.0 || page_height <= 0.0 {
            return 0.0;
        }

        match *self {
            Self::Width(width) => width as f32 / page_width,
            Self::Fit { width, height } => {
                (width as f32 / page_width).min(height as f32 / page_height)
            }
        }
    }

    /// Pixel size of the rendered page, never smaller than 1x1.
    pub fn output_size(&self, page_width: f32, page_height: f32) -> (u32, u32) {
        let scale = self.scale_for(page_width, page_height);
        let to_pixels = |points: f32| ((points * scale).round() as u32).max(1);
        (to_pixels(page_width), to_pixels(page_height))
    }
}

/// Something that can rasterize referenced pages.
pub trait PageRenderer {
    /// Size of the page in points (width, height).
    fn page_size(&self, page: &PageReference) -> Result<(f32, f32)>;

    /// Render the page at the requested size.
    fn render(&self, page: &PageReference, target: RenderTarget) -> Result<DynamicImage>;
}

/// Render a thumbnail `width` pixels wide.
///
/// Failures are logged and turned into `None` so that one bad page does
/// not end a preview run.
pub fn thumbnail<R>(renderer: &R, page: &PageReference, width: u32) -> Option<DynamicImage>
where
    R: PageRenderer + ?Sized,
{
    match renderer.render(page, RenderTarget::Width(width)) {
        Ok(image) => Some(image),
        Err(err) => {
            tracing::warn!(page = %page, error = %err, "thumbnail unavailable");
            None
        }
    }
}

/// Write `image` to `path` as PNG.
///
/// # Errors
///
/// Returns [`DeckError::FailedToWrite`] when the file cannot be written and
/// [`DeckError::Other`] when encoding fails.
pub fn save_png(image: &DynamicImage, path: &Path) -> Result<()> {
    image
        .save_with_format(path, ImageFormat::Png)
        .map_err(|err| match err {
            ImageError::IoError(source) => DeckError::FailedToWrite {
                path: path.to_path_buf(),
                source,
            },
            other => DeckError::other(format!(
                "Failed to encode PNG {}: {other}",
                path.display()
            )),
        })
}
