//! Document rasterisation: render page 1 of a PDF to a `DynamicImage`.
//!
//! ## Why spawn_blocking?
//!
//! The `pdfium-render` crate wraps the pdfium C++ library, which uses
//! thread-local state internally and is not safe to call from async
//! contexts. `tokio::task::spawn_blocking` moves the work onto the blocking
//! thread pool so the runtime's worker threads never stall mid-render.
//!
//! ## Why a tempfile?
//!
//! pdfium wants a file-system path. Staging the downloaded bytes in a
//! `NamedTempFile` gives it one while guaranteeing cleanup when the handle
//! drops, even on panic.
//!
//! ## Why only page 1?
//!
//! The surface analysis chart is distributed as a single-page PDF; the first
//! page is the chart. Later pages, if a feed ever grew them, are never
//! rendered.

use crate::error::BriefError;
use image::DynamicImage;
use pdfium_render::prelude::*;
use std::io::Write;
use std::path::Path;
use tracing::debug;

/// Rasterise the first page of the document bytes.
///
/// `max_pixels` caps the longest rendered edge regardless of the page's
/// physical size, keeping memory bounded and matching the image-size sweet
/// spot for vision models (around 1,024–2,048 px).
pub async fn first_page(
    bytes: Vec<u8>,
    url: &str,
    max_pixels: u32,
) -> Result<DynamicImage, BriefError> {
    let url = url.to_string();

    tokio::task::spawn_blocking(move || {
        let mut tmp = tempfile::NamedTempFile::new()
            .map_err(|e| BriefError::Internal(format!("tempfile: {e}")))?;
        tmp.write_all(&bytes)
            .map_err(|e| BriefError::Internal(format!("tempfile write: {e}")))?;

        first_page_blocking(tmp.path(), &url, max_pixels)
        // `tmp` drops here, deleting the staged file
    })
    .await
    .map_err(|e| BriefError::Internal(format!("Render task panicked: {e}")))?
}

/// Blocking implementation of first-page rendering.
fn first_page_blocking(
    pdf_path: &Path,
    url: &str,
    max_pixels: u32,
) -> Result<DynamicImage, BriefError> {
    let pdfium = Pdfium::default();

    let document = pdfium
        .load_pdf_from_file(pdf_path, None)
        .map_err(|e| BriefError::Decode {
            url: url.to_string(),
            reason: format!("{e:?}"),
        })?;

    let pages = document.pages();
    if pages.len() == 0 {
        return Err(BriefError::EmptyDocument {
            url: url.to_string(),
        });
    }
    debug!("Document loaded: {} pages, rendering page 1", pages.len());

    let page = pages.get(0).map_err(|e| BriefError::Decode {
        url: url.to_string(),
        reason: format!("{e:?}"),
    })?;

    let render_config = PdfRenderConfig::new()
        .set_target_width(max_pixels as i32)
        .set_maximum_height(max_pixels as i32);

    let bitmap = page
        .render_with_config(&render_config)
        .map_err(|e| BriefError::Decode {
            url: url.to_string(),
            reason: format!("{e:?}"),
        })?;

    let image = bitmap.as_image();
    debug!(
        "Rendered page 1 of {} → {}x{} px",
        url,
        image.width(),
        image.height()
    );

    Ok(image)
}
