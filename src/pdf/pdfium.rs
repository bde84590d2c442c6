//! Loads a PDF through pdfium and materialises it into the crate's page model.

use std::path::Path;

use pdfium_render::prelude::*;

use super::{Document, DrawnRect, Page, Rect, TextRun};
use crate::errors::{ConvertError, ConvertResult};

/// Bind to a pdfium library, preferring one next to the executable and
/// falling back to the system copy.
fn bind_pdfium() -> ConvertResult<Pdfium> {
    let bindings = Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path("./"))
        .or_else(|_| Pdfium::bind_to_system_library())
        .map_err(|err| ConvertError::Pdf(format!("failed to load pdfium library: {err:?}")))?;
    Ok(Pdfium::new(bindings))
}

/// Load `path` and extract every page's text runs and drawn rectangles.
///
/// Rotated pages are reset to unrotated before extraction so that the
/// template pixel offsets used by the converters line up.
pub fn load_document(path: &Path) -> ConvertResult<Document> {
    let pdfium = bind_pdfium()?;
    let document = pdfium
        .load_pdf_from_file(path, None)
        .map_err(|err| ConvertError::Pdf(format!("{}: {err:?}", path.display())))?;

    let mut pages = Vec::new();
    for (index, mut page) in document.pages().iter().enumerate() {
        let rotation = page
            .rotation()
            .map_err(|err| ConvertError::Pdf(format!("page {index} rotation: {err:?}")))?;
        if rotation != PdfPageRenderRotation::None {
            log::debug!("resetting rotation on page {index}");
            page.set_rotation(PdfPageRenderRotation::None);
        }

        pages.push(extract_page(&page, index)?);
    }

    Ok(Document { pages })
}

fn extract_page(page: &PdfPage, index: usize) -> ConvertResult<Page> {
    let width = page.width().value;
    let height = page.height().value;

    let text_page = page
        .text()
        .map_err(|err| ConvertError::Pdf(format!("page {index} text: {err:?}")))?;

    let mut runs = Vec::new();
    for segment in text_page.segments().iter() {
        let text = segment.text();
        if text.trim().is_empty() {
            continue;
        }
        runs.push(TextRun::new(text, flip_rect(segment.bounds(), height)));
    }

    let mut drawings = Vec::new();
    for object in page.objects().iter() {
        if let Some(path_object) = object.as_path_object() {
            let Ok(bounds) = object.bounds() else {
                continue;
            };
            let filled = match path_object.fill_mode() {
                Ok(fill_mode) => fill_mode != PdfPathFillMode::None,
                Err(_) => false,
            };
            drawings.push(DrawnRect {
                rect: flip_quad(bounds, height),
                filled,
            });
        }
    }

    Ok(Page {
        width,
        height,
        runs,
        drawings,
    })
}

// pdfium uses a bottom-left origin with y growing upwards; the page model is
// top-left origin with y growing downwards.

fn flip_rect(rect: PdfRect, height: f32) -> Rect {
    Rect::new(
        rect.left.value,
        height - rect.top.value,
        rect.right.value,
        height - rect.bottom.value,
    )
}

fn flip_quad(quad: PdfQuadPoints, height: f32) -> Rect {
    Rect::new(
        quad.left().value,
        height - quad.top().value,
        quad.right().value,
        height - quad.bottom().value,
    )
}
