// PDF output: turns finished pages into a printpdf document

use crate::error::{FormError, Result};
use crate::font::FontSpec;
use crate::form::PageSize;
use crate::page::{Mark, Page};
use printpdf::path::{PaintMode, WindingOrder};
use printpdf::*;
use std::f32::consts::FRAC_PI_2;
use std::io::{BufWriter, Write};

/// Segments used to approximate each rounded corner
const ARC_STEPS: usize = 6;

const LAYER_NAME: &str = "Layer 1";

fn pt_to_mm(pt: f32) -> Mm {
    Mm(pt * 25.4 / 72.0)
}

/// Map a top-down form point (in points) onto printpdf's bottom-up page.
fn to_pdf(x: f32, y: f32, page_height: f32) -> (Mm, Mm) {
    (pt_to_mm(x), pt_to_mm(page_height - y))
}

/// Page outline of a slug whose top-left corner is at (x, y) in form
/// coordinates.
fn slug_path(
    x: f32,
    y: f32,
    width: f32,
    height: f32,
    radius: f32,
    page_height: f32,
) -> Vec<(Mm, Mm)> {
    slug_outline(x, y, width, height, radius)
        .into_iter()
        .map(|(px, py)| to_pdf(px, py, page_height))
        .collect()
}

/// Write `pages` as a PDF document to `writer`.
///
/// Marks use top-down coordinates in points; PDF pages are bottom-up, so
/// every y is flipped against the page height here.
pub fn write_pdf<W: Write>(
    title: &str,
    page_size: PageSize,
    font: FontSpec,
    pages: &[Page],
    writer: &mut W,
) -> Result<()> {
    if pages.is_empty() {
        return Err(FormError::EmptyDocument);
    }

    let width = pt_to_mm(page_size.width);
    let height = pt_to_mm(page_size.height);
    let (doc, page1, layer1) = PdfDocument::new(title, width, height, LAYER_NAME);

    let font_ref = doc
        .add_builtin_font(font.face.builtin())
        .map_err(|e| FormError::PdfError(e.to_string()))?;

    for (index, page) in pages.iter().enumerate() {
        let layer = if index == 0 {
            doc.get_page(page1).get_layer(layer1)
        } else {
            let (page_idx, layer_idx) = doc.add_page(width, height, LAYER_NAME);
            doc.get_page(page_idx).get_layer(layer_idx)
        };
        draw_page(&layer, &font_ref, font.size, page_size.height, page);
    }

    let mut buffered = BufWriter::new(writer);
    doc.save(&mut buffered)
        .map_err(|e| FormError::PdfError(e.to_string()))?;
    buffered.flush()?;

    Ok(())
}

fn draw_page(
    layer: &PdfLayerReference,
    font: &IndirectFontRef,
    font_size: f32,
    page_height: f32,
    page: &Page,
) {
    layer.set_fill_color(Color::Rgb(Rgb::new(0.0, 0.0, 0.0, None)));

    for mark in page.marks() {
        match mark {
            Mark::Text { x, y, text } => {
                let (px, py) = to_pdf(*x, *y, page_height);
                layer.use_text(text.as_str(), font_size, px, py, font);
            }
            Mark::Slug {
                x,
                y,
                width,
                height,
                radius,
            } => {
                let ring: Vec<(Point, bool)> =
                    slug_path(*x, *y, *width, *height, *radius, page_height)
                        .into_iter()
                        .map(|(px, py)| (Point::new(px, py), false))
                        .collect();
                layer.add_polygon(Polygon {
                    rings: vec![ring],
                    mode: PaintMode::Fill,
                    winding_order: WindingOrder::NonZero,
                });
            }
        }
    }
}

/// Outline of a (possibly rounded) rectangle spanning x..x+width and
/// y..y+height, in the same units and axes as its inputs.
fn slug_outline(x: f32, y: f32, width: f32, height: f32, radius: f32) -> Vec<(f32, f32)> {
    let (x1, y1) = (x + width, y + height);
    let r = radius.min(width / 2.0).min(height / 2.0);
    if r <= 0.0 {
        return vec![(x, y), (x1, y), (x1, y1), (x, y1)];
    }

    // (centre x, centre y, starting angle) for each corner
    let corners = [
        (x1 - r, y + r, -FRAC_PI_2),
        (x1 - r, y1 - r, 0.0),
        (x + r, y1 - r, FRAC_PI_2),
        (x + r, y + r, 2.0 * FRAC_PI_2),
    ];

    let mut points = Vec::with_capacity(corners.len() * (ARC_STEPS + 1));
    for (cx, cy, start) in corners {
        for step in 0..=ARC_STEPS {
            let angle = start + FRAC_PI_2 * step as f32 / ARC_STEPS as f32;
            points.push((cx + r * angle.cos(), cy + r * angle.sin()));
        }
    }
    points
}
