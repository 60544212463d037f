// Sheet rendering: field values in, positioned marks out

use crate::error::{FormError, Result};
use crate::font::FontSpec;
use crate::form::{FieldLayout, FormLayout, NumericGrid};
use crate::page::{Mark, Page};
use crate::pdf::write_pdf;
use log::{debug, info};
use std::io::Write;

/// Document title written into the PDF metadata by default
pub const DEFAULT_TITLE: &str = "Bubble Sheets";

/// Renderer settings that are not part of the form definition.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Overrides the font named by the form definition.
    pub font: Option<FontSpec>,
    /// Added to every x coordinate, in points.
    pub x_offset: f32,
    /// Added to every y coordinate, in points.
    pub y_offset: f32,
    pub title: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        RenderOptions {
            font: None,
            x_offset: 0.0,
            y_offset: 0.0,
            title: DEFAULT_TITLE.to_string(),
        }
    }
}

/// Draws records onto sheets laid out by a [`FormLayout`] and writes the
/// finished document to `W`.
///
/// Fields are drawn onto the open page until [`show_page`](Self::show_page)
/// (or [`page`](Self::page)) closes it. [`save`](Self::save) consumes the
/// renderer, so nothing can be drawn once the document is written.
pub struct FormRenderer<'a, L: FormLayout, W: Write> {
    layout: &'a L,
    font: FontSpec,
    offset: (f32, f32),
    title: String,
    current: Page,
    pages: Vec<Page>,
    output: W,
}

impl<'a, L: FormLayout, W: Write> FormRenderer<'a, L, W> {
    pub fn new(layout: &'a L, options: RenderOptions, output: W) -> Self {
        let font = options.font.or_else(|| layout.font()).unwrap_or_default();
        FormRenderer {
            layout,
            font,
            offset: (options.x_offset, options.y_offset),
            title: options.title,
            current: Page::new(),
            pages: Vec::new(),
            output,
        }
    }

    pub fn font(&self) -> FontSpec {
        self.font
    }

    /// Pages finished so far.
    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn coords(&self, x: f32, y: f32) -> (f32, f32) {
        (x + self.offset.0, y + self.offset.1)
    }

    /// Horizontal shift that centres `c` inside a slug.
    fn center_in_slug(&self, c: char) -> f32 {
        let mut buf = [0u8; 4];
        let text_width = self.font.string_width(c.encode_utf8(&mut buf));
        (self.layout.slug_size().width - text_width) / 2.0
    }

    fn text(&mut self, text: &str, x: f32, y: f32) {
        let (x, y) = self.coords(x, y);
        self.current.push(Mark::Text {
            x,
            y,
            text: text.to_string(),
        });
    }

    fn slug(&mut self, x: f32, y: f32) {
        let (x, y) = self.coords(x, y);
        let size = self.layout.slug_size();
        self.current.push(Mark::Slug {
            x,
            y,
            width: size.width,
            height: size.height,
            radius: size.radius,
        });
    }

    /// Draw `value` into the field called `name` on the open page.
    pub fn set_field(&mut self, name: &str, value: &str) -> Result<()> {
        let layout = self.layout;
        let field = layout.field(name)?;
        match &field.layout {
            FieldLayout::Text { start } => {
                if !value.is_empty() {
                    self.text(value, start.0, start.1);
                }
                Ok(())
            }
            FieldLayout::Numeric(grid) => self.set_numeric_field(&field.name, grid, value),
        }
    }

    fn set_numeric_field(&mut self, name: &str, grid: &NumericGrid, value: &str) -> Result<()> {
        let length = value.chars().count();
        if length > grid.length {
            return Err(FormError::ValueTooLong {
                field: name.to_string(),
                length,
                max: grid.length,
            });
        }

        let padded = format!("{:>width$}", value, width = grid.length);
        let digits = padded.trim_matches(' ');
        if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(FormError::NotNumeric {
                field: name.to_string(),
                value: value.to_string(),
            });
        }

        for (i, c) in padded.chars().enumerate() {
            let Some(digit) = c.to_digit(10) else {
                continue;
            };
            let col = grid.column_x(i);
            let mut buf = [0u8; 4];
            self.text(c.encode_utf8(&mut buf), col + self.center_in_slug(c), grid.text_row);
            self.slug(col, grid.slug_y(digit));
        }

        Ok(())
    }

    /// Close the open page; later drawing starts a new one.
    pub fn show_page(&mut self) {
        let page = std::mem::take(&mut self.current);
        self.pages.push(page);
        debug!("Finished page {}", self.pages.len());
    }

    /// Draw every (field, value) pair on a fresh page and close it.
    ///
    /// If any field fails, the open page is discarded and the error returned.
    pub fn page<I, K, V>(&mut self, values: I) -> Result<()>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        for (name, value) in values {
            if let Err(e) = self.set_field(name.as_ref(), value.as_ref()) {
                self.current.clear();
                return Err(e);
            }
        }
        self.show_page();
        Ok(())
    }

    /// Alignment sheet: text fields show their own name in capitals, numeric
    /// fields count 0, 1, 2, ... across every column.
    pub fn test_page(&mut self) -> Result<()> {
        let values: Vec<(String, String)> = self
            .layout
            .fields()
            .iter()
            .map(|f| {
                let value = match &f.layout {
                    FieldLayout::Text { .. } => f.name.to_uppercase(),
                    FieldLayout::Numeric(grid) => (0..grid.length)
                        .map(|i| char::from(b'0' + (i % 10) as u8))
                        .collect(),
                };
                (f.name.clone(), value)
            })
            .collect();
        self.page(values)
    }

    /// Write every finished page to the output and hand the output back.
    ///
    /// A page still open with marks on it is closed first.
    pub fn save(mut self) -> Result<W> {
        if !self.current.is_empty() {
            self.show_page();
        }
        write_pdf(
            &self.title,
            self.layout.page_size(),
            self.font,
            &self.pages,
            &mut self.output,
        )?;
        info!("Saved {} page(s)", self.pages.len());
        Ok(self.output)
    }
}
