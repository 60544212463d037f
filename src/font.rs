// Built-in PDF faces and their advance widths

use printpdf::BuiltinFont;
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

/// Default font size in points
pub const DEFAULT_FONT_SIZE: f32 = 10.0;

/// Fallback advance width (1/1000 em) for characters outside the table
const FALLBACK_WIDTH: u16 = 556;

/// Helvetica advance widths for ASCII 32..=126 (1/1000 em)
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '../
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, // 0..9
    278, 278, 584, 584, 584, 556, 1015, // :..@
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, // A..M
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, // N..Z
    278, 278, 278, 469, 556, 333, // [..`
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, // a..m
    556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, // n..z
    334, 260, 334, 584, // {..~
];

/// The standard PDF faces a form may be printed with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum FontFace {
    #[serde(rename = "Courier")]
    Courier,
    #[serde(rename = "Courier-Bold")]
    CourierBold,
    #[serde(rename = "Helvetica")]
    Helvetica,
}

impl FontFace {
    pub fn builtin(self) -> BuiltinFont {
        match self {
            FontFace::Courier => BuiltinFont::Courier,
            FontFace::CourierBold => BuiltinFont::CourierBold,
            FontFace::Helvetica => BuiltinFont::Helvetica,
        }
    }

    /// Advance width of `c` in 1/1000 em.
    fn glyph_width(self, c: char) -> u16 {
        match self {
            FontFace::Courier | FontFace::CourierBold => 600,
            FontFace::Helvetica => match c as u32 {
                code @ 32..=126 => HELVETICA_WIDTHS[(code - 32) as usize],
                _ => FALLBACK_WIDTH,
            },
        }
    }
}

impl fmt::Display for FontFace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FontFace::Courier => "Courier",
            FontFace::CourierBold => "Courier-Bold",
            FontFace::Helvetica => "Helvetica",
        };
        f.write_str(name)
    }
}

impl FromStr for FontFace {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "courier" => Ok(FontFace::Courier),
            "courier-bold" => Ok(FontFace::CourierBold),
            "helvetica" => Ok(FontFace::Helvetica),
            _ => Err(format!(
                "unknown font \"{}\" (expected Courier, Courier-Bold or Helvetica)",
                s
            )),
        }
    }
}

/// A face at a given size.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct FontSpec {
    pub face: FontFace,
    #[serde(default = "default_size")]
    pub size: f32,
}

fn default_size() -> f32 {
    DEFAULT_FONT_SIZE
}

impl Default for FontSpec {
    fn default() -> Self {
        FontSpec {
            face: FontFace::Courier,
            size: DEFAULT_FONT_SIZE,
        }
    }
}

impl FontSpec {
    pub fn new(face: FontFace, size: f32) -> Self {
        FontSpec { face, size }
    }

    /// Rendered width of `text` in points.
    pub fn string_width(&self, text: &str) -> f32 {
        let units: u32 = text.chars().map(|c| self.face.glyph_width(c) as u32).sum();
        units as f32 * self.size / 1000.0
    }
}
