// Form definitions: page geometry and the named fields drawn on each sheet

use crate::error::{FormError, Result};
use crate::font::FontSpec;
use log::debug;
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;

// ============================================================================
// Geometry
// ============================================================================

/// Widest numeric grid a definition may declare, in digit columns
pub const MAX_GRID_LENGTH: usize = 64;

/// Page dimensions in points, written as `[width, height]`.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(from = "(f32, f32)")]
pub struct PageSize {
    pub width: f32,
    pub height: f32,
}

impl From<(f32, f32)> for PageSize {
    fn from((width, height): (f32, f32)) -> Self {
        PageSize { width, height }
    }
}

/// Slug dimensions in points, written as `[width, height]` or
/// `[width, height, corner_radius]`.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(from = "SlugSizeRepr")]
pub struct SlugSize {
    pub width: f32,
    pub height: f32,
    pub radius: f32,
}

impl SlugSize {
    pub fn new(width: f32, height: f32) -> Self {
        SlugSize {
            width,
            height,
            radius: 0.0,
        }
    }

    pub fn rounded(width: f32, height: f32, radius: f32) -> Self {
        SlugSize {
            width,
            height,
            radius,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SlugSizeRepr {
    Rounded(f32, f32, f32),
    Square(f32, f32),
}

impl From<SlugSizeRepr> for SlugSize {
    fn from(repr: SlugSizeRepr) -> Self {
        match repr {
            SlugSizeRepr::Rounded(w, h, r) => SlugSize::rounded(w, h, r),
            SlugSizeRepr::Square(w, h) => SlugSize::new(w, h),
        }
    }
}

/// Placement of a numeric bubble grid: one column per digit, ten slug rows
/// per column (digits 0 through 9, top to bottom).
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct NumericGrid {
    pub start_col: f32,
    pub col_width: f32,
    pub text_row: f32,
    pub slug_row: f32,
    pub row_height: f32,
    pub length: usize,
}

impl NumericGrid {
    /// Left edge of the digit column at `index`.
    pub fn column_x(&self, index: usize) -> f32 {
        self.start_col + self.col_width * index as f32
    }

    /// Top edge of the slug for `digit`.
    pub fn slug_y(&self, digit: u32) -> f32 {
        self.slug_row + self.row_height * digit as f32
    }
}

/// How a field is drawn. Tagged by `_type` in the JSON definition.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "_type", rename_all = "lowercase")]
pub enum FieldLayout {
    /// Free text drawn with its baseline starting at `start`.
    Text { start: (f32, f32) },
    /// Digits written above a column of slugs.
    Numeric(NumericGrid),
}

// ============================================================================
// Raw description (as read from JSON)
// ============================================================================

/// An unvalidated form definition.
#[derive(Debug, Clone, Deserialize)]
pub struct FormDescription {
    pub page_size: PageSize,
    pub slug_size: SlugSize,
    #[serde(default)]
    pub font: Option<FontSpec>,
    pub fields: Vec<FieldEntry>,
}

/// One entry of the `fields` list; the name may be missing until validated.
#[derive(Debug, Clone, Deserialize)]
pub struct FieldEntry {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(flatten)]
    pub layout: FieldLayout,
}

impl FieldEntry {
    pub fn text(name: &str, x: f32, y: f32) -> Self {
        FieldEntry {
            name: Some(name.to_string()),
            layout: FieldLayout::Text { start: (x, y) },
        }
    }

    pub fn numeric(name: &str, grid: NumericGrid) -> Self {
        FieldEntry {
            name: Some(name.to_string()),
            layout: FieldLayout::Numeric(grid),
        }
    }
}

// ============================================================================
// Validated definition
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct FieldDescriptor {
    pub name: String,
    pub layout: FieldLayout,
}

/// Read-only access to a form's geometry, independent of where it came from.
pub trait FormLayout {
    fn page_size(&self) -> PageSize;

    fn slug_size(&self) -> SlugSize;

    /// Font the form asks for, if any.
    fn font(&self) -> Option<FontSpec> {
        None
    }

    fn fields(&self) -> &[FieldDescriptor];

    fn field(&self, name: &str) -> Result<&FieldDescriptor> {
        self.fields()
            .iter()
            .find(|f| f.name == name)
            .ok_or_else(|| FormError::FieldNotFound(name.to_string()))
    }
}

/// A validated form definition: every field is named and names are unique.
#[derive(Debug, Clone, PartialEq)]
pub struct FormDefinition {
    page_size: PageSize,
    slug_size: SlugSize,
    font: Option<FontSpec>,
    fields: Vec<FieldDescriptor>,
}

impl FormDefinition {
    pub fn from_description(desc: FormDescription) -> Result<Self> {
        let mut seen = HashSet::new();
        let mut fields = Vec::with_capacity(desc.fields.len());

        for (index, entry) in desc.fields.into_iter().enumerate() {
            let name = match entry.name {
                Some(name) if !name.is_empty() => name,
                _ => return Err(FormError::MissingFieldName { index }),
            };
            if !seen.insert(name.clone()) {
                return Err(FormError::DuplicateFieldName(name));
            }
            fields.push(FieldDescriptor {
                name,
                layout: entry.layout,
            });
        }

        let definition = FormDefinition {
            page_size: desc.page_size,
            slug_size: desc.slug_size,
            font: desc.font,
            fields,
        };
        definition.check_geometry()?;
        Ok(definition)
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let desc: FormDescription = serde_json::from_str(json)
            .map_err(|e| FormError::DefinitionError(format!("Invalid JSON: {}", e)))?;
        Self::from_description(desc)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| FormError::DefinitionError(format!("{}: {}", path.display(), e)))?;
        let definition = Self::from_json_str(&content)?;
        debug!(
            "Loaded form definition {} with {} fields",
            path.display(),
            definition.fields.len()
        );
        Ok(definition)
    }

    fn check_geometry(&self) -> Result<()> {
        let PageSize { width, height } = self.page_size;
        if width <= 0.0 || height <= 0.0 {
            return Err(FormError::InvalidDefinition(format!(
                "page size must be positive, got {} x {}",
                width, height
            )));
        }

        let slug = self.slug_size;
        if slug.width <= 0.0 || slug.height <= 0.0 || slug.radius < 0.0 {
            return Err(FormError::InvalidDefinition(format!(
                "slug size must be positive, got {} x {} (radius {})",
                slug.width, slug.height, slug.radius
            )));
        }

        if let Some(font) = self.font {
            if font.size <= 0.0 {
                return Err(FormError::InvalidDefinition(format!(
                    "font size must be positive, got {}",
                    font.size
                )));
            }
        }

        for field in &self.fields {
            if let FieldLayout::Numeric(grid) = &field.layout {
                if grid.length == 0 || grid.length > MAX_GRID_LENGTH {
                    return Err(FormError::InvalidDefinition(format!(
                        "numeric field \"{}\" has length {}, expected 1 to {}",
                        field.name, grid.length, MAX_GRID_LENGTH
                    )));
                }
                if grid.col_width <= 0.0 || grid.row_height <= 0.0 {
                    return Err(FormError::InvalidDefinition(format!(
                        "numeric field \"{}\" needs positive col_width and row_height",
                        field.name
                    )));
                }
            }
        }

        Ok(())
    }
}

impl FormLayout for FormDefinition {
    fn page_size(&self) -> PageSize {
        self.page_size
    }

    fn slug_size(&self) -> SlugSize {
        self.slug_size
    }

    fn font(&self) -> Option<FontSpec> {
        self.font
    }

    fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::FontFace;
    use std::io::Write;

    const ANSWER_CARD: &str = r#"{
        "page_size": [612, 792],
        "slug_size": [9, 5, 2],
        "font": { "face": "Helvetica", "size": 9 },
        "fields": [
            { "name": "Name", "_type": "text", "start": [72, 90] },
            { "name": "Student ID Number", "_type": "numeric",
              "start_col": 300, "col_width": 14, "text_row": 160,
              "slug_row": 170, "row_height": 12, "length": 9 }
        ]
    }"#;

    fn id_grid(length: usize) -> NumericGrid {
        NumericGrid {
            start_col: 100.0,
            col_width: 12.0,
            text_row: 50.0,
            slug_row: 60.0,
            row_height: 10.0,
            length,
        }
    }

    fn description(fields: Vec<FieldEntry>) -> FormDescription {
        FormDescription {
            page_size: PageSize::from((612.0, 792.0)),
            slug_size: SlugSize::new(8.0, 4.0),
            font: None,
            fields,
        }
    }

    #[test]
    fn parses_json_definition() {
        let def = FormDefinition::from_json_str(ANSWER_CARD).unwrap();
        assert_eq!(def.page_size(), PageSize::from((612.0, 792.0)));
        assert_eq!(def.slug_size(), SlugSize::rounded(9.0, 5.0, 2.0));
        assert_eq!(def.font(), Some(FontSpec::new(FontFace::Helvetica, 9.0)));
        assert_eq!(def.fields().len(), 2);

        let name = def.field("Name").unwrap();
        assert_eq!(name.layout, FieldLayout::Text { start: (72.0, 90.0) });

        match &def.field("Student ID Number").unwrap().layout {
            FieldLayout::Numeric(grid) => {
                assert_eq!(grid.length, 9);
                assert_eq!(grid.column_x(2), 328.0);
                assert_eq!(grid.slug_y(3), 206.0);
            }
            other => panic!("expected numeric layout, got {:?}", other),
        }
    }

    #[test]
    fn two_value_slug_size_is_square() {
        let json = r#"{ "page_size": [612, 792], "slug_size": [9, 5], "fields": [] }"#;
        let def = FormDefinition::from_json_str(json).unwrap();
        assert_eq!(def.slug_size(), SlugSize::new(9.0, 5.0));
        assert_eq!(def.font(), None);
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let desc = description(vec![
            FieldEntry::numeric("id", id_grid(3)),
            FieldEntry::text("id", 10.0, 10.0),
        ]);
        match FormDefinition::from_description(desc) {
            Err(FormError::DuplicateFieldName(name)) => assert_eq!(name, "id"),
            other => panic!("expected duplicate name error, got {:?}", other),
        }
    }

    #[test]
    fn missing_name_is_rejected() {
        let json = r#"{
            "page_size": [612, 792],
            "slug_size": [9, 5],
            "fields": [
                { "name": "Name", "_type": "text", "start": [72, 90] },
                { "_type": "text", "start": [72, 120] }
            ]
        }"#;
        match FormDefinition::from_json_str(json) {
            Err(FormError::MissingFieldName { index }) => assert_eq!(index, 1),
            other => panic!("expected missing name error, got {:?}", other),
        }
    }

    #[test]
    fn empty_name_counts_as_missing() {
        let desc = description(vec![FieldEntry::text("", 0.0, 0.0)]);
        assert!(matches!(
            FormDefinition::from_description(desc),
            Err(FormError::MissingFieldName { index: 0 })
        ));
    }

    #[test]
    fn unknown_field_lookup_fails() {
        let def = FormDefinition::from_description(description(vec![FieldEntry::text(
            "Name", 72.0, 90.0,
        )]))
        .unwrap();
        match def.field("Teacher") {
            Err(FormError::FieldNotFound(name)) => assert_eq!(name, "Teacher"),
            other => panic!("expected not found error, got {:?}", other),
        }
    }

    #[test]
    fn zero_length_grid_is_invalid() {
        let desc = description(vec![FieldEntry::numeric("id", id_grid(0))]);
        assert!(matches!(
            FormDefinition::from_description(desc),
            Err(FormError::InvalidDefinition(_))
        ));
    }

    #[test]
    fn oversized_grid_is_invalid() {
        let json = r#"{
            "page_size": [612, 792],
            "slug_size": [9, 5],
            "fields": [{ "name": "id", "_type": "numeric",
                "start_col": 72, "col_width": 14, "text_row": 206,
                "slug_row": 220, "row_height": 14, "length": 1000000000000 }]
        }"#;
        assert!(matches!(
            FormDefinition::from_json_str(json),
            Err(FormError::InvalidDefinition(_))
        ));

        let widest = description(vec![FieldEntry::numeric("id", id_grid(MAX_GRID_LENGTH))]);
        assert!(FormDefinition::from_description(widest).is_ok());
    }

    #[test]
    fn non_positive_font_size_is_invalid() {
        for size in ["0", "-3"] {
            let json = format!(
                r#"{{ "page_size": [612, 792], "slug_size": [9, 5],
                     "font": {{ "face": "Courier", "size": {} }}, "fields": [] }}"#,
                size
            );
            match FormDefinition::from_json_str(&json) {
                Err(FormError::InvalidDefinition(msg)) => assert!(msg.contains("font size")),
                other => panic!("expected invalid definition, got {:?}", other),
            }
        }
    }

    #[test]
    fn unknown_type_tag_is_a_parse_error() {
        let json = r#"{
            "page_size": [612, 792],
            "slug_size": [9, 5],
            "fields": [{ "name": "Photo", "_type": "image", "start": [0, 0] }]
        }"#;
        assert!(matches!(
            FormDefinition::from_json_str(json),
            Err(FormError::DefinitionError(_))
        ));
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(ANSWER_CARD.as_bytes()).unwrap();
        let def = FormDefinition::load(file.path()).unwrap();
        assert!(def.field("Name").is_ok());
    }

    #[test]
    fn missing_file_is_reported() {
        assert!(matches!(
            FormDefinition::load("does/not/exist.json"),
            Err(FormError::DefinitionError(_))
        ));
    }
}
