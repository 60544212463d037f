//! # bubble-sheet
//!
//! Printable bubble sheet answer forms, driven by a JSON form definition.
//!
//! A [`FormDefinition`] names every field on the sheet and where it sits.
//! A [`FormRenderer`] takes one record of field values per page, writes free
//! text where text fields start and fills one slug per digit in numeric
//! fields, then saves the pages as a PDF.
//!
//! ```no_run
//! use bubble_sheet::{FormDefinition, FormRenderer, RenderOptions};
//! use std::fs::File;
//!
//! fn main() -> bubble_sheet::Result<()> {
//!     let form = FormDefinition::load("demos/answer_card.json")?;
//!     let mut sheets = FormRenderer::new(&form, RenderOptions::default(), File::create("out.pdf")?);
//!     sheets.page([("Name", "Ada Lovelace"), ("Student ID Number", "     1815")])?;
//!     sheets.save()?;
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod font;
pub mod form;
pub mod page;
pub mod pdf;
pub mod record;
pub mod render;

pub use error::{FormError, Result};
pub use font::{FontFace, FontSpec};
pub use form::{
    FieldDescriptor, FieldEntry, FieldLayout, FormDefinition, FormDescription, FormLayout,
    NumericGrid, PageSize, SlugSize,
};
pub use page::{Mark, Page};
pub use record::{load_records, parse_date, DateStamp, Record};
pub use render::{FormRenderer, RenderOptions};
