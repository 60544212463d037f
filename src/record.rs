// Per-page field values loaded from JSON

use crate::error::{FormError, Result};
use chrono::format::{Item, StrftimeItems};
use chrono::{Local, NaiveDate};
use log::debug;
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;

/// Field name -> value for one sheet
pub type Record = BTreeMap<String, String>;

/// Default display format for stamped dates, e.g. `3/15/2015`
pub const DEFAULT_DATE_FORMAT: &str = "%-m/%-d/%Y";

/// Parse a JSON array of objects into records.
///
/// String values are taken as-is so padding survives; numbers are written
/// out in decimal. Any other value type is an error.
pub fn parse_records(json: &str) -> Result<Vec<Record>> {
    let rows: Vec<BTreeMap<String, Value>> = serde_json::from_str(json)
        .map_err(|e| FormError::RecordError(format!("Invalid JSON: {}", e)))?;

    rows.into_iter()
        .enumerate()
        .map(|(index, row)| {
            row.into_iter()
                .map(|(name, value)| match value {
                    Value::String(s) => Ok((name, s)),
                    Value::Number(n) => Ok((name, n.to_string())),
                    other => Err(FormError::RecordError(format!(
                        "record {}: field \"{}\" must be a string or number, got {}",
                        index, name, other
                    ))),
                })
                .collect::<Result<Record>>()
        })
        .collect()
}

pub fn load_records<P: AsRef<Path>>(path: P) -> Result<Vec<Record>> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)
        .map_err(|e| FormError::RecordError(format!("{}: {}", path.display(), e)))?;
    let records = parse_records(&content)?;
    debug!("Loaded {} record(s) from {}", records.len(), path.display());
    Ok(records)
}

/// Parse a `YYYY-MM-DD` date, defaulting to today.
pub fn parse_date(date_str: Option<&str>) -> Result<NaiveDate> {
    match date_str {
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map_err(|_| FormError::DateError(s.to_string())),
        None => Ok(Local::now().date_naive()),
    }
}

/// Writes one formatted date into a named field of every record that does
/// not already carry a value for it.
#[derive(Debug, Clone)]
pub struct DateStamp {
    field: String,
    text: String,
}

impl DateStamp {
    pub fn new(field: &str, date: NaiveDate, format: &str) -> Result<Self> {
        if StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
            return Err(FormError::DateError(format!("bad date format \"{}\"", format)));
        }
        Ok(DateStamp {
            field: field.to_string(),
            text: date.format(format).to_string(),
        })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn apply(&self, record: &mut Record) {
        record
            .entry(self.field.clone())
            .or_insert_with(|| self.text.clone());
    }
}
