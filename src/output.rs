//! Flat-file sinks: CSV pass-through, JSON, and callback-wrapped JSON.
//!
//! Each writer replaces the target file wholesale; the pipeline makes no
//! all-or-nothing guarantee across the formats.

use std::fs;
use std::path::Path;

use anyhow::Result;
use csv::WriterBuilder;
use serde::Serialize;
use tracing::debug;

/// Writes the header plus the accepted raw rows as CSV, original cell
/// values untouched.
pub fn write_rows(path: &Path, header: &[String], rows: &[Vec<String>]) -> Result<()> {
    debug!(path = %path.display(), rows = rows.len(), "writing CSV rows");

    let mut writer = WriterBuilder::new().flexible(true).from_path(path)?;
    writer.write_record(header)?;
    for row in rows {
        writer.write_record(row)?;
    }
    writer.flush()?;

    Ok(())
}

/// Serializes a value to compact JSON on disk.
pub fn write_json(path: &Path, value: &impl Serialize) -> Result<()> {
    debug!(path = %path.display(), "writing JSON");
    fs::write(path, serde_json::to_vec(value)?)?;
    Ok(())
}

/// Writes `<callback>(<json>);` for script-tag consumers.
pub fn write_jsonp(path: &Path, callback: &str, value: &impl Serialize) -> Result<()> {
    debug!(path = %path.display(), callback, "writing JSONP");
    let body = format!("{}({});", callback, serde_json::to_string(value)?);
    fs::write(path, body)?;
    Ok(())
}
