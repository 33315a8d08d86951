//! Row sources. The pipeline only needs fully materialized rows of string
//! cells with the header first; where they come from is behind this trait.

use std::path::PathBuf;

use anyhow::Result;

pub trait RowSource {
    /// Returns all rows, header row included, in sheet order.
    fn fetch_rows(&self) -> Result<Vec<Vec<String>>>;
}

/// A spreadsheet export on local disk. Rows may be ragged; the reader does
/// not enforce a uniform width.
pub struct CsvFile {
    path: PathBuf,
}

impl CsvFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        CsvFile { path: path.into() }
    }
}

impl RowSource for CsvFile {
    fn fetch_rows(&self) -> Result<Vec<Vec<String>>> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_path(&self.path)?;

        let mut rows = Vec::new();
        for result in rdr.records() {
            let record = result?;
            rows.push(record.iter().map(str::to_string).collect());
        }

        Ok(rows)
    }
}
