//! The record processor: one pass over the raw rows, in row order.

use chrono::NaiveDate;
use tracing::{debug, info};

use crate::error::Error;
use crate::filter::{self, FilterRule};
use crate::record::Record;
use crate::score::Observation;

/// Everything a run produces, all three sequences in input row order.
#[derive(Debug, Default)]
pub struct Processed {
    /// Records that passed every filter, derived fields populated.
    pub accepted: Vec<Record>,
    /// The original cell values of the accepted rows, untouched, for the
    /// CSV pass-through sink.
    pub raw_rows: Vec<Vec<String>>,
    /// One (Date, Value) pair per accepted record that has both fields.
    pub observations: Vec<Observation>,
}

/// Normalizes and filters the raw rows.
///
/// `rows` excludes the header row. `today` is injected so runs are
/// reproducible. Filters see only the raw zipped fields; name and date
/// derivation happens after a record passes. A record whose date does not
/// parse is kept (`unixtime` 0) and the run continues; a filter naming a
/// missing field aborts the run.
pub fn process(
    header: &[String],
    rows: &[Vec<String>],
    rules: &[FilterRule],
    today: NaiveDate,
) -> Result<Processed, Error> {
    let mut out = Processed::default();

    for (i, row) in rows.iter().enumerate() {
        let row_number = i + 1;
        let mut record = Record::from_row(header, row);

        if !filter::passes_all(&record, rules, row_number)? {
            continue;
        }

        record.derive_names();
        record.resolve_date(today);

        match (record.get("Date"), record.get("Value")) {
            (Some(date), Some(value)) => {
                out.observations
                    .push(Observation::new(date.to_string(), value.to_string()));
            }
            _ => {
                debug!(row = row_number, "record has no Date/Value pair, no observation");
            }
        }

        out.raw_rows.push(row.clone());
        out.accepted.push(record);
    }

    info!(
        rows = rows.len(),
        accepted = out.accepted.len(),
        observations = out.observations.len(),
        "record processing complete"
    );
    Ok(out)
}
