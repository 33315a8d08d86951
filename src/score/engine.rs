//! The decay recurrence over daily event totals.

use std::collections::HashMap;

use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::error::Error;
use crate::record::DATE_FORMAT;
use crate::score::types::{Observation, ScoreSeries};

/// Per-day damping divisor. Slightly above 2 so a day's score falls to just
/// under half the day before; the exact constant is load-bearing for
/// published numbers.
pub const DECAY_DIVISOR: f64 = 2.1;

/// Builds the dense daily score series from sparse observations.
///
/// The series is anchored on the date of the *first* observation in input
/// order, not the chronological minimum, and runs through `today` inclusive
/// with no gaps. Each day's score is `round(prev / 2.1)` plus that day's raw
/// integer sum; days with no events still decay.
///
/// Returns `Ok(None)` for an empty observation set. A non-integer value or
/// an unparseable anchor date is fatal; other unparseable or out-of-window
/// dates only lose their contribution, with a warning.
pub fn build_series(
    observations: &[Observation],
    today: NaiveDate,
) -> Result<Option<ScoreSeries>, Error> {
    let Some(first) = observations.first() else {
        return Ok(None);
    };

    let anchor = NaiveDate::parse_from_str(&first.date, DATE_FORMAT).map_err(|_| {
        Error::UnparseableAnchor {
            date: first.date.clone(),
        }
    })?;

    let mut raw_sums: HashMap<NaiveDate, i64> = HashMap::new();
    for obs in observations {
        let value: i64 =
            obs.value
                .trim()
                .parse()
                .map_err(|_| Error::NonIntegerValue {
                    date: obs.date.clone(),
                    value: obs.value.clone(),
                })?;

        match NaiveDate::parse_from_str(&obs.date, DATE_FORMAT) {
            Ok(day) if day >= anchor && day <= today => {
                *raw_sums.entry(day).or_default() += value;
            }
            Ok(day) => {
                warn!(day = %day, anchor = %anchor, "observation outside series window, dropped");
            }
            Err(e) => {
                warn!(date = %obs.date, error = %e, "observation date did not parse, dropped");
            }
        }
    }

    let mut series = ScoreSeries::default();
    let mut prev = 0i64;
    let mut day = anchor;
    while day <= today {
        let raw = raw_sums.get(&day).copied().unwrap_or(0);
        let score = (prev as f64 / DECAY_DIVISOR).round() as i64 + raw;
        series.push(day.format("%-m/%-d/%Y").to_string(), score);
        prev = score;

        match day.succ_opt() {
            Some(next) => day = next,
            None => break,
        }
    }

    debug!(days = series.len(), anchor = %anchor, "score series built");
    Ok(Some(series))
}
