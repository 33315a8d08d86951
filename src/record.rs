//! Record normalization: header/row zipping and derived fields.

use chrono::{Local, NaiveDate, NaiveTime, TimeZone};
use serde::ser::{Serialize, SerializeMap, Serializer};
use tracing::warn;

/// Month/day/year, US convention. chrono's `%m`/`%d` accept the
/// non-zero-padded values the source data uses.
pub const DATE_FORMAT: &str = "%m/%d/%Y";

/// One normalized row: the raw string fields keyed by the header, plus the
/// derived timestamp fields. String-valued derivations (`name_full`,
/// `name_last`, a backfilled `Date`) are written back into the field map so
/// downstream lookups see the authoritative values.
#[derive(Debug, Clone)]
pub struct Record {
    fields: Vec<(String, String)>,
    /// Epoch seconds at local midnight of the resolved date; 0 when the date
    /// did not parse.
    pub unixtime: i64,
    /// Days between today and the resolved date; negative for future dates,
    /// `None` when the date did not parse.
    pub ago: Option<i64>,
}

impl Record {
    /// Zips the header with a row's cells. Pairs beyond the shorter sequence
    /// are dropped: extra header fields stay unmapped, extra cells vanish.
    pub fn from_row(header: &[String], cells: &[String]) -> Self {
        let fields = header
            .iter()
            .zip(cells.iter())
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();

        Record {
            fields,
            unixtime: 0,
            ago: None,
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Replaces an existing field's value, or appends the field.
    pub fn set(&mut self, key: &str, value: String) {
        match self.fields.iter_mut().find(|(k, _)| k == key) {
            Some((_, v)) => *v = value,
            None => self.fields.push((key.to_string(), value)),
        }
    }

    /// Ensures both `name_full` and `name_last` are present: `name_last` is
    /// the last space-delimited token of an existing `name_full`, otherwise
    /// `name_full` is synthesized from `name_first` + `name_last`.
    pub fn derive_names(&mut self) {
        if let Some(full) = self.get("name_full") {
            let last = full.split(' ').next_back().unwrap_or("").to_string();
            self.set("name_last", last);
        } else {
            let first = self.get("name_first").unwrap_or("").to_string();
            let last = self.get("name_last").unwrap_or("").to_string();
            self.set("name_full", format!("{} {}", first, last));
        }
    }

    /// Resolves the authoritative record date and fills `unixtime` and `ago`.
    ///
    /// An empty or absent `Date` is backfilled from `Timestamp`'s leading
    /// token (the portion before the first space); `Date` is then the single
    /// parse source. A failed parse leaves `unixtime` at the 0 sentinel and
    /// `ago` unset, and the record is still kept.
    pub fn resolve_date(&mut self, today: NaiveDate) {
        let timestamp_date = self
            .get("Timestamp")
            .and_then(|t| t.split(' ').next())
            .unwrap_or("")
            .to_string();

        let date_missing = self.get("Date").is_none_or(|d| d.is_empty());
        if date_missing && !timestamp_date.is_empty() {
            self.set("Date", timestamp_date);
        }

        let date_str = self.get("Date").unwrap_or("").to_string();
        match NaiveDate::parse_from_str(&date_str, DATE_FORMAT) {
            Ok(day) => {
                self.unixtime = local_midnight_epoch(day);
                self.ago = Some(today.signed_duration_since(day).num_days());
            }
            Err(e) => {
                warn!(date = %date_str, error = %e, "record date did not parse, unixtime set to 0");
                self.unixtime = 0;
                self.ago = None;
            }
        }
    }
}

/// Epoch seconds at local midnight of `day`, ignoring time of day.
fn local_midnight_epoch(day: NaiveDate) -> i64 {
    Local
        .from_local_datetime(&day.and_time(NaiveTime::MIN))
        .earliest()
        .map(|dt| dt.timestamp())
        .unwrap_or(0)
}

impl Serialize for Record {
    /// Flat JSON object: raw fields in header order, then the derived
    /// numeric fields.
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let len = self.fields.len() + 1 + usize::from(self.ago.is_some());
        let mut map = serializer.serialize_map(Some(len))?;
        for (k, v) in &self.fields {
            map.serialize_entry(k, v)?;
        }
        map.serialize_entry("unixtime", &self.unixtime)?;
        if let Some(ago) = self.ago {
            map.serialize_entry("ago", &ago)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn cells(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2015, 6, 3).unwrap()
    }

    #[test]
    fn test_zip_stops_at_shorter_row() {
        let record = Record::from_row(&header(&["a", "b", "c"]), &cells(&["1", "2"]));
        assert_eq!(record.get("a"), Some("1"));
        assert_eq!(record.get("b"), Some("2"));
        assert_eq!(record.get("c"), None);
    }

    #[test]
    fn test_extra_cells_dropped() {
        let record = Record::from_row(&header(&["a"]), &cells(&["1", "orphan"]));
        assert_eq!(record.get("a"), Some("1"));
    }

    #[test]
    fn test_name_last_from_name_full() {
        let mut record = Record::from_row(
            &header(&["name_full"]),
            &cells(&["Alejandra Cardona-Lamas"]),
        );
        record.derive_names();
        assert_eq!(record.get("name_last"), Some("Cardona-Lamas"));
        assert_eq!(record.get("name_full"), Some("Alejandra Cardona-Lamas"));
    }

    #[test]
    fn test_name_full_synthesized() {
        let mut record = Record::from_row(
            &header(&["name_first", "name_last"]),
            &cells(&["Kaylan", "Bailey"]),
        );
        record.derive_names();
        assert_eq!(record.get("name_full"), Some("Kaylan Bailey"));
        assert_eq!(record.get("name_last"), Some("Bailey"));
    }

    #[test]
    fn test_date_backfilled_from_timestamp() {
        let mut record = Record::from_row(
            &header(&["Date", "Timestamp"]),
            &cells(&["", "6/1/2015 10:30:00"]),
        );
        record.resolve_date(today());
        assert_eq!(record.get("Date"), Some("6/1/2015"));
        assert_eq!(record.ago, Some(2));
        assert_ne!(record.unixtime, 0);
    }

    #[test]
    fn test_explicit_date_wins_over_timestamp() {
        let mut record = Record::from_row(
            &header(&["Date", "Timestamp"]),
            &cells(&["6/2/2015", "5/1/2015 08:00:00"]),
        );
        record.resolve_date(today());
        assert_eq!(record.get("Date"), Some("6/2/2015"));
        assert_eq!(record.ago, Some(1));
    }

    #[test]
    fn test_malformed_date_soft_fails() {
        let mut record = Record::from_row(
            &header(&["Date", "Timestamp"]),
            &cells(&["", "not-a-date"]),
        );
        record.resolve_date(today());
        assert_eq!(record.unixtime, 0);
        assert_eq!(record.ago, None);
    }

    #[test]
    fn test_future_date_gives_negative_ago() {
        let mut record = Record::from_row(&header(&["Date"]), &cells(&["6/10/2015"]));
        record.resolve_date(today());
        assert_eq!(record.ago, Some(-7));
    }

    #[test]
    fn test_serializes_to_flat_object() {
        let mut record = Record::from_row(
            &header(&["name_full", "Date"]),
            &cells(&["Kaylan Bailey", "6/1/2015"]),
        );
        record.derive_names();
        record.resolve_date(today());

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["name_full"], "Kaylan Bailey");
        assert_eq!(json["name_last"], "Bailey");
        assert_eq!(json["Date"], "6/1/2015");
        assert_eq!(json["ago"], 2);
        assert!(json["unixtime"].is_i64());
    }
}
