//! Filter rules deciding which records get published.

use std::fs::File;

use serde::Deserialize;
use tracing::debug;

use crate::error::Error;
use crate::record::Record;

/// One `{key, value}` rule from the filter configuration.
///
/// `Year` is special-cased: the rule passes when `value` is a substring of
/// the record's `Date` field. Every other key requires an exact match on the
/// named field.
#[derive(Debug, Clone, Deserialize)]
pub struct FilterRule {
    pub key: String,
    pub value: String,
}

impl FilterRule {
    /// Evaluates this rule against a record's raw fields.
    ///
    /// A missing field is a configuration/data mismatch, not a failed match;
    /// it aborts the run (`row` is the 1-based data row, for the message).
    pub fn matches(&self, record: &Record, row: usize) -> Result<bool, Error> {
        let lookup_key = if self.key == "Year" { "Date" } else { &self.key };
        let actual = record
            .get(lookup_key)
            .ok_or_else(|| Error::MissingFilterField {
                key: lookup_key.to_string(),
                row,
            })?;

        if self.key == "Year" {
            Ok(actual.contains(&self.value))
        } else {
            Ok(actual == self.value)
        }
    }
}

/// True when the record passes every rule (conjunction). The first failed
/// rule settles the record; a missing field still propagates as an error.
pub fn passes_all(record: &Record, rules: &[FilterRule], row: usize) -> Result<bool, Error> {
    for rule in rules {
        if !rule.matches(record, row)? {
            debug!(key = %rule.key, value = %rule.value, row, "record filtered out");
            return Ok(false);
        }
    }
    Ok(true)
}

/// Loads the ordered rule list from a two-column CSV file (`key,value`
/// header row first).
pub fn load_rules(path: &str) -> anyhow::Result<Vec<FilterRule>> {
    let file = File::open(path)?;
    let mut rdr = csv::Reader::from_reader(file);

    let mut rules = Vec::new();
    for result in rdr.deserialize() {
        let rule: FilterRule = result?;
        rules.push(rule);
    }

    Ok(rules)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(pairs: &[(&str, &str)]) -> Record {
        let header: Vec<String> = pairs.iter().map(|(k, _)| k.to_string()).collect();
        let cells: Vec<String> = pairs.iter().map(|(_, v)| v.to_string()).collect();
        Record::from_row(&header, &cells)
    }

    fn rule(key: &str, value: &str) -> FilterRule {
        FilterRule {
            key: key.to_string(),
            value: value.to_string(),
        }
    }

    #[test]
    fn test_year_rule_is_substring_match() {
        let r = record(&[("Date", "6/1/2015")]);
        assert!(rule("Year", "2015").matches(&r, 1).unwrap());
        assert!(!rule("Year", "2014").matches(&r, 1).unwrap());
    }

    #[test]
    fn test_other_rules_are_exact_match() {
        let r = record(&[("Verdict", "Guilty")]);
        assert!(rule("Verdict", "Guilty").matches(&r, 1).unwrap());
        assert!(!rule("Verdict", "Guilt").matches(&r, 1).unwrap());
    }

    #[test]
    fn test_missing_field_is_an_error() {
        let r = record(&[("Verdict", "Guilty")]);
        let err = rule("Charge", "Murder").matches(&r, 4).unwrap_err();
        assert!(matches!(err, Error::MissingFilterField { ref key, row: 4 } if key == "Charge"));
    }

    #[test]
    fn test_year_rule_on_record_without_date_is_an_error() {
        let r = record(&[("Verdict", "Guilty")]);
        let err = rule("Year", "2015").matches(&r, 2).unwrap_err();
        assert!(matches!(err, Error::MissingFilterField { ref key, .. } if key == "Date"));
    }

    #[test]
    fn test_passes_all_is_a_conjunction() {
        let r = record(&[("Date", "6/1/2015"), ("Verdict", "Guilty")]);
        let both = [rule("Year", "2015"), rule("Verdict", "Guilty")];
        assert!(passes_all(&r, &both, 1).unwrap());

        let one_fails = [rule("Year", "2015"), rule("Verdict", "Not guilty")];
        assert!(!passes_all(&r, &one_fails, 1).unwrap());
    }

    #[test]
    fn test_empty_rule_list_passes_everything() {
        let r = record(&[("Verdict", "Guilty")]);
        assert!(passes_all(&r, &[], 1).unwrap());
    }
}
