//! Data types for the score pipeline.

use serde::ser::{Serialize, SerializeMap, Serializer};

/// One (date, value) pair drawn from an accepted record, in input row order.
/// Both halves stay strings until the engine validates them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Observation {
    pub date: String,
    pub value: String,
}

impl Observation {
    pub fn new(date: impl Into<String>, value: impl Into<String>) -> Self {
        Observation {
            date: date.into(),
            value: value.into(),
        }
    }
}

/// Dense daily score series. Insertion order is chronological, one entry per
/// calendar day, and the JSON form is an object preserving that order.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ScoreSeries {
    days: Vec<(String, i64)>,
}

impl ScoreSeries {
    pub(crate) fn push(&mut self, day: String, score: i64) {
        self.days.push((day, score));
    }

    pub fn get(&self, day: &str) -> Option<i64> {
        self.days
            .iter()
            .find(|(d, _)| d == day)
            .map(|&(_, score)| score)
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, i64)> {
        self.days.iter().map(|(d, s)| (d.as_str(), *s))
    }
}

impl Serialize for ScoreSeries {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.days.len()))?;
        for (day, score) in &self.days {
            map.serialize_entry(day, score)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_object_keeps_insertion_order() {
        let mut series = ScoreSeries::default();
        series.push("6/30/2015".to_string(), 5);
        series.push("7/1/2015".to_string(), 2);

        // Lexicographic order would flip these keys.
        let json = serde_json::to_string(&series).unwrap();
        assert_eq!(json, r#"{"6/30/2015":5,"7/1/2015":2}"#);
    }

    #[test]
    fn test_get_and_len() {
        let mut series = ScoreSeries::default();
        series.push("6/1/2015".to_string(), 8);

        assert_eq!(series.len(), 1);
        assert_eq!(series.get("6/1/2015"), Some(8));
        assert_eq!(series.get("6/2/2015"), None);
    }
}
