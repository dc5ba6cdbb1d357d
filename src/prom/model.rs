use chrono::{DateTime, TimeZone, Utc};

/// A single `key="value"` annotation of a sample, in the order it was written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Label {
    pub key: String,
    pub value: String,
}

impl Label {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Label {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// One parsed exposition line.
///
/// The value is kept in its textual form so no precision is lost before the
/// output stage decides how to render it.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricSample {
    pub name: String,
    pub labels: Vec<Label>,
    pub raw_value: String,
    pub timestamp: u64,
}

impl MetricSample {
    /// The sample timestamp, read as milliseconds since the epoch.
    pub fn observed_at(&self) -> Option<DateTime<Utc>> {
        let millis = i64::try_from(self.timestamp).ok()?;
        Utc.timestamp_millis_opt(millis).single()
    }
}

/// Classification of one line of an exposition document.
#[derive(Debug, Clone, PartialEq)]
pub enum Line {
    Sample(MetricSample),
    /// Comment or blank line.
    Skip,
}

/// Result of tokenizing a whole document.
#[derive(Debug, Default)]
pub struct ParsedDocument {
    pub samples: Vec<MetricSample>,
    pub malformed: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timestamp_is_read_as_millis() {
        let sample = MetricSample {
            name: "foo".into(),
            labels: vec![],
            raw_value: "1".into(),
            timestamp: 1_700_000_000_000,
        };
        let at = sample.observed_at().expect("a valid timestamp");
        assert_eq!(at.to_rfc3339(), "2023-11-14T22:13:20+00:00");
    }
}
