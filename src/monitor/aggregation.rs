use std::collections::{BTreeMap, HashSet};
use std::num::ParseFloatError;

use crate::prom::Label;

/// Topics whose name starts with this are internal to the cluster.
pub const HIDDEN_PREFIX: char = '_';

/// Labels whose values are counted, matched case-insensitively on the key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelRole {
    DistinctResource,
    DistinctCluster,
}

impl LabelRole {
    pub fn of(key: &str) -> Option<LabelRole> {
        if key.eq_ignore_ascii_case("topic") {
            Some(LabelRole::DistinctResource)
        } else if key.eq_ignore_ascii_case("kafka_id") {
            Some(LabelRole::DistinctCluster)
        } else {
            None
        }
    }
}

/// Distinct topics, distinct clusters and per-metric sums of one collection
/// cycle. Must be reset between cycles.
#[derive(Debug, Default)]
pub struct AggregationState {
    resources: HashSet<String>,
    clusters: HashSet<String>,
    sums: BTreeMap<String, f64>,
}

impl AggregationState {
    pub fn record_distinct_resource(&mut self, value: &str) {
        if !self.resources.contains(value) {
            self.resources.insert(value.to_string());
        }
    }

    pub fn record_distinct_cluster(&mut self, value: &str) {
        if !self.clusters.contains(value) {
            self.clusters.insert(value.to_string());
        }
    }

    /// Feed the identifying labels of one sample. Hidden topics are left out
    /// of the distinct set when `ignore_hidden_topics` is set.
    pub fn record_labels(&mut self, labels: &[Label], ignore_hidden_topics: bool) {
        for label in labels {
            match LabelRole::of(&label.key) {
                Some(LabelRole::DistinctResource) => {
                    if ignore_hidden_topics && label.value.starts_with(HIDDEN_PREFIX) {
                        continue;
                    }
                    self.record_distinct_resource(&label.value);
                }
                Some(LabelRole::DistinctCluster) => self.record_distinct_cluster(&label.value),
                None => {}
            }
        }
    }

    pub fn add_to_sum(&mut self, metric_name: &str, raw_value: &str) -> Result<(), ParseFloatError> {
        let value: f64 = raw_value.parse()?;
        *self.sums.entry(metric_name.to_string()).or_insert(0.0) += value;
        Ok(())
    }

    pub fn resource_count(&self) -> usize {
        self.resources.len()
    }

    pub fn cluster_count(&self) -> usize {
        self.clusters.len()
    }

    pub fn clusters(&self) -> impl Iterator<Item = &str> {
        self.clusters.iter().map(String::as_str)
    }

    /// Sums truncated to integers, ordered by metric name.
    #[allow(clippy::cast_possible_truncation)]
    pub fn totals(&self) -> impl Iterator<Item = (&str, i64)> {
        self.sums
            .iter()
            .map(|(name, sum)| (name.as_str(), sum.trunc() as i64))
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty() && self.clusters.is_empty() && self.sums.is_empty()
    }

    pub fn reset(&mut self) {
        self.resources.clear();
        self.clusters.clear();
        self.sums.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roles_ignore_key_case() {
        assert_eq!(LabelRole::of("topic"), Some(LabelRole::DistinctResource));
        assert_eq!(LabelRole::of("Topic"), Some(LabelRole::DistinctResource));
        assert_eq!(LabelRole::of("KAFKA_ID"), Some(LabelRole::DistinctCluster));
        assert_eq!(LabelRole::of("partition"), None);
    }

    #[test]
    fn counts_distinct_values() {
        let mut state = AggregationState::default();
        state.record_labels(&[Label::new("kafka_id", "c1"), Label::new("topic", "t1")], false);
        state.record_labels(&[Label::new("kafka_id", "c1"), Label::new("topic", "t2")], false);
        state.record_labels(&[Label::new("topic", "t1")], false);
        assert_eq!(state.resource_count(), 2);
        assert_eq!(state.cluster_count(), 1);
        assert_eq!(state.clusters().collect::<Vec<_>>(), vec!["c1"]);
    }

    #[test]
    fn hidden_topics() {
        let labels = [Label::new("topic", "_internal"), Label::new("topic", "orders")];

        let mut state = AggregationState::default();
        state.record_labels(&labels, true);
        assert_eq!(state.resource_count(), 1);

        state.reset();
        state.record_labels(&labels, false);
        assert_eq!(state.resource_count(), 2);
    }

    #[test]
    fn sums_per_metric() {
        let mut state = AggregationState::default();
        state.add_to_sum("bytes", "42.0").unwrap();
        state.add_to_sum("bytes", "10.75").unwrap();
        state.add_to_sum("count", "1.5e3").unwrap();
        state.add_to_sum("loss", "-3.9").unwrap();
        assert!(state.add_to_sum("bytes", "nope").is_err());

        assert_eq!(
            state.totals().collect::<Vec<_>>(),
            vec![("bytes", 52), ("count", 1500), ("loss", -3)]
        );
    }

    #[test]
    fn reset_empties_everything() {
        let mut state = AggregationState::default();
        state.record_distinct_resource("t1");
        state.record_distinct_cluster("c1");
        state.add_to_sum("bytes", "1").unwrap();
        assert!(!state.is_empty());

        state.reset();
        assert!(state.is_empty());
        assert_eq!(state.resource_count(), 0);
        assert_eq!(state.cluster_count(), 0);
        assert_eq!(state.totals().count(), 0);
    }
}
