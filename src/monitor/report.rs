//! Output records and the reporting side of the machine agent protocol.

use std::fmt;
use std::io::{self, Write};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregationKind {
    Average,
    Sum,
    Observation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeRollupKind {
    Average,
    Sum,
    Current,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClusterRollupKind {
    Individual,
    Collective,
}

impl fmt::Display for AggregationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            AggregationKind::Average => "AVERAGE",
            AggregationKind::Sum => "SUM",
            AggregationKind::Observation => "OBSERVATION",
        })
    }
}

impl fmt::Display for TimeRollupKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TimeRollupKind::Average => "AVERAGE",
            TimeRollupKind::Sum => "SUM",
            TimeRollupKind::Current => "CURRENT",
        })
    }
}

impl fmt::Display for ClusterRollupKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ClusterRollupKind::Individual => "INDIVIDUAL",
            ClusterRollupKind::Collective => "COLLECTIVE",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetricValue {
    Text(String),
    Integer(i64),
}

impl fmt::Display for MetricValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricValue::Text(text) => f.write_str(text),
            MetricValue::Integer(value) => write!(f, "{value}"),
        }
    }
}

impl From<usize> for MetricValue {
    fn from(count: usize) -> Self {
        MetricValue::Integer(i64::try_from(count).unwrap_or(i64::MAX))
    }
}

impl From<i64> for MetricValue {
    fn from(value: i64) -> Self {
        MetricValue::Integer(value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputMetric {
    pub path: String,
    pub value: MetricValue,
    pub aggregation: AggregationKind,
    pub time_rollup: TimeRollupKind,
    pub cluster_rollup: ClusterRollupKind,
}

impl OutputMetric {
    /// Observation rolled up as the current value; used for everything but
    /// the liveness indicator.
    pub fn current(path: impl Into<String>, value: impl Into<MetricValue>) -> Self {
        OutputMetric {
            path: path.into(),
            value: value.into(),
            aggregation: AggregationKind::Observation,
            time_rollup: TimeRollupKind::Current,
            cluster_rollup: ClusterRollupKind::Collective,
        }
    }

    pub fn sum(path: impl Into<String>, value: impl Into<MetricValue>) -> Self {
        OutputMetric {
            time_rollup: TimeRollupKind::Sum,
            ..OutputMetric::current(path, value)
        }
    }
}

/// Receives every metric a run produces.
pub trait Reporter {
    fn report(&mut self, metric: &OutputMetric) -> io::Result<()>;
}

/// Collects metrics in memory.
impl Reporter for Vec<OutputMetric> {
    fn report(&mut self, metric: &OutputMetric) -> io::Result<()> {
        self.push(metric.clone());
        Ok(())
    }
}

pub const DEFAULT_METRIC_PREFIX: &str = "Custom Metrics|Confluent Kafka|";

/// Writes the line format the machine agent reads from an extension's stdout:
///
/// `name=<path>,aggregator=OBSERVATION,time-rollup=CURRENT,cluster-rollup=COLLECTIVE,value=<value>`
pub struct MachineAgentWriter<W: Write> {
    out: W,
    prefix: String,
}

impl<W: Write> MachineAgentWriter<W> {
    pub fn new(out: W, prefix: impl Into<String>) -> Self {
        MachineAgentWriter {
            out,
            prefix: prefix.into(),
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Reporter for MachineAgentWriter<W> {
    fn report(&mut self, metric: &OutputMetric) -> io::Result<()> {
        log::info!("Print Metric: '{}{}'={}", self.prefix, metric.path, metric.value);
        writeln!(
            self.out,
            "name={}{},aggregator={},time-rollup={},cluster-rollup={},value={}",
            self.prefix,
            metric.path,
            metric.aggregation,
            metric.time_rollup,
            metric.cluster_rollup,
            metric.value
        )?;
        self.out.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_machine_agent_lines() {
        let mut writer = MachineAgentWriter::new(Vec::new(), DEFAULT_METRIC_PREFIX);
        writer.report(&OutputMetric::sum("up", MetricValue::Integer(1))).unwrap();
        writer
            .report(&OutputMetric::current("Production|Topic Count", 3usize))
            .unwrap();
        let text = String::from_utf8(writer.into_inner()).unwrap();
        assert_eq!(
            text,
            "name=Custom Metrics|Confluent Kafka|up,aggregator=OBSERVATION,time-rollup=SUM,cluster-rollup=COLLECTIVE,value=1\n\
             name=Custom Metrics|Confluent Kafka|Production|Topic Count,aggregator=OBSERVATION,time-rollup=CURRENT,cluster-rollup=COLLECTIVE,value=3\n"
        );
    }

    #[test]
    fn text_values_are_written_verbatim() {
        let mut writer = MachineAgentWriter::new(Vec::new(), "");
        writer
            .report(&OutputMetric::current("a", MetricValue::Text("1.5e3".into())))
            .unwrap();
        let text = String::from_utf8(writer.into_inner()).unwrap();
        assert!(text.ends_with(",value=1.5e3\n"));
    }
}
