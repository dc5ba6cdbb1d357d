use std::collections::HashSet;
use std::io;

use chrono::{DateTime, TimeDelta, Utc};

use super::aggregation::AggregationState;
use super::normalize::{normalize, strip_trailing_zero};
use super::path::{PathShape, SEPARATOR};
use super::report::{MetricValue, OutputMetric, Reporter};
use crate::config::Endpoint;
use crate::prom::{parse_document, Fetch, FetchError};

#[derive(Debug, thiserror::Error)]
pub enum CollectError {
    #[error("could not fetch dataset {dataset} of {endpoint}: {source}")]
    Fetch {
        endpoint: String,
        dataset: String,
        #[source]
        source: FetchError,
    },
    #[error("could not report metric: {0}")]
    Report(#[from] io::Error),
}

/// What one (endpoint, dataset) cycle produced.
#[derive(Debug, Default)]
pub struct CycleReport {
    pub samples: usize,
    pub malformed: usize,
    pub topic_count: usize,
    pub clusters: HashSet<String>,
    pub newest_sample: Option<DateTime<Utc>>,
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub cycles: usize,
    pub samples: usize,
    pub malformed: usize,
    pub topic_count: usize,
    pub cluster_count: usize,
    /// Timestamp of the most recent sample seen in any cycle.
    pub newest_sample: Option<DateTime<Utc>>,
}

impl RunSummary {
    /// How far behind `now` the newest collected sample is.
    pub fn newest_sample_age(&self, now: DateTime<Utc>) -> Option<TimeDelta> {
        self.newest_sample.map(|newest| now - newest)
    }
}

/// Drives collection cycles: fetch, parse, aggregate, emit, reset.
pub struct Monitor<F, R> {
    fetcher: F,
    reporter: R,
    shape: PathShape,
}

impl<F: Fetch, R: Reporter> Monitor<F, R> {
    pub fn new(fetcher: F, reporter: R, shape: PathShape) -> Self {
        Monitor {
            fetcher,
            reporter,
            shape,
        }
    }

    pub fn reporter(&self) -> &R {
        &self.reporter
    }

    /// Collect every dataset of every endpoint, one cycle at a time.
    ///
    /// A fetch or report failure stops the run; nothing is collected for the
    /// remaining pairs and the run-level totals are not reported.
    pub async fn run(&mut self, endpoints: &[Endpoint], datasets: &[String]) -> Result<RunSummary, CollectError> {
        self.emit(OutputMetric::sum("up", 1i64))?;

        let mut summary = RunSummary::default();
        let mut clusters = HashSet::new();
        let mut state = AggregationState::default();

        for endpoint in endpoints {
            for dataset in datasets {
                let cycle = self.run_cycle(endpoint, dataset, &mut state).await?;
                summary.cycles += 1;
                summary.samples += cycle.samples;
                summary.malformed += cycle.malformed;
                summary.topic_count += cycle.topic_count;
                clusters.extend(cycle.clusters);
                summary.newest_sample = summary.newest_sample.max(cycle.newest_sample);
            }
        }
        summary.cluster_count = clusters.len();

        self.emit(OutputMetric::current("Cluster Count", summary.cluster_count))?;
        self.emit(OutputMetric::current("Topic Count", summary.topic_count))?;
        Ok(summary)
    }

    /// One collection cycle. `state` must be empty on entry and is empty
    /// again when this returns, whatever the outcome.
    pub async fn run_cycle(
        &mut self,
        endpoint: &Endpoint,
        dataset: &str,
        state: &mut AggregationState,
    ) -> Result<CycleReport, CollectError> {
        debug_assert!(state.is_empty(), "aggregation state leaked from a previous cycle");

        let text = self
            .fetcher
            .fetch(endpoint, dataset)
            .await
            .map_err(|source| CollectError::Fetch {
                endpoint: endpoint.name.clone(),
                dataset: dataset.to_string(),
                source,
            })?;

        let result = self.collect(endpoint, dataset, &text, state);
        state.reset();
        result
    }

    fn collect(
        &mut self,
        endpoint: &Endpoint,
        dataset: &str,
        text: &str,
        state: &mut AggregationState,
    ) -> Result<CycleReport, CollectError> {
        let document = parse_document(text);
        let newest_sample = document.samples.iter().filter_map(|s| s.observed_at()).max();
        log::debug!(
            "{}/{dataset}: {} sample(s), {} malformed line(s), newest at {:?}",
            endpoint.name,
            document.samples.len(),
            document.malformed,
            newest_sample
        );

        for sample in &document.samples {
            state.record_labels(&sample.labels, endpoint.ignore_hidden_topics);
            if let Err(e) = state.add_to_sum(&sample.name, &sample.raw_value) {
                log::warn!("Skipping value {:?} of {} in total: {e}", sample.raw_value, sample.name);
            }
        }

        for sample in &document.samples {
            let path = self.shape.build(&endpoint.name, &sample.labels, &sample.name);
            let value = MetricValue::Text(strip_trailing_zero(&sample.raw_value).to_string());
            self.emit(OutputMetric::current(path, value))?;
        }

        let name = &endpoint.name;
        self.emit(OutputMetric::current(
            format!("{name}{SEPARATOR}Topic Count"),
            state.resource_count(),
        ))?;
        self.emit(OutputMetric::current(
            format!("{name}{SEPARATOR}Cluster Count"),
            state.cluster_count(),
        ))?;
        for (metric, total) in state.totals() {
            self.emit(OutputMetric::current(format!("{name}{SEPARATOR}Total {metric}"), total))?;
        }

        Ok(CycleReport {
            samples: document.samples.len(),
            malformed: document.malformed,
            topic_count: state.resource_count(),
            clusters: state.clusters().map(str::to_string).collect(),
            newest_sample,
        })
    }

    fn emit(&mut self, metric: OutputMetric) -> io::Result<()> {
        self.reporter.report(&normalize(metric))
    }
}
