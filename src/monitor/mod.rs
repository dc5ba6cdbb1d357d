mod aggregation;
pub use self::aggregation::{AggregationState, LabelRole, HIDDEN_PREFIX};

mod cycle;
pub use self::cycle::{CollectError, CycleReport, Monitor, RunSummary};

pub mod normalize;

mod path;
pub use self::path::{PathShape, SEPARATOR};

mod report;
pub use self::report::{
    AggregationKind, ClusterRollupKind, MachineAgentWriter, MetricValue, OutputMetric, Reporter,
    TimeRollupKind, DEFAULT_METRIC_PREFIX,
};
