use std::path::PathBuf;

use clap::Parser;
use clap::ValueHint;
use confluent_monitor::monitor::{PathShape, DEFAULT_METRIC_PREFIX};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Endpoint configuration file
    ///
    /// JSON array of Confluent clusters to collect from, each with id, name,
    /// url, apiKey, apiSecret and ignoreHiddenTopics.
    #[arg(short, long, env="CONFLUENT_CONFIG", value_hint=ValueHint::FilePath, default_value="confluent-config.json")]
    pub config: PathBuf,

    /// Datasets to export from every endpoint
    #[arg(short, long = "dataset", env="CONFLUENT_DATASETS", value_delimiter=',', default_value="cloud")]
    pub datasets: Vec<String>,

    /// Shape of the reported metric paths
    ///
    /// free-form: <endpoint>|<label>=<value>|...|<metric>
    /// fixed: <kafka_id>|<topic>|<metric>
    #[arg(short='s', long, env="CONFLUENT_PATH_SHAPE", value_enum, default_value_t=PathShape::FreeForm)]
    pub path_shape: PathShape,

    /// Prefix prepended to every reported metric path
    #[arg(long, env="CONFLUENT_METRIC_PREFIX", default_value=DEFAULT_METRIC_PREFIX)]
    pub metric_prefix: String,

    /// Request timeout in seconds
    #[arg(short, long, env="CONFLUENT_TIMEOUT", value_hint=ValueHint::Other, default_value="30")]
    pub timeout: u64,

    /// Accept invalid TLS certificates from the endpoints
    #[arg(long, env="CONFLUENT_ACCEPT_INVALID_CERTS")]
    pub accept_invalid_certs: bool,

    /// File the log is written to
    #[arg(long, env="LOG_FILE", value_hint=ValueHint::FilePath, default_value="confluent-monitor.log")]
    pub log_file: PathBuf,

    /// Set the logging level
    ///
    /// Set the logging level to use when logging to the log file
    #[arg(short, long, env="LOG_LEVEL", value_hint=ValueHint::Other, default_value="INFO")]
    pub loglevel: log::LevelFilter,
}
