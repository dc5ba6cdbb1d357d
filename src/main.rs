use std::time::Duration;

use anyhow::Context;
use chrono::Utc;
use clap::Parser;
use cli::Cli;
use confluent_monitor::config::load_endpoints;
use confluent_monitor::logging::app_config;
use confluent_monitor::monitor::{MachineAgentWriter, Monitor};
use confluent_monitor::prom::MetricScraper;

mod cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // initialize the logger
    log4rs::init_config(app_config(&cli.log_file, cli.loglevel)?)?;
    log::info!("Starting the monitor!");

    let endpoints = load_endpoints(&cli.config)
        .inspect_err(|e| log::error!("{e}"))?;
    log::info!("Collecting datasets {:?} with {:?} paths", cli.datasets, cli.path_shape);

    let scraper = MetricScraper::new(Duration::from_secs(cli.timeout), cli.accept_invalid_certs)?;
    let writer = MachineAgentWriter::new(std::io::stdout().lock(), cli.metric_prefix);
    let mut monitor = Monitor::new(scraper, writer, cli.path_shape);

    let summary = monitor
        .run(&endpoints, &cli.datasets)
        .await
        .inspect_err(|e| log::error!("Collection run failed: {e}"))
        .context("collection run failed")?;
    log::info!(
        "Run complete: {} cycle(s), {} sample(s), {} malformed line(s), {} topic(s), {} cluster(s), newest sample {}",
        summary.cycles,
        summary.samples,
        summary.malformed,
        summary.topic_count,
        summary.cluster_count,
        summary
            .newest_sample_age(Utc::now())
            .map_or_else(|| "n/a".to_string(), |age| format!("{}s old", age.num_seconds()))
    );
    Ok(())
}
