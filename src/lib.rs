//! Collects the Confluent Cloud metrics export, aggregates topic and cluster
//! counts per collection cycle and reports everything as machine agent
//! metrics.

pub mod config;
pub mod logging;
pub mod monitor;
pub mod prom;
