use std::future::Future;
use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use reqwest::{StatusCode, Url};

use crate::config::Endpoint;

const OPENMETRICS_CONTENT_TYPE: &str = "application/openmetrics-text; version=1.0.0; charset=utf-8";

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("could not build http client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("invalid endpoint url {url}: {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("request to {url} failed: {source}")]
    Request {
        url: Url,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} answered with {status}")]
    Status { url: Url, status: StatusCode },
}

/// Source of raw exposition text for one (endpoint, dataset) pair.
pub trait Fetch {
    fn fetch(&self, endpoint: &Endpoint, dataset: &str) -> impl Future<Output = Result<String, FetchError>>;
}

/// Fetches a dataset from the Confluent Cloud metrics export API.
#[derive(Debug, Clone)]
pub struct MetricScraper {
    client: reqwest::Client,
}

impl MetricScraper {
    pub fn new(timeout: Duration, accept_invalid_certs: bool) -> Result<MetricScraper, FetchError> {
        if accept_invalid_certs {
            log::warn!("TLS certificate validation is disabled");
        }
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .danger_accept_invalid_certs(accept_invalid_certs)
            .build()
            .map_err(FetchError::Client)?;
        Ok(MetricScraper { client })
    }
}

impl Fetch for MetricScraper {
    async fn fetch(&self, endpoint: &Endpoint, dataset: &str) -> Result<String, FetchError> {
        let url = export_url(endpoint, dataset)?;
        log::debug!("Request: GET {url}");

        let response = self
            .client
            .get(url.clone())
            .basic_auth(&endpoint.api_key, Some(&endpoint.api_secret))
            .header(CONTENT_TYPE, OPENMETRICS_CONTENT_TYPE)
            .send()
            .await
            .map_err(|source| FetchError::Request {
                url: url.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status { url, status });
        }

        response
            .text()
            .await
            .map_err(|source| FetchError::Request { url, source })
    }
}

/// `{url}/v2/metrics/{dataset}/export?resource.kafka.id={id}`
///
/// The dataset is pushed as a single escaped path segment.
pub fn export_url(endpoint: &Endpoint, dataset: &str) -> Result<Url, FetchError> {
    let invalid = |reason: &str| FetchError::InvalidUrl {
        url: endpoint.url.clone(),
        reason: reason.to_string(),
    };
    let mut url = Url::parse(&endpoint.url).map_err(|e| invalid(&e.to_string()))?;
    url.path_segments_mut()
        .map_err(|()| invalid("cannot be used as a base url"))?
        .pop_if_empty()
        .extend(["v2", "metrics", dataset, "export"]);
    url.query_pairs_mut()
        .clear()
        .append_pair("resource.kafka.id", &endpoint.id);
    Ok(url)
}
