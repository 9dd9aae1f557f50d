use choropleth_shared::TopologyError;
use thiserror::Error;

/// Why one of the two datasets could not be loaded. Always fatal.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("{dataset}: request to {url} failed: {source}")]
    Request {
        dataset: &'static str,
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{dataset}: {url} answered HTTP {status}")]
    Status {
        dataset: &'static str,
        url: String,
        status: reqwest::StatusCode,
    },
    #[error("{dataset}: response from {url} is not valid JSON: {source}")]
    Decode {
        dataset: &'static str,
        url: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("counties: {0}")]
    Topology(#[from] TopologyError),
}

impl FetchError {
    pub fn dataset(&self) -> &'static str {
        match self {
            FetchError::Request { dataset, .. }
            | FetchError::Status { dataset, .. }
            | FetchError::Decode { dataset, .. } => dataset,
            FetchError::Topology(_) => "counties",
        }
    }
}
