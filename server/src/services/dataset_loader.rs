use choropleth_shared::{Region, StatRecord, Topology};
use serde::de::DeserializeOwned;
use tracing::{info, warn};

use crate::config::{
    counties_object, counties_url, education_url, upstream_connect_timeout, upstream_http_timeout,
};
use crate::error::FetchError;

const COUNTIES: &str = "counties";
const EDUCATION: &str = "education";

/// Where the two datasets come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetSources {
    pub counties_url: String,
    pub counties_object: String,
    pub education_url: String,
}

impl DatasetSources {
    pub fn from_env() -> Self {
        Self {
            counties_url: counties_url(),
            counties_object: counties_object(),
            education_url: education_url(),
        }
    }
}

/// Both inputs of the join, loaded once and never modified.
#[derive(Debug)]
pub struct Datasets {
    pub regions: Vec<Region>,
    pub stats: Vec<StatRecord>,
}

pub fn build_http_client() -> Result<reqwest::Client, reqwest::Error> {
    let request_timeout = upstream_http_timeout();
    let connect_timeout = upstream_connect_timeout();
    reqwest::Client::builder()
        .user_agent(concat!("choropleth-server/", env!("CARGO_PKG_VERSION")))
        .timeout(request_timeout)
        .connect_timeout(connect_timeout)
        .build()
        .or_else(|e| {
            warn!(
                error = %e,
                "failed to build configured HTTP client, retrying without custom user-agent"
            );
            reqwest::Client::builder()
                .timeout(request_timeout)
                .connect_timeout(connect_timeout)
                .build()
        })
}

/// Fetch both datasets concurrently. Resolves only once both succeeded;
/// the first failure wins and nothing partial is returned.
pub async fn load_datasets(
    client: &reqwest::Client,
    sources: &DatasetSources,
) -> Result<Datasets, FetchError> {
    let (regions, stats) = tokio::try_join!(
        fetch_regions(client, &sources.counties_url, &sources.counties_object),
        fetch_stats(client, &sources.education_url),
    )?;
    Ok(Datasets { regions, stats })
}

pub async fn fetch_regions(
    client: &reqwest::Client,
    url: &str,
    object: &str,
) -> Result<Vec<Region>, FetchError> {
    let topology: Topology = fetch_json(client, COUNTIES, url).await?;
    let regions = topology.regions(object)?;
    info!(dataset = COUNTIES, url, object, count = regions.len(), "loaded regions");
    Ok(regions)
}

pub async fn fetch_stats(
    client: &reqwest::Client,
    url: &str,
) -> Result<Vec<StatRecord>, FetchError> {
    let stats: Vec<StatRecord> = fetch_json(client, EDUCATION, url).await?;
    info!(dataset = EDUCATION, url, count = stats.len(), "loaded statistics");
    Ok(stats)
}

async fn fetch_json<T: DeserializeOwned>(
    client: &reqwest::Client,
    dataset: &'static str,
    url: &str,
) -> Result<T, FetchError> {
    let request_error = |source| FetchError::Request {
        dataset,
        url: url.to_owned(),
        source,
    };

    let resp = client.get(url).send().await.map_err(request_error)?;
    let status = resp.status();
    if !status.is_success() {
        return Err(FetchError::Status {
            dataset,
            url: url.to_owned(),
            status,
        });
    }

    let body = resp.bytes().await.map_err(request_error)?;
    serde_json::from_slice(&body).map_err(|source| FetchError::Decode {
        dataset,
        url: url.to_owned(),
        source,
    })
}
