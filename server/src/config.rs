use std::path::PathBuf;
use std::time::Duration;

pub const COUNTIES_URL: &str =
    "https://cdn.freecodecamp.org/testable-projects-fcc/data/choropleth_map/counties.json";
pub const EDUCATION_URL: &str =
    "https://cdn.freecodecamp.org/testable-projects-fcc/data/choropleth_map/for_user_education.json";

/// Topology object holding one polygon per county.
pub const COUNTIES_OBJECT: &str = "counties";

pub const DEFAULT_UPSTREAM_HTTP_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_UPSTREAM_CONNECT_TIMEOUT_SECS: u64 = 5;
pub const DEFAULT_SERVER_PORT: u16 = 3000;

fn env_string(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
}

pub fn counties_url() -> String {
    env_string("COUNTIES_URL").unwrap_or_else(|| COUNTIES_URL.to_owned())
}

pub fn education_url() -> String {
    env_string("EDUCATION_URL").unwrap_or_else(|| EDUCATION_URL.to_owned())
}

pub fn counties_object() -> String {
    env_string("COUNTIES_OBJECT").unwrap_or_else(|| COUNTIES_OBJECT.to_owned())
}

pub fn server_port() -> u16 {
    std::env::var("SERVER_PORT")
        .ok()
        .and_then(|value| value.trim().parse::<u16>().ok())
        .filter(|value| *value > 0)
        .unwrap_or(DEFAULT_SERVER_PORT)
}

/// When set, the rendered page is written here instead of being served.
pub fn output_path() -> Option<PathBuf> {
    env_string("CHOROPLETH_OUTPUT").map(PathBuf::from)
}

pub fn upstream_http_timeout() -> Duration {
    std::env::var("UPSTREAM_HTTP_TIMEOUT_SECS")
        .ok()
        .and_then(|value| value.parse::<u64>().ok())
        .filter(|value| *value > 0)
        .map(Duration::from_secs)
        .unwrap_or_else(|| Duration::from_secs(DEFAULT_UPSTREAM_HTTP_TIMEOUT_SECS))
}

pub fn upstream_connect_timeout() -> Duration {
    std::env::var("UPSTREAM_CONNECT_TIMEOUT_SECS")
        .ok()
        .and_then(|value| value.parse::<u64>().ok())
        .filter(|value| *value > 0)
        .map(Duration::from_secs)
        .unwrap_or_else(|| Duration::from_secs(DEFAULT_UPSTREAM_CONNECT_TIMEOUT_SECS))
}
