use std::time::Duration;

use reqwest::Client;
use tracing::debug;

use crate::config::ReportConfig;
use crate::error::FetchError;
use crate::models::{ServiceList, StatusResponse};

const STATUS_QUERY: &str = "/cgi-bin/statusjson.cgi?query=servicelist&details=true&servicestatus=";

// The original tool had no timeout and could block forever on a dead
// server; 30 s is ample for one status page.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

pub fn status_url(config: &ReportConfig) -> String {
    format!("{}{}{}", config.address, STATUS_QUERY, config.service_status)
}

/// Perform the single authenticated GET against the status endpoint and
/// decode the service list.
pub async fn fetch_status(config: &ReportConfig) -> Result<ServiceList, FetchError> {
    let url = status_url(config);

    let client = Client::builder()
        .danger_accept_invalid_certs(!config.tls_verify)
        .timeout(REQUEST_TIMEOUT)
        .build()
        .map_err(|source| FetchError::Transport {
            url: url.clone(),
            source,
        })?;

    debug!("fetching service status from {url}");
    let response = client
        .get(&url)
        .basic_auth(&config.username, Some(&config.password))
        .send()
        .await
        .map_err(|source| FetchError::Transport {
            url: url.clone(),
            source,
        })?;

    check_http_status(response.status())?;

    let body = response
        .text()
        .await
        .map_err(|source| FetchError::Transport { url, source })?;

    decode_status(&body)
}

fn check_http_status(status: reqwest::StatusCode) -> Result<(), FetchError> {
    if status.is_success() {
        Ok(())
    } else {
        Err(FetchError::HttpStatus(status.as_u16()))
    }
}

pub fn decode_status(body: &str) -> Result<ServiceList, FetchError> {
    let response: StatusResponse = serde_json::from_str(body)?;
    response.data.servicelist.ok_or(FetchError::NoServices)
}
