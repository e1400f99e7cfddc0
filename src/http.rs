//! HTTP client wrapper for the 25Live API.

use std::time::Duration;

use reqwest::blocking::Client;

use crate::config::{Config, HTTP_TIMEOUT_SECS};
use crate::error::{HarvestError, Result};

/// User agent string identifying this harvester.
const USER_AGENT: &str = concat!("r25-harvester/", env!("CARGO_PKG_VERSION"));

/// Create a configured HTTP client.
///
/// # Returns
/// A `reqwest::blocking::Client` configured with appropriate timeout and user agent.
pub fn create_client() -> Result<Client> {
    let client = Client::builder()
        .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
        .user_agent(USER_AGENT)
        .build()?;
    Ok(client)
}

/// Perform one authenticated GET and return the response body.
///
/// Failures are never retried here; the batch layer decides what to do with
/// a failed window.
///
/// # Arguments
/// * `client` - HTTP client to use
/// * `config` - API credentials
/// * `url` - Fully-formed request URL
///
/// # Returns
/// Response body as a string, or `HarvestError::Request` carrying the URL
/// and underlying cause for any transport failure or non-2xx status.
pub fn get_xml(client: &Client, config: &Config, url: &str) -> Result<String> {
    let wrap = |source: reqwest::Error| HarvestError::Request {
        url: url.to_string(),
        source,
    };

    let response = client
        .get(url)
        .basic_auth(&config.username, Some(&config.password))
        .send()
        .map_err(wrap)?;

    let response = response.error_for_status().map_err(wrap)?;
    let body = response.text().map_err(wrap)?;
    Ok(body)
}
