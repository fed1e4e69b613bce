use reqwest::StatusCode;

use super::Endpoint;
use crate::error::{ProbeError, Result};
use crate::value::Value;

/// GET `url` and decode the body into a [`Value`] tree.
pub fn fetch_json(endpoint: &Endpoint, url: &str) -> Result<Value> {
    let client = endpoint.client().map_err(ProbeError::Http)?;
    log::info!("GET {url}");

    let response = endpoint
        .authenticate(client.get(url))
        .send()
        .map_err(ProbeError::Http)?;
    if response.status() != StatusCode::OK {
        return Err(ProbeError::HttpStatus(response.status()));
    }

    let body = response.bytes().map_err(ProbeError::Http)?;
    log::debug!("received {} bytes", body.len());
    Ok(Value::from_slice(&body)?)
}
