use std::collections::BTreeMap;

use serde::Deserialize;

use super::Endpoint;
use crate::error::{ProbeError, Result};
use crate::series::Series;
use crate::value::Value;

/// One command against the `/query` endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InfluxQuery {
    pub command: String,
    /// Empty for server-wide commands such as `SHOW STATS`.
    pub database: String,
}

#[derive(Debug, Deserialize)]
struct Response {
    #[serde(default)]
    results: Vec<StatementResult>,
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StatementResult {
    #[serde(default)]
    series: Vec<Row>,
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Row {
    #[serde(default)]
    name: String,
    #[serde(default)]
    tags: BTreeMap<String, String>,
    #[serde(default)]
    columns: Vec<String>,
    #[serde(default)]
    values: Vec<Vec<serde_json::Value>>,
}

impl From<Row> for Series {
    fn from(row: Row) -> Self {
        Series {
            name: row.name,
            tags: row.tags,
            columns: row.columns,
            rows: row
                .values
                .into_iter()
                .map(|cells| cells.into_iter().map(Value::from).collect())
                .collect(),
        }
    }
}

/// Run `query` and return the series of every statement, in order.
pub fn query(endpoint: &Endpoint, query: &InfluxQuery) -> Result<Vec<Series>> {
    let client = endpoint.client().map_err(ProbeError::Influx)?;
    let url = endpoint.url("/query");
    log::info!("query {url}: {}", query.command);

    let mut params = vec![("q", query.command.as_str()), ("epoch", "s")];
    if !query.database.is_empty() {
        params.push(("db", query.database.as_str()));
    }
    let response = endpoint
        .authenticate(client.get(&url).query(&params))
        .send()
        .map_err(ProbeError::Influx)?;
    let status = response.status();
    let body = response.bytes().map_err(ProbeError::Influx)?;

    // error responses still carry a JSON body naming the problem
    let decoded: Response = match serde_json::from_slice(&body) {
        Ok(decoded) => decoded,
        Err(_) if !status.is_success() => return Err(ProbeError::HttpStatus(status)),
        Err(err) => return Err(ProbeError::Decode(err)),
    };
    if !status.is_success() && decoded.error.is_none() {
        return Err(ProbeError::HttpStatus(status));
    }
    into_series(decoded)
}

fn into_series(response: Response) -> Result<Vec<Series>> {
    if let Some(error) = response.error {
        return Err(ProbeError::Request(error));
    }
    let mut all = Vec::new();
    for result in response.results {
        if let Some(error) = result.error {
            return Err(ProbeError::Request(error));
        }
        all.extend(result.series.into_iter().map(Series::from));
    }
    Ok(all)
}
