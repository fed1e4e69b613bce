use thiserror::Error;

use crate::check::Status;

/// Every failure is terminal for the run.
#[derive(Error, Debug)]
pub enum ProbeError {
    #[error("Unable to locate key {path}")]
    NotFound { path: String },
    #[error("Unable to process key {path}: nesting deeper than {max} levels")]
    TooDeep { path: String, max: usize },
    #[error("Column {column} of series {series} is not numeric: {value}")]
    NotNumeric {
        series: String,
        column: String,
        value: String,
    },
    #[error("Row of series {series} has {cells} cells for {columns} columns")]
    RowShape {
        series: String,
        columns: usize,
        cells: usize,
    },
    #[error("Query returns multiple rows ({rows} rows in series {series})")]
    MultipleRows { series: String, rows: usize },
    #[error("No data returned for {0}")]
    NoData(String),
    #[error("Query parameter required in query mode")]
    MissingQuery,
    #[error("HTTP request failed: {0}")]
    Http(#[source] reqwest::Error),
    #[error("HTTP request failed: {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error("Failed to decode JSON response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("Failed to query InfluxDB server: {0}")]
    Influx(#[source] reqwest::Error),
    #[error("Request error: {0}")]
    Request(String),
}

impl ProbeError {
    /// Severity the run terminates with.
    pub fn status(&self) -> Status {
        match self {
            ProbeError::NotFound { .. } | ProbeError::TooDeep { .. } => Status::Unknown,
            _ => Status::Critical,
        }
    }
}

pub type Result<T> = std::result::Result<T, ProbeError>;
