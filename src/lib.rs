//! Monitoring probes that pull metrics out of JSON documents and InfluxDB
//! stats/query results.

pub mod check;
pub mod classify;
pub mod cli;
pub mod error;
pub mod logging;
pub mod probe;
pub mod resolve;
pub mod series;
pub mod source;
pub mod value;
