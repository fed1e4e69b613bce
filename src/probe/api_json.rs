//! Probe for applications exposing their state as a JSON document.

use crate::check::{Check, MetricSink};
use crate::classify::{classify_and_emit, ClassifyOptions};
use crate::error::Result;
use crate::source::{fetch_json, Endpoint};
use crate::value::Value;

#[derive(Debug, Clone, PartialEq)]
pub struct JsonProbeConfig {
    pub endpoint: Endpoint,
    /// Handler path, starting with `/`.
    pub path: String,
    /// Leading message; the request URL when unset.
    pub message: Option<String>,
    pub keys: Vec<String>,
    pub classify: ClassifyOptions,
}

impl JsonProbeConfig {
    pub fn url(&self) -> String {
        self.endpoint.url(&self.path)
    }
}

pub fn run(config: &JsonProbeConfig) -> Result<Check> {
    let url = config.url();
    let mut check = Check::new();
    check.add_message(config.message.clone().unwrap_or_else(|| url.clone()));

    let root = fetch_json(&config.endpoint, &url)?;
    report(&root, config, &mut check)?;
    Ok(check)
}

/// Classify every requested key of `root`, in order.
pub fn report(root: &Value, config: &JsonProbeConfig, sink: &mut dyn MetricSink) -> Result<()> {
    for key in &config.keys {
        classify_and_emit(root, key, &config.classify, sink)?;
    }
    Ok(())
}
