//! Turns resolved JSON nodes into metrics and messages.
//!
//! Numbers become metrics, maps are expanded key by key, lists are skipped
//! and every other scalar is reported as "`name` is `value`".

use crate::check::{Metric, MetricSink, PerfOptions};
use crate::error::{ProbeError, Result};
use crate::resolve::resolve;
use crate::value::Value;

/// Deepest map nesting expanded below a requested key.
pub const MAX_DEPTH: usize = 64;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClassifyOptions {
    /// Report only the last path segment as the metric name.
    pub basename: bool,
    pub perf: PerfOptions,
}

impl ClassifyOptions {
    pub fn display_name<'a>(&self, path: &'a str) -> &'a str {
        basename(path, self.basename)
    }
}

pub fn basename(path: &str, enabled: bool) -> &str {
    if enabled {
        path.rsplit_once('.').map_or(path, |(_, last)| last)
    } else {
        path
    }
}

/// Resolve `path` in `root` and report what it holds to `sink`.
pub fn classify_and_emit(
    root: &Value,
    path: &str,
    options: &ClassifyOptions,
    sink: &mut dyn MetricSink,
) -> Result<()> {
    emit(root, path, options, sink, 0)
}

fn emit(
    root: &Value,
    path: &str,
    options: &ClassifyOptions,
    sink: &mut dyn MetricSink,
    depth: usize,
) -> Result<()> {
    if depth > MAX_DEPTH {
        return Err(ProbeError::TooDeep {
            path: path.to_string(),
            max: MAX_DEPTH,
        });
    }

    match resolve(root, path)? {
        Value::Number(n) => {
            sink.add_metric(Metric::new(options.display_name(path), *n, &options.perf));
        }
        Value::Map(children) => {
            for key in children.keys() {
                emit(root, &format!("{path}.{key}"), options, sink, depth + 1)?;
            }
        }
        Value::List(_) => {
            log::debug!("skipping list at {path}");
        }
        scalar @ (Value::String(_) | Value::Bool(_) | Value::Null) => {
            sink.add_message(format!("{} is {scalar}", options.display_name(path)));
        }
    }
    Ok(())
}
