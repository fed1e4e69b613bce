//! Result reporting for monitoring plugins.
//!
//! Collects metrics and messages, evaluates warning/critical ranges and
//! renders the status line with its trailing performance data. The exit code
//! of the process is the numeric value of the final [`Status`].

use std::fmt;
use std::sync::OnceLock;

use anyhow::{bail, Context};
use regex::Regex;

use crate::value::Number;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Status {
    Ok,
    Warning,
    Critical,
    Unknown,
}

impl Status {
    pub fn exit_code(self) -> i32 {
        match self {
            Status::Ok => 0,
            Status::Warning => 1,
            Status::Critical => 2,
            Status::Unknown => 3,
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Status::Ok => "OK",
            Status::Warning => "WARNING",
            Status::Critical => "CRITICAL",
            Status::Unknown => "UNKNOWN",
        })
    }
}

fn range_regex() -> &'static Regex {
    static RANGE: OnceLock<Regex> = OnceLock::new();
    RANGE.get_or_init(|| {
        let number = r"[-+]?(?:\d+\.?\d*|\.\d+)";
        Regex::new(&format!(r"^(@)?(?:(~|{number})?(:))?({number})?$"))
            .expect("threshold pattern compiles")
    })
}

/// A `[@][start:][end]` alert range.
#[derive(Debug, Clone, PartialEq)]
pub struct Threshold {
    text: String,
    start: f64,
    end: f64,
    inside: bool,
}

impl Threshold {
    pub fn parse(text: &str) -> anyhow::Result<Threshold> {
        let text = text.trim();
        let captures = range_regex()
            .captures(text)
            .with_context(|| format!("invalid threshold range '{text}'"))?;
        let inside = captures.get(1).is_some();
        let has_colon = captures.get(3).is_some();
        let start = match captures.get(2).map(|m| m.as_str()) {
            Some("~") => f64::NEG_INFINITY,
            Some(s) => s.parse::<f64>()?,
            None => 0.0,
        };
        let end = match captures.get(4) {
            Some(m) => m.as_str().parse::<f64>()?,
            None if has_colon => f64::INFINITY,
            None => bail!("invalid threshold range '{text}'"),
        };
        if start > end {
            bail!("invalid threshold range '{text}': start is greater than end");
        }
        Ok(Threshold {
            text: text.to_string(),
            start,
            end,
            inside,
        })
    }

    /// True when `value` falls in the alerting part of the range.
    pub fn alerts(&self, value: f64) -> bool {
        let within = self.start <= value && value <= self.end;
        if self.inside {
            within
        } else {
            !within
        }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    fn describe(&self) -> String {
        if self.inside {
            format!("inside {}", self.text.trim_start_matches('@'))
        } else {
            format!("outside {}", self.text)
        }
    }
}

/// Unit and ranges applied to every metric of a run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PerfOptions {
    pub uom: Option<String>,
    pub warning: Option<Threshold>,
    pub critical: Option<Threshold>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Metric {
    pub name: String,
    pub value: Number,
    pub perf: PerfOptions,
}

impl Metric {
    pub fn new(name: impl Into<String>, value: Number, perf: &PerfOptions) -> Metric {
        Metric {
            name: name.into(),
            value,
            perf: perf.clone(),
        }
    }

    pub fn status(&self) -> Status {
        let value = self.value.as_f64();
        if self.perf.critical.as_ref().is_some_and(|t| t.alerts(value)) {
            Status::Critical
        } else if self.perf.warning.as_ref().is_some_and(|t| t.alerts(value)) {
            Status::Warning
        } else {
            Status::Ok
        }
    }

    fn violation(&self) -> Option<String> {
        let threshold = match self.status() {
            Status::Critical => self.perf.critical.as_ref(),
            Status::Warning => self.perf.warning.as_ref(),
            _ => None,
        }?;
        Some(format!(
            "{} is {} ({})",
            self.name,
            self.value,
            threshold.describe()
        ))
    }

    fn perf_data(&self) -> String {
        format!(
            "{}={}{};{};{};;",
            quote_label(&self.name),
            self.value,
            self.perf.uom.as_deref().unwrap_or(""),
            range_text(&self.perf.warning),
            range_text(&self.perf.critical),
        )
    }
}

fn range_text(threshold: &Option<Threshold>) -> &str {
    threshold.as_ref().map_or("", Threshold::as_str)
}

fn quote_label(name: &str) -> String {
    if name.contains([' ', '=', '\'']) {
        format!("'{}'", name.replace('\'', "''"))
    } else {
        name.to_string()
    }
}

/// Receiver of everything a probe extracts from a response.
pub trait MetricSink {
    fn add_metric(&mut self, metric: Metric);
    fn add_message(&mut self, message: String);
}

/// Final rendering of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub status: Status,
    pub output: String,
}

impl Outcome {
    /// Abort the run without performance data.
    pub fn fatal(status: Status, text: impl fmt::Display) -> Outcome {
        Outcome {
            status,
            output: format!("{status}: {text}"),
        }
    }
}

#[derive(Debug, Default)]
pub struct Check {
    messages: Vec<String>,
    metrics: Vec<Metric>,
}

impl Check {
    pub fn new() -> Check {
        Check::default()
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    pub fn metrics(&self) -> &[Metric] {
        &self.metrics
    }

    pub fn status(&self) -> Status {
        self.metrics
            .iter()
            .map(Metric::status)
            .max()
            .unwrap_or(Status::Ok)
    }

    pub fn finish(&self) -> Outcome {
        let status = self.status();
        let mut messages = self.messages.clone();
        messages.extend(self.metrics.iter().filter_map(Metric::violation));

        let mut output = format!("{status}: {}", messages.join(", "));
        if !self.metrics.is_empty() {
            let perf: Vec<String> = self.metrics.iter().map(Metric::perf_data).collect();
            output.push_str(" | ");
            output.push_str(&perf.join(" "));
        }
        Outcome { status, output }
    }
}

impl MetricSink for Check {
    fn add_metric(&mut self, metric: Metric) {
        log::debug!("metric {}={}", metric.name, metric.value);
        self.metrics.push(metric);
    }

    fn add_message(&mut self, message: String) {
        log::debug!("message '{message}'");
        self.messages.push(message);
    }
}
