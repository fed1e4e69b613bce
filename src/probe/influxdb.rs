//! Probe for InfluxDB 1.x `SHOW STATS` output and arbitrary queries.

use std::collections::BTreeSet;

use crate::check::{Check, Metric, MetricSink, PerfOptions};
use crate::error::{ProbeError, Result};
use crate::series::{collect_metrics, ColumnFilter, RunMode, Series, TagFilter};
use crate::source::{query, Endpoint, InfluxQuery};

/// Database queried in query mode.
pub const INTERNAL_DATABASE: &str = "_internal";

#[derive(Debug, Clone, PartialEq)]
pub struct InfluxProbeConfig {
    pub endpoint: Endpoint,
    pub mode: RunMode,
    pub module: String,
    pub tags: TagFilter,
    pub metrics: Vec<String>,
    pub query: Option<String>,
    pub perf: PerfOptions,
}

impl InfluxProbeConfig {
    /// The command to send and the leading status message.
    pub fn plan(&self) -> Result<(InfluxQuery, String)> {
        match self.mode {
            RunMode::Stats => {
                let mut message = format!("{} stats", self.module);
                if !self.tags.is_empty() {
                    let tags: Vec<String> =
                        self.tags.iter().map(|(k, v)| format!("{k}:{v}")).collect();
                    message.push_str(&format!(" ({})", tags.join(", ")));
                }
                if !self.metrics.is_empty() {
                    message.push_str(&format!(" for: {}", self.metrics.join(", ")));
                }
                let command = format!("SHOW STATS FOR '{}'", self.module);
                Ok((
                    InfluxQuery {
                        command,
                        database: String::new(),
                    },
                    message,
                ))
            }
            RunMode::Query => {
                let command = self
                    .query
                    .as_deref()
                    .filter(|q| !q.is_empty())
                    .ok_or(ProbeError::MissingQuery)?;
                Ok((
                    InfluxQuery {
                        command: command.to_string(),
                        database: INTERNAL_DATABASE.to_string(),
                    },
                    format!("Query '{command}'"),
                ))
            }
        }
    }

    fn column_filter(&self) -> ColumnFilter {
        ColumnFilter {
            mode: self.mode,
            wanted: self.metrics.iter().cloned().collect::<BTreeSet<_>>(),
            skip_time: self.mode == RunMode::Query,
        }
    }
}

pub fn run(config: &InfluxProbeConfig) -> Result<Check> {
    let (influx_query, message) = config.plan()?;
    let mut check = Check::new();
    check.add_message(message);

    let series = query(&config.endpoint, &influx_query)?;
    report(&series, config, &influx_query.command, &mut check)?;
    Ok(check)
}

/// Turn the matching series into metrics.
pub fn report(
    series: &[Series],
    config: &InfluxProbeConfig,
    command: &str,
    sink: &mut dyn MetricSink,
) -> Result<()> {
    let pairs = collect_metrics(
        series,
        &config.module,
        &config.tags,
        &config.column_filter(),
        command,
    )?;
    for (name, value) in pairs {
        sink.add_metric(Metric::new(name, value, &config.perf));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{Number, Value};
    use std::time::Duration;

    fn config(mode: RunMode) -> InfluxProbeConfig {
        InfluxProbeConfig {
            endpoint: Endpoint {
                schema: "http".into(),
                hostname: "localhost".into(),
                port: 8086,
                username: None,
                password: None,
                ignore_ssl_errors: false,
                timeout: Duration::from_secs(30),
            },
            mode,
            module: "runtime".into(),
            tags: TagFilter::new(),
            metrics: Vec::new(),
            query: None,
            perf: PerfOptions::default(),
        }
    }

    #[test]
    fn stats_plan_describes_filter() {
        let mut config = config(RunMode::Stats);
        config.module = "shard".into();
        config.tags = [("id", "20"), ("database", "measurements")]
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        config.metrics = vec!["diskBytes".into()];
        let (query, message) = config.plan().unwrap();
        assert_eq!(query.command, "SHOW STATS FOR 'shard'");
        assert_eq!(query.database, "");
        assert_eq!(message, "shard stats (database:measurements, id:20) for: diskBytes");
    }

    #[test]
    fn query_plan_requires_query() {
        let mut config = config(RunMode::Query);
        assert!(matches!(config.plan(), Err(ProbeError::MissingQuery)));
        config.query = Some("SELECT 1".into());
        let (query, message) = config.plan().unwrap();
        assert_eq!(query.database, INTERNAL_DATABASE);
        assert_eq!(message, "Query 'SELECT 1'");
    }

    #[test]
    fn query_mode_reports_all_but_time() {
        let mut config = config(RunMode::Query);
        config.metrics = vec!["ignored".into()];
        let series = vec![Series {
            name: "write".into(),
            columns: vec!["time".into(), "writeErrors".into()],
            rows: vec![vec![
                Value::Number(Number::Int(1500000000)),
                Value::Number(Number::Int(2)),
            ]],
            ..Series::default()
        }];
        let mut check = Check::new();
        report(&series, &config, "SELECT 1", &mut check).unwrap();
        assert_eq!(check.metrics().len(), 1);
        assert_eq!(check.metrics()[0].name, "writeErrors");
    }
}
