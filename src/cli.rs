use std::path::PathBuf;
use std::time::Duration;

use anyhow::{anyhow, Context};
use clap::{Args, Parser, Subcommand, ValueEnum, ValueHint};

use crate::check::{PerfOptions, Threshold};
use crate::classify::ClassifyOptions;
use crate::probe::{InfluxProbeConfig, JsonProbeConfig};
use crate::series::{RunMode, TagFilter};
use crate::source::Endpoint;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Set the logging level
    ///
    /// Log records go to stderr, or to the log file when one is given.
    #[arg(short, long, global = true, env="LOG_LEVEL", value_hint=ValueHint::Other, default_value="WARN")]
    pub loglevel: log::LevelFilter,

    /// Write log records to this file instead of stderr
    #[arg(long, global = true, env="PROBE_LOG_FILE", value_hint=ValueHint::FilePath)]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Check metrics exposed by a JSON based API
    ///
    /// Keys are dotted paths: `toplevel`, `parent.child` or `list.1.item`.
    /// A key pointing to an object reports all its children, list values are
    /// ignored. Numeric items are added to the performance data, anything
    /// else is added to the check message.
    ApiJson(ApiJsonArgs),
    /// Check an InfluxDB server
    ///
    /// In stats mode runs SHOW STATS FOR '<MODULE>', narrowed down by tags and
    /// metrics. In query mode runs the given query on the _internal database;
    /// it must return a single row per series.
    Influxdb(InfluxdbArgs),
}

#[derive(Args, Debug)]
pub struct ConnectionArgs {
    /// Protocol schema
    #[arg(short, long, default_value = "http")]
    pub schema: String,

    /// Username
    #[arg(short, long)]
    pub username: Option<String>,

    /// Password
    #[arg(short, long, env = "PROBE_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Ignore SSL certificate errors
    #[arg(long)]
    pub ignore_ssl_errors: bool,

    /// Connection timeout in seconds
    #[arg(long, default_value = "30")]
    pub timeout: u64,
}

#[derive(Args, Debug)]
pub struct ThresholdArgs {
    /// Warning threshold, applied to all metrics
    #[arg(short, long, allow_hyphen_values = true)]
    pub warning: Option<String>,

    /// Critical threshold, applied to all metrics
    #[arg(short, long, allow_hyphen_values = true)]
    pub critical: Option<String>,

    /// Unit of measure for all metrics
    #[arg(long)]
    pub uom: Option<String>,
}

#[derive(Args, Debug)]
pub struct ApiJsonArgs {
    /// Application host
    #[arg(short = 'H', long, value_hint=ValueHint::Hostname, default_value = "localhost")]
    pub hostname: String,

    /// Application port
    #[arg(short = 'P', long, default_value = "8080")]
    pub port: u16,

    /// Handler URL path
    #[arg(short = 'U', long, default_value = "/")]
    pub path: String,

    /// Initial plugin message
    #[arg(short = 'M', long)]
    pub message: Option<String>,

    /// Path based key to query, may be repeated
    #[arg(short = 'm', long = "metric", required = true)]
    pub keys: Vec<String>,

    /// Ignore leading path of metrics
    #[arg(short, long)]
    pub basename: bool,

    #[command(flatten)]
    pub connection: ConnectionArgs,

    #[command(flatten)]
    pub thresholds: ThresholdArgs,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    /// SHOW STATS FOR the module
    Stats,
    /// Run the given query
    Query,
}

impl From<Mode> for RunMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Stats => RunMode::Stats,
            Mode::Query => RunMode::Query,
        }
    }
}

#[derive(Args, Debug)]
pub struct InfluxdbArgs {
    /// InfluxDB server host
    #[arg(short = 'H', long, value_hint=ValueHint::Hostname, default_value = "localhost")]
    pub hostname: String,

    /// InfluxDB server port
    #[arg(short = 'P', long, default_value = "8086")]
    pub port: u16,

    /// Run mode
    #[arg(short, long = "run", value_enum, default_value = "stats")]
    pub run: Mode,

    /// Stats module
    #[arg(short = 'M', long, default_value = "runtime")]
    pub module: String,

    /// Additional key:value tag identifying the stats module, may be repeated
    #[arg(short, long = "tag", value_parser = parse_tag)]
    pub tags: Vec<(String, String)>,

    /// Metric to report, may be repeated; all when none is given
    #[arg(short = 'm', long = "metric")]
    pub metrics: Vec<String>,

    /// Query to execute in query mode
    #[arg(short, long)]
    pub query: Option<String>,

    #[command(flatten)]
    pub connection: ConnectionArgs,

    #[command(flatten)]
    pub thresholds: ThresholdArgs,
}

fn parse_tag(raw: &str) -> Result<(String, String), String> {
    match raw.split_once(':') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected key:value, got '{raw}'")),
    }
}

impl ConnectionArgs {
    fn endpoint(&self, hostname: &str, port: u16) -> Endpoint {
        Endpoint {
            schema: self.schema.clone(),
            hostname: hostname.to_string(),
            port,
            username: self.username.clone().filter(|u| !u.is_empty()),
            password: self.password.clone(),
            ignore_ssl_errors: self.ignore_ssl_errors,
            timeout: Duration::from_secs(self.timeout),
        }
    }
}

impl ThresholdArgs {
    fn perf_options(&self) -> anyhow::Result<PerfOptions> {
        let parse = |text: &Option<String>, which: &str| {
            text.as_deref()
                .map(Threshold::parse)
                .transpose()
                .with_context(|| format!("{which} threshold"))
        };
        Ok(PerfOptions {
            uom: self.uom.clone().filter(|u| !u.is_empty()),
            warning: parse(&self.warning, "warning")?,
            critical: parse(&self.critical, "critical")?,
        })
    }
}

impl TryFrom<&ApiJsonArgs> for JsonProbeConfig {
    type Error = anyhow::Error;

    fn try_from(args: &ApiJsonArgs) -> anyhow::Result<Self> {
        if !args.path.starts_with('/') {
            return Err(anyhow!("path must start with '/', got '{}'", args.path));
        }
        Ok(JsonProbeConfig {
            endpoint: args.connection.endpoint(&args.hostname, args.port),
            path: args.path.clone(),
            message: args.message.clone().filter(|m| !m.is_empty()),
            keys: args.keys.clone(),
            classify: ClassifyOptions {
                basename: args.basename,
                perf: args.thresholds.perf_options()?,
            },
        })
    }
}

impl TryFrom<&InfluxdbArgs> for InfluxProbeConfig {
    type Error = anyhow::Error;

    fn try_from(args: &InfluxdbArgs) -> anyhow::Result<Self> {
        Ok(InfluxProbeConfig {
            endpoint: args.connection.endpoint(&args.hostname, args.port),
            mode: args.run.into(),
            module: args.module.clone(),
            tags: args.tags.iter().cloned().collect::<TagFilter>(),
            metrics: args.metrics.clone(),
            query: args.query.clone(),
            perf: args.thresholds.perf_options()?,
        })
    }
}
