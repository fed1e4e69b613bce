use clap::error::ErrorKind;
use clap::Parser;
use metricprobe::check::{Outcome, Status};
use metricprobe::cli::{Cli, Command};
use metricprobe::logging::app_config;
use metricprobe::probe::{self, InfluxProbeConfig, JsonProbeConfig};

fn main() {
    let outcome = run();
    println!("{}", outcome.output);
    std::process::exit(outcome.status.exit_code());
}

fn run() -> Outcome {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => e.exit(),
        Err(e) => {
            let text = e.to_string();
            let first = text.lines().next().unwrap_or_default();
            return Outcome::fatal(Status::Critical, format!("Error parsing arguments: {first}"));
        }
    };

    // initialize the logger
    match app_config(cli.log_file.as_deref(), cli.loglevel) {
        Ok(config) => {
            if let Err(e) = log4rs::init_config(config) {
                eprintln!("logging disabled: {e}");
            }
        }
        Err(e) => eprintln!("logging disabled: {e:#}"),
    }
    log::info!("Starting {} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));

    let result = match &cli.command {
        Command::ApiJson(args) => {
            JsonProbeConfig::try_from(args).map(|config| probe::api_json::run(&config))
        }
        Command::Influxdb(args) => {
            InfluxProbeConfig::try_from(args).map(|config| probe::influxdb::run(&config))
        }
    };
    match result {
        Ok(result) => probe::outcome(result),
        Err(e) => {
            log::error!("{e:#}");
            Outcome::fatal(Status::Critical, format!("Error parsing arguments: {e:#}"))
        }
    }
}
