use std::path::Path;

use anyhow::Context;
use log::LevelFilter;
use log4rs::append::console::{ConsoleAppender, Target};
use log4rs::append::file::FileAppender;
use log4rs::config::{Appender, Config, Root};
use log4rs::encode::pattern::PatternEncoder;

const PATTERN: &str = "{d(%Y-%m-%d %H:%M:%S%.3f)} {l:<5} {t} - {m}{n}";

/// Log configuration for a single probe run.
///
/// Stdout carries the plugin status line, so records go to stderr unless a
/// log file is given.
pub fn app_config(log_file: Option<&Path>, level: LevelFilter) -> anyhow::Result<Config> {
    let appender = match log_file {
        Some(path) => {
            let file = FileAppender::builder()
                .encoder(Box::new(PatternEncoder::new(PATTERN)))
                .build(path)
                .with_context(|| format!("cannot open log file {}", path.display()))?;
            Appender::builder().build("probe", Box::new(file))
        }
        None => {
            let console = ConsoleAppender::builder()
                .target(Target::Stderr)
                .encoder(Box::new(PatternEncoder::new(PATTERN)))
                .build();
            Appender::builder().build("probe", Box::new(console))
        }
    };

    Config::builder()
        .appender(appender)
        .build(Root::builder().appender("probe").build(level))
        .context("invalid logging configuration")
}
