pub mod api_json;
pub mod influxdb;

pub use self::api_json::JsonProbeConfig;
pub use self::influxdb::InfluxProbeConfig;

use crate::check::{Check, Outcome};
use crate::error::Result;

/// Render a finished run, or the failure that aborted it.
pub fn outcome(result: Result<Check>) -> Outcome {
    match result {
        Ok(check) => check.finish(),
        Err(err) => {
            log::error!("{err}");
            Outcome::fatal(err.status(), err)
        }
    }
}
