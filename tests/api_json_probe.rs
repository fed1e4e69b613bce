//! JSON probe against a mocked application endpoint

use std::time::Duration;

use httpmock::prelude::*;
use metricprobe::check::{PerfOptions, Status, Threshold};
use metricprobe::classify::ClassifyOptions;
use metricprobe::probe::{self, api_json, JsonProbeConfig};
use metricprobe::source::Endpoint;

const DEBUG_VARS: &str = r#"{
    "cmdline": ["influxd"],
    "memstats": {"Alloc": 52836064, "GCCPUFraction": 0.25, "BySize": [{"Size": 8}]},
    "version": "1.8.10"
}"#;

fn config(server: &MockServer, keys: &[&str]) -> JsonProbeConfig {
    JsonProbeConfig {
        endpoint: Endpoint {
            schema: "http".into(),
            hostname: server.host(),
            port: server.port(),
            username: None,
            password: None,
            ignore_ssl_errors: false,
            timeout: Duration::from_secs(5),
        },
        path: "/debug/vars".into(),
        message: Some("Memstats metrics".into()),
        keys: keys.iter().map(|k| k.to_string()).collect(),
        classify: ClassifyOptions {
            basename: true,
            perf: PerfOptions::default(),
        },
    }
}

fn serve_debug_vars(server: &MockServer) -> httpmock::Mock<'_> {
    server.mock(|when, then| {
        when.method(GET).path("/debug/vars");
        then.status(200)
            .header("content-type", "application/json")
            .body(DEBUG_VARS);
    })
}

#[test]
fn test_memstats_expand_to_perf_data() {
    let server = MockServer::start();
    let mock = serve_debug_vars(&server);

    let outcome = probe::outcome(api_json::run(&config(&server, &["memstats", "cmdline"])));

    mock.assert();
    assert_eq!(outcome.status, Status::Ok);
    assert_eq!(
        outcome.output,
        "OK: Memstats metrics | Alloc=52836064;;;; GCCPUFraction=0.25;;;;"
    );
}

#[test]
fn test_text_value_goes_to_message() {
    let server = MockServer::start();
    let _mock = serve_debug_vars(&server);

    let mut config = config(&server, &["version"]);
    config.message = None;
    let outcome = probe::outcome(api_json::run(&config));

    assert_eq!(
        outcome.output,
        format!("OK: {}, version is 1.8.10", config.url())
    );
}

#[test]
fn test_threshold_violation() {
    let server = MockServer::start();
    let _mock = serve_debug_vars(&server);

    let mut config = config(&server, &["memstats.GCCPUFraction"]);
    config.classify.perf.warning = Some(Threshold::parse("0.1").unwrap());
    config.classify.perf.critical = Some(Threshold::parse("0.5").unwrap());
    let outcome = probe::outcome(api_json::run(&config));

    assert_eq!(outcome.status, Status::Warning);
    assert_eq!(
        outcome.output,
        "WARNING: Memstats metrics, GCCPUFraction is 0.25 (outside 0.1) | GCCPUFraction=0.25;0.1;0.5;;"
    );
}

#[test]
fn test_missing_key_is_unknown() {
    let server = MockServer::start();
    let _mock = serve_debug_vars(&server);

    let outcome = probe::outcome(api_json::run(&config(&server, &["memstats", "memstats.Missing"])));

    assert_eq!(outcome.status, Status::Unknown);
    assert_eq!(outcome.output, "UNKNOWN: Unable to locate key memstats.Missing");
}

#[test]
fn test_basic_auth_is_sent() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET)
            .path("/debug/vars")
            .header("authorization", "Basic YWRtaW46czNjcjN0");
        then.status(200).body(r#"{"up": 1}"#);
    });

    let mut config = config(&server, &["up"]);
    config.endpoint.username = Some("admin".into());
    config.endpoint.password = Some("s3cr3t".into());
    let outcome = probe::outcome(api_json::run(&config));

    mock.assert();
    assert_eq!(outcome.output, "OK: Memstats metrics | up=1;;;;");
}

#[test]
fn test_non_200_is_critical() {
    let server = MockServer::start();
    let _mock = server.mock(|when, then| {
        when.method(GET).path("/debug/vars");
        then.status(503);
    });

    let outcome = probe::outcome(api_json::run(&config(&server, &["memstats"])));

    assert_eq!(outcome.status, Status::Critical);
    assert!(outcome.output.starts_with("CRITICAL: HTTP request failed: 503"));
}

#[test]
fn test_invalid_body_is_critical() {
    let server = MockServer::start();
    let _mock = server.mock(|when, then| {
        when.method(GET).path("/debug/vars");
        then.status(200).body("<html>not json</html>");
    });

    let outcome = probe::outcome(api_json::run(&config(&server, &["memstats"])));

    assert_eq!(outcome.status, Status::Critical);
    assert!(outcome.output.starts_with("CRITICAL: Failed to decode JSON response"));
}

#[test]
fn test_timeout_is_critical() {
    let server = MockServer::start();
    let _mock = server.mock(|when, then| {
        when.method(GET).path("/debug/vars");
        then.status(200).body(DEBUG_VARS).delay(Duration::from_secs(3));
    });

    let mut config = config(&server, &["memstats"]);
    config.endpoint.timeout = Duration::from_millis(200);
    let outcome = probe::outcome(api_json::run(&config));

    assert_eq!(outcome.status, Status::Critical);
    assert!(outcome.output.starts_with("CRITICAL: HTTP request failed"));
}
