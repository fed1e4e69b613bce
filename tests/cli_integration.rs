//! End-to-end runs of the binary, checking the status line and exit code

use assert_cmd::Command;
use httpmock::prelude::*;
use predicates::prelude::*;

fn probe() -> Command {
    let mut cmd = Command::cargo_bin("metricprobe").expect("binary is built");
    cmd.env_remove("LOG_LEVEL")
        .env_remove("PROBE_LOG_FILE")
        .env_remove("PROBE_PASSWORD");
    cmd
}

#[test]
fn test_api_json_ok() {
    let server = MockServer::start();
    let _mock = server.mock(|when, then| {
        when.method(GET).path("/job/PROJECT/api/json");
        then.status(200).body(
            r#"{"healthReport":[{"description":"Test Result: 0 tests failing out of a total of 12 tests.","score":100}]}"#,
        );
    });

    probe()
        .args(["api-json", "-H", &server.host(), "-P", &server.port().to_string()])
        .args(["-U", "/job/PROJECT/api/json", "-M", "Job Summary"])
        .args(["-b", "-m", "healthReport.0.description", "-m", "healthReport.0.score"])
        .assert()
        .code(0)
        .stdout(
            "OK: Job Summary, description is Test Result: 0 tests failing out of a total of 12 tests. | score=100;;;;\n",
        );
}

#[test]
fn test_influxdb_critical_exit_code() {
    let server = MockServer::start();
    let _mock = server.mock(|when, then| {
        when.method(GET).path("/query");
        then.status(200).body(
            r#"{"results":[{"statement_id":0,"series":[{"name":"database","tags":{"database":"measurements"},"columns":["numMeasurements","numSeries"],"values":[[12,20000]]}]}]}"#,
        );
    });

    probe()
        .args(["influxdb", "-H", &server.host(), "-P", &server.port().to_string()])
        .args(["-M", "database", "-t", "database:measurements", "-m", "numSeries"])
        .args(["-w", "1000", "-c", "10000"])
        .assert()
        .code(2)
        .stdout(predicate::str::starts_with(
            "CRITICAL: database stats (database:measurements) for: numSeries, numSeries is 20000 (outside 10000)",
        ))
        .stdout(predicate::str::contains("| numSeries=20000;1000;10000;;"));
}

#[test]
fn test_missing_key_exits_unknown() {
    let server = MockServer::start();
    let _mock = server.mock(|when, then| {
        when.method(GET).path("/");
        then.status(200).body(r#"{"a":1}"#);
    });

    probe()
        .args(["api-json", "-H", &server.host(), "-P", &server.port().to_string()])
        .args(["-m", "b"])
        .assert()
        .code(3)
        .stdout("UNKNOWN: Unable to locate key b\n");
}

#[test]
fn test_bad_arguments_are_critical() {
    probe()
        .args(["influxdb", "-w", "20:10"])
        .assert()
        .code(2)
        .stdout(predicate::str::starts_with("CRITICAL: Error parsing arguments"));

    probe()
        .args(["api-json"])
        .assert()
        .code(2)
        .stdout(predicate::str::starts_with("CRITICAL: Error parsing arguments"));
}

#[test]
fn test_unknown_run_mode_is_rejected() {
    probe()
        .args(["influxdb", "-r", "replay"])
        .assert()
        .code(2)
        .stdout(predicate::str::contains("Error parsing arguments"));
}

#[test]
fn test_connection_refused_is_critical() {
    // nothing listens on the discard port in the test environment
    probe()
        .args(["api-json", "-H", "127.0.0.1", "-P", "9", "-m", "x", "--timeout", "2"])
        .assert()
        .code(2)
        .stdout(predicate::str::starts_with("CRITICAL: HTTP request failed"));
}
