//! CLI options interaction tests
//!
//! Every command runs in a scratch directory with probe endpoints pointed at
//! nothing or at a local mock, so no test touches the public probe hosts.

use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::process::Command;
use tempfile::TempDir;
use testipv6::ProbeName;

/// Helper function to create a test command isolated from the caller's env
fn create_test_cmd(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("testipv6").unwrap();
    cmd.current_dir(dir.path());
    for (key, _) in std::env::vars() {
        if key.starts_with("TESTIPV6_") {
            cmd.env_remove(key);
        }
    }
    cmd.env("NO_COLOR", "1");
    cmd
}

/// `--endpoint name=` for every probe
fn skip_all_args() -> Vec<String> {
    ProbeName::ALL
        .iter()
        .flat_map(|p| ["--endpoint".to_string(), format!("{}=", p)])
        .collect()
}

#[test]
fn test_help_and_version() {
    let dir = TempDir::new().unwrap();

    create_test_cmd(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--endpoint"))
        .stdout(predicate::str::contains("--catalog"));

    create_test_cmd(&dir)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_catalog_lists_every_probe() {
    let dir = TempDir::new().unwrap();

    let assert = create_test_cmd(&dir)
        .arg("--catalog")
        .assert()
        .success();

    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    for probe in ProbeName::ALL {
        assert!(stdout.contains(probe.as_str()), "missing {} in:\n{}", probe, stdout);
    }
}

#[test]
fn test_catalog_as_json() {
    let dir = TempDir::new().unwrap();

    let assert = create_test_cmd(&dir)
        .args(["--catalog", "--json", "--domain", "example.net"])
        .assert()
        .success();

    let value: serde_json::Value = serde_json::from_slice(&assert.get_output().stdout).unwrap();
    let defs = value.as_array().unwrap();
    assert_eq!(defs.len(), 8);
    assert_eq!(defs[0]["name"], "ipv4_dns");
    assert!(defs[0]["exampleURL"].as_str().unwrap().contains("example.net"));
}

#[test]
fn test_all_probes_skipped_json_report() {
    let dir = TempDir::new().unwrap();

    let assert = create_test_cmd(&dir)
        .arg("--json")
        .args(skip_all_args())
        .assert()
        .success();

    let value: serde_json::Value = serde_json::from_slice(&assert.get_output().stdout).unwrap();
    let results = value["run"]["results"].as_array().unwrap();
    assert_eq!(results.len(), 8);
    assert!(results.iter().all(|r| r["status"] == "skipped"));
    assert_eq!(value["analysis"]["miniPrimary"], "xxxx");
    assert!(value["analysis"]["scoreStrict"].as_i64().unwrap() <= 10);
}

#[test]
fn test_text_report_for_subset() {
    let dir = TempDir::new().unwrap();

    create_test_cmd(&dir)
        .args(["--no-color", "--tests", "ipv4_dns,asn_v4", "--endpoint", "ipv4_dns=", "--endpoint", "asn_v4="])
        .assert()
        .success()
        .stdout(predicate::str::contains("- ipv4_dns"))
        .stdout(predicate::str::contains("- asn_v4"))
        .stdout(predicate::str::contains("- ipv6_dns").not())
        .stdout(predicate::str::contains("Readiness: IPv4"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_json_report_against_mock_endpoint() {
    use wiremock::{matchers::method, Mock, MockServer, ResponseTemplate};

    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"cb({"ip":"192.0.2.55","type":"ipv4"})"#))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let mut cmd = create_test_cmd(&dir);
    cmd.args(["--json", "--tests", "ipv4_dns", "--timeout", "5s"])
        .arg("--endpoint")
        .arg(format!("ipv4_dns={}/ip/", server.uri()));

    let output = tokio::task::spawn_blocking(move || cmd.output().unwrap()).await.unwrap();
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["run"]["results"][0]["status"], "ok");
    assert_eq!(value["run"]["ipv4"]["ip"], "192.0.2.55");
    assert_eq!(value["run"]["timeoutMs"], 5000);
}

#[test]
fn test_unknown_probe_name_is_rejected() {
    let dir = TempDir::new().unwrap();

    create_test_cmd(&dir)
        .args(["--tests", "ipv4_dns,client_info"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("client_info"));
}

#[test]
fn test_conflicting_color_flags() {
    let dir = TempDir::new().unwrap();

    create_test_cmd(&dir)
        .args(["--color", "--no-color"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("--color"));
}

#[test]
fn test_invalid_endpoint_scheme() {
    let dir = TempDir::new().unwrap();

    create_test_cmd(&dir)
        .args(["--endpoint", "ipv6_mtu=ftp://mtu.example.net/"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("ipv6_mtu"));
}

#[test]
fn test_env_file_is_loaded() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join(".env"), "TESTIPV6_TIMEOUT=whenever\n").unwrap();

    create_test_cmd(&dir)
        .arg("--catalog")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("TESTIPV6_TIMEOUT"));
}

#[test]
fn test_cli_beats_env_file() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join(".env"), "TESTIPV6_DOMAIN=from-env.example\n").unwrap();

    create_test_cmd(&dir)
        .args(["--catalog", "--json", "--domain", "from-cli.example"])
        .assert()
        .success()
        .stdout(predicate::str::contains("from-cli.example"))
        .stdout(predicate::str::contains("from-env.example").not());
}

#[test]
fn test_env_help_lists_variables() {
    let dir = TempDir::new().unwrap();

    create_test_cmd(&dir)
        .arg("--env-help")
        .assert()
        .success()
        .stdout(predicate::str::contains("TESTIPV6_TIMEOUT"))
        .stdout(predicate::str::contains("Configuration Priority"));
}

#[test]
fn test_init_env_writes_example() {
    let dir = TempDir::new().unwrap();

    create_test_cmd(&dir).arg("--init-env").assert().success();

    let content = fs::read_to_string(dir.path().join(".env.example")).unwrap();
    assert!(content.contains("# TESTIPV6_DOMAIN=test-ipv6.com"));
}
