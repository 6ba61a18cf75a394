use assert_cmd::Command;
use predicates::prelude::*;
use std::path::PathBuf;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .parent()
        .unwrap()
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn authlens() -> Command {
    Command::cargo_bin("authlens").unwrap()
}

/// Test that analyze_trace reads a trace and returns the expected findings
#[test]
fn test_analyze_trace_returns_findings() {
    let result =
        authlens_cli::commands::analyze::analyze_trace(&fixture("sample-trace.json"), vec![], false);

    assert!(result.is_ok(), "Should successfully analyze trace");
    let report = result.unwrap();

    let ids: Vec<&str> = report.findings.iter().map(|f| f.id.as_str()).collect();
    assert_eq!(
        ids,
        vec![
            "COOKIE_MISSING_SECURE",
            "COOKIE_MISSING_HTTPONLY",
            "NONCE_MISSING",
            "PKCE_MISSING",
            "PKCE_VERIFIER_MISSING",
        ]
    );

    assert_eq!(report.tab_id, 42);
    assert_eq!(report.started_at_ms, 1_754_000_000_000);
    assert_eq!(report.summary.high, 2);
    assert_eq!(report.summary.med, 3);
    assert_eq!(report.summary.low, 0);
}

/// Host scoping drops the app callback event, and its cookie findings with it
#[test]
fn test_analyze_trace_with_host_scope() {
    let report = authlens_cli::commands::analyze::analyze_trace(
        &fixture("sample-trace.json"),
        vec!["idp.example.com".to_string()],
        false,
    )
    .unwrap();

    let ids: Vec<&str> = report.findings.iter().map(|f| f.id.as_str()).collect();
    assert_eq!(ids, vec!["NONCE_MISSING", "PKCE_MISSING", "PKCE_VERIFIER_MISSING"]);
}

#[test]
fn test_analyze_command_writes_report() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("report.json");

    authlens()
        .arg("analyze")
        .arg(fixture("sample-trace.json"))
        .arg("--out")
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("Findings: HIGH=2 MED=3 LOW=0"))
        .stdout(predicate::str::contains("Wrote: "));

    let content = std::fs::read_to_string(&out).unwrap();
    let json: serde_json::Value = serde_json::from_str(&content).unwrap();

    assert_eq!(json["version"], 1);
    assert_eq!(json["tabId"], 42);
    assert_eq!(json["startedAtMs"], 1_754_000_000_000i64);
    assert_eq!(json["summary"]["HIGH"], 2);
    assert_eq!(json["summary"]["MED"], 3);
    assert_eq!(json["summary"]["LOW"], 0);
    assert_eq!(json["findings"].as_array().unwrap().len(), 5);

    // Cookie findings carry the raw Set-Cookie value as evidence
    assert_eq!(json["findings"][0]["id"], "COOKIE_MISSING_SECURE");
    assert_eq!(json["findings"][0]["evidence"][0], "sessionid=abc; Path=/");
}

#[test]
fn test_clean_trace_exits_zero_with_empty_report() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("report.json");

    authlens()
        .arg("analyze")
        .arg(fixture("clean-trace.json"))
        .arg("--out")
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("Findings: HIGH=0 MED=0 LOW=0"));

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(json["findings"].as_array().unwrap().len(), 0);
}

/// A trace whose events field is not an array is a fatal input error:
/// exit status 1 and no report file written
#[test]
fn test_invalid_events_fails_without_report() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("report.json");

    authlens()
        .arg("analyze")
        .arg(fixture("invalid-events.json"))
        .arg("--out")
        .arg(&out)
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Failed to parse trace file"));

    assert!(!out.exists(), "No report may be written on a fatal error");
}

#[test]
fn test_unreadable_trace_fails() {
    authlens()
        .arg("analyze")
        .arg(fixture("no-such-trace.json"))
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Failed to read trace file"));
}

#[test]
fn test_unknown_subcommand_exits_one() {
    authlens().arg("frobnicate").assert().failure().code(1);
}

#[test]
fn test_redact_scrubs_url_evidence() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("report.json");

    authlens()
        .arg("analyze")
        .arg(fixture("token-leak-trace.json"))
        .arg("--redact")
        .arg("--out")
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("Findings: HIGH=1 MED=1 LOW=0"));

    let content = std::fs::read_to_string(&out).unwrap();
    assert!(content.contains("access_token=<redacted len=11>"));
    assert!(!content.contains("supersecret"));
}

#[test]
fn test_details_flag_lists_findings() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("report.json");

    authlens()
        .arg("analyze")
        .arg(fixture("sample-trace.json"))
        .arg("--details")
        .arg("--out")
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("Session cookie missing Secure"))
        .stdout(predicate::str::contains("PKCE_VERIFIER_MISSING"));
}
