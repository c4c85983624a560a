use assert_cmd::Command;
use predicates::prelude::*;
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::Value;
use std::io::Write;

fn bond_metrics() -> Command {
    let mut cmd = Command::cargo_bin("bond-metrics").unwrap();
    cmd.env_remove("RUST_LOG");
    cmd
}

fn decimal_at(value: &Value, pointer: &str) -> Decimal {
    value
        .pointer(pointer)
        .and_then(Value::as_str)
        .unwrap_or_else(|| panic!("missing {pointer} in {value}"))
        .parse()
        .unwrap()
}

#[test]
fn default_run_prints_report_and_saves_chart() {
    let dir = tempfile::tempdir().unwrap();

    bond_metrics()
        .arg("--output-dir")
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Treasury Bond (Bullet Repayment)"))
        .stdout(predicate::str::contains("$875,377.90"))
        .stdout(predicate::str::contains("13.0293"))
        .stdout(predicate::str::contains("Mortgage Bond (Amortized)"))
        .stdout(predicate::str::contains("$916,991.25"))
        .stdout(predicate::str::contains("8.4790"))
        .stdout(predicate::str::contains("svb_duration_analysis.png"));

    let bytes = std::fs::read(dir.path().join("svb_duration_analysis.png")).unwrap();
    assert_eq!(&bytes[1..4], b"PNG");
}

#[test]
fn simulate_subcommand_matches_default_run() {
    let dir = tempfile::tempdir().unwrap();

    bond_metrics()
        .args(["simulate", "--no-chart"])
        .arg("--output-dir")
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("$875,377.90"));

    assert!(!dir.path().join("svb_duration_analysis.png").exists());
}

#[test]
fn json_output_carries_both_bonds() {
    let output = bond_metrics()
        .args(["--no-chart", "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: Value = serde_json::from_slice(&output.stdout).unwrap();
    let treasury_price = decimal_at(&value, "/result/treasury/metrics/total_present_value");
    let mortgage_duration = decimal_at(&value, "/result/mortgage/metrics/duration");
    assert_eq!(treasury_price.round_dp(4), dec!(875377.8966));
    assert_eq!(mortgage_duration.round_dp(4), dec!(8.4790));
    assert!(value.get("chart").is_none());
}

#[test]
fn scenario_flags_override_defaults() {
    // coupon equal to yield prices at par
    let output = bond_metrics()
        .args(["--no-chart", "--format", "json", "--maturity", "5", "--coupon-rate", "0.05"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: Value = serde_json::from_slice(&output.stdout).unwrap();
    let price = decimal_at(&value, "/result/treasury/metrics/total_present_value");
    assert_eq!(price.round_dp(6), dec!(1000000));
    assert_eq!(value.pointer("/result/parameters/maturity"), Some(&Value::from(5)));
}

#[test]
fn scenario_file_is_read() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, r#"{{"maturity": 3, "face_value": "1000"}}"#).unwrap();

    bond_metrics()
        .args(["--no-chart", "--input"])
        .arg(file.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Maturity 3 periods"));
}

#[test]
fn zero_maturity_is_rejected() {
    bond_metrics()
        .args(["--no-chart", "--maturity", "0"])
        .assert()
        .failure();
}

#[test]
fn maturity_above_limit_is_rejected() {
    bond_metrics()
        .args(["--no-chart", "--maturity", "4000000000"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("--maturity"));
}

#[test]
fn long_maturity_prices_as_perpetuity() {
    let output = bond_metrics()
        .args(["--no-chart", "--format", "json", "--maturity", "1400"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: Value = serde_json::from_slice(&output.stdout).unwrap();
    let price = decimal_at(&value, "/result/treasury/metrics/total_present_value");
    let duration = decimal_at(&value, "/result/treasury/metrics/duration");
    assert_eq!(price.round_dp(2), dec!(800000));
    assert_eq!(duration.round_dp(4), dec!(20));
}

#[test]
fn non_numeric_maturity_is_rejected() {
    bond_metrics()
        .args(["--no-chart", "--maturity", "abc"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--maturity"));
}

#[test]
fn non_positive_face_value_is_rejected() {
    bond_metrics()
        .args(["--no-chart", "--face-value", "0"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("face_value"));
}

#[test]
fn unwritable_chart_location_is_reported_but_not_fatal() {
    let blocker = tempfile::NamedTempFile::new().unwrap();

    bond_metrics()
        .arg("--output-dir")
        .arg(blocker.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("$875,377.90"))
        .stderr(predicate::str::contains("could not save chart"));
}

#[test]
fn cash_flows_bullet_schedule() {
    bond_metrics()
        .args(["cash-flows", "--maturity", "3", "--face-value", "1000"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Cash flows (bullet)"))
        .stdout(predicate::str::contains("$1,040.00"))
        .stdout(predicate::str::contains("$1,120.00"));
}

#[test]
fn cash_flows_amortized_csv() {
    bond_metrics()
        .args(["cash-flows", "--policy", "amortized", "--format", "csv"])
        .assert()
        .success()
        .stdout(predicate::str::contains("cash_flow"))
        .stdout(predicate::str::contains("73581.75"));
}

#[test]
fn metrics_from_explicit_cash_flows() {
    let output = bond_metrics()
        .args(["metrics", "--cash-flows", "100,100,1100", "--yield-rate", "0.1", "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(decimal_at(&value, "/result/total_present_value").round_dp(6), dec!(1000));
    assert_eq!(decimal_at(&value, "/result/duration").round_dp(4), dec!(2.4869));
    assert_eq!(value.pointer("/result/periods").and_then(Value::as_array).map(Vec::len), Some(3));
}

#[test]
fn metrics_requires_cash_flows() {
    bond_metrics()
        .arg("metrics")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("--cash-flows"));
}

#[test]
fn metrics_offsetting_flows_fail() {
    bond_metrics()
        .args(["metrics", "--cash-flows", "105,-110.25"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Division by zero"));
}

#[test]
fn version_subcommand() {
    bond_metrics()
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("bond-metrics "));
}
