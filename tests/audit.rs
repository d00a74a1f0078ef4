mod common;

use std::fs;

use assert_cmd::Command;
use predicates::str::contains;

use common::{TestWorkspace, messy_orders_csv};

#[test]
fn audit_prints_report_without_writing_rows() {
    let workspace = TestWorkspace::new();
    let input = workspace.write("orders.csv", &messy_orders_csv());
    let assert = Command::cargo_bin("csv-refinery")
        .expect("binary exists")
        .args(["audit", "-i", input.to_str().unwrap()])
        .assert()
        .success();

    let stdout = String::from_utf8(assert.get_output().stdout.clone()).expect("stdout");
    assert!(stdout.contains("Rows processed: 3"));
    assert!(stdout.contains("Needs verification: 1"));
    assert!(stdout.contains("Duplicates flagged: 0"));
    assert!(stdout.contains("customer_email"));

    // The input is untouched and nothing else is created next to it.
    let untouched = fs::read_to_string(&input).expect("re-read input");
    assert_eq!(untouched, messy_orders_csv());
    let entries = fs::read_dir(workspace.path()).expect("list workspace").count();
    assert_eq!(entries, 1);
}

#[test]
fn audit_report_counts_nulled_cells() {
    let workspace = TestWorkspace::new();
    let input = workspace.write(
        "orders.csv",
        "Customer Email,Order Date\n\
         good@example.com,2022-01-15\n\
         broken-email,pending\n",
    );
    let report_path = workspace.path().join("audit.json");
    Command::cargo_bin("csv-refinery")
        .expect("binary exists")
        .args([
            "audit",
            "-i",
            input.to_str().unwrap(),
            "--report",
            report_path.to_str().unwrap(),
        ])
        .assert()
        .success();

    let report: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&report_path).expect("read report"))
            .expect("parse report JSON");
    assert_eq!(report["rows"], 2);
    let fields = report["fields"].as_array().expect("fields array");
    let email = fields
        .iter()
        .find(|tally| tally["column"] == "customer_email")
        .expect("email tally");
    assert_eq!(email["present"], 2);
    assert_eq!(email["normalized"], 1);
    assert_eq!(email["nulled"], 1);
    let order_date = fields
        .iter()
        .find(|tally| tally["column"] == "order_date")
        .expect("order date tally");
    assert_eq!(order_date["nulled"], 1);
}

#[test]
fn audit_respects_row_limit() {
    let workspace = TestWorkspace::new();
    let mut contents = String::from("Customer Email\n");
    for i in 0..20 {
        contents.push_str(&format!("user{i}@example.com\n"));
    }
    let input = workspace.write("orders.csv", &contents);
    let assert = Command::cargo_bin("csv-refinery")
        .expect("binary exists")
        .args(["audit", "-i", input.to_str().unwrap(), "--limit", "5"])
        .assert()
        .success();

    let stdout = String::from_utf8(assert.get_output().stdout.clone()).expect("stdout");
    assert!(stdout.contains("Rows processed: 5"));
}

#[test]
fn audit_fails_without_recognizable_columns() {
    let workspace = TestWorkspace::new();
    let input = workspace.write("opaque.csv", "alpha,beta\n1,2\n");
    Command::cargo_bin("csv-refinery")
        .expect("binary exists")
        .args(["audit", "-i", input.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(contains("no recognizable field columns"));
}
