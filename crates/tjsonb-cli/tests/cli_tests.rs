//! Integration tests for the `tjsonb` CLI binary.
//!
//! These tests use `assert_cmd` and `predicates` to drive every subcommand
//! through the actual binary, covering stdin/stdout piping, file I/O, temporal
//! input, and error reporting.

// `Command::cargo_bin` was deprecated in assert_cmd 2.1.2 in favor of
// `cargo::cargo_bin_cmd!`. Allow it until we migrate.
#![allow(deprecated)]

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::{json, Value};

fn fixture(name: &str) -> String {
    format!("{}/tests/fixtures/{}", env!("CARGO_MANIFEST_DIR"), name)
}

fn tjsonb() -> Command {
    Command::cargo_bin("tjsonb").unwrap()
}

/// Run the binary and parse its stdout as JSON.
fn run_json(args: &[&str], stdin: Option<&str>) -> Value {
    let mut cmd = tjsonb();
    cmd.args(args);
    if let Some(input) = stdin {
        cmd.write_stdin(input);
    }
    let output = cmd.output().unwrap();
    assert!(
        output.status.success(),
        "tjsonb {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).unwrap()
}

/// Values of every instant of a temporal document.
fn instant_values(temporal: &Value) -> Vec<Value> {
    temporal["instants"]
        .as_array()
        .unwrap()
        .iter()
        .map(|inst| inst["value"].clone())
        .collect()
}

// ─────────────────────────────────────────────────────────────────────────────
// Plain documents
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn set_creates_missing_key_from_stdin() {
    tjsonb()
        .args(["set", "--path", "b", "--value", "2", "--create"])
        .write_stdin(r#"{"a":1}"#)
        .assert()
        .success()
        .stdout(predicate::str::diff("{\"a\":1,\"b\":2}\n"));
}

#[test]
fn set_without_create_leaves_missing_key_alone() {
    let out = run_json(&["set", "--path", "b", "--value", "2"], Some(r#"{"a":1}"#));
    assert_eq!(out, json!({"a": 1}));
}

#[test]
fn set_replaces_last_array_element() {
    let out = run_json(&["set", "--path", "-1", "--value", "9"], Some("[1,2,3]"));
    assert_eq!(out, json!([1, 2, 9]));
}

#[test]
fn insert_after_array_element_from_file() {
    let out = run_json(
        &[
            "insert",
            "-i",
            &fixture("doc.json"),
            "--path",
            "tags",
            "--path",
            "0",
            "--value",
            r#""gamma""#,
            "--after",
        ],
        None,
    );
    assert_eq!(out["tags"], json!(["alpha", "gamma", "beta"]));
}

#[test]
fn delete_path_removes_nested_member() {
    tjsonb()
        .args([
            "delete-path",
            "-i",
            &fixture("doc.json"),
            "--path",
            "meta",
            "--path",
            "debug",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            r#"{"meta":{"owner":"ops"},"name":"probe-7","tags":["alpha","beta"]}"#,
        ));
}

#[test]
fn delete_removes_several_keys() {
    let out = run_json(
        &["delete", "--key", "a", "--key", "c"],
        Some(r#"{"a":1,"b":2,"c":3}"#),
    );
    assert_eq!(out, json!({"b": 2}));
}

#[test]
fn concat_merges_with_right_side_winning() {
    let out = run_json(
        &["concat", "--with", r#"{"a":2,"b":3}"#],
        Some(r#"{"a":1}"#),
    );
    assert_eq!(out, json!({"a": 2, "b": 3}));
}

#[test]
fn concat_prepend_puts_other_operand_first() {
    let out = run_json(&["concat", "--with", "[0]", "--prepend"], Some("[1,2]"));
    assert_eq!(out, json!([0, 1, 2]));
}

#[test]
fn write_to_output_file() {
    let dir = std::env::temp_dir();
    let output_path = dir.join("tjsonb-test-set-output.json");
    let _ = std::fs::remove_file(&output_path);

    tjsonb()
        .args(["set", "--path", "x", "--value", "true", "--create", "-o"])
        .arg(&output_path)
        .write_stdin("{}")
        .assert()
        .success();

    let content = std::fs::read_to_string(&output_path).unwrap();
    assert_eq!(content, r#"{"x":true}"#);
    let _ = std::fs::remove_file(&output_path);
}

#[test]
fn pretty_output_spans_lines() {
    tjsonb()
        .args(["set", "--path", "a", "--value", "[1]", "--pretty"])
        .write_stdin(r#"{"a":0}"#)
        .assert()
        .success()
        .stdout(predicate::str::contains("\n  \"a\": [\n"));
}

// ─────────────────────────────────────────────────────────────────────────────
// Temporal documents
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn temporal_delete_key_at_every_instant() {
    let out = run_json(
        &["delete", "--temporal", "-i", &fixture("trip.json"), "--key", "debug"],
        None,
    );
    assert_eq!(out["subtype"], "Sequence");
    assert_eq!(out["interp"], "step");
    assert_eq!(
        instant_values(&out),
        vec![json!({"speed": 10}), json!({"speed": 12}), json!({"speed": 9})]
    );
    assert_eq!(out["instants"][1]["t"], "2026-03-01T08:05:00Z");
}

#[test]
fn temporal_set_path_at_every_instant() {
    let out = run_json(
        &[
            "set",
            "--temporal",
            "-i",
            &fixture("trip.json"),
            "--path",
            "speed",
            "--value",
            "0",
        ],
        None,
    );
    assert!(instant_values(&out).iter().all(|v| v["speed"] == json!(0)));
}

#[test]
fn temporal_concat_with_constant() {
    let out = run_json(
        &[
            "concat",
            "--temporal",
            "-i",
            &fixture("trip.json"),
            "--with",
            r#"{"unit":"kmh"}"#,
        ],
        None,
    );
    assert!(instant_values(&out).iter().all(|v| v["unit"] == "kmh"));
}

#[test]
fn temporal_concat_with_temporal_file() {
    let out = run_json(
        &[
            "concat",
            "--temporal",
            "-i",
            &fixture("trip.json"),
            "--with-file",
            &fixture("trip_extra.json"),
        ],
        None,
    );
    let lanes: Vec<Value> = instant_values(&out)
        .iter()
        .map(|v| v["lane"].clone())
        .collect();
    assert_eq!(lanes, vec![json!(1), json!(2), json!(2)]);
}

// ─────────────────────────────────────────────────────────────────────────────
// Errors
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn invalid_json_input_fails() {
    tjsonb()
        .args(["delete", "--key", "a"])
        .write_stdin("{not json")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse JSON document"));
}

#[test]
fn scalar_document_is_rejected() {
    tjsonb()
        .args(["set", "--path", "a", "--value", "1"])
        .write_stdin("42")
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot set path in scalar"));
}

#[test]
fn insert_on_existing_key_fails() {
    tjsonb()
        .args(["insert", "--path", "a", "--value", "1"])
        .write_stdin(r#"{"a":0}"#)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to insert at path"));
}

#[test]
fn invalid_temporal_input_fails() {
    tjsonb()
        .args(["delete", "--temporal", "--key", "a"])
        .write_stdin(r#"{"subtype":"Sequence","instants":[]}"#)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse temporal document"));
}

#[test]
fn temporal_concat_rejects_invalid_temporal_operand() {
    let unordered = r#"{"subtype":"Sequence","instants":[
        {"t":"2026-03-01T09:00:00Z","value":{"b":1}},
        {"t":"2026-03-01T08:00:00Z","value":{"b":2}}
    ]}"#;
    tjsonb()
        .args(["concat", "--temporal", "--with", unordered])
        .write_stdin(r#"{"subtype":"Instant","t":"2026-03-01T08:00:00Z","value":{"a":1}}"#)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse temporal operand"));
}

#[test]
fn temporal_concat_without_subtype_is_plain() {
    let out = run_json(
        &["concat", "--temporal", "--with", r#"{"instants":[]}"#],
        Some(r#"{"subtype":"Instant","t":"2026-03-01T08:00:00Z","value":{"a":1}}"#),
    );
    assert_eq!(out["value"], json!({"a": 1, "instants": []}));
}

#[test]
fn missing_input_file_fails() {
    tjsonb()
        .args(["delete", "-i", "/nonexistent/doc.json", "--key", "a"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read file"));
}

#[test]
fn concat_requires_an_operand() {
    tjsonb()
        .arg("concat")
        .write_stdin("{}")
        .assert()
        .failure();
}

#[test]
fn help_flag_shows_usage() {
    tjsonb()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("delete-path"))
        .stdout(predicate::str::contains("concat"));
}
