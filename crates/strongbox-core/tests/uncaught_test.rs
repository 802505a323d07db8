//! Tests for errors that no region catches.
//!
//! An uncaught error ends the process, so each scenario re-runs this test
//! binary filtered to a single test, with `SCENARIO_ENV` telling the child
//! which error to throw.

use std::env;
use std::process::{Command, Output};

use strongbox_core::errors::*;
use strongbox_core::{throw, throw_code};

const SCENARIO_ENV: &str = "STRONGBOX_UNCAUGHT_SCENARIO";

static TEST_CHILD_ERROR: ErrorType = ErrorType::new(200, "TestChildError", false, &RUNTIME_ERROR);

/// Scenario name when running as the child process.
fn is_child() -> Option<String> {
    env::var(SCENARIO_ENV).ok()
}

fn run_child(test_name: &str, scenario: &str) -> Output {
    let exe = env::current_exe().expect("test binary path");

    Command::new(exe)
        .args([test_name, "--exact", "--nocapture", "--test-threads=1"])
        .env(SCENARIO_ENV, scenario)
        .output()
        .expect("spawn test binary")
}

fn scenario(name: &str) {
    match name {
        "child" => {
            region(|| {
                throw!(TEST_CHILD_ERROR, "does not get caught!");
            })
            .catch(&FORMAT_ERROR, |_| eprintln!("wrong catch ran"))
            .finally(|| eprintln!("finally ran"))
            .run();
        }
        "assert" => {
            region(|| {
                throw!(ASSERT_ERROR, "fatal and unhandled");
            })
            .catch_any(|_| eprintln!("wrong catch ran"))
            .run();
        }
        "unknown" => throw_code!(777, "no such code"),
        "top_level" => throw!(CHECKSUM_ERROR, "thrown outside any region"),
        other => panic!("unknown scenario {other}"),
    }

    eprintln!("scenario returned");
}

#[test]
fn uncaught_error_exits_with_its_code() {
    if let Some(name) = is_child() {
        scenario(&name);
        return;
    }

    let output = run_child("uncaught_error_exits_with_its_code", "child");
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert_eq!(output.status.code(), Some(200), "stderr: {stderr}");
    assert!(stderr.contains("Uncaught TestChildError: does not get caught!"));
    assert!(stderr.contains("uncaught_test.rs"));
    assert!(stderr.contains("finally ran"));
    assert!(!stderr.contains("wrong catch ran"));
    assert!(!stderr.contains("scenario returned"));
}

#[test]
fn uncaught_fatal_error_exits_with_its_code() {
    if let Some(name) = is_child() {
        scenario(&name);
        return;
    }

    let output = run_child("uncaught_fatal_error_exits_with_its_code", "assert");
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert_eq!(output.status.code(), Some(25), "stderr: {stderr}");
    assert!(stderr.contains("Uncaught AssertError: fatal and unhandled"));
    assert!(!stderr.contains("wrong catch ran"));
}

#[test]
fn uncaught_unknown_code_exits_as_unknown_error() {
    if let Some(name) = is_child() {
        scenario(&name);
        return;
    }

    let output = run_child("uncaught_unknown_code_exits_as_unknown_error", "unknown");
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert_eq!(output.status.code(), Some(125), "stderr: {stderr}");
    assert!(stderr.contains("Uncaught UnknownError: no such code"));
}

#[test]
fn throw_outside_any_region_exits_immediately() {
    if let Some(name) = is_child() {
        scenario(&name);
        return;
    }

    let output = run_child("throw_outside_any_region_exits_immediately", "top_level");
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert_eq!(output.status.code(), Some(26), "stderr: {stderr}");
    assert!(stderr.contains("Uncaught ChecksumError: thrown outside any region"));
    assert!(stderr.contains("(scenario)"));
}
