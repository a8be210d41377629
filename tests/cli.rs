use std::io::Write;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::NamedTempFile;

fn flow_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("create temp file");
    write!(file, "{contents}").expect("write temp file");
    file
}

#[test]
fn valid_pipeline_exits_success_and_dumps_ast() {
    let file = flow_file("a > worker >> out |: main\n");
    Command::cargo_bin("flowc")
        .unwrap()
        .arg(file.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Definition: main"))
        .stdout(predicate::str::contains("get workflow for"));
}

#[test]
fn missing_input_file_fails_with_usage_style_error() {
    Command::cargo_bin("flowc")
        .unwrap()
        .arg("/no/such/file.flow")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error:"));
}

#[test]
fn forbidden_pipe_in_worker_is_reported_but_exit_code_stays_zero() {
    let file = flow_file("a > w1 | w2 >> out |: main\n");
    Command::cargo_bin("flowc")
        .unwrap()
        .arg(file.path())
        .assert()
        .success()
        .stderr(predicate::str::contains("PARSER::ERROR"));
}

#[test]
fn definition_with_free_vars_yields_no_pure_functions_error_but_exit_code_stays_zero() {
    let file = flow_file("a > w >> out |: impure{fv}\n");
    Command::cargo_bin("flowc")
        .unwrap()
        .arg(file.path())
        .assert()
        .success()
        .stderr(predicate::str::contains("WORKFLOW::ERROR"))
        .stderr(predicate::str::contains("no pure functions to build found"));
}

#[test]
fn cross_pipeline_forward_reference_resolves() {
    let file = flow_file("{later > consumer; a > producer >> later} |: grouped\n");
    Command::cargo_bin("flowc")
        .unwrap()
        .arg(file.path())
        .assert()
        .success();
}

#[test]
fn repeated_numeric_argument_produces_distinct_pipes() {
    let file = flow_file("{7 > w1; 7 > w2} |: numeric\n");
    let output = Command::cargo_bin("flowc")
        .unwrap()
        .arg(file.path())
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.matches("numeric pipeline").count(), 2);
}
