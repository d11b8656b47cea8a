//! `mc-cli check-env` exit codes and reporting.
//!
//! Each case runs the binary with a cleared environment from an empty
//! temporary directory, so no developer `.env` leaks in.

#![allow(clippy::unwrap_used)]

mod common;

use std::path::Path;
use std::process::Output;

use common::{VALID_ENV, borrowed, stderr, valid_except, write_env_file};

fn check_env(dir: &Path, vars: &[(&str, &str)], extra_args: &[&str]) -> Output {
    let mut args = extra_args.to_vec();
    args.push("check-env");
    common::mc_cli(dir, vars, &args)
}

#[test]
fn valid_environment_exits_zero() {
    let dir = tempfile::tempdir().unwrap();
    let output = check_env(dir.path(), VALID_ENV, &[]);

    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));
}

#[test]
fn missing_required_variable_exits_one() {
    let dir = tempfile::tempdir().unwrap();
    let vars = valid_except("JWT_SECRET", None);
    let output = check_env(dir.path(), &borrowed(&vars), &[]);

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("JWT_SECRET"));
}

#[test]
fn every_problem_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let output = check_env(dir.path(), &[("NODE_ENV", "production")], &[]);

    assert_eq!(output.status.code(), Some(1));
    let stderr = stderr(&output);
    for key in ["APP_URL", "DATABASE_URL", "ENCRYPTION_KEY", "MITTO_API_KEY"] {
        assert!(stderr.contains(key), "{key} not reported in: {stderr}");
    }
}

#[test]
fn redis_driver_without_url_exits_one() {
    let dir = tempfile::tempdir().unwrap();
    let mut vars = valid_except("REDIS_URL", Some(""));
    vars.push(("QUEUE_DRIVER", "redis".to_string()));
    let output = check_env(dir.path(), &borrowed(&vars), &[]);

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("REDIS_URL"));
}

#[test]
fn redis_driver_with_url_exits_zero() {
    let dir = tempfile::tempdir().unwrap();
    let mut vars = valid_except("REDIS_URL", Some("redis://localhost:6379"));
    vars.push(("QUEUE_DRIVER", "redis".to_string()));
    let output = check_env(dir.path(), &borrowed(&vars), &[]);

    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));
}

#[test]
fn advisories_do_not_fail_the_check() {
    let dir = tempfile::tempdir().unwrap();
    let vars = valid_except("APP_URL", Some("http://sms.mitto-connect.io"));
    let output = check_env(dir.path(), &borrowed(&vars), &[]);

    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));
    assert!(stderr(&output).contains("APP_URL"));
}

#[test]
fn env_file_supplies_variables() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("deploy.env");
    write_env_file(&path, VALID_ENV);

    let output = check_env(dir.path(), &[], &["--env-file", path.to_str().unwrap()]);

    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));
}

#[test]
fn missing_env_file_exits_one() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.env");

    let output = check_env(dir.path(), VALID_ENV, &["--env-file", path.to_str().unwrap()]);

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("absent.env"));
}

#[test]
fn failure_is_reported_whatever_rust_log_says() {
    for filter in ["sqlx=debug", "off"] {
        let dir = tempfile::tempdir().unwrap();
        let mut vars = valid_except("JWT_SECRET", None);
        vars.push(("RUST_LOG", filter.to_string()));
        let output = check_env(dir.path(), &borrowed(&vars), &[]);

        assert_eq!(output.status.code(), Some(1));
        assert!(
            stderr(&output).contains("JWT_SECRET"),
            "RUST_LOG={filter} hid the failure: {}",
            stderr(&output)
        );
    }
}

#[test]
fn env_file_failure_is_reported_with_logging_off() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.env");
    let mut vars = VALID_ENV.to_vec();
    vars.push(("RUST_LOG", "off"));

    let output = check_env(dir.path(), &vars, &["--env-file", path.to_str().unwrap()]);

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("absent.env"));
}

#[test]
fn env_file_log_filter_is_applied() {
    let dir = tempfile::tempdir().unwrap();
    let mut vars = valid_except("APP_URL", Some("http://sms.mitto-connect.io"));
    vars.push(("RUST_LOG", "off".to_string()));
    let path = dir.path().join("deploy.env");
    write_env_file(&path, &borrowed(&vars));

    let output = check_env(dir.path(), &[], &["--env-file", path.to_str().unwrap()]);

    assert_eq!(output.status.code(), Some(0));
    assert!(
        !stderr(&output).contains("APP_URL"),
        "advisory logged despite RUST_LOG=off in the env file: {}",
        stderr(&output)
    );
}
