//! Failure paths of the database-backed commands that need no database.
//!
//! Every command other than `check-env` loads the full configuration first,
//! so a broken environment fails before any connection is attempted.

#![allow(clippy::unwrap_used)]

mod common;

use common::{VALID_ENV, borrowed, mc_cli, stderr, stdout, valid_except, write_env_file};

#[test]
fn health_requires_valid_environment() {
    let dir = tempfile::tempdir().unwrap();
    let mut vars = valid_except("ENCRYPTION_KEY", None);
    vars.push(("RUST_LOG", "off".to_string()));

    let output = mc_cli(dir.path(), &borrowed(&vars), &["health"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("ENCRYPTION_KEY"), "{}", stderr(&output));
    assert!(stdout(&output).is_empty());
}

#[test]
fn commands_read_dotenv_from_working_directory() {
    let dir = tempfile::tempdir().unwrap();
    let vars = valid_except("JWT_SECRET", None);
    write_env_file(&dir.path().join(".env"), &borrowed(&vars));

    let output = mc_cli(dir.path(), &[], &["migrate"]);

    assert_eq!(output.status.code(), Some(1));
    let stderr = stderr(&output);
    assert!(stderr.contains("JWT_SECRET"), "{stderr}");
    assert!(!stderr.contains("APP_URL"), "{stderr}");
}

#[test]
fn shop_show_rejects_invalid_domain() {
    let dir = tempfile::tempdir().unwrap();

    let output = mc_cli(dir.path(), VALID_ENV, &["shop", "show", "not a domain"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("invalid shop domain"), "{}", stderr(&output));
}

#[test]
fn shop_upsert_rejects_malformed_assignment() {
    let dir = tempfile::tempdir().unwrap();

    let output = mc_cli(
        dir.path(),
        VALID_ENV,
        &["shop", "upsert", "shop.example.com", "--set", "no-equals"],
    );

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("KEY=VALUE"), "{}", stderr(&output));
}
