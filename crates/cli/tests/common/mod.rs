//! Helpers for running the built `mc-cli` binary.

#![allow(clippy::unwrap_used, dead_code)]

use std::path::Path;
use std::process::{Command, Output};

pub const VALID_ENV: &[(&str, &str)] = &[
    ("APP_URL", "https://sms.mitto-connect.io"),
    ("DATABASE_URL", "postgres://app:pw@localhost:5432/mitto"),
    ("SHOPIFY_API_KEY", "3f9a2c71d0b84e56"),
    ("SHOPIFY_API_SECRET", "aB3$xY9!mK2@nL5#pQ7&rT0*uW4^zC6"),
    ("SHOPIFY_SCOPES", "read_customers,write_orders"),
    ("WEBHOOK_SECRET", "Zq8#Lw2!Hd5@Vn7$Rk1%Tb4^Gy6&Mj9*"),
    ("JWT_SECRET", "p7Q!x2Z@k9W#m4R$t1Y%v6U^b3N&c8"),
    (
        "ENCRYPTION_KEY",
        "00112233445566778899aabbccddeeff00112233445566778899aabbccddeeff",
    ),
    ("MITTO_API_URL", "https://rest.mittoapi.net"),
    ("MITTO_API_KEY", "Mt9$kQ2!zX7@pL4#wR1%vN6^hB3&"),
    ("NODE_ENV", "production"),
];

/// Run `mc-cli` with only `vars` in its environment, from `dir`.
pub fn mc_cli(dir: &Path, vars: &[(&str, &str)], args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_mc-cli"))
        .args(args)
        .env_clear()
        .env("NO_COLOR", "1")
        .envs(vars.iter().copied())
        .current_dir(dir)
        .output()
        .unwrap()
}

/// [`VALID_ENV`] without `key`, optionally re-added with `value`.
pub fn valid_except(key: &'static str, value: Option<&str>) -> Vec<(&'static str, String)> {
    let mut vars: Vec<(&'static str, String)> = VALID_ENV
        .iter()
        .filter(|(k, _)| *k != key)
        .map(|(k, v)| (*k, (*v).to_string()))
        .collect();
    if let Some(value) = value {
        vars.push((key, value.to_string()));
    }
    vars
}

pub fn borrowed<'a>(vars: &'a [(&'static str, String)]) -> Vec<(&'a str, &'a str)> {
    vars.iter().map(|(k, v)| (*k, v.as_str())).collect()
}

/// Write `vars` as a dotenv file at `path`.
pub fn write_env_file(path: &Path, vars: &[(&str, &str)]) {
    let contents: String = vars.iter().map(|(k, v)| format!("{k}='{v}'\n")).collect();
    std::fs::write(path, contents).unwrap();
}

pub fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

pub fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}
