//! Application configuration loaded from environment variables.
//!
//! This is the Environment Guard: the whole environment is validated once at
//! boot, every failure is collected, and the caller decides how to exit.
//!
//! # Environment Variables
//!
//! ## Required
//! - `APP_URL` - Public URL of the app (must be an absolute URL)
//! - `DATABASE_URL` - `PostgreSQL` connection string
//! - `SHOPIFY_API_KEY` - Shopify app API key
//! - `SHOPIFY_API_SECRET` - Shopify app API secret
//! - `SHOPIFY_SCOPES` - Comma-separated OAuth scopes
//! - `WEBHOOK_SECRET` - Webhook signing secret
//! - `JWT_SECRET` - Session token signing secret (24+ chars recommended)
//! - `ENCRYPTION_KEY` - 32-byte key, hex or base64, for sealing offline tokens
//! - `MITTO_API_URL` - Mitto SMS API base URL
//! - `MITTO_API_KEY` - Mitto SMS API key
//!
//! ## Optional
//! - `PORT` - Listen port (default: 8080)
//! - `QUEUE_DRIVER` - `memory` or `redis` (default: memory)
//! - `REDIS_URL` - Redis connection string (required when `QUEUE_DRIVER=redis`)
//! - `NODE_ENV` - Deployment environment (default: development)
//! - `PCD_APPROVED` - Protected customer data approval flag (default: false)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use mitto_connect_core::QueueDriver;
use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;
use url::Url;

use crate::crypto;

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_NODE_ENV: &str = "development";
const MIN_JWT_SECRET_LENGTH: usize = 24;
const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;

/// Secrets checked for placeholder values and low entropy.
const STRENGTH_CHECKED_SECRETS: &[&str] = &[
    "SHOPIFY_API_SECRET",
    "WEBHOOK_SECRET",
    "JWT_SECRET",
    "MITTO_API_KEY",
];

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "secret",
    "password",
    "xxx",
    "todo",
    "fixme",
    "insert",
    "enter-",
    "put-your",
    "add-your",
];

const TRUE_VALUES: &[&str] = &["true", "t", "yes", "on", "1"];
const FALSE_VALUES: &[&str] = &["false", "f", "no", "off", "0"];

/// A single configuration failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Missing environment variable: REDIS_URL (required when QUEUE_DRIVER=redis)")]
    RedisUrlRequired,
    #[error("Failed to load env file {0}: {1}")]
    EnvFile(String, String),
}

impl ConfigError {
    /// Name of the variable (or file) this error is about.
    #[must_use]
    pub fn subject(&self) -> &str {
        match self {
            Self::MissingEnvVar(key) | Self::InvalidEnvVar(key, _) | Self::EnvFile(key, _) => key,
            Self::RedisUrlRequired => "REDIS_URL",
        }
    }
}

/// Every failure found while validating the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigErrors(Vec<ConfigError>);

impl ConfigErrors {
    /// The individual failures, in schema order.
    #[must_use]
    pub fn errors(&self) -> &[ConfigError] {
        &self.0
    }

    /// Whether any failure concerns `key`.
    #[must_use]
    pub fn mentions(&self, key: &str) -> bool {
        self.0.iter().any(|e| e.subject() == key)
    }
}

impl fmt::Display for ConfigErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid environment ({} problem", self.0.len())?;
        if self.0.len() != 1 {
            write!(f, "s")?;
        }
        write!(f, ")")?;
        for error in &self.0 {
            write!(f, "\n  - {error}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ConfigErrors {}

impl From<ConfigError> for ConfigErrors {
    fn from(error: ConfigError) -> Self {
        Self(vec![error])
    }
}

/// A non-fatal configuration warning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Advisory {
    /// Variable the advisory is about.
    pub var: &'static str,
    /// Human-readable explanation.
    pub message: String,
}

impl fmt::Display for Advisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.var, self.message)
    }
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Public URL of the app
    pub app_url: Url,
    /// Port to listen on
    pub port: u16,
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: SecretString,
    /// Shopify app credentials
    pub shopify: ShopifyConfig,
    /// Webhook signing secret
    pub webhook_secret: SecretString,
    /// Session token signing secret
    pub jwt_secret: SecretString,
    /// Key used to seal offline tokens (hex or base64)
    pub encryption_key: SecretString,
    /// Mitto SMS API configuration
    pub mitto: MittoConfig,
    /// Background queue configuration
    pub queue: QueueConfig,
    /// Deployment environment (`NODE_ENV`)
    pub environment: String,
    /// Whether protected customer data access has been approved
    pub pcd_approved: bool,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (falls back to `environment`)
    pub sentry_environment: Option<String>,
}

/// Shopify app credentials.
///
/// Implements `Debug` manually to redact the API secret.
#[derive(Clone)]
pub struct ShopifyConfig {
    /// App API key (public client ID)
    pub api_key: String,
    /// App API secret
    pub api_secret: SecretString,
    /// Requested OAuth scopes
    pub scopes: Vec<String>,
}

impl fmt::Debug for ShopifyConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShopifyConfig")
            .field("api_key", &self.api_key)
            .field("api_secret", &"[REDACTED]")
            .field("scopes", &self.scopes)
            .finish()
    }
}

/// Mitto SMS API configuration.
///
/// Implements `Debug` manually to redact the API key.
#[derive(Clone)]
pub struct MittoConfig {
    /// API base URL
    pub api_url: Url,
    /// API key
    pub api_key: SecretString,
}

impl fmt::Debug for MittoConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MittoConfig")
            .field("api_url", &self.api_url.as_str())
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

/// Queue backend configuration.
///
/// Implements `Debug` manually; Redis URLs usually carry a password.
#[derive(Clone)]
pub struct QueueConfig {
    /// Selected driver
    pub driver: QueueDriver,
    /// Redis connection string (only set when non-empty)
    pub redis_url: Option<SecretString>,
}

impl fmt::Debug for QueueConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueueConfig")
            .field("driver", &self.driver)
            .field("redis_url", &self.redis_url.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

/// Result of a successful environment check.
#[derive(Debug, Clone)]
pub struct GuardReport {
    /// The validated configuration.
    pub config: AppConfig,
    /// Non-fatal warnings.
    pub advisories: Vec<Advisory>,
}

/// Validate the environment and compute advisories in one step.
///
/// # Errors
///
/// Returns every configuration failure found.
pub fn check_environment<F>(lookup: F) -> Result<GuardReport, ConfigErrors>
where
    F: Fn(&str) -> Option<String>,
{
    let config = AppConfig::from_lookup(lookup)?;
    let advisories = config.advisories();
    Ok(GuardReport { config, advisories })
}

/// Load variables from a `.env` file into the process environment.
///
/// With no path, a `.env` in the working directory (or a parent) is loaded if
/// present. An explicit path must exist. Variables already set in the process
/// environment are never overridden.
///
/// # Errors
///
/// Returns `ConfigError::EnvFile` if an explicit file cannot be loaded.
pub fn load_dotenv(path: Option<&Path>) -> Result<(), ConfigError> {
    match path {
        Some(path) => dotenvy::from_path(path)
            .map_err(|e| ConfigError::EnvFile(path.display().to_string(), e.to_string())),
        None => {
            // Load .env file if present (ignore errors if not found)
            let _ = dotenvy::dotenv();
            Ok(())
        }
    }
}

impl AppConfig {
    /// Load configuration from the process environment.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigErrors` listing every missing or invalid variable.
    pub fn from_env() -> Result<Self, ConfigErrors> {
        load_dotenv(None)?;
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from a map of variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigErrors` listing every missing or invalid variable.
    pub fn from_map(vars: &HashMap<String, String>) -> Result<Self, ConfigErrors> {
        Self::from_lookup(|key| vars.get(key).cloned())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigErrors` listing every missing or invalid variable,
    /// including a violated `QUEUE_DRIVER=redis` / `REDIS_URL` pairing.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigErrors>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut env = EnvReader::new(lookup);

        let app_url = env.url("APP_URL");
        let port = env.port("PORT", DEFAULT_PORT);
        let database_url = env.required_secret("DATABASE_URL");
        let shopify_api_key = env.required("SHOPIFY_API_KEY");
        let shopify_api_secret = env.required_secret("SHOPIFY_API_SECRET");
        let shopify_scopes = env.required("SHOPIFY_SCOPES");
        let webhook_secret = env.required_secret("WEBHOOK_SECRET");
        let jwt_secret = env.required_secret("JWT_SECRET");
        let encryption_key = env.required_secret("ENCRYPTION_KEY");
        let mitto_api_url = env.url("MITTO_API_URL");
        let mitto_api_key = env.required_secret("MITTO_API_KEY");
        let queue_driver = env.choice("QUEUE_DRIVER", QueueDriver::default());
        let redis_url = env.optional("REDIS_URL");
        let environment = env.or_default("NODE_ENV", DEFAULT_NODE_ENV);
        let pcd_approved = env.boolean("PCD_APPROVED", false);
        let sentry_dsn = env.optional("SENTRY_DSN");
        let sentry_environment = env.optional("SENTRY_ENVIRONMENT");

        if queue_driver.is_some_and(QueueDriver::requires_redis) && redis_url.is_none() {
            env.fail(ConfigError::RedisUrlRequired);
        }

        let (
            Some(app_url),
            Some(port),
            Some(database_url),
            Some(shopify_api_key),
            Some(shopify_api_secret),
            Some(shopify_scopes),
            Some(webhook_secret),
            Some(jwt_secret),
            Some(encryption_key),
            Some(mitto_api_url),
            Some(mitto_api_key),
            Some(queue_driver),
            Some(pcd_approved),
        ) = (
            app_url,
            port,
            database_url,
            shopify_api_key,
            shopify_api_secret,
            shopify_scopes,
            webhook_secret,
            jwt_secret,
            encryption_key,
            mitto_api_url,
            mitto_api_key,
            queue_driver,
            pcd_approved,
        )
        else {
            return Err(env.into_errors());
        };

        if env.has_errors() {
            return Err(env.into_errors());
        }

        Ok(Self {
            app_url,
            port,
            database_url,
            shopify: ShopifyConfig {
                api_key: shopify_api_key,
                api_secret: shopify_api_secret,
                scopes: split_scopes(&shopify_scopes),
            },
            webhook_secret,
            jwt_secret,
            encryption_key,
            mitto: MittoConfig {
                api_url: mitto_api_url,
                api_key: mitto_api_key,
            },
            queue: QueueConfig {
                driver: queue_driver,
                redis_url: redis_url.map(SecretString::from),
            },
            environment,
            pcd_approved,
            sentry_dsn,
            sentry_environment,
        })
    }

    /// Whether the app runs in the `development` environment.
    #[must_use]
    pub fn is_development(&self) -> bool {
        self.environment == DEFAULT_NODE_ENV
    }

    /// Non-fatal configuration warnings.
    ///
    /// These never block startup; the guard logs them and carries on.
    #[must_use]
    pub fn advisories(&self) -> Vec<Advisory> {
        let mut advisories = Vec::new();

        if self.app_url.scheme() != "https" && !self.is_development() {
            advisories.push(Advisory {
                var: "APP_URL",
                message: format!(
                    "uses {}:// outside development (NODE_ENV={}); Shopify requires https",
                    self.app_url.scheme(),
                    self.environment
                ),
            });
        }

        let jwt_len = self.jwt_secret.expose_secret().chars().count();
        if jwt_len < MIN_JWT_SECRET_LENGTH {
            advisories.push(Advisory {
                var: "JWT_SECRET",
                message: format!(
                    "should be at least {MIN_JWT_SECRET_LENGTH} characters (got {jwt_len})"
                ),
            });
        }

        if let Err(e) = crypto::decode_key(self.encryption_key.expose_secret()) {
            advisories.push(Advisory {
                var: "ENCRYPTION_KEY",
                message: format!("{e}; offline tokens cannot be sealed"),
            });
        }

        let secrets = [
            &self.shopify.api_secret,
            &self.webhook_secret,
            &self.jwt_secret,
            &self.mitto.api_key,
        ];
        for (var, secret) in STRENGTH_CHECKED_SECRETS.iter().copied().zip(secrets) {
            if let Err(message) = validate_secret_strength(secret.expose_secret()) {
                advisories.push(Advisory { var, message });
            }
        }

        advisories
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Reads variables through a lookup and records every failure.
struct EnvReader<F> {
    lookup: F,
    errors: Vec<ConfigError>,
}

impl<F> EnvReader<F>
where
    F: Fn(&str) -> Option<String>,
{
    const fn new(lookup: F) -> Self {
        Self {
            lookup,
            errors: Vec::new(),
        }
    }

    fn fail(&mut self, error: ConfigError) {
        self.errors.push(error);
    }

    fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    fn into_errors(self) -> ConfigErrors {
        ConfigErrors(self.errors)
    }

    /// Get an optional variable. Empty values count as unset.
    fn optional(&self, key: &str) -> Option<String> {
        (self.lookup)(key).filter(|v| !v.is_empty())
    }

    /// Get a variable with a default value.
    fn or_default(&self, key: &str, default: &str) -> String {
        self.optional(key).unwrap_or_else(|| default.to_string())
    }

    /// Get a required, non-empty variable.
    fn required(&mut self, key: &str) -> Option<String> {
        let value = self.optional(key);
        if value.is_none() {
            self.fail(ConfigError::MissingEnvVar(key.to_string()));
        }
        value
    }

    /// Get a required variable as a secret.
    fn required_secret(&mut self, key: &str) -> Option<SecretString> {
        self.required(key).map(SecretString::from)
    }

    /// Get a required absolute URL.
    fn url(&mut self, key: &str) -> Option<Url> {
        let raw = self.required(key)?;
        match Url::parse(&raw) {
            Ok(url) if url.has_host() => Some(url),
            Ok(_) => {
                self.fail(ConfigError::InvalidEnvVar(
                    key.to_string(),
                    "URL must include a host".to_string(),
                ));
                None
            }
            Err(e) => {
                self.fail(ConfigError::InvalidEnvVar(key.to_string(), e.to_string()));
                None
            }
        }
    }

    /// Get a TCP port number (1-65535).
    fn port(&mut self, key: &str, default: u16) -> Option<u16> {
        let Some(raw) = self.optional(key) else {
            return Some(default);
        };
        match raw.parse::<u16>() {
            Ok(0) => {
                self.fail(ConfigError::InvalidEnvVar(
                    key.to_string(),
                    "port must be between 1 and 65535".to_string(),
                ));
                None
            }
            Ok(port) => Some(port),
            Err(e) => {
                self.fail(ConfigError::InvalidEnvVar(key.to_string(), e.to_string()));
                None
            }
        }
    }

    /// Get a boolean flag.
    fn boolean(&mut self, key: &str, default: bool) -> Option<bool> {
        let Some(raw) = self.optional(key) else {
            return Some(default);
        };
        match parse_bool(&raw) {
            Some(value) => Some(value),
            None => {
                self.fail(ConfigError::InvalidEnvVar(
                    key.to_string(),
                    format!("expected a boolean, got {raw:?}"),
                ));
                None
            }
        }
    }

    /// Get one of an enumerated set of values.
    fn choice<T>(&mut self, key: &str, default: T) -> Option<T>
    where
        T: std::str::FromStr<Err = String>,
    {
        let Some(raw) = self.optional(key) else {
            return Some(default);
        };
        match raw.parse::<T>() {
            Ok(value) => Some(value),
            Err(e) => {
                self.fail(ConfigError::InvalidEnvVar(key.to_string(), e));
                None
            }
        }
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    let lower = raw.trim().to_ascii_lowercase();
    if TRUE_VALUES.contains(&lower.as_str()) {
        Some(true)
    } else if FALSE_VALUES.contains(&lower.as_str()) {
        Some(false)
    } else {
        None
    }
}

fn split_scopes(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // String length will never exceed f64 precision
    let len = s.chars().count() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)] // Character count will never exceed f64 precision
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Check that a secret is not a placeholder and has sufficient entropy.
fn validate_secret_strength(secret: &str) -> Result<(), String> {
    let lower = secret.to_lowercase();

    if let Some(pattern) = PLACEHOLDER_PATTERNS.iter().find(|p| lower.contains(*p)) {
        return Err(format!("appears to be a placeholder (contains '{pattern}')"));
    }

    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(format!(
            "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1}). Use a randomly generated value."
        ));
    }

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const REQUIRED: &[&str] = &[
        "APP_URL",
        "DATABASE_URL",
        "SHOPIFY_API_KEY",
        "SHOPIFY_API_SECRET",
        "SHOPIFY_SCOPES",
        "WEBHOOK_SECRET",
        "JWT_SECRET",
        "ENCRYPTION_KEY",
        "MITTO_API_URL",
        "MITTO_API_KEY",
    ];

    fn valid_vars() -> HashMap<String, String> {
        [
            ("APP_URL", "https://sms.mitto-connect.io"),
            ("DATABASE_URL", "postgres://app:pw@localhost:5432/mitto"),
            ("SHOPIFY_API_KEY", "3f9a2c71d0b84e56"),
            ("SHOPIFY_API_SECRET", "aB3$xY9!mK2@nL5#pQ7&rT0*uW4^zC6"),
            ("SHOPIFY_SCOPES", "read_customers, write_orders,,read_products"),
            ("WEBHOOK_SECRET", "Zq8#Lw2!Hd5@Vn7$Rk1%Tb4^Gy6&Mj9*"),
            ("JWT_SECRET", "p7Q!x2Z@k9W#m4R$t1Y%v6U^b3N&c8"),
            (
                "ENCRYPTION_KEY",
                "00112233445566778899aabbccddeeff00112233445566778899aabbccddeeff",
            ),
            ("MITTO_API_URL", "https://rest.mittoapi.net"),
            ("MITTO_API_KEY", "Mt9$kQ2!zX7@pL4#wR1%vN6^hB3&"),
            ("NODE_ENV", "production"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
    }

    fn with(mut vars: HashMap<String, String>, key: &str, value: &str) -> HashMap<String, String> {
        vars.insert(key.to_string(), value.to_string());
        vars
    }

    #[test]
    fn test_valid_environment_applies_defaults() {
        let config = AppConfig::from_map(&valid_vars()).unwrap();

        assert_eq!(config.port, 8080);
        assert_eq!(config.queue.driver, QueueDriver::Memory);
        assert!(config.queue.redis_url.is_none());
        assert!(!config.pcd_approved);
        assert_eq!(config.environment, "production");
        assert_eq!(
            config.shopify.scopes,
            vec!["read_customers", "write_orders", "read_products"]
        );
        assert_eq!(config.mitto.api_url.host_str(), Some("rest.mittoapi.net"));
    }

    #[test]
    fn test_node_env_defaults_to_development() {
        let mut vars = valid_vars();
        vars.remove("NODE_ENV");
        let config = AppConfig::from_map(&vars).unwrap();
        assert!(config.is_development());
    }

    #[test]
    fn test_each_missing_required_key_is_reported() {
        for key in REQUIRED {
            let mut vars = valid_vars();
            vars.remove(*key);
            let errors = AppConfig::from_map(&vars).unwrap_err();
            assert!(errors.mentions(key), "{key} not reported: {errors}");
            assert!(errors.to_string().contains(key));
        }
    }

    #[test]
    fn test_empty_required_value_counts_as_missing() {
        let vars = with(valid_vars(), "DATABASE_URL", "");
        let errors = AppConfig::from_map(&vars).unwrap_err();
        assert_eq!(
            errors.errors(),
            &[ConfigError::MissingEnvVar("DATABASE_URL".to_string())]
        );
    }

    #[test]
    fn test_all_failures_are_collected() {
        let mut vars = valid_vars();
        vars.remove("JWT_SECRET");
        vars.remove("MITTO_API_KEY");
        vars.insert("PORT".to_string(), "not-a-port".to_string());

        let errors = AppConfig::from_map(&vars).unwrap_err();
        assert_eq!(errors.errors().len(), 3);
        assert!(errors.mentions("JWT_SECRET"));
        assert!(errors.mentions("MITTO_API_KEY"));
        assert!(errors.mentions("PORT"));
        assert!(errors.to_string().starts_with("invalid environment (3 problems)"));
    }

    #[test]
    fn test_redis_driver_requires_redis_url() {
        let vars = with(valid_vars(), "QUEUE_DRIVER", "redis");
        let errors = AppConfig::from_map(&vars).unwrap_err();
        assert_eq!(errors.errors(), &[ConfigError::RedisUrlRequired]);
        assert!(errors.to_string().contains("REDIS_URL"));

        let vars = with(vars, "REDIS_URL", "");
        assert!(AppConfig::from_map(&vars).unwrap_err().mentions("REDIS_URL"));
    }

    #[test]
    fn test_redis_driver_with_url() {
        let vars = with(valid_vars(), "QUEUE_DRIVER", "redis");
        let vars = with(vars, "REDIS_URL", "redis://:pw@localhost:6379/0");
        let config = AppConfig::from_map(&vars).unwrap();
        assert_eq!(config.queue.driver, QueueDriver::Redis);
        assert!(config.queue.redis_url.is_some());
    }

    #[test]
    fn test_invalid_queue_driver() {
        let vars = with(valid_vars(), "QUEUE_DRIVER", "kafka");
        let errors = AppConfig::from_map(&vars).unwrap_err();
        assert!(errors.mentions("QUEUE_DRIVER"));
        assert!(errors.to_string().contains("memory, redis"));
    }

    #[test]
    fn test_port_validation() {
        let config = AppConfig::from_map(&with(valid_vars(), "PORT", "3000")).unwrap();
        assert_eq!(config.port, 3000);

        for bad in ["0", "65536", "http", "-1"] {
            let errors = AppConfig::from_map(&with(valid_vars(), "PORT", bad)).unwrap_err();
            assert!(errors.mentions("PORT"), "PORT={bad} accepted");
        }
    }

    #[test]
    fn test_url_validation() {
        for bad in ["not a url", "localhost:3000", "/relative/path"] {
            let errors = AppConfig::from_map(&with(valid_vars(), "APP_URL", bad)).unwrap_err();
            assert!(errors.mentions("APP_URL"), "APP_URL={bad} accepted");
        }
    }

    #[test]
    fn test_boolean_parsing() {
        for (raw, expected) in [("true", true), ("YES", true), ("1", true), ("off", false)] {
            let config = AppConfig::from_map(&with(valid_vars(), "PCD_APPROVED", raw)).unwrap();
            assert_eq!(config.pcd_approved, expected, "PCD_APPROVED={raw}");
        }

        let errors = AppConfig::from_map(&with(valid_vars(), "PCD_APPROVED", "maybe")).unwrap_err();
        assert!(errors.mentions("PCD_APPROVED"));
    }

    #[test]
    fn test_clean_environment_has_no_advisories() {
        let report = check_environment(|key| valid_vars().get(key).cloned()).unwrap();
        assert!(report.advisories.is_empty(), "{:?}", report.advisories);
    }

    #[test]
    fn test_insecure_app_url_outside_development() {
        let vars = with(valid_vars(), "APP_URL", "http://sms.mitto-connect.io");
        let advisories = AppConfig::from_map(&vars).unwrap().advisories();
        assert!(advisories.iter().any(|a| a.var == "APP_URL"));

        let vars = with(vars, "NODE_ENV", "development");
        let advisories = AppConfig::from_map(&vars).unwrap().advisories();
        assert!(!advisories.iter().any(|a| a.var == "APP_URL"));
    }

    #[test]
    fn test_short_jwt_secret_is_advisory() {
        let vars = with(valid_vars(), "JWT_SECRET", "k9W#m4R$t1Y%");
        let advisories = AppConfig::from_map(&vars).unwrap().advisories();
        assert!(
            advisories
                .iter()
                .any(|a| a.var == "JWT_SECRET" && a.message.contains("at least 24"))
        );
    }

    #[test]
    fn test_malformed_encryption_key_is_advisory() {
        let vars = with(valid_vars(), "ENCRYPTION_KEY", "too-short");
        let advisories = AppConfig::from_map(&vars).unwrap().advisories();
        assert!(advisories.iter().any(|a| a.var == "ENCRYPTION_KEY"));
    }

    #[test]
    fn test_placeholder_secret_is_advisory() {
        let vars = with(valid_vars(), "WEBHOOK_SECRET", "changeme-webhook");
        let advisories = AppConfig::from_map(&vars).unwrap().advisories();
        let advisory = advisories.iter().find(|a| a.var == "WEBHOOK_SECRET").unwrap();
        assert!(advisory.message.contains("placeholder"));
        assert_eq!(
            advisory.to_string(),
            "WEBHOOK_SECRET: appears to be a placeholder (contains 'changeme')"
        );
    }

    #[test]
    fn test_config_debug_redacts_secrets() {
        let config = AppConfig::from_map(&valid_vars()).unwrap();
        let debug_output = format!("{config:?}");

        assert!(debug_output.contains("3f9a2c71d0b84e56"));
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("aB3$xY9!mK2@nL5#pQ7&rT0*uW4^zC6"));
        assert!(!debug_output.contains("Mt9$kQ2!zX7@pL4#wR1%vN6^hB3&"));
        assert!(!debug_output.contains("00112233445566778899aabbccddeeff"));
    }

    #[test]
    fn test_queue_config_debug_redacts_redis_url() {
        let queue = QueueConfig {
            driver: QueueDriver::Redis,
            redis_url: Some(SecretString::from("redis://:hunter2@cache:6379")),
        };
        let debug_output = format!("{queue:?}");
        assert!(debug_output.contains("Redis"));
        assert!(!debug_output.contains("hunter2"));
    }

    #[test]
    fn test_load_dotenv_missing_explicit_file() {
        let err = load_dotenv(Some(Path::new("/nonexistent/mitto.env"))).unwrap_err();
        assert!(matches!(err, ConfigError::EnvFile(_, _)));
        assert_eq!(err.subject(), "/nonexistent/mitto.env");
    }

    #[test]
    fn test_shannon_entropy_empty() {
        assert!((shannon_entropy("") - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_shannon_entropy_single_char() {
        assert!((shannon_entropy("aaaaaaa") - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_shannon_entropy_two_chars() {
        let entropy = shannon_entropy("ab");
        assert!((entropy - 1.0).abs() < 0.01);
    }

    #[test]
    fn test_validate_secret_strength() {
        assert!(validate_secret_strength("your-api-key-here").is_err());
        assert!(validate_secret_strength("aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa").is_err());
        assert!(validate_secret_strength("aB3$xY9!mK2@nL5#pQ7&rT0*uW4^zC6").is_ok());
    }
}
