//! Application configuration.
//!
//! Loaded from a TOML file, then overridden field by field from the
//! environment. Secrets usually arrive through the environment only.

use crate::error::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use taker_executor::MAX_BOUNDARY_SECS;
use taker_venue::VenueEnvironment;

/// Config path used when neither `--config` nor `FSPD_TAKER_CONFIG` is set.
pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// Environment variable naming the config file.
pub const CONFIG_PATH_ENV: &str = "FSPD_TAKER_CONFIG";

/// Environment variables that override file values.
pub mod env_vars {
    pub const ENVIRONMENT: &str = "PARADIGM_ENVIRONMENT";
    pub const LOG_LEVEL: &str = "LOGGING_LEVEL";
    pub const ACCOUNT_NAME: &str = "PARADIGM_TAKER_ACCOUNT_NAME";
    pub const ACCESS_KEY: &str = "PARADIGM_TAKER_ACCESS_KEY";
    pub const SECRET_KEY: &str = "PARADIGM_TAKER_SECRET_KEY";
    pub const ORDERS_PER_SIDE: &str = "ORDER_NUMBER_PER_STRATEGY";
    pub const LOWER_BOUNDARY: &str = "ORDER_SUBMISSION_LOWER_BOUNDARY";
    pub const UPPER_BOUNDARY: &str = "ORDER_SUBMISSION_HIGHER_BOUNDARY";
}

/// Pause between submission rounds, in seconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmissionConfig {
    /// Lower bound of the jittered pause. Default: 1.
    #[serde(default = "default_boundary_secs")]
    pub lower_boundary_secs: f64,
    /// Upper bound of the jittered pause. Default: 1.
    #[serde(default = "default_boundary_secs")]
    pub upper_boundary_secs: f64,
}

fn default_boundary_secs() -> f64 {
    1.0
}

impl Default for SubmissionConfig {
    fn default() -> Self {
        Self {
            lower_boundary_secs: default_boundary_secs(),
            upper_boundary_secs: default_boundary_secs(),
        }
    }
}

/// HTTP client settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Per-request timeout (ms). Default: 10,000.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_timeout_ms() -> u64 {
    10_000
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl HttpConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Logging and metrics settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetryConfig {
    /// Default log level when `RUST_LOG` is unset. Default: "info".
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Port for `GET /metrics`. 0 disables the endpoint.
    #[serde(default)]
    pub metrics_port: u16,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            metrics_port: 0,
        }
    }
}

/// Main application configuration.
#[derive(Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Venue environment selector (e.g. "TEST", "PROD"). Default: "TEST".
    #[serde(default = "default_environment")]
    pub environment: String,

    /// Explicit REST base URL; overrides the one derived from `environment`.
    #[serde(default)]
    pub base_url: Option<String>,

    #[serde(default)]
    pub account_name: String,

    #[serde(default)]
    pub access_key: String,

    /// Base64-encoded signing secret.
    #[serde(default)]
    pub secret_key: String,

    /// Orders per side per strategy. Validated but not applied: each strategy
    /// always gets exactly one BUY and one SELL.
    #[serde(default = "default_orders_per_side")]
    pub orders_per_side: u32,

    #[serde(default)]
    pub submission: SubmissionConfig,

    #[serde(default)]
    pub http: HttpConfig,

    #[serde(default)]
    pub telemetry: TelemetryConfig,

    /// Stop after this many rounds. Unlimited when unset.
    #[serde(default)]
    pub max_rounds: Option<u64>,
}

fn default_environment() -> String {
    VenueEnvironment::default().as_str().to_string()
}

fn default_orders_per_side() -> u32 {
    1
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            environment: default_environment(),
            base_url: None,
            account_name: String::new(),
            access_key: String::new(),
            secret_key: String::new(),
            orders_per_side: default_orders_per_side(),
            submission: SubmissionConfig::default(),
            http: HttpConfig::default(),
            telemetry: TelemetryConfig::default(),
            max_rounds: None,
        }
    }
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("environment", &self.environment)
            .field("base_url", &self.base_url)
            .field("account_name", &self.account_name)
            .field("access_key", &redact(&self.access_key))
            .field("secret_key", &redact(&self.secret_key))
            .field("orders_per_side", &self.orders_per_side)
            .field("submission", &self.submission)
            .field("http", &self.http)
            .field("telemetry", &self.telemetry)
            .field("max_rounds", &self.max_rounds)
            .finish()
    }
}

fn redact(secret: &str) -> &'static str {
    if secret.is_empty() {
        "<unset>"
    } else {
        "<redacted>"
    }
}

impl AppConfig {
    /// Pick the config path: CLI arg > `FSPD_TAKER_CONFIG` > default.
    pub fn resolve_path(cli_path: Option<String>) -> String {
        cli_path
            .or_else(|| std::env::var(CONFIG_PATH_ENV).ok())
            .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string())
    }

    /// Load from `path` (defaults if the file does not exist), then apply
    /// environment overrides.
    ///
    /// Runs before logging is initialized, so the caller reports a missing
    /// file (see [`AppConfig::file_exists`]).
    pub fn load(path: &str) -> AppResult<Self> {
        let mut config = if Self::file_exists(path) {
            Self::from_file(path)?
        } else {
            Self::default()
        };
        config.apply_env_overrides()?;
        Ok(config)
    }

    pub fn file_exists(path: &str) -> bool {
        Path::new(path).is_file()
    }

    /// Load configuration from a specific file.
    pub fn from_file(path: &str) -> AppResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| AppError::Config(format!("Failed to read config: {e}")))?;

        toml::from_str(&content)
            .map_err(|e| AppError::Config(format!("Failed to parse config: {e}")))
    }

    /// Override fields from the process environment.
    pub fn apply_env_overrides(&mut self) -> AppResult<()> {
        self.apply_overrides(|name| std::env::var(name).ok())
    }

    /// Override fields from an arbitrary variable lookup.
    ///
    /// Empty values are ignored. Unparseable numbers are errors.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> AppResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(v) = get(env_vars::ENVIRONMENT) {
            self.environment = v;
        }
        if let Some(v) = get(env_vars::LOG_LEVEL) {
            self.telemetry.log_level = v;
        }
        if let Some(v) = get(env_vars::ACCOUNT_NAME) {
            self.account_name = v;
        }
        if let Some(v) = get(env_vars::ACCESS_KEY) {
            self.access_key = v;
        }
        if let Some(v) = get(env_vars::SECRET_KEY) {
            self.secret_key = v;
        }
        if let Some(v) = get(env_vars::ORDERS_PER_SIDE) {
            self.orders_per_side = parse_var(env_vars::ORDERS_PER_SIDE, &v)?;
        }
        if let Some(v) = get(env_vars::LOWER_BOUNDARY) {
            self.submission.lower_boundary_secs = parse_var(env_vars::LOWER_BOUNDARY, &v)?;
        }
        if let Some(v) = get(env_vars::UPPER_BOUNDARY) {
            self.submission.upper_boundary_secs = parse_var(env_vars::UPPER_BOUNDARY, &v)?;
        }
        Ok(())
    }

    /// Check that the configuration can drive a run.
    pub fn validate(&self) -> AppResult<()> {
        if self.account_name.trim().is_empty() {
            return Err(AppError::Config("account_name is required".to_string()));
        }
        if self.access_key.trim().is_empty() {
            return Err(AppError::Config("access_key is required".to_string()));
        }
        if self.secret_key.trim().is_empty() {
            return Err(AppError::Config("secret_key is required".to_string()));
        }
        if self.orders_per_side < 1 {
            return Err(AppError::Config(
                "orders_per_side must be at least 1".to_string(),
            ));
        }

        let lower = self.submission.lower_boundary_secs;
        let upper = self.submission.upper_boundary_secs;
        if !lower.is_finite() || !upper.is_finite() {
            return Err(AppError::Config(format!(
                "submission boundaries must be finite (lower={lower}, upper={upper})"
            )));
        }
        if lower < 0.0 {
            return Err(AppError::Config(format!(
                "submission lower boundary {lower} is negative"
            )));
        }
        if lower > upper {
            return Err(AppError::Config(format!(
                "submission lower boundary {lower} exceeds upper boundary {upper}"
            )));
        }
        if upper > MAX_BOUNDARY_SECS {
            return Err(AppError::Config(format!(
                "submission upper boundary {upper} exceeds {MAX_BOUNDARY_SECS} seconds"
            )));
        }
        if self.http.timeout_ms == 0 {
            return Err(AppError::Config("http.timeout_ms must be positive".to_string()));
        }

        self.venue_environment()?;
        Ok(())
    }

    /// Parsed venue environment.
    pub fn venue_environment(&self) -> AppResult<VenueEnvironment> {
        self.environment
            .parse()
            .map_err(|e| AppError::Config(format!("Invalid environment: {e}")))
    }

    /// REST base URL: explicit `base_url`, else derived from `environment`.
    pub fn base_url(&self) -> AppResult<String> {
        match &self.base_url {
            Some(url) if !url.trim().is_empty() => Ok(url.trim().to_string()),
            _ => Ok(self.venue_environment()?.base_url()),
        }
    }
}

fn parse_var<T>(name: &str, value: &str) -> AppResult<T>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e| AppError::Config(format!("{name}={value:?} is invalid: {e}")))
}
