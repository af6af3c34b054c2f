//! Application configuration module
//!
//! Configuration is read once at process start and handed to the components
//! that need it. Values come from an optional TOML file and are overridden by
//! environment variables using the same (case-insensitive) key names.
//!
//! | Key                 | Required | Default |
//! |---------------------|----------|---------|
//! | `APP_NAME`          | yes      |         |
//! | `JWT_SECRET_KEY`    | yes      |         |
//! | `HTTP_PORT`         | no       | 8080    |
//! | `JWT_LOGIN_EXP`     | no       | 24 (hours) |
//! | `JWT_REFRESH_EXP`   | no       | 7 (days) |
//! | `BCRYPT_COST`       | no       | 12      |
//! | `DATABASE_URL`      | no       | in-memory stores |
//! | `DB_MAX_OPEN_CONNS` | no       | 20      |

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use chrono::Duration;
use thiserror::Error;

/// Config file looked up in the working directory when `CONFIG_PATH` is unset
pub const DEFAULT_CONFIG_FILE: &str = "config.toml";
pub const DEFAULT_HTTP_PORT: u16 = 8080;
pub const DEFAULT_ACCESS_HOURS: i64 = 24;
pub const DEFAULT_REFRESH_DAYS: i64 = 7;
pub const DEFAULT_PASSWORD_COST: u32 = 12;
pub const DEFAULT_MAX_CONNECTIONS: u32 = 20;
/// Upper bound for either validity window
pub const MAX_VALIDITY_DAYS: i64 = 3650;

/// Shared HMAC signing secret.
///
/// The value is only reachable through [`JwtSecret::as_bytes`]; `Debug`
/// never prints it.
#[derive(Clone)]
pub struct JwtSecret(String);

impl JwtSecret {
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for JwtSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("JwtSecret(***)")
    }
}

/// Token signing configuration
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Signing secret shared by every token this process issues
    pub secret: JwtSecret,
    /// Access token validity window
    pub access_ttl: Duration,
    /// Refresh token validity window (never shorter than `access_ttl`)
    pub refresh_ttl: Duration,
}

/// Database connection settings
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// PostgreSQL URL; `None` runs the service on in-memory stores
    pub url: Option<String>,
    /// Pool size
    pub max_connections: u32,
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Service name, embedded as the issuer of every token
    pub app_name: String,
    /// Listening port
    pub http_port: u16,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    /// bcrypt work factor
    pub password_cost: u32,
}

impl AppConfig {
    /// Create a new AppConfigBuilder
    pub fn builder() -> AppConfigBuilder {
        AppConfigBuilder::default()
    }

    /// Issuer string written into token claims
    pub fn issuer(&self) -> &str {
        &self.app_name
    }

    /// Load from `CONFIG_PATH` (or `config.toml` if present) plus environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        let path = std::env::var("CONFIG_PATH")
            .ok()
            .map(PathBuf::from)
            .or_else(|| {
                let default = PathBuf::from(DEFAULT_CONFIG_FILE);
                default.exists().then_some(default)
            });
        Self::load(path.as_deref())
    }

    /// Load from an optional TOML file, with environment variables taking
    /// precedence over file values.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let file = match path {
            Some(path) => read_config_file(path)?,
            None => BTreeMap::new(),
        };
        Self::from_sources(file, |key| std::env::var(key).ok())
    }

    fn from_sources<F>(file: BTreeMap<String, String>, env: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let sources = Sources { file, env };

        let http_port = sources.get_int_or_default("HTTP_PORT", i64::from(DEFAULT_HTTP_PORT));
        let http_port = u16::try_from(http_port).map_err(|_| ConfigError::InvalidValue {
            key: "HTTP_PORT",
            message: format!("{} is not a valid port", http_port),
        })?;

        let password_cost = sources.get_int_or_default("BCRYPT_COST", i64::from(DEFAULT_PASSWORD_COST));
        let max_connections =
            sources.get_int_or_default("DB_MAX_OPEN_CONNS", i64::from(DEFAULT_MAX_CONNECTIONS));

        let access_hours = sources.get_int_or_default("JWT_LOGIN_EXP", DEFAULT_ACCESS_HOURS);
        let access_ttl = Duration::try_hours(access_hours).ok_or_else(|| ConfigError::InvalidValue {
            key: "JWT_LOGIN_EXP",
            message: format!("{} hours is out of range", access_hours),
        })?;
        let refresh_days = sources.get_int_or_default("JWT_REFRESH_EXP", DEFAULT_REFRESH_DAYS);
        let refresh_ttl = Duration::try_days(refresh_days).ok_or_else(|| ConfigError::InvalidValue {
            key: "JWT_REFRESH_EXP",
            message: format!("{} days is out of range", refresh_days),
        })?;

        let config = AppConfig {
            app_name: sources.get_string_or_err("APP_NAME")?,
            http_port,
            database: DatabaseConfig {
                url: sources.get_string("DATABASE_URL").filter(|url| !url.is_empty()),
                max_connections: u32::try_from(max_connections).map_err(|_| ConfigError::InvalidValue {
                    key: "DB_MAX_OPEN_CONNS",
                    message: format!("{} is out of range", max_connections),
                })?,
            },
            jwt: JwtConfig {
                secret: JwtSecret::new(sources.get_string_or_err("JWT_SECRET_KEY")?),
                access_ttl,
                refresh_ttl,
            },
            password_cost: u32::try_from(password_cost).map_err(|_| ConfigError::InvalidValue {
                key: "BCRYPT_COST",
                message: format!("{} is out of range", password_cost),
            })?,
        };

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.app_name.trim().is_empty() {
            return Err(ConfigError::MissingValue("APP_NAME"));
        }
        if self.jwt.secret.is_empty() {
            return Err(ConfigError::MissingValue("JWT_SECRET_KEY"));
        }
        if self.jwt.access_ttl <= Duration::zero() {
            return Err(ConfigError::InvalidValue {
                key: "JWT_LOGIN_EXP",
                message: "access window must be positive".to_string(),
            });
        }
        if self.jwt.refresh_ttl > Duration::days(MAX_VALIDITY_DAYS) {
            return Err(ConfigError::InvalidValue {
                key: "JWT_REFRESH_EXP",
                message: format!("refresh window must not exceed {} days", MAX_VALIDITY_DAYS),
            });
        }
        if self.jwt.refresh_ttl < self.jwt.access_ttl {
            return Err(ConfigError::InvalidValue {
                key: "JWT_REFRESH_EXP",
                message: "refresh window must not be shorter than the access window".to_string(),
            });
        }
        if !(4..=31).contains(&self.password_cost) {
            return Err(ConfigError::InvalidValue {
                key: "BCRYPT_COST",
                message: format!("{} is outside 4..=31", self.password_cost),
            });
        }
        Ok(())
    }
}

/// Builder for AppConfig
#[derive(Debug, Default)]
pub struct AppConfigBuilder {
    app_name: Option<String>,
    http_port: Option<u16>,
    database_url: Option<String>,
    max_connections: Option<u32>,
    jwt_secret: Option<JwtSecret>,
    access_ttl: Option<Duration>,
    refresh_ttl: Option<Duration>,
    password_cost: Option<u32>,
}

impl AppConfigBuilder {
    pub fn app_name(mut self, name: impl Into<String>) -> Self {
        self.app_name = Some(name.into());
        self
    }

    pub fn http_port(mut self, port: u16) -> Self {
        self.http_port = Some(port);
        self
    }

    pub fn database_url(mut self, url: impl Into<String>) -> Self {
        self.database_url = Some(url.into());
        self
    }

    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = Some(max);
        self
    }

    pub fn jwt_secret(mut self, secret: impl Into<String>) -> Self {
        self.jwt_secret = Some(JwtSecret::new(secret));
        self
    }

    pub fn access_ttl(mut self, ttl: Duration) -> Self {
        self.access_ttl = Some(ttl);
        self
    }

    pub fn refresh_ttl(mut self, ttl: Duration) -> Self {
        self.refresh_ttl = Some(ttl);
        self
    }

    pub fn password_cost(mut self, cost: u32) -> Self {
        self.password_cost = Some(cost);
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<AppConfig, ConfigError> {
        let config = AppConfig {
            app_name: self.app_name.ok_or(ConfigError::MissingValue("APP_NAME"))?,
            http_port: self.http_port.unwrap_or(DEFAULT_HTTP_PORT),
            database: DatabaseConfig {
                url: self.database_url,
                max_connections: self.max_connections.unwrap_or(DEFAULT_MAX_CONNECTIONS),
            },
            jwt: JwtConfig {
                secret: self.jwt_secret.ok_or(ConfigError::MissingValue("JWT_SECRET_KEY"))?,
                access_ttl: self.access_ttl.unwrap_or_else(|| Duration::hours(DEFAULT_ACCESS_HOURS)),
                refresh_ttl: self.refresh_ttl.unwrap_or_else(|| Duration::days(DEFAULT_REFRESH_DAYS)),
            },
            password_cost: self.password_cost.unwrap_or(DEFAULT_PASSWORD_COST),
        };
        config.validate()?;
        Ok(config)
    }
}

/// Configuration errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing value: {0}")]
    MissingValue(&'static str),
    #[error("invalid value for {key}: {message}")]
    InvalidValue { key: &'static str, message: String },
    #[error("failed to read config file {path}: {message}")]
    File { path: String, message: String },
}

/// Parse an integer setting, falling back to `default` when the value is
/// absent or not a number.
pub fn parse_int_or_default(raw: Option<&str>, default: i64) -> i64 {
    match raw.map(|value| value.trim().parse::<i64>()) {
        Some(Ok(value)) => value,
        Some(Err(_)) => {
            tracing::warn!("Ignoring non-numeric config value {:?}, using {}", raw, default);
            default
        }
        None => default,
    }
}

struct Sources<F> {
    file: BTreeMap<String, String>,
    env: F,
}

impl<F> Sources<F>
where
    F: Fn(&str) -> Option<String>,
{
    fn get_string(&self, key: &str) -> Option<String> {
        (self.env)(key).or_else(|| self.file.get(key).cloned())
    }

    fn get_string_or_err(&self, key: &'static str) -> Result<String, ConfigError> {
        self.get_string(key).ok_or(ConfigError::MissingValue(key))
    }

    fn get_int_or_default(&self, key: &str, default: i64) -> i64 {
        parse_int_or_default(self.get_string(key).as_deref(), default)
    }
}

/// Read a flat TOML table; keys are upper-cased to match environment names.
fn read_config_file(path: &Path) -> Result<BTreeMap<String, String>, ConfigError> {
    let file_error = |message: String| ConfigError::File {
        path: path.display().to_string(),
        message,
    };
    let raw = std::fs::read_to_string(path).map_err(|e| file_error(e.to_string()))?;
    let table: toml::Table = toml::from_str(&raw).map_err(|e| file_error(e.to_string()))?;

    Ok(table
        .into_iter()
        .map(|(key, value)| {
            let value = match value {
                toml::Value::String(s) => s,
                other => other.to_string(),
            };
            (key.to_ascii_uppercase(), value)
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use std::collections::HashMap;
    use std::io::Write;

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_parse_int_or_default() {
        assert_eq!(parse_int_or_default(Some("48"), 24), 48);
        assert_eq!(parse_int_or_default(Some(" 3 "), 24), 3);
        assert_eq!(parse_int_or_default(Some("soon"), 24), 24);
        assert_eq!(parse_int_or_default(Some(""), 24), 24);
        assert_eq!(parse_int_or_default(None, 24), 24);
    }

    #[test]
    fn test_from_sources_defaults() {
        let env = env_from(&[("APP_NAME", "auth-service"), ("JWT_SECRET_KEY", "s3cret")]);
        let config = AppConfig::from_sources(BTreeMap::new(), env).unwrap();

        assert_eq!(config.issuer(), "auth-service");
        assert_eq!(config.http_port, DEFAULT_HTTP_PORT);
        assert_eq!(config.jwt.access_ttl, Duration::hours(24));
        assert_eq!(config.jwt.refresh_ttl, Duration::days(7));
        assert_eq!(config.password_cost, DEFAULT_PASSWORD_COST);
        assert!(config.database.url.is_none());
    }

    #[test]
    fn test_from_sources_missing_secret() {
        let env = env_from(&[("APP_NAME", "auth-service")]);
        let result = AppConfig::from_sources(BTreeMap::new(), env);
        assert_matches!(result, Err(ConfigError::MissingValue("JWT_SECRET_KEY")));
    }

    #[test]
    fn test_env_overrides_file() {
        let mut file = BTreeMap::new();
        file.insert("APP_NAME".to_string(), "from-file".to_string());
        file.insert("JWT_SECRET_KEY".to_string(), "file-secret".to_string());
        file.insert("JWT_LOGIN_EXP".to_string(), "2".to_string());

        let env = env_from(&[("APP_NAME", "from-env")]);
        let config = AppConfig::from_sources(file, env).unwrap();

        assert_eq!(config.app_name, "from-env");
        assert_eq!(config.jwt.access_ttl, Duration::hours(2));
    }

    #[test]
    fn test_refresh_shorter_than_access_rejected() {
        let env = env_from(&[
            ("APP_NAME", "auth-service"),
            ("JWT_SECRET_KEY", "s3cret"),
            ("JWT_LOGIN_EXP", "200"),
            ("JWT_REFRESH_EXP", "1"),
        ]);
        let result = AppConfig::from_sources(BTreeMap::new(), env);
        assert_matches!(result, Err(ConfigError::InvalidValue { key: "JWT_REFRESH_EXP", .. }));
    }

    #[test]
    fn test_out_of_range_windows_rejected() {
        let env = env_from(&[
            ("APP_NAME", "auth-service"),
            ("JWT_SECRET_KEY", "s3cret"),
            ("JWT_REFRESH_EXP", "200000000000"),
        ]);
        let result = AppConfig::from_sources(BTreeMap::new(), env);
        assert_matches!(result, Err(ConfigError::InvalidValue { key: "JWT_REFRESH_EXP", .. }));

        let env = env_from(&[
            ("APP_NAME", "auth-service"),
            ("JWT_SECRET_KEY", "s3cret"),
            ("JWT_LOGIN_EXP", "9223372036854775807"),
        ]);
        let result = AppConfig::from_sources(BTreeMap::new(), env);
        assert_matches!(result, Err(ConfigError::InvalidValue { key: "JWT_LOGIN_EXP", .. }));
    }

    #[test]
    fn test_windows_above_maximum_rejected() {
        let result = AppConfig::builder()
            .app_name("auth-service")
            .jwt_secret("s3cret")
            .refresh_ttl(Duration::days(100_000_000))
            .build();
        assert_matches!(result, Err(ConfigError::InvalidValue { key: "JWT_REFRESH_EXP", .. }));

        let result = AppConfig::builder()
            .app_name("auth-service")
            .jwt_secret("s3cret")
            .access_ttl(Duration::days(MAX_VALIDITY_DAYS + 1))
            .refresh_ttl(Duration::days(MAX_VALIDITY_DAYS))
            .build();
        assert_matches!(result, Err(ConfigError::InvalidValue { .. }));

        let at_limit = AppConfig::builder()
            .app_name("auth-service")
            .jwt_secret("s3cret")
            .refresh_ttl(Duration::days(MAX_VALIDITY_DAYS))
            .build();
        assert!(at_limit.is_ok());
    }

    #[test]
    fn test_invalid_port_rejected() {
        let env = env_from(&[
            ("APP_NAME", "auth-service"),
            ("JWT_SECRET_KEY", "s3cret"),
            ("HTTP_PORT", "70000"),
        ]);
        let result = AppConfig::from_sources(BTreeMap::new(), env);
        assert_matches!(result, Err(ConfigError::InvalidValue { key: "HTTP_PORT", .. }));
    }

    #[test]
    fn test_read_config_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "app_name = \"toml-app\"").unwrap();
        writeln!(file, "jwt_secret_key = \"toml-secret\"").unwrap();
        writeln!(file, "http_port = 9090").unwrap();

        let values = read_config_file(file.path()).unwrap();
        assert_eq!(values.get("APP_NAME").map(String::as_str), Some("toml-app"));
        assert_eq!(values.get("HTTP_PORT").map(String::as_str), Some("9090"));

        let config = AppConfig::from_sources(values, |_| None).unwrap();
        assert_eq!(config.http_port, 9090);
    }

    #[test]
    fn test_read_missing_config_file() {
        let result = read_config_file(Path::new("/definitely/not/here.toml"));
        assert_matches!(result, Err(ConfigError::File { .. }));
    }

    #[test]
    #[serial_test::serial]
    fn test_load_reads_process_environment() {
        std::env::set_var("APP_NAME", "env-app");
        std::env::set_var("JWT_SECRET_KEY", "env-secret");
        std::env::set_var("JWT_REFRESH_EXP", "14");

        let config = AppConfig::load(None).unwrap();
        assert_eq!(config.app_name, "env-app");
        assert_eq!(config.jwt.refresh_ttl, Duration::days(14));

        std::env::remove_var("APP_NAME");
        std::env::remove_var("JWT_SECRET_KEY");
        std::env::remove_var("JWT_REFRESH_EXP");
    }

    #[test]
    fn test_builder() {
        let config = AppConfig::builder()
            .app_name("auth-service")
            .jwt_secret("s3cret")
            .password_cost(4)
            .build()
            .unwrap();
        assert_eq!(config.password_cost, 4);

        let missing = AppConfig::builder().jwt_secret("s3cret").build();
        assert_matches!(missing, Err(ConfigError::MissingValue("APP_NAME")));
    }

    #[test]
    fn test_secret_is_redacted() {
        let secret = JwtSecret::new("hunter2");
        let debug = format!("{:?}", secret);
        assert!(!debug.contains("hunter2"));
    }
}
