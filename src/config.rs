//! Configuration loading and constants.
//!
//! Loads application configuration from a TOML file, then overlays the AWS
//! region and credentials from the process environment. `AppConfig` is the root
//! configuration struct; it is built once at startup and passed down explicitly.

use const_format::formatcp;
use serde::Deserialize;
use std::fmt;
use std::path::Path;

// =============================================================================
// HTTP Response Cache Control
// =============================================================================

/// Greeting page - static text
pub const HTTP_CACHE_HOME_MAX_AGE: u32 = 60;

pub const CACHE_CONTROL_HOME: &str = formatcp!("public, max-age={}", HTTP_CACHE_HOME_MAX_AGE);

/// Scan status changes underneath us, never let an intermediary hold on to it
pub const CACHE_CONTROL_SCAN_STATUS: &str = "no-store";

// =============================================================================
// Default Paths and Strings
// =============================================================================

/// Default configuration file path
pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// Default log filter when RUST_LOG is not set
pub const DEFAULT_LOG_FILTER: &str = "scanwatch=debug,tower_http=info";

/// Default log format (text or json)
pub const DEFAULT_LOG_FORMAT: &str = "text";

/// Default bind address
pub const DEFAULT_HTTP_HOST: &str = "0.0.0.0";

/// Default listen port
pub const DEFAULT_HTTP_PORT: u16 = 3000;

/// Bucket holding uploaded files that GuardDuty scans
pub const DEFAULT_BUCKET: &str = "eazecap-uploads-2026";

// Environment variables read by the overlay
pub const ENV_REGION: &str = "AWS_REGION";
pub const ENV_ACCESS_KEY_ID: &str = "AWS_ACCESS_KEY_ID";
pub const ENV_SECRET_ACCESS_KEY: &str = "AWS_SECRET_ACCESS_KEY";
pub const ENV_SESSION_TOKEN: &str = "AWS_SESSION_TOKEN";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// HTTP server configuration
    #[serde(default)]
    pub http: HttpServerConfig,
    /// Object store holding the scanned uploads
    #[serde(default)]
    pub storage: StorageConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct HttpServerConfig {
    #[serde(default = "HttpServerConfig::default_host")]
    pub host: String,
    #[serde(default = "HttpServerConfig::default_port")]
    pub port: u16,
}

impl Default for HttpServerConfig {
    fn default() -> Self {
        Self {
            host: Self::default_host(),
            port: Self::default_port(),
        }
    }
}

impl HttpServerConfig {
    fn default_host() -> String {
        DEFAULT_HTTP_HOST.to_string()
    }

    fn default_port() -> u16 {
        DEFAULT_HTTP_PORT
    }
}

/// Object store settings.
///
/// `region` and `credentials` are normally left out of the file and supplied by
/// the environment overlay; see [`StorageConfig::apply_env`].
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Bucket the scanned uploads live in
    #[serde(default = "StorageConfig::default_bucket")]
    pub bucket: String,
    /// AWS region; falls back to the SDK's provider chain when unset
    pub region: Option<String>,
    /// Custom endpoint for S3-compatible stores (MinIO, LocalStack)
    pub endpoint_url: Option<String>,
    /// Use path-style addressing (usually required with a custom endpoint)
    #[serde(default)]
    pub force_path_style: bool,
    /// Static credentials, only ever populated from the environment
    #[serde(skip)]
    pub credentials: Option<StaticCredentials>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            bucket: Self::default_bucket(),
            region: None,
            endpoint_url: None,
            force_path_style: false,
            credentials: None,
        }
    }
}

impl StorageConfig {
    fn default_bucket() -> String {
        DEFAULT_BUCKET.to_string()
    }

    /// Overlay region and credentials from an environment lookup.
    ///
    /// The lookup is injected so tests never touch the real process
    /// environment. Empty values count as unset. Environment values win over
    /// the file.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.is_empty());

        if let Some(region) = get(ENV_REGION) {
            self.region = Some(region);
        }

        match (get(ENV_ACCESS_KEY_ID), get(ENV_SECRET_ACCESS_KEY)) {
            (Some(access_key_id), Some(secret_access_key)) => {
                self.credentials = Some(StaticCredentials {
                    access_key_id,
                    secret_access_key,
                    session_token: get(ENV_SESSION_TOKEN),
                });
            }
            (None, None) => {}
            _ => {
                return Err(ConfigError::Validation(format!(
                    "{} and {} must be set together",
                    ENV_ACCESS_KEY_ID, ENV_SECRET_ACCESS_KEY
                )));
            }
        }

        Ok(())
    }

    /// Check if static credentials were supplied
    pub fn has_credentials(&self) -> bool {
        self.credentials.is_some()
    }
}

/// Access key pair read from the environment at startup.
#[derive(Clone, PartialEq, Eq)]
pub struct StaticCredentials {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub session_token: Option<String>,
}

impl fmt::Debug for StaticCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StaticCredentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"** redacted **")
            .field(
                "session_token",
                &self.session_token.as_ref().map(|_| "** redacted **"),
            )
            .finish()
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log format: "text" (human-readable, default) or "json" (structured)
    #[serde(default = "LoggingConfig::default_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: DEFAULT_LOG_FORMAT.to_string(),
        }
    }
}

impl LoggingConfig {
    fn default_format() -> String {
        DEFAULT_LOG_FORMAT.to_string()
    }

    pub fn is_json(&self) -> bool {
        self.format.eq_ignore_ascii_case("json")
    }
}

impl AppConfig {
    /// Load the TOML file at `path` and overlay the process environment.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        Self::load_with_env(path, |name| std::env::var(name).ok())
    }

    /// Load the TOML file at `path` and overlay the given environment lookup.
    pub fn load_with_env<P, F>(path: P, lookup: F) -> Result<Self, ConfigError>
    where
        P: AsRef<Path>,
        F: Fn(&str) -> Option<String>,
    {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_with_env(&contents, lookup)
    }

    /// Parse TOML contents, overlay the given environment lookup, and validate.
    pub fn from_toml_with_env<F>(contents: &str, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config: AppConfig = toml::from_str(contents)?;
        config.storage.apply_env(lookup)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.storage.bucket.trim().is_empty() {
            return Err(ConfigError::Validation(
                "storage.bucket must not be empty".to_string(),
            ));
        }

        if let Some(endpoint) = &self.storage.endpoint_url {
            if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
                return Err(ConfigError::Validation(format!(
                    "storage.endpoint_url must start with http:// or https://, got '{}'",
                    endpoint
                )));
            }
        }

        if !matches!(self.logging.format.to_ascii_lowercase().as_str(), "text" | "json") {
            return Err(ConfigError::Validation(format!(
                "logging.format must be \"text\" or \"json\", got '{}'",
                self.logging.format
            )));
        }

        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Configuration error: {0}")]
    Validation(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_empty_file_uses_defaults() {
        let config = AppConfig::from_toml_with_env("", env(&[])).unwrap();
        assert_eq!(config.http.host, DEFAULT_HTTP_HOST);
        assert_eq!(config.http.port, 3000);
        assert_eq!(config.storage.bucket, "eazecap-uploads-2026");
        assert!(config.storage.region.is_none());
        assert!(!config.storage.has_credentials());
        assert!(!config.logging.is_json());
    }

    #[test]
    fn test_file_values_are_read() {
        let toml = r#"
            [http]
            host = "127.0.0.1"
            port = 8081

            [storage]
            bucket = "other-bucket"
            region = "eu-west-1"
            endpoint_url = "http://127.0.0.1:9000"
            force_path_style = true

            [logging]
            format = "json"
        "#;
        let config = AppConfig::from_toml_with_env(toml, env(&[])).unwrap();
        assert_eq!(config.http.host, "127.0.0.1");
        assert_eq!(config.http.port, 8081);
        assert_eq!(config.storage.bucket, "other-bucket");
        assert_eq!(config.storage.region.as_deref(), Some("eu-west-1"));
        assert_eq!(
            config.storage.endpoint_url.as_deref(),
            Some("http://127.0.0.1:9000")
        );
        assert!(config.storage.force_path_style);
        assert!(config.logging.is_json());
    }

    #[test]
    fn test_env_overlay_sets_region_and_credentials() {
        let config = AppConfig::from_toml_with_env(
            "[storage]\nregion = \"us-west-2\"\n",
            env(&[
                ("AWS_REGION", "us-east-1"),
                ("AWS_ACCESS_KEY_ID", "AKIAEXAMPLE"),
                ("AWS_SECRET_ACCESS_KEY", "secret"),
            ]),
        )
        .unwrap();

        assert_eq!(config.storage.region.as_deref(), Some("us-east-1"));
        let creds = config.storage.credentials.unwrap();
        assert_eq!(creds.access_key_id, "AKIAEXAMPLE");
        assert_eq!(creds.secret_access_key, "secret");
        assert!(creds.session_token.is_none());
    }

    #[test]
    fn test_env_overlay_ignores_empty_values() {
        let config = AppConfig::from_toml_with_env(
            "[storage]\nregion = \"us-west-2\"\n",
            env(&[
                ("AWS_REGION", ""),
                ("AWS_ACCESS_KEY_ID", ""),
                ("AWS_SECRET_ACCESS_KEY", ""),
            ]),
        )
        .unwrap();
        assert_eq!(config.storage.region.as_deref(), Some("us-west-2"));
        assert!(!config.storage.has_credentials());
    }

    #[test]
    fn test_env_overlay_session_token() {
        let config = AppConfig::from_toml_with_env(
            "",
            env(&[
                ("AWS_ACCESS_KEY_ID", "AKIAEXAMPLE"),
                ("AWS_SECRET_ACCESS_KEY", "secret"),
                ("AWS_SESSION_TOKEN", "token"),
            ]),
        )
        .unwrap();
        let creds = config.storage.credentials.unwrap();
        assert_eq!(creds.session_token.as_deref(), Some("token"));
    }

    #[test]
    fn test_half_configured_credentials_rejected() {
        let err = AppConfig::from_toml_with_env("", env(&[("AWS_ACCESS_KEY_ID", "AKIAEXAMPLE")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn test_empty_bucket_rejected() {
        let err = AppConfig::from_toml_with_env("[storage]\nbucket = \"  \"\n", env(&[]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn test_bad_endpoint_rejected() {
        let err = AppConfig::from_toml_with_env(
            "[storage]\nendpoint_url = \"localhost:9000\"\n",
            env(&[]),
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn test_unknown_log_format_rejected() {
        let err = AppConfig::from_toml_with_env("[logging]\nformat = \"xml\"\n", env(&[]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn test_malformed_toml_is_parse_error() {
        let err = AppConfig::from_toml_with_env("[http\nport = ", env(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[http]\nport = 4000").unwrap();
        let config = AppConfig::load_with_env(file.path(), env(&[])).unwrap();
        assert_eq!(config.http.port, 4000);
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = AppConfig::load(dir.path().join("missing.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn test_credentials_debug_redacts_secret() {
        let creds = StaticCredentials {
            access_key_id: "AKIAEXAMPLE".to_string(),
            secret_access_key: "very-secret".to_string(),
            session_token: Some("token-value".to_string()),
        };
        let debug = format!("{:?}", creds);
        assert!(debug.contains("AKIAEXAMPLE"));
        assert!(!debug.contains("very-secret"));
        assert!(!debug.contains("token-value"));
    }
}
