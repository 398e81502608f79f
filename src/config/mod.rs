//! TOML configuration
//!
//! ```toml
//! [config]
//! url = "http://localhost:9200"
//! username = ""
//! password = ""
//!
//! [scroll]
//! index = "accountsesdt"
//! ttl = "1m"
//!
//! [query]
//! token = ""
//! exclude_zero_balance = true
//! ```
//!
//! Only `[config].url` is required; everything else has a default.

mod errors;

use std::fmt;
use std::fs;
use std::path::Path;
use std::time::Duration;

use reqwest::Url;
use serde::{Deserialize, Serialize};

pub use errors::{ConfigError, ConfigResult};

use crate::query::{
    AccountQuery, DEFAULT_BALANCE_FIELD, DEFAULT_TIMESTAMP_FIELD, DEFAULT_TOKEN_FIELD,
    DEFAULT_ZERO_VALUE,
};
use crate::response::{ResponseDecoder, DEFAULT_CURSOR_FIELD};
use crate::scroll::ScrollTtl;
use crate::transport::{HttpTransport, TransportResult, DEFAULT_CURSOR_PARAM};

/// Path read when none is given
pub const DEFAULT_CONFIG_PATH: &str = "./config.toml";

/// Index traversed when none is configured
pub const DEFAULT_INDEX: &str = "accountsesdt";

/// Whole configuration file
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Cluster connection (the `[config]` table)
    #[serde(rename = "config")]
    pub connection: ConnectionConfig,

    #[serde(default)]
    pub scroll: ScrollConfig,

    #[serde(default)]
    pub query: QueryConfig,
}

/// Cluster endpoint and credentials
#[derive(Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConnectionConfig {
    pub url: String,

    /// Empty means no basic auth
    #[serde(default)]
    pub username: String,

    #[serde(default)]
    pub password: String,

    /// Per-request timeout; unset means none
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

impl fmt::Debug for ConnectionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionConfig")
            .field("url", &self.url)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}

/// Traversal settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScrollConfig {
    pub index: String,

    /// Cursor keep-alive in duration notation (`1m`, `30s`)
    pub ttl: String,

    /// Hits per page; 0 leaves it to the server
    pub page_size: u32,

    /// Response field carrying the cursor
    pub cursor_field: String,

    /// Request-body key carrying the cursor
    pub cursor_param: String,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            index: DEFAULT_INDEX.to_string(),
            ttl: ScrollTtl::default().as_param(),
            page_size: 0,
            cursor_field: DEFAULT_CURSOR_FIELD.to_string(),
            cursor_param: DEFAULT_CURSOR_PARAM.to_string(),
        }
    }
}

/// Field names and defaults for the canned queries
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct QueryConfig {
    pub token_field: String,
    pub token: String,
    pub exclude_zero_balance: bool,
    pub balance_field: String,
    pub zero_value: String,
    pub timestamp_field: String,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            token_field: DEFAULT_TOKEN_FIELD.to_string(),
            token: String::new(),
            exclude_zero_balance: true,
            balance_field: DEFAULT_BALANCE_FIELD.to_string(),
            zero_value: DEFAULT_ZERO_VALUE.to_string(),
            timestamp_field: DEFAULT_TIMESTAMP_FIELD.to_string(),
        }
    }
}

impl Config {
    /// Load and validate a configuration file
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content)
    }

    /// Parse and validate configuration text
    pub fn parse(content: &str) -> ConfigResult<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Configuration for a cluster at `url`, defaults elsewhere
    pub fn for_url(url: impl Into<String>) -> Self {
        Self {
            connection: ConnectionConfig {
                url: url.into(),
                username: String::new(),
                password: String::new(),
                request_timeout_secs: None,
            },
            scroll: ScrollConfig::default(),
            query: QueryConfig::default(),
        }
    }

    pub fn validate(&self) -> ConfigResult<()> {
        let url = Url::parse(&self.connection.url)
            .map_err(|e| ConfigError::invalid("config.url", e.to_string()))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::invalid(
                "config.url",
                format!("scheme '{}' is not http or https", url.scheme()),
            ));
        }

        if self.connection.request_timeout_secs == Some(0) {
            return Err(ConfigError::invalid(
                "config.request_timeout_secs",
                "must be > 0",
            ));
        }

        self.ttl()?;

        let required = [
            ("scroll.index", &self.scroll.index),
            ("scroll.cursor_field", &self.scroll.cursor_field),
            ("scroll.cursor_param", &self.scroll.cursor_param),
            ("query.token_field", &self.query.token_field),
            ("query.balance_field", &self.query.balance_field),
            ("query.timestamp_field", &self.query.timestamp_field),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(ConfigError::invalid(field, "must not be empty"));
            }
        }

        Ok(())
    }

    /// Parsed cursor keep-alive
    pub fn ttl(&self) -> ConfigResult<ScrollTtl> {
        self.scroll
            .ttl
            .parse::<ScrollTtl>()
            .map_err(|e| ConfigError::invalid("scroll.ttl", e.to_string()))
    }

    /// Configured page size, if any
    pub fn page_size(&self) -> Option<u32> {
        match self.scroll.page_size {
            0 => None,
            n => Some(n),
        }
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.connection.request_timeout_secs.map(Duration::from_secs)
    }

    /// HTTP transport for the configured cluster
    pub fn transport(&self) -> TransportResult<HttpTransport> {
        let mut builder = HttpTransport::builder(self.connection.url.clone())
            .credentials(
                self.connection.username.clone(),
                self.connection.password.clone(),
            )
            .cursor_param(self.scroll.cursor_param.clone());
        if let Some(timeout) = self.request_timeout() {
            builder = builder.timeout(timeout);
        }
        builder.build()
    }

    pub fn decoder(&self) -> ResponseDecoder {
        ResponseDecoder::new(self.scroll.cursor_field.clone())
    }

    /// Default account query with the configured fields
    pub fn account_query(&self) -> AccountQuery {
        AccountQuery {
            token_field: self.query.token_field.clone(),
            token: self.query.token.clone(),
            exclude_zero_balance: self.query.exclude_zero_balance,
            balance_field: self.query.balance_field.clone(),
            zero_value: self.query.zero_value.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_config_defaults() {
        let config = Config::parse(
            r#"
            [config]
            url = "http://localhost:9200"
            "#,
        )
        .unwrap();

        assert_eq!(config.scroll.index, "accountsesdt");
        assert_eq!(config.ttl().unwrap(), ScrollTtl::from_secs(60));
        assert_eq!(config.page_size(), None);
        assert_eq!(config.request_timeout(), None);
        assert!(config.connection.username.is_empty());
        assert!(config.query.exclude_zero_balance);
        assert_eq!(config.decoder().cursor_field(), "_scroll_id");
    }

    #[test]
    fn test_connection_only_layout_parses() {
        let config = Config::parse(
            r#"
            [config]
            url = "https://es.example.com:9200"
            username = "elastic"
            password = "changeme"
            "#,
        )
        .unwrap();
        assert_eq!(config.connection.username, "elastic");
        assert_eq!(config.connection.password, "changeme");
    }

    #[test]
    fn test_full_config() {
        let config = Config::parse(
            r#"
            [config]
            url = "http://localhost:9200"
            request_timeout_secs = 10

            [scroll]
            index = "tokens"
            ttl = "5m"
            page_size = 500
            cursor_field = "cursor"
            cursor_param = "cursor_id"

            [query]
            token = "SBHAT-89efd3"
            exclude_zero_balance = false
            "#,
        )
        .unwrap();

        assert_eq!(config.scroll.index, "tokens");
        assert_eq!(config.ttl().unwrap(), ScrollTtl::from_secs(300));
        assert_eq!(config.page_size(), Some(500));
        assert_eq!(config.request_timeout(), Some(Duration::from_secs(10)));
        assert_eq!(config.decoder().cursor_field(), "cursor");

        let account = config.account_query();
        assert_eq!(account.token, "SBHAT-89efd3");
        assert!(!account.exclude_zero_balance);
        assert_eq!(account.token_field, "token");
    }

    #[test]
    fn test_missing_connection_table() {
        let err = Config::parse("[scroll]\nindex = \"x\"\n").unwrap_err();
        assert_eq!(err.code(), "ESQ_CONFIG_PARSE");
    }

    #[test]
    fn test_unknown_key_rejected() {
        let err = Config::parse(
            r#"
            [config]
            url = "http://localhost:9200"
            passwd = "typo"
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_rejects_bad_url() {
        for url in ["localhost:9200x", "ftp://host", "not a url"] {
            let err = Config::for_url(url).validate().unwrap_err();
            assert!(
                matches!(err, ConfigError::Invalid { field: "config.url", .. }),
                "accepted {}",
                url
            );
        }
    }

    #[test]
    fn test_rejects_bad_ttl() {
        let mut config = Config::for_url("http://localhost:9200");
        config.scroll.ttl = "0s".into();
        assert!(matches!(
            config.validate().unwrap_err(),
            ConfigError::Invalid { field: "scroll.ttl", .. }
        ));

        config.scroll.ttl = "soon".into();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_empty_names() {
        let mut config = Config::for_url("http://localhost:9200");
        config.scroll.index = "  ".into();
        assert!(matches!(
            config.validate().unwrap_err(),
            ConfigError::Invalid { field: "scroll.index", .. }
        ));

        let mut config = Config::for_url("http://localhost:9200");
        config.scroll.cursor_param = String::new();
        assert!(matches!(
            config.validate().unwrap_err(),
            ConfigError::Invalid { field: "scroll.cursor_param", .. }
        ));
    }

    #[test]
    fn test_rejects_zero_timeout() {
        let mut config = Config::for_url("http://localhost:9200");
        config.connection.request_timeout_secs = Some(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_debug_hides_password() {
        let mut config = Config::for_url("http://localhost:9200");
        config.connection.password = "hunter2".into();
        assert!(!format!("{:?}", config).contains("hunter2"));
    }

    #[test]
    fn test_transport_from_config() {
        let config = Config::for_url("http://localhost:9200/");
        let transport = config.transport().unwrap();
        assert_eq!(transport.base_url().as_str(), "http://localhost:9200/");
    }
}
