//! # Server Configuration
//!
//! Layered with the `config` crate, later layers overriding earlier ones:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. Built-in defaults          ServerConfig::default()                  │
//! │  2. configurator.toml          optional, working directory              │
//! │  3. BELLOWS_* env variables    BELLOWS_PORT=9000, BELLOWS_JWT_SECRET=…  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//! ```toml
//! # configurator.toml
//! port = 8080
//! database_path = "/var/lib/bellows/bellows.db"
//! quote_endpoint = "https://formspree.io/f/abcd1234"
//! quote_recipient = "sales@example.com"
//! jwt_secret = "change-me"
//! ```

use std::path::PathBuf;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use url::Url;

use bellows_core::DEFAULT_LEAD_SOURCE;

const CONFIG_FILE: &str = "configurator";
const ENV_PREFIX: &str = "BELLOWS";

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Interface to bind. Default: 127.0.0.1
    pub bind_address: String,

    /// HTTP port. Default: 8080
    pub port: u16,

    /// SQLite file. Default: `<platform data dir>/bellows.db`
    pub database_path: PathBuf,

    /// Root of the product image bucket.
    pub image_dir: PathBuf,

    /// Public URL prefix under which `image_dir` is served.
    pub public_image_base_url: String,

    /// Where exported quotation documents are also written.
    pub export_dir: PathBuf,

    /// Mail relay that receives quote payloads.
    pub quote_endpoint: Url,

    /// Inbox named in every quote payload.
    pub quote_recipient: String,

    pub lead_source: String,

    /// Logo drawn in the document header; `None` always uses the text heading.
    /// A local path must lie under `image_dir`.
    pub logo_url: Option<String>,

    /// HMAC secret for admin session tokens.
    pub jwt_secret: String,

    /// Admin session lifetime in seconds. Default: 8 hours
    pub session_lifetime_secs: i64,

    /// Timeout for outbound HTTP (relay and images) in seconds.
    pub http_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        let data_dir = default_data_dir();

        ServerConfig {
            bind_address: "127.0.0.1".to_string(),
            port: 8080,
            database_path: data_dir.join("bellows.db"),
            image_dir: data_dir.join("images"),
            public_image_base_url: "http://127.0.0.1:8080/images".to_string(),
            export_dir: data_dir.join("exports"),
            quote_endpoint: Url::parse("https://formspree.io/f/placeholder-id")
                .unwrap_or_else(|_| unreachable!("static URL is valid")),
            quote_recipient: "webmaster@bellows-systems.com".to_string(),
            lead_source: DEFAULT_LEAD_SOURCE.to_string(),
            logo_url: Some(
                "https://www.bellows-systems.com/wp-content/uploads/2024/05/BSI-black-Logo.webp"
                    .to_string(),
            ),
            jwt_secret: "bellows-configurator-dev-secret-change-in-production".to_string(),
            session_lifetime_secs: 8 * 60 * 60,
            http_timeout_secs: 30,
        }
    }
}

impl ServerConfig {
    /// Loads defaults, then `configurator.toml`, then `BELLOWS_*` variables.
    pub fn load() -> Result<Self, ConfigError> {
        let defaults = config::Config::try_from(&ServerConfig::default())?;

        let config: ServerConfig = config::Config::builder()
            .add_source(defaults)
            .add_source(config::File::with_name(CONFIG_FILE).required(false))
            .add_source(config::Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.jwt_secret.trim().is_empty() {
            return Err(ConfigError::MissingRequired("jwt_secret".to_string()));
        }
        if self.session_lifetime_secs <= 0 {
            return Err(ConfigError::InvalidValue("session_lifetime_secs".to_string()));
        }
        if !matches!(self.quote_endpoint.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidValue("quote_endpoint".to_string()));
        }
        Ok(())
    }

    /// `bind_address:port`.
    pub fn listen_address(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }
}

/// Platform data directory, or `./data` when none can be determined.
///
/// - **macOS**: `~/Library/Application Support/com.bellows-systems.configurator`
/// - **Windows**: `%APPDATA%\bellows-systems\configurator\data`
/// - **Linux**: `~/.local/share/configurator`
fn default_data_dir() -> PathBuf {
    ProjectDirs::from("com", "bellows-systems", "configurator")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("./data"))
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),

    #[error("Missing required configuration: {0}")]
    MissingRequired(String),

    #[error("Configuration could not be loaded: {0}")]
    Load(#[from] config::ConfigError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = ServerConfig::default();
        config.validate().unwrap();
        assert_eq!(config.listen_address(), "127.0.0.1:8080");
        assert!(config.database_path.ends_with("bellows.db"));
    }

    #[test]
    fn test_defaults_survive_the_config_layers() {
        let defaults = config::Config::try_from(&ServerConfig::default()).unwrap();
        let loaded: ServerConfig = config::Config::builder()
            .add_source(defaults)
            .set_override("port", 9100)
            .unwrap()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(loaded.port, 9100);
        assert_eq!(loaded.quote_recipient, "webmaster@bellows-systems.com");
        assert_eq!(loaded.session_lifetime_secs, 8 * 60 * 60);
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let config = ServerConfig {
            jwt_secret: " ".to_string(),
            ..ServerConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::MissingRequired(_))));

        let config = ServerConfig {
            quote_endpoint: Url::parse("ftp://example.com/").unwrap(),
            ..ServerConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::InvalidValue(_))));
    }
}
