//! # Connection Configuration
//!
//! Settings the facade needs to construct its record client and to fill in
//! the fixed parts of outgoing documents.
//!
//! ## Configuration File Format
//! ```toml
//! # odx.toml
//! [connection]
//! base_url = "https://erp.example.com"
//! database = "prod"
//! erp_api_key = "..."
//! proxy_api_key = "..."
//! user_id = 2
//!
//! [pos]
//! session_name = "POS Session"
//! order_name = "POS Order"
//! payment_method_id = 1
//!
//! [query]
//! partner_page_size = 5
//! product_page_size = 20
//! ```
//!
//! ## Load Order
//! 1. Explicit path, or the platform config dir
//!    (`~/.config/odx-pos/odx.toml` on Linux)
//! 2. Missing `[pos]` / `[query]` sections fall back to defaults
//! 3. [`ConnectionConfig::validate`] runs before the config is returned
//!
//! Environment variables are not consulted.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use url::Url;

use crate::error::{ServiceError, ServiceResult};

// =============================================================================
// Connection Settings
// =============================================================================

/// The four connection parameters plus the ERP user the proxy acts as.
#[derive(Clone, Serialize, Deserialize)]
pub struct ConnectionSettings {
    /// ERP base URL (http or https).
    pub base_url: String,

    /// ERP database name.
    pub database: String,

    /// API key for the ERP user.
    pub erp_api_key: String,

    /// API key for the RPC proxy.
    pub proxy_api_key: String,

    /// ERP user id the proxy authenticates as.
    #[serde(default = "default_user_id")]
    pub user_id: i64,
}

fn default_user_id() -> i64 {
    2
}

/// Keys are redacted so settings can be logged.
impl fmt::Debug for ConnectionSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionSettings")
            .field("base_url", &self.base_url)
            .field("database", &self.database)
            .field("erp_api_key", &"<redacted>")
            .field("proxy_api_key", &"<redacted>")
            .field("user_id", &self.user_id)
            .finish()
    }
}

impl ConnectionSettings {
    /// Parsed base URL.
    pub fn url(&self) -> ServiceResult<Url> {
        Ok(Url::parse(&self.base_url)?)
    }
}

// =============================================================================
// POS Settings
// =============================================================================

/// Fixed values written into session and order documents.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PosSettings {
    /// Name given to sessions created by `open_store`.
    #[serde(default = "default_session_name")]
    pub session_name: String,

    /// Name given to submitted orders.
    #[serde(default = "default_order_name")]
    pub order_name: String,

    /// Payment method the single full payment is booked against.
    #[serde(default = "default_payment_method_id")]
    pub payment_method_id: i64,
}

fn default_session_name() -> String {
    "POS Session".to_string()
}

fn default_order_name() -> String {
    "POS Order".to_string()
}

fn default_payment_method_id() -> i64 {
    1
}

impl Default for PosSettings {
    fn default() -> Self {
        PosSettings {
            session_name: default_session_name(),
            order_name: default_order_name(),
            payment_method_id: default_payment_method_id(),
        }
    }
}

// =============================================================================
// Query Settings
// =============================================================================

/// Default page sizes of the list operations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuerySettings {
    #[serde(default = "default_partner_page_size")]
    pub partner_page_size: u32,

    #[serde(default = "default_product_page_size")]
    pub product_page_size: u32,
}

fn default_partner_page_size() -> u32 {
    5
}

fn default_product_page_size() -> u32 {
    20
}

impl Default for QuerySettings {
    fn default() -> Self {
        QuerySettings {
            partner_page_size: default_partner_page_size(),
            product_page_size: default_product_page_size(),
        }
    }
}

// =============================================================================
// Main Configuration
// =============================================================================

/// Complete facade configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionConfig {
    pub connection: ConnectionSettings,

    #[serde(default)]
    pub pos: PosSettings,

    #[serde(default)]
    pub query: QuerySettings,
}

impl ConnectionConfig {
    /// Builds a config from the four connection parameters with default
    /// `[pos]` and `[query]` sections.
    pub fn new(
        base_url: impl Into<String>,
        database: impl Into<String>,
        erp_api_key: impl Into<String>,
        proxy_api_key: impl Into<String>,
    ) -> Self {
        ConnectionConfig {
            connection: ConnectionSettings {
                base_url: base_url.into(),
                database: database.into(),
                erp_api_key: erp_api_key.into(),
                proxy_api_key: proxy_api_key.into(),
                user_id: default_user_id(),
            },
            pos: PosSettings::default(),
            query: QuerySettings::default(),
        }
    }

    /// Loads and validates a TOML config file.
    ///
    /// With `None`, the platform config path is used.
    pub fn load(config_path: Option<PathBuf>) -> ServiceResult<Self> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| ServiceError::ConfigLoadFailed("No config path available".into()))?;

        Self::load_from(&path)
    }

    /// Loads and validates the TOML file at `path`.
    pub fn load_from(path: &Path) -> ServiceResult<Self> {
        if !path.exists() {
            return Err(ServiceError::ConfigLoadFailed(format!(
                "Config file not found: {}",
                path.display()
            )));
        }

        info!(?path, "Loading connection config from file");
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parses and validates TOML text.
    pub fn from_toml_str(contents: &str) -> ServiceResult<Self> {
        let config: ConnectionConfig = toml::from_str(contents)?;
        config.validate()?;
        debug!(connection = ?config.connection, "Connection config parsed");
        Ok(config)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ServiceResult<()> {
        let url = self.connection.url()?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(ServiceError::InvalidConfig(format!(
                "base_url must start with http:// or https://, got: {}",
                self.connection.base_url
            )));
        }

        for (field, value) in [
            ("database", &self.connection.database),
            ("erp_api_key", &self.connection.erp_api_key),
            ("proxy_api_key", &self.connection.proxy_api_key),
            ("session_name", &self.pos.session_name),
            ("order_name", &self.pos.order_name),
        ] {
            if value.trim().is_empty() {
                return Err(ServiceError::InvalidConfig(format!("{} is required", field)));
            }
        }

        if self.connection.user_id <= 0 {
            return Err(ServiceError::InvalidConfig(
                "user_id must be greater than 0".into(),
            ));
        }

        if self.pos.payment_method_id <= 0 {
            return Err(ServiceError::InvalidConfig(
                "payment_method_id must be greater than 0".into(),
            ));
        }

        if self.query.partner_page_size == 0 || self.query.product_page_size == 0 {
            return Err(ServiceError::InvalidConfig(
                "page sizes must be greater than 0".into(),
            ));
        }

        Ok(())
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "odx", "odx-pos")
            .map(|dirs| dirs.config_dir().join("odx.toml"))
    }
}
