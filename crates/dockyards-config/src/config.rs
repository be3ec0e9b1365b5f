// crates/dockyards-config/src/config.rs
// ============================================================================
// Module: Dockyards Configuration
// Description: Configuration loading and validation for the Dockyards API.
// Purpose: Provide strict, fail-closed config parsing with hard limits.
// Dependencies: dockyards-core, dockyards-store-sqlite, serde, toml
// ============================================================================

//! ## Overview
//! Configuration is loaded from a TOML file with strict size and path limits.
//! Only the global namespace name, token lifetimes, bcrypt cost, the replica
//! cap, the store backend, and the audit sink are configurable. Missing or
//! invalid configuration fails closed.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::env;
use std::fs;
use std::net::SocketAddr;
use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;

use dockyards_core::is_dns_label;
use dockyards_store_sqlite::SqliteStoreConfig;
use dockyards_store_sqlite::SqliteStoreMode;
use dockyards_store_sqlite::SqliteSyncMode;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
const DEFAULT_CONFIG_NAME: &str = "dockyards.toml";
/// Environment variable used to override the config path.
pub const CONFIG_ENV_VAR: &str = "DOCKYARDS_CONFIG";
/// Maximum configuration file size in bytes.
pub(crate) const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Maximum length of a single path component.
pub(crate) const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
pub(crate) const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Default global namespace.
pub const DEFAULT_GLOBAL_NAMESPACE: &str = "dockyards-system";
/// Default bind address.
pub(crate) const DEFAULT_BIND: &str = "127.0.0.1:9000";
/// Default maximum request body size in bytes.
pub(crate) const DEFAULT_MAX_BODY_BYTES: usize = 1024 * 1024;
/// Maximum allowed request body size in bytes.
pub(crate) const MAX_MAX_BODY_BYTES: usize = 16 * 1024 * 1024;
/// Default access token lifetime in seconds.
pub(crate) const DEFAULT_ACCESS_TOKEN_TTL_SECS: u64 = 30 * 60;
/// Default refresh token lifetime in seconds.
pub(crate) const DEFAULT_REFRESH_TOKEN_TTL_SECS: u64 = 24 * 60 * 60;
/// Minimum access token lifetime in seconds.
pub(crate) const MIN_ACCESS_TOKEN_TTL_SECS: u64 = 60;
/// Maximum access token lifetime in seconds.
pub(crate) const MAX_ACCESS_TOKEN_TTL_SECS: u64 = 24 * 60 * 60;
/// Maximum refresh token lifetime in seconds.
pub(crate) const MAX_REFRESH_TOKEN_TTL_SECS: u64 = 90 * 24 * 60 * 60;
/// Default bcrypt cost.
pub(crate) const DEFAULT_BCRYPT_COST: u32 = 10;
/// Minimum bcrypt cost accepted by the bcrypt crate.
pub(crate) const MIN_BCRYPT_COST: u32 = 4;
/// Maximum bcrypt cost accepted by the bcrypt crate.
pub(crate) const MAX_BCRYPT_COST: u32 = 31;
/// Default node pool replica cap.
pub const DEFAULT_MAX_REPLICAS: u32 = 16;
/// Maximum configurable replica cap.
pub(crate) const MAX_MAX_REPLICAS: u32 = 1024;
/// Default `SQLite` busy timeout (ms).
pub(crate) const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

// ============================================================================
// SECTION: Configuration Types
// ============================================================================

/// Dockyards API configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DockyardsConfig {
    /// Namespace holding global objects (catalog, features, signing keys).
    #[serde(default = "default_global_namespace")]
    pub global_namespace: String,
    /// HTTP server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Token and password configuration.
    #[serde(default)]
    pub auth: AuthConfig,
    /// Object store configuration.
    #[serde(default)]
    pub store: StoreConfig,
    /// Request validation limits.
    #[serde(default)]
    pub limits: LimitsConfig,
    /// Audit logging configuration.
    #[serde(default)]
    pub audit: AuditConfig,
}

impl Default for DockyardsConfig {
    fn default() -> Self {
        Self {
            global_namespace: default_global_namespace(),
            server: ServerConfig::default(),
            auth: AuthConfig::default(),
            store: StoreConfig::default(),
            limits: LimitsConfig::default(),
            audit: AuditConfig::default(),
        }
    }
}

impl DockyardsConfig {
    /// Loads configuration from disk using the default resolution rules.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading or validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let resolved = resolve_path(path)?;
        validate_path(&resolved)?;
        let bytes = fs::read(&resolved).map_err(|err| ConfigError::Io(err.to_string()))?;
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(&bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        Self::from_toml(content)
    }

    /// Parses and validates configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when parsing or validation fails.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !is_dns_label(&self.global_namespace) {
            return Err(ConfigError::Invalid("global_namespace must be a dns label".to_string()));
        }
        self.server.validate()?;
        self.auth.validate()?;
        self.store.validate()?;
        self.limits.validate()?;
        self.audit.validate()?;
        Ok(())
    }
}

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Bind address.
    #[serde(default = "default_bind")]
    pub bind: String,
    /// Maximum request body size in bytes.
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

impl ServerConfig {
    /// Returns the parsed bind address.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the address does not parse.
    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        self.bind
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid("invalid bind address".to_string()))
    }

    /// Validates server configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        self.bind_addr()?;
        if self.max_body_bytes == 0 {
            return Err(ConfigError::Invalid(
                "server.max_body_bytes must be greater than zero".to_string(),
            ));
        }
        if self.max_body_bytes > MAX_MAX_BODY_BYTES {
            return Err(ConfigError::Invalid("server.max_body_bytes too large".to_string()));
        }
        Ok(())
    }
}

/// Token and password configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// Access token lifetime in seconds.
    #[serde(default = "default_access_token_ttl_secs")]
    pub access_token_ttl_secs: u64,
    /// Refresh token lifetime in seconds.
    #[serde(default = "default_refresh_token_ttl_secs")]
    pub refresh_token_ttl_secs: u64,
    /// bcrypt work factor for new password hashes.
    #[serde(default = "default_bcrypt_cost")]
    pub bcrypt_cost: u32,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            access_token_ttl_secs: default_access_token_ttl_secs(),
            refresh_token_ttl_secs: default_refresh_token_ttl_secs(),
            bcrypt_cost: default_bcrypt_cost(),
        }
    }
}

impl AuthConfig {
    /// Returns the access token lifetime.
    #[must_use]
    pub const fn access_token_ttl(&self) -> Duration {
        Duration::from_secs(self.access_token_ttl_secs)
    }

    /// Returns the refresh token lifetime.
    #[must_use]
    pub const fn refresh_token_ttl(&self) -> Duration {
        Duration::from_secs(self.refresh_token_ttl_secs)
    }

    /// Validates auth configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_ACCESS_TOKEN_TTL_SECS ..= MAX_ACCESS_TOKEN_TTL_SECS)
            .contains(&self.access_token_ttl_secs)
        {
            return Err(ConfigError::Invalid(format!(
                "auth.access_token_ttl_secs must be between {MIN_ACCESS_TOKEN_TTL_SECS} and \
                 {MAX_ACCESS_TOKEN_TTL_SECS}"
            )));
        }
        if self.refresh_token_ttl_secs <= self.access_token_ttl_secs {
            return Err(ConfigError::Invalid(
                "auth.refresh_token_ttl_secs must exceed auth.access_token_ttl_secs".to_string(),
            ));
        }
        if self.refresh_token_ttl_secs > MAX_REFRESH_TOKEN_TTL_SECS {
            return Err(ConfigError::Invalid("auth.refresh_token_ttl_secs too large".to_string()));
        }
        if !(MIN_BCRYPT_COST ..= MAX_BCRYPT_COST).contains(&self.bcrypt_cost) {
            return Err(ConfigError::Invalid(format!(
                "auth.bcrypt_cost must be between {MIN_BCRYPT_COST} and {MAX_BCRYPT_COST}"
            )));
        }
        Ok(())
    }
}

/// Object store configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    /// Store backend type.
    #[serde(rename = "type", default)]
    pub store_type: StoreType,
    /// `SQLite` database path when using the sqlite backend.
    #[serde(default)]
    pub path: Option<PathBuf>,
    /// Busy timeout in milliseconds.
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
    /// `SQLite` journal mode.
    #[serde(default)]
    pub journal_mode: SqliteStoreMode,
    /// `SQLite` synchronous mode.
    #[serde(default)]
    pub sync_mode: SqliteSyncMode,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            store_type: StoreType::default(),
            path: None,
            busy_timeout_ms: default_busy_timeout_ms(),
            journal_mode: SqliteStoreMode::default(),
            sync_mode: SqliteSyncMode::default(),
        }
    }
}

impl StoreConfig {
    /// Returns the `SQLite` store settings for the sqlite backend.
    #[must_use]
    pub fn sqlite(&self) -> Option<SqliteStoreConfig> {
        match (self.store_type, &self.path) {
            (StoreType::Sqlite, Some(path)) => Some(SqliteStoreConfig {
                path: path.clone(),
                busy_timeout_ms: self.busy_timeout_ms,
                journal_mode: self.journal_mode,
                sync_mode: self.sync_mode,
            }),
            _ => None,
        }
    }

    /// Validates store configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        match self.store_type {
            StoreType::Memory => {
                if self.path.is_some() {
                    return Err(ConfigError::Invalid("memory store must not set path".to_string()));
                }
                Ok(())
            }
            StoreType::Sqlite => {
                let path = self
                    .path
                    .as_ref()
                    .ok_or_else(|| ConfigError::Invalid("sqlite store requires path".to_string()))?;
                validate_path_string("store.path", &path.to_string_lossy())
            }
        }
    }
}

/// Object store backend type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum StoreType {
    /// Use the in-memory store.
    #[default]
    Memory,
    /// Use the `SQLite`-backed durable store.
    Sqlite,
}

/// Request validation limits.
#[derive(Debug, Clone, Deserialize)]
pub struct LimitsConfig {
    /// Maximum node pool replica count.
    #[serde(default = "default_max_replicas")]
    pub max_replicas: u32,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_replicas: default_max_replicas(),
        }
    }
}

impl LimitsConfig {
    /// Validates limits configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.max_replicas == 0 || self.max_replicas > MAX_MAX_REPLICAS {
            return Err(ConfigError::Invalid(format!(
                "limits.max_replicas must be between 1 and {MAX_MAX_REPLICAS}"
            )));
        }
        Ok(())
    }
}

/// Audit logging configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuditConfig {
    /// Audit sink.
    #[serde(default)]
    pub sink: AuditSinkType,
    /// Audit log path (JSON lines) for the file sink.
    #[serde(default)]
    pub path: Option<String>,
}

impl AuditConfig {
    /// Validates audit configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        match (self.sink, &self.path) {
            (AuditSinkType::File, None) => {
                Err(ConfigError::Invalid("file audit sink requires audit.path".to_string()))
            }
            (AuditSinkType::File, Some(path)) => validate_path_string("audit.path", path),
            (_, Some(_)) => {
                Err(ConfigError::Invalid("audit.path is only valid for the file sink".to_string()))
            }
            (_, None) => Ok(()),
        }
    }
}

/// Audit sink selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AuditSinkType {
    /// JSON lines on stderr.
    #[default]
    Stderr,
    /// JSON lines appended to a file.
    File,
    /// Discard audit events.
    None,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O failure while reading configuration.
    #[error("config io error: {0}")]
    Io(String),
    /// TOML parsing error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Invalid configuration data.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Resolves the config path from CLI or environment defaults.
fn resolve_path(path: Option<&Path>) -> Result<PathBuf, ConfigError> {
    if let Some(path) = path {
        return Ok(path.to_path_buf());
    }
    if let Ok(env_path) = env::var(CONFIG_ENV_VAR) {
        if env_path.len() > MAX_TOTAL_PATH_LENGTH {
            return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
        }
        return Ok(PathBuf::from(env_path));
    }
    Ok(PathBuf::from(DEFAULT_CONFIG_NAME))
}

/// Validates the resolved path against security limits.
fn validate_path(path: &Path) -> Result<(), ConfigError> {
    let text = path.to_string_lossy();
    if text.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
    }
    for component in path.components() {
        let value = component.as_os_str().to_string_lossy();
        if value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid("config path component too long".to_string()));
        }
    }
    Ok(())
}

/// Validates a path string against length constraints.
fn validate_path_string(field: &str, value: &str) -> Result<(), ConfigError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::Invalid(format!("{field} must be non-empty")));
    }
    if trimmed.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid(format!("{field} exceeds max length")));
    }
    for component in Path::new(trimmed).components() {
        if component.as_os_str().len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid(format!("{field} path component too long")));
        }
    }
    Ok(())
}

/// Default global namespace.
fn default_global_namespace() -> String {
    DEFAULT_GLOBAL_NAMESPACE.to_string()
}

/// Default bind address.
fn default_bind() -> String {
    DEFAULT_BIND.to_string()
}

/// Default maximum request body size.
const fn default_max_body_bytes() -> usize {
    DEFAULT_MAX_BODY_BYTES
}

/// Default access token lifetime.
const fn default_access_token_ttl_secs() -> u64 {
    DEFAULT_ACCESS_TOKEN_TTL_SECS
}

/// Default refresh token lifetime.
const fn default_refresh_token_ttl_secs() -> u64 {
    DEFAULT_REFRESH_TOKEN_TTL_SECS
}

/// Default bcrypt cost.
const fn default_bcrypt_cost() -> u32 {
    DEFAULT_BCRYPT_COST
}

/// Default replica cap.
const fn default_max_replicas() -> u32 {
    DEFAULT_MAX_REPLICAS
}

/// Default `SQLite` busy timeout.
const fn default_busy_timeout_ms() -> u64 {
    DEFAULT_BUSY_TIMEOUT_MS
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::validate_path_string;

    #[test]
    fn validate_path_string_rejects_empty_string() {
        assert!(validate_path_string("test_path", "").is_err());
        assert!(validate_path_string("test_path", "   ").is_err());
    }

    #[test]
    fn validate_path_string_rejects_overlong_component() {
        let long = "a".repeat(256);
        assert!(validate_path_string("test_path", &long).is_err());
        assert!(validate_path_string("test_path", "./data/dockyards.db").is_ok());
    }
}
