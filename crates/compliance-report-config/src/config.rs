// crates/compliance-report-config/src/config.rs
// ============================================================================
// Module: Compliance Report Configuration
// Description: Configuration loading and validation for the report engine.
// Purpose: Provide strict, fail-closed config parsing with hard limits.
// Dependencies: compliance-report-core, compliance-report-store-sqlite, serde, toml
// ============================================================================

//! ## Overview
//! Configuration is loaded from a TOML file with strict size and path limits.
//! Missing or invalid configuration fails closed.
//!
//! ```toml
//! [report]
//! labels = { "app.kubernetes.io/managed-by" = "compliance-report" }
//!
//! [kinds.scanners]
//! kube-bench = ["Node"]
//!
//! [store]
//! type = "sqlite"
//! path = "/var/lib/compliance-report/reports.db"
//!
//! [sources]
//! root = "/var/lib/compliance-report/resources"
//!
//! [audit]
//! sink = "stderr"
//! ```

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::Path;
use std::path::PathBuf;

use compliance_report_core::runtime::CONFIG_AUDIT_SCANNER;
use compliance_report_core::runtime::KUBE_BENCH_SCANNER;
use compliance_report_core::SPEC_HASH_LABEL;
use compliance_report_scanners::file_source::DEFAULT_MAX_FILE_BYTES;
use compliance_report_scanners::file_source::DEFAULT_MAX_FILES;
use compliance_report_store_sqlite::SqliteStoreMode;
use compliance_report_store_sqlite::SqliteSyncMode;
use serde::Deserialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
const DEFAULT_CONFIG_NAME: &str = "compliance-report.toml";
/// Environment variable used to override the config path.
pub(crate) const CONFIG_ENV_VAR: &str = "COMPLIANCE_REPORT_CONFIG";
/// Maximum configuration file size in bytes.
pub(crate) const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Maximum length of a single path component.
pub(crate) const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
pub(crate) const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Maximum number of static report labels.
pub(crate) const MAX_REPORT_LABELS: usize = 64;
/// Maximum length of a label key.
pub(crate) const MAX_LABEL_KEY_LENGTH: usize = 253;
/// Maximum length of a label value.
pub(crate) const MAX_LABEL_VALUE_LENGTH: usize = 63;
/// Maximum number of scanner kind overrides.
pub(crate) const MAX_KIND_OVERRIDES: usize = 64;
/// Maximum number of kinds declared for one scanner.
pub(crate) const MAX_KINDS_PER_SCANNER: usize = 32;
/// Maximum length of a scanner or kind name.
pub(crate) const MAX_NAME_LENGTH: usize = 128;
/// Maximum allowed resource file size in bytes.
pub(crate) const MAX_SOURCE_FILE_BYTES: usize = 64 * 1024 * 1024;
/// Maximum allowed number of resource files per directory.
pub(crate) const MAX_SOURCE_FILES: usize = 1_000_000;
/// Default busy timeout for the sqlite store (ms).
const DEFAULT_STORE_BUSY_TIMEOUT_MS: u64 = 5_000;
/// Maximum busy timeout for the sqlite store (ms).
pub(crate) const MAX_STORE_BUSY_TIMEOUT_MS: u64 = 60_000;
/// Scanner identities with built-in mappers.
pub(crate) const BUILTIN_SCANNERS: [&str; 2] = [KUBE_BENCH_SCANNER, CONFIG_AUDIT_SCANNER];

// ============================================================================
// SECTION: Configuration Types
// ============================================================================

/// Compliance report engine configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ComplianceReportConfig {
    /// Report output configuration.
    #[serde(default)]
    pub report: ReportConfig,
    /// Kind policy overrides.
    #[serde(default)]
    pub kinds: KindsConfig,
    /// Report store configuration.
    #[serde(default)]
    pub store: ReportStoreConfig,
    /// Resource source configuration.
    #[serde(default)]
    pub sources: SourcesConfig,
    /// Audit sink configuration.
    #[serde(default)]
    pub audit: AuditConfig,
}

impl ComplianceReportConfig {
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
        Self::from_toml_str(content)
    }

    /// Parses and validates configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when parsing or validation fails.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.report.validate()?;
        self.kinds.validate()?;
        self.store.validate()?;
        self.sources.validate()?;
        self.audit.validate()?;
        Ok(())
    }
}

/// Report output configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReportConfig {
    /// Static labels written to both reports.
    #[serde(default)]
    pub labels: BTreeMap<String, String>,
}

impl ReportConfig {
    /// Validates static labels.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.labels.len() > MAX_REPORT_LABELS {
            return Err(ConfigError::Invalid(format!(
                "report.labels exceeds {MAX_REPORT_LABELS} entries"
            )));
        }
        for (key, value) in &self.labels {
            if key.trim().is_empty() {
                return Err(ConfigError::Invalid("report.labels key must be non-empty".to_string()));
            }
            if key.len() > MAX_LABEL_KEY_LENGTH {
                return Err(ConfigError::Invalid(format!("report.labels key {key} too long")));
            }
            if value.len() > MAX_LABEL_VALUE_LENGTH {
                return Err(ConfigError::Invalid(format!("report.labels value for {key} too long")));
            }
            if key == SPEC_HASH_LABEL {
                return Err(ConfigError::Invalid(format!(
                    "report.labels must not set reserved label {SPEC_HASH_LABEL}"
                )));
            }
        }
        Ok(())
    }
}

/// Kind policy overrides.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct KindsConfig {
    /// Drop the built-in scanner defaults before applying overrides.
    #[serde(default)]
    pub replace_builtin: bool,
    /// Declared kinds used when a control declares none, keyed by scanner.
    #[serde(default)]
    pub scanners: BTreeMap<String, Vec<String>>,
}

impl KindsConfig {
    /// Validates kind overrides.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.scanners.len() > MAX_KIND_OVERRIDES {
            return Err(ConfigError::Invalid(format!(
                "kinds.scanners exceeds {MAX_KIND_OVERRIDES} entries"
            )));
        }
        for (scanner, kinds) in &self.scanners {
            validate_name("kinds.scanners key", scanner)?;
            if kinds.len() > MAX_KINDS_PER_SCANNER {
                return Err(ConfigError::Invalid(format!(
                    "kinds.scanners.{scanner} exceeds {MAX_KINDS_PER_SCANNER} kinds"
                )));
            }
            for kind in kinds {
                validate_name(&format!("kinds.scanners.{scanner}"), kind)?;
            }
        }
        Ok(())
    }
}

/// Report store configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ReportStoreConfig {
    /// Store backend type.
    #[serde(rename = "type", default)]
    pub store_type: ReportStoreType,
    /// `SQLite` database path when using the sqlite backend.
    #[serde(default)]
    pub path: Option<PathBuf>,
    /// Busy timeout in milliseconds.
    #[serde(default = "default_store_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
    /// `SQLite` journal mode.
    #[serde(default)]
    pub journal_mode: SqliteStoreMode,
    /// `SQLite` synchronous mode.
    #[serde(default)]
    pub sync_mode: SqliteSyncMode,
    /// Optional max snapshots to retain per report.
    #[serde(default)]
    pub max_versions: Option<u64>,
}

impl Default for ReportStoreConfig {
    fn default() -> Self {
        Self {
            store_type: ReportStoreType::default(),
            path: None,
            busy_timeout_ms: default_store_busy_timeout_ms(),
            journal_mode: SqliteStoreMode::default(),
            sync_mode: SqliteSyncMode::default(),
            max_versions: None,
        }
    }
}

impl ReportStoreConfig {
    /// Validates report store configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        match self.store_type {
            ReportStoreType::Memory => {
                if self.path.is_some() {
                    return Err(ConfigError::Invalid("memory store must not set path".to_string()));
                }
                Ok(())
            }
            ReportStoreType::Sqlite => {
                let path = self.path.as_ref().ok_or_else(|| {
                    ConfigError::Invalid("sqlite store requires path".to_string())
                })?;
                validate_path_string("store.path", &path.to_string_lossy())?;
                if self.busy_timeout_ms > MAX_STORE_BUSY_TIMEOUT_MS {
                    return Err(ConfigError::Invalid(format!(
                        "store.busy_timeout_ms must be at most {MAX_STORE_BUSY_TIMEOUT_MS}"
                    )));
                }
                if self.max_versions == Some(0) {
                    return Err(ConfigError::Invalid(
                        "store max_versions must be greater than zero".to_string(),
                    ));
                }
                Ok(())
            }
        }
    }
}

/// Report store backend type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ReportStoreType {
    /// Use the in-memory store.
    #[default]
    Memory,
    /// Use `SQLite`-backed durable store.
    Sqlite,
}

/// File resource source configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct SourcesConfig {
    /// Root directory holding `<scanner>/<kind>/` resource files.
    #[serde(default)]
    pub root: Option<PathBuf>,
    /// Maximum size of one resource file in bytes.
    #[serde(default = "default_max_file_bytes")]
    pub max_file_bytes: usize,
    /// Maximum number of files per directory.
    #[serde(default = "default_max_files")]
    pub max_files: usize,
    /// Accept YAML resource files.
    #[serde(default = "default_allow_yaml")]
    pub allow_yaml: bool,
    /// Scanners whose mappers are enabled; empty enables all built-in ones.
    #[serde(default)]
    pub enabled_scanners: Vec<String>,
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            root: None,
            max_file_bytes: default_max_file_bytes(),
            max_files: default_max_files(),
            allow_yaml: default_allow_yaml(),
            enabled_scanners: Vec::new(),
        }
    }
}

impl SourcesConfig {
    /// Validates resource source configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        let root = self
            .root
            .as_ref()
            .ok_or_else(|| ConfigError::Invalid("sources.root must be set".to_string()))?;
        validate_path_string("sources.root", &root.to_string_lossy())?;
        if self.max_file_bytes == 0 || self.max_file_bytes > MAX_SOURCE_FILE_BYTES {
            return Err(ConfigError::Invalid(format!(
                "sources.max_file_bytes must be between 1 and {MAX_SOURCE_FILE_BYTES}"
            )));
        }
        if self.max_files == 0 || self.max_files > MAX_SOURCE_FILES {
            return Err(ConfigError::Invalid(format!(
                "sources.max_files must be between 1 and {MAX_SOURCE_FILES}"
            )));
        }
        for scanner in &self.enabled_scanners {
            if !BUILTIN_SCANNERS.contains(&scanner.as_str()) {
                return Err(ConfigError::Invalid(format!(
                    "sources.enabled_scanners contains unknown scanner {scanner}"
                )));
            }
        }
        Ok(())
    }
}

/// Audit sink configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuditConfig {
    /// Audit sink type.
    #[serde(default)]
    pub sink: AuditSinkType,
    /// Output path for the file sink.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

impl AuditConfig {
    /// Validates audit sink configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        match self.sink {
            AuditSinkType::File => {
                let path = self.path.as_ref().ok_or_else(|| {
                    ConfigError::Invalid("file audit sink requires path".to_string())
                })?;
                validate_path_string("audit.path", &path.to_string_lossy())
            }
            AuditSinkType::Stderr | AuditSinkType::None => {
                if self.path.is_some() {
                    return Err(ConfigError::Invalid(
                        "audit.path is only valid for the file sink".to_string(),
                    ));
                }
                Ok(())
            }
        }
    }
}

/// Audit sink type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AuditSinkType {
    /// JSON lines on stderr.
    Stderr,
    /// JSON lines appended to a file.
    File,
    /// Discard audit events.
    #[default]
    None,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration loading, validation, or build errors.
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
    /// A configured collaborator failed to initialize.
    #[error("config init error: {0}")]
    Init(String),
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Default busy timeout for the sqlite store.
const fn default_store_busy_timeout_ms() -> u64 {
    DEFAULT_STORE_BUSY_TIMEOUT_MS
}

/// Default maximum resource file size.
const fn default_max_file_bytes() -> usize {
    DEFAULT_MAX_FILE_BYTES
}

/// Default maximum resource files per directory.
const fn default_max_files() -> usize {
    DEFAULT_MAX_FILES
}

/// YAML resources are accepted unless disabled.
const fn default_allow_yaml() -> bool {
    true
}

/// Resolves the config path from the argument or environment defaults.
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

/// Validates a configured path string against length constraints.
fn validate_path_string(field: &str, value: &str) -> Result<(), ConfigError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::Invalid(format!("{field} must be non-empty")));
    }
    if trimmed.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid(format!("{field} exceeds max length")));
    }
    for component in Path::new(trimmed).components() {
        let component_value = component.as_os_str().to_string_lossy();
        if component_value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid(format!("{field} path component too long")));
        }
    }
    Ok(())
}

/// Validates a scanner or kind name.
fn validate_name(field: &str, value: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::Invalid(format!("{field} must be non-empty")));
    }
    if value.len() > MAX_NAME_LENGTH {
        return Err(ConfigError::Invalid(format!("{field} exceeds max length")));
    }
    Ok(())
}
