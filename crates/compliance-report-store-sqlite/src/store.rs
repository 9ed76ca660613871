// crates/compliance-report-store-sqlite/src/store.rs
// ============================================================================
// Module: SQLite Report Store
// Description: Durable ReportStore backed by SQLite WAL.
// Purpose: Persist report snapshots with deterministic serialization.
// Dependencies: compliance-report-core, rusqlite, serde, serde_json, thiserror
// ============================================================================

//! ## Overview
//! This module implements a durable [`ReportStore`] using `SQLite`. Every
//! create or update appends a canonical JSON snapshot to a version table and
//! advances the record's revision. Updates must carry the current revision;
//! anything else is a conflict. Loads verify integrity via stored hashes and
//! fail closed on corruption.
//! Security posture: database contents are untrusted.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use compliance_report_core::DetailReport;
use compliance_report_core::ReportRecord;
use compliance_report_core::ReportStore;
use compliance_report_core::StoreError;
use compliance_report_core::SummaryReport;
use compliance_report_core::hashing::DEFAULT_HASH_ALGORITHM;
use compliance_report_core::hashing::HashAlgorithm;
use compliance_report_core::hashing::canonical_json_bytes;
use compliance_report_core::hashing::hash_bytes;
use rusqlite::Connection;
use rusqlite::OpenFlags;
use rusqlite::OptionalExtension;
use rusqlite::Transaction;
use rusqlite::params;
use serde::Deserialize;
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// `SQLite` schema version for the store.
const SCHEMA_VERSION: i64 = 1;
/// Default busy timeout (ms).
const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;
/// Maximum length of a single path component.
const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Maximum length of a report name.
const MAX_REPORT_NAME_LENGTH: usize = 253;
/// Maximum report snapshot size accepted by the store.
pub const MAX_REPORT_BYTES: usize = 16 * 1024 * 1024;

// ============================================================================
// SECTION: Config
// ============================================================================

/// `SQLite` journal mode configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SqliteStoreMode {
    /// WAL journal mode (recommended).
    #[default]
    Wal,
    /// Delete journal mode (legacy).
    Delete,
}

impl SqliteStoreMode {
    /// Returns the `SQLite` pragma value.
    #[must_use]
    pub const fn pragma_value(self) -> &'static str {
        match self {
            Self::Wal => "wal",
            Self::Delete => "delete",
        }
    }
}

/// `SQLite` sync mode configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SqliteSyncMode {
    /// Full synchronous mode (safest).
    #[default]
    Full,
    /// Normal synchronous mode (balanced).
    Normal,
}

impl SqliteSyncMode {
    /// Returns the `SQLite` pragma value.
    #[must_use]
    pub const fn pragma_value(self) -> &'static str {
        match self {
            Self::Full => "full",
            Self::Normal => "normal",
        }
    }
}

/// Configuration for the `SQLite` report store.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SqliteStoreConfig {
    /// Path to the `SQLite` database file.
    pub path: PathBuf,
    /// Busy timeout in milliseconds.
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
    /// `SQLite` journal mode.
    #[serde(default)]
    pub journal_mode: SqliteStoreMode,
    /// `SQLite` sync mode.
    #[serde(default)]
    pub sync_mode: SqliteSyncMode,
    /// Optional maximum snapshots kept per report (older ones pruned).
    #[serde(default)]
    pub max_versions: Option<u64>,
}

impl SqliteStoreConfig {
    /// Creates a configuration with default settings for a database path.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            busy_timeout_ms: DEFAULT_BUSY_TIMEOUT_MS,
            journal_mode: SqliteStoreMode::default(),
            sync_mode: SqliteSyncMode::default(),
            max_versions: None,
        }
    }
}

/// Returns the default busy timeout for `SQLite` connections.
const fn default_busy_timeout_ms() -> u64 {
    DEFAULT_BUSY_TIMEOUT_MS
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// `SQLite` store errors.
#[derive(Debug, Error)]
pub enum SqliteStoreError {
    /// Store I/O error.
    #[error("sqlite store io error: {0}")]
    Io(String),
    /// `SQLite` engine error.
    #[error("sqlite store db error: {0}")]
    Db(String),
    /// Store corruption or hash mismatch.
    #[error("sqlite store corruption: {0}")]
    Corrupt(String),
    /// Store schema version mismatch.
    #[error("sqlite store version mismatch: {0}")]
    VersionMismatch(String),
    /// Invalid store data.
    #[error("sqlite store invalid data: {0}")]
    Invalid(String),
    /// Update was based on a stale revision.
    #[error("sqlite store conflict: {0}")]
    Conflict(String),
    /// Create targeted an existing record.
    #[error("sqlite store record already exists: {0}")]
    AlreadyExists(String),
    /// Store payload exceeded configured size limits.
    #[error("sqlite store payload too large: {actual_bytes} bytes (max {max_bytes})")]
    TooLarge {
        /// Maximum allowed bytes.
        max_bytes: usize,
        /// Actual payload size in bytes.
        actual_bytes: usize,
    },
}

impl From<SqliteStoreError> for StoreError {
    fn from(error: SqliteStoreError) -> Self {
        match error {
            SqliteStoreError::Io(message) => Self::Io(message),
            SqliteStoreError::Db(message) => Self::Store(message),
            SqliteStoreError::Corrupt(message) => Self::Corrupt(message),
            SqliteStoreError::VersionMismatch(message) => Self::VersionMismatch(message),
            SqliteStoreError::Invalid(message) => Self::Invalid(message),
            SqliteStoreError::Conflict(message) => Self::Conflict(message),
            SqliteStoreError::AlreadyExists(message) => Self::AlreadyExists(message),
            SqliteStoreError::TooLarge {
                max_bytes,
                actual_bytes,
            } => Self::Invalid(format!(
                "report_json exceeds size limit: {actual_bytes} bytes (max {max_bytes})"
            )),
        }
    }
}

// ============================================================================
// SECTION: Store
// ============================================================================

/// Write intent for a report snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WriteMode {
    /// Insert a new record at revision 1.
    Create,
    /// Replace an existing record at its current revision.
    Update,
}

/// `SQLite`-backed report store with WAL support.
#[derive(Clone)]
pub struct SqliteReportStore {
    /// Store configuration.
    config: SqliteStoreConfig,
    /// Shared `SQLite` connection guarded by a mutex.
    connection: Arc<Mutex<Connection>>,
}

impl SqliteReportStore {
    /// Opens an `SQLite`-backed report store.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteStoreError`] when the database cannot be opened or
    /// initialized.
    pub fn new(config: SqliteStoreConfig) -> Result<Self, SqliteStoreError> {
        validate_store_path(&config.path)?;
        ensure_parent_dir(&config.path)?;
        let mut connection = open_connection(&config)?;
        initialize_schema(&mut connection)?;
        Ok(Self {
            config,
            connection: Arc::new(Mutex::new(connection)),
        })
    }

    /// Returns the store configuration.
    #[must_use]
    pub const fn config(&self) -> &SqliteStoreConfig {
        &self.config
    }

    /// Locks the shared connection.
    fn lock(&self) -> Result<MutexGuard<'_, Connection>, SqliteStoreError> {
        self.connection.lock().map_err(|_| SqliteStoreError::Db("mutex poisoned".to_string()))
    }

    /// Loads the latest snapshot of a record.
    fn load_record<T>(&self, name: &str) -> Result<Option<T>, SqliteStoreError>
    where
        T: ReportRecord + DeserializeOwned,
    {
        let row = {
            let mut guard = self.lock()?;
            let tx = guard.transaction().map_err(|err| SqliteStoreError::Db(err.to_string()))?;
            let row = match latest_revision(&tx, T::RECORD_KIND, name)? {
                None => None,
                Some(revision) => Some((revision, read_snapshot(&tx, T::RECORD_KIND, name, revision)?)),
            };
            tx.commit().map_err(|err| SqliteStoreError::Db(err.to_string()))?;
            drop(guard);
            row
        };
        let Some((revision, (bytes, hash_value, hash_algorithm))) = row else {
            return Ok(None);
        };
        let algorithm = parse_hash_algorithm(&hash_algorithm)?;
        let expected = hash_bytes(algorithm, &bytes);
        if expected.value != hash_value {
            return Err(SqliteStoreError::Corrupt(format!(
                "hash mismatch for {} report {name}",
                T::RECORD_KIND
            )));
        }
        let record: T = serde_json::from_slice(&bytes)
            .map_err(|err| SqliteStoreError::Invalid(err.to_string()))?;
        if record.metadata().name != name {
            return Err(SqliteStoreError::Invalid(
                "report name mismatch between key and payload".to_string(),
            ));
        }
        if i64::try_from(record.metadata().revision).ok() != Some(revision) {
            return Err(SqliteStoreError::Corrupt(format!(
                "revision mismatch between key and payload for {} report {name}",
                T::RECORD_KIND
            )));
        }
        Ok(Some(record))
    }

    /// Writes a new snapshot of a record and returns it as stored.
    fn write_record<T>(&self, record: &T, mode: WriteMode) -> Result<T, SqliteStoreError>
    where
        T: ReportRecord + Serialize,
    {
        let name = record.metadata().name.clone();
        validate_report_name(&name)?;
        let saved_at = unix_millis();
        let mut guard = self.lock()?;
        let tx = guard.transaction().map_err(|err| SqliteStoreError::Db(err.to_string()))?;
        let current = latest_revision(&tx, T::RECORD_KIND, &name)?;
        let next_revision = match (mode, current) {
            (WriteMode::Create, None) => 1,
            (WriteMode::Create, Some(_)) => {
                return Err(SqliteStoreError::AlreadyExists(format!(
                    "{} report {name}",
                    T::RECORD_KIND
                )));
            }
            (WriteMode::Update, None) => {
                return Err(SqliteStoreError::Invalid(format!(
                    "{} report {name} does not exist",
                    T::RECORD_KIND
                )));
            }
            (WriteMode::Update, Some(current)) => {
                let based_on = i64::try_from(record.metadata().revision)
                    .map_err(|_| SqliteStoreError::Invalid("revision too large".to_string()))?;
                if based_on != current {
                    return Err(SqliteStoreError::Conflict(format!(
                        "{} report {name} is at revision {current}, update based on {based_on}",
                        T::RECORD_KIND
                    )));
                }
                current.checked_add(1).ok_or_else(|| {
                    SqliteStoreError::Corrupt(format!(
                        "revision overflow for {} report {name}",
                        T::RECORD_KIND
                    ))
                })?
            }
        };
        let mut stored = record.clone();
        stored.metadata_mut().revision = u64::try_from(next_revision)
            .map_err(|_| SqliteStoreError::Corrupt("negative revision".to_string()))?;
        let canonical_json = canonical_json_bytes(&stored)
            .map_err(|err| SqliteStoreError::Invalid(err.to_string()))?;
        if canonical_json.len() > MAX_REPORT_BYTES {
            return Err(SqliteStoreError::TooLarge {
                max_bytes: MAX_REPORT_BYTES,
                actual_bytes: canonical_json.len(),
            });
        }
        let digest = hash_bytes(DEFAULT_HASH_ALGORITHM, &canonical_json);
        tx.execute(
            "INSERT INTO reports (record_kind, name, latest_revision) VALUES (?1, ?2, ?3) ON \
             CONFLICT(record_kind, name) DO UPDATE SET latest_revision = excluded.latest_revision",
            params![T::RECORD_KIND, name, next_revision],
        )
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
        tx.execute(
            "INSERT INTO report_versions (record_kind, name, revision, report_json, report_hash, \
             hash_algorithm, saved_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                T::RECORD_KIND,
                name,
                next_revision,
                canonical_json,
                digest.value,
                digest.algorithm.label(),
                saved_at
            ],
        )
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
        enforce_retention(&tx, T::RECORD_KIND, &name, next_revision, self.config.max_versions)?;
        tx.commit().map_err(|err| SqliteStoreError::Db(err.to_string()))?;
        drop(guard);
        Ok(stored)
    }
}

impl ReportStore for SqliteReportStore {
    fn load_summary(&self, name: &str) -> Result<Option<SummaryReport>, StoreError> {
        self.load_record(name).map_err(StoreError::from)
    }

    fn create_summary(&self, report: &SummaryReport) -> Result<SummaryReport, StoreError> {
        self.write_record(report, WriteMode::Create).map_err(StoreError::from)
    }

    fn update_summary(&self, report: &SummaryReport) -> Result<SummaryReport, StoreError> {
        self.write_record(report, WriteMode::Update).map_err(StoreError::from)
    }

    fn load_detail(&self, name: &str) -> Result<Option<DetailReport>, StoreError> {
        self.load_record(name).map_err(StoreError::from)
    }

    fn create_detail(&self, report: &DetailReport) -> Result<DetailReport, StoreError> {
        self.write_record(report, WriteMode::Create).map_err(StoreError::from)
    }

    fn update_detail(&self, report: &DetailReport) -> Result<DetailReport, StoreError> {
        self.write_record(report, WriteMode::Update).map_err(StoreError::from)
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Snapshot bytes with their stored hash and algorithm label.
type Snapshot = (Vec<u8>, String, String);

/// Returns the latest revision of a record, validating its range.
fn latest_revision(
    tx: &Transaction<'_>,
    record_kind: &str,
    name: &str,
) -> Result<Option<i64>, SqliteStoreError> {
    let latest: Option<i64> = tx
        .query_row(
            "SELECT latest_revision FROM reports WHERE record_kind = ?1 AND name = ?2",
            params![record_kind, name],
            |row| row.get(0),
        )
        .optional()
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    match latest {
        Some(value) if value < 1 => Err(SqliteStoreError::Corrupt(format!(
            "invalid latest_revision for {record_kind} report {name}"
        ))),
        other => Ok(other),
    }
}

/// Reads a stored snapshot after checking its size.
fn read_snapshot(
    tx: &Transaction<'_>,
    record_kind: &str,
    name: &str,
    revision: i64,
) -> Result<Snapshot, SqliteStoreError> {
    let metadata = tx
        .query_row(
            "SELECT length(report_json), report_hash, hash_algorithm FROM report_versions WHERE \
             record_kind = ?1 AND name = ?2 AND revision = ?3",
            params![record_kind, name, revision],
            |row| {
                let length: i64 = row.get(0)?;
                let hash: String = row.get(1)?;
                let algorithm: String = row.get(2)?;
                Ok((length, hash, algorithm))
            },
        )
        .optional()
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    let Some((length, hash, algorithm)) = metadata else {
        return Err(SqliteStoreError::Corrupt(format!(
            "missing revision {revision} for {record_kind} report {name}"
        )));
    };
    let length = usize::try_from(length).map_err(|_| {
        SqliteStoreError::Invalid(format!("negative report length for {record_kind} report {name}"))
    })?;
    if length > MAX_REPORT_BYTES {
        return Err(SqliteStoreError::TooLarge {
            max_bytes: MAX_REPORT_BYTES,
            actual_bytes: length,
        });
    }
    let bytes: Vec<u8> = tx
        .query_row(
            "SELECT report_json FROM report_versions WHERE record_kind = ?1 AND name = ?2 AND \
             revision = ?3",
            params![record_kind, name, revision],
            |row| row.get(0),
        )
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    Ok((bytes, hash, algorithm))
}

/// Validates a report name before it is used as a key.
fn validate_report_name(name: &str) -> Result<(), SqliteStoreError> {
    if name.is_empty() {
        return Err(SqliteStoreError::Invalid("report name is empty".to_string()));
    }
    if name.len() > MAX_REPORT_NAME_LENGTH {
        return Err(SqliteStoreError::Invalid("report name exceeds length limit".to_string()));
    }
    Ok(())
}

/// Ensures the parent directory for the store exists.
fn ensure_parent_dir(path: &Path) -> Result<(), SqliteStoreError> {
    let Some(parent) = path.parent() else {
        return Err(SqliteStoreError::Io("store path missing parent directory".to_string()));
    };
    std::fs::create_dir_all(parent).map_err(|err| SqliteStoreError::Io(err.to_string()))
}

/// Validates store paths for safety limits.
fn validate_store_path(path: &Path) -> Result<(), SqliteStoreError> {
    let path_string = path.display().to_string();
    if path_string.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(SqliteStoreError::Invalid("store path exceeds length limit".to_string()));
    }
    for component in path.components() {
        let name = component.as_os_str().to_string_lossy();
        if name.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(SqliteStoreError::Invalid(
                "store path contains an overlong component".to_string(),
            ));
        }
    }
    if path.is_dir() {
        return Err(SqliteStoreError::Invalid(
            "store path must be a file, not a directory".to_string(),
        ));
    }
    Ok(())
}

/// Opens an `SQLite` connection with secure defaults.
fn open_connection(config: &SqliteStoreConfig) -> Result<Connection, SqliteStoreError> {
    let flags = OpenFlags::SQLITE_OPEN_READ_WRITE
        | OpenFlags::SQLITE_OPEN_CREATE
        | OpenFlags::SQLITE_OPEN_FULL_MUTEX;
    let connection = Connection::open_with_flags(&config.path, flags)
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    apply_pragmas(&connection, config)?;
    Ok(connection)
}

/// Applies `SQLite` pragmas required for durability.
fn apply_pragmas(
    connection: &Connection,
    config: &SqliteStoreConfig,
) -> Result<(), SqliteStoreError> {
    connection
        .execute_batch("PRAGMA foreign_keys = ON;")
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    connection
        .execute_batch(&format!("PRAGMA journal_mode = {};", config.journal_mode.pragma_value()))
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    connection
        .execute_batch(&format!("PRAGMA synchronous = {};", config.sync_mode.pragma_value()))
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    connection
        .busy_timeout(std::time::Duration::from_millis(config.busy_timeout_ms))
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    Ok(())
}

/// Initializes the `SQLite` schema or validates existing version.
fn initialize_schema(connection: &mut Connection) -> Result<(), SqliteStoreError> {
    let tx = connection.transaction().map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    tx.execute_batch("CREATE TABLE IF NOT EXISTS store_meta (version INTEGER NOT NULL);")
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    let version: Option<i64> = tx
        .query_row("SELECT version FROM store_meta LIMIT 1", params![], |row| row.get(0))
        .optional()
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    match version {
        None => {
            tx.execute("INSERT INTO store_meta (version) VALUES (?1)", params![SCHEMA_VERSION])
                .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
            tx.execute_batch(
                "CREATE TABLE IF NOT EXISTS reports (
                    record_kind TEXT NOT NULL,
                    name TEXT NOT NULL,
                    latest_revision INTEGER NOT NULL,
                    PRIMARY KEY (record_kind, name)
                );
                CREATE TABLE IF NOT EXISTS report_versions (
                    record_kind TEXT NOT NULL,
                    name TEXT NOT NULL,
                    revision INTEGER NOT NULL,
                    report_json BLOB NOT NULL,
                    report_hash TEXT NOT NULL,
                    hash_algorithm TEXT NOT NULL,
                    saved_at INTEGER NOT NULL,
                    PRIMARY KEY (record_kind, name, revision),
                    FOREIGN KEY (record_kind, name) REFERENCES reports(record_kind, name)
                        ON DELETE CASCADE
                );",
            )
            .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
        }
        Some(value) if value == SCHEMA_VERSION => {}
        Some(value) => {
            return Err(SqliteStoreError::VersionMismatch(format!(
                "unsupported schema version: {value}"
            )));
        }
    }
    tx.commit().map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    Ok(())
}

/// Enforces snapshot retention if configured.
fn enforce_retention(
    tx: &Transaction<'_>,
    record_kind: &str,
    name: &str,
    latest_revision: i64,
    max_versions: Option<u64>,
) -> Result<(), SqliteStoreError> {
    let Some(max_versions) = max_versions else {
        return Ok(());
    };
    if max_versions == 0 {
        return Err(SqliteStoreError::Invalid(
            "max_versions must be greater than zero".to_string(),
        ));
    }
    let max_versions = i64::try_from(max_versions)
        .map_err(|_| SqliteStoreError::Invalid("max_versions too large".to_string()))?;
    if latest_revision > max_versions {
        let min_revision = latest_revision - max_versions + 1;
        tx.execute(
            "DELETE FROM report_versions WHERE record_kind = ?1 AND name = ?2 AND revision < ?3",
            params![record_kind, name, min_revision],
        )
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    }
    Ok(())
}

/// Returns the current unix epoch in milliseconds.
fn unix_millis() -> i64 {
    let now = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default();
    i64::try_from(now.as_millis()).unwrap_or(i64::MAX)
}

/// Parses a stored hash algorithm label.
fn parse_hash_algorithm(label: &str) -> Result<HashAlgorithm, SqliteStoreError> {
    HashAlgorithm::from_label(label)
        .ok_or_else(|| SqliteStoreError::Invalid(format!("unsupported hash algorithm: {label}")))
}
