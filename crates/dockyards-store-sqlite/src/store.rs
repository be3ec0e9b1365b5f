// crates/dockyards-store-sqlite/src/store.rs
// ============================================================================
// Module: SQLite Object Store
// Description: Durable ObjectStore backed by SQLite WAL.
// Purpose: Persist declarative objects with transactional lifecycle semantics.
// Dependencies: dockyards-core, rusqlite, serde, serde_json, thiserror
// ============================================================================

//! ## Overview
//! This module implements a durable [`ObjectStore`] using `SQLite`. Objects are
//! stored as JSON bodies keyed by `(kind, namespace, name)`; owner references
//! are mirrored into an `object_owners` table so garbage collection does not
//! scan every body. The global revision counter lives in `store_meta`.
//! Every store call runs inside a single transaction through
//! [`dockyards_core::runtime::semantics`].
//! Security posture: database contents are untrusted; bodies are size-checked
//! and must decode into the key they are stored under.

// ============================================================================//
// SECTION: Imports
// ============================================================================//

use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::Mutex;

use async_trait::async_trait;
use dockyards_core::DeleteOutcome;
use dockyards_core::ListParams;
use dockyards_core::ObjectKey;
use dockyards_core::ObjectStore;
use dockyards_core::RawObject;
use dockyards_core::RecordTable;
use dockyards_core::StoreError;
use dockyards_core::runtime::semantics::create_object;
use dockyards_core::runtime::semantics::delete_object;
use dockyards_core::runtime::semantics::list_objects;
use dockyards_core::runtime::semantics::update_object;
use rusqlite::Connection;
use rusqlite::OpenFlags;
use rusqlite::OptionalExtension;
use rusqlite::Transaction;
use rusqlite::params;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

// ============================================================================//
// SECTION: Constants
// ============================================================================//

/// `SQLite` schema version for the store.
const SCHEMA_VERSION: i64 = 1;
/// Default busy timeout (ms).
const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;
/// Maximum length of a single path component.
const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Maximum encoded object size accepted by the store.
pub const MAX_OBJECT_BYTES: usize = 1024 * 1024;

// ============================================================================//
// SECTION: Config
// ============================================================================//

/// `SQLite` journal mode configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
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
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
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

/// Configuration for the `SQLite` object store.
#[derive(Debug, Clone, Deserialize)]
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
}

impl SqliteStoreConfig {
    /// Builds a config with default pragmas.
    #[must_use]
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            busy_timeout_ms: DEFAULT_BUSY_TIMEOUT_MS,
            journal_mode: SqliteStoreMode::default(),
            sync_mode: SqliteSyncMode::default(),
        }
    }
}

/// Returns the default busy timeout for `SQLite` connections.
const fn default_busy_timeout_ms() -> u64 {
    DEFAULT_BUSY_TIMEOUT_MS
}

// ============================================================================//
// SECTION: Errors
// ============================================================================//

/// `SQLite` store errors.
#[derive(Debug, Error)]
pub enum SqliteStoreError {
    /// Store I/O error.
    #[error("sqlite store io error: {0}")]
    Io(String),
    /// `SQLite` engine error.
    #[error("sqlite store db error: {0}")]
    Db(String),
    /// Store corruption.
    #[error("sqlite store corruption: {0}")]
    Corrupt(String),
    /// Store schema version mismatch.
    #[error("sqlite store version mismatch: {0}")]
    VersionMismatch(String),
    /// Invalid store data.
    #[error("sqlite store invalid data: {0}")]
    Invalid(String),
    /// Object body exceeded the size limit.
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
            SqliteStoreError::Db(message)
            | SqliteStoreError::Corrupt(message)
            | SqliteStoreError::VersionMismatch(message) => Self::Store(message),
            SqliteStoreError::Invalid(message) => Self::Invalid(message),
            SqliteStoreError::TooLarge {
                max_bytes,
                actual_bytes,
            } => Self::Invalid(format!(
                "object body exceeds size limit: {actual_bytes} bytes (max {max_bytes})"
            )),
        }
    }
}

/// Maps an engine error into a store error.
fn db_error(err: &rusqlite::Error) -> StoreError {
    SqliteStoreError::Db(err.to_string()).into()
}

// ============================================================================//
// SECTION: Store
// ============================================================================//

/// `SQLite`-backed object store with WAL support.
#[derive(Clone)]
pub struct SqliteObjectStore {
    /// Shared `SQLite` connection guarded by a mutex.
    connection: Arc<Mutex<Connection>>,
}

impl SqliteObjectStore {
    /// Opens an `SQLite`-backed object store.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteStoreError`] when the database cannot be opened or
    /// initialized.
    pub fn new(config: &SqliteStoreConfig) -> Result<Self, SqliteStoreError> {
        validate_store_path(&config.path)?;
        ensure_parent_dir(&config.path)?;
        let mut connection = open_connection(config)?;
        initialize_schema(&mut connection)?;
        Ok(Self {
            connection: Arc::new(Mutex::new(connection)),
        })
    }

    /// Runs `operation` inside one transaction, committing on success.
    fn with_table<T>(
        &self,
        operation: impl FnOnce(&mut SqliteTable<'_>) -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        let mut guard = self
            .connection
            .lock()
            .map_err(|_| StoreError::from(SqliteStoreError::Db("mutex poisoned".to_string())))?;
        let tx = guard.transaction().map_err(|err| db_error(&err))?;
        let result = {
            let mut table = SqliteTable {
                tx: &tx,
            };
            operation(&mut table)?
        };
        tx.commit().map_err(|err| db_error(&err))?;
        drop(guard);
        Ok(result)
    }
}

#[async_trait]
impl ObjectStore for SqliteObjectStore {
    async fn get(&self, key: &ObjectKey) -> Result<Option<RawObject>, StoreError> {
        self.with_table(|table| table.load(key))
    }

    async fn list(&self, kind: &str, params: &ListParams) -> Result<Vec<RawObject>, StoreError> {
        self.with_table(|table| list_objects(&*table, kind, params))
    }

    async fn create(&self, object: RawObject) -> Result<RawObject, StoreError> {
        self.with_table(|table| create_object(table, object))
    }

    async fn update(&self, object: RawObject) -> Result<RawObject, StoreError> {
        self.with_table(|table| update_object(table, object, false))
    }

    async fn update_status(&self, object: RawObject) -> Result<RawObject, StoreError> {
        self.with_table(|table| update_object(table, object, true))
    }

    async fn delete(&self, key: &ObjectKey) -> Result<DeleteOutcome, StoreError> {
        self.with_table(|table| delete_object(table, key))
    }
}

// ============================================================================//
// SECTION: Record Table
// ============================================================================//

/// Record table view over an open transaction.
struct SqliteTable<'a> {
    /// Open transaction.
    tx: &'a Transaction<'a>,
}

impl SqliteTable<'_> {
    /// Queries bodies and decodes them.
    fn query_bodies(
        &self,
        sql: &str,
        params: &[&dyn rusqlite::ToSql],
    ) -> Result<Vec<RawObject>, StoreError> {
        let mut statement = self.tx.prepare(sql).map_err(|err| db_error(&err))?;
        let rows = statement
            .query_map(params, |row| row.get::<_, Vec<u8>>(0))
            .map_err(|err| db_error(&err))?;
        let mut objects = Vec::new();
        for row in rows {
            let body = row.map_err(|err| db_error(&err))?;
            objects.push(decode_body(&body)?);
        }
        Ok(objects)
    }
}

impl RecordTable for SqliteTable<'_> {
    fn load(&self, key: &ObjectKey) -> Result<Option<RawObject>, StoreError> {
        let body: Option<Vec<u8>> = self
            .tx
            .query_row(
                "SELECT body FROM objects WHERE kind = ?1 AND namespace = ?2 AND name = ?3",
                params![key.kind, namespace_column(key.namespace.as_deref()), key.name],
                |row| row.get(0),
            )
            .optional()
            .map_err(|err| db_error(&err))?;
        let Some(body) = body else {
            return Ok(None);
        };
        let object = decode_body(&body)?;
        if object.key() != *key {
            return Err(SqliteStoreError::Corrupt(format!("object key mismatch for {key}")).into());
        }
        Ok(Some(object))
    }

    fn scan(&self, kind: &str, namespace: Option<&str>) -> Result<Vec<RawObject>, StoreError> {
        match namespace {
            Some(namespace) => self.query_bodies(
                "SELECT body FROM objects WHERE kind = ?1 AND namespace = ?2 ORDER BY namespace, \
                 name",
                &[&kind, &namespace],
            ),
            None => self.query_bodies(
                "SELECT body FROM objects WHERE kind = ?1 ORDER BY namespace, name",
                &[&kind],
            ),
        }
    }

    fn dependents(&self, uid: &str) -> Result<Vec<RawObject>, StoreError> {
        self.query_bodies(
            "SELECT o.body FROM object_owners w JOIN objects o ON o.kind = w.kind AND \
             o.namespace = w.namespace AND o.name = w.name WHERE w.owner_uid = ?1 ORDER BY \
             o.kind, o.namespace, o.name",
            &[&uid],
        )
    }

    fn put(&mut self, object: &RawObject) -> Result<(), StoreError> {
        let body = serde_json::to_vec(object).map_err(|err| StoreError::Invalid(err.to_string()))?;
        if body.len() > MAX_OBJECT_BYTES {
            return Err(SqliteStoreError::TooLarge {
                max_bytes: MAX_OBJECT_BYTES,
                actual_bytes: body.len(),
            }
            .into());
        }
        let namespace = namespace_column(object.metadata.namespace.as_deref());
        self.tx
            .execute(
                "INSERT INTO objects (kind, namespace, name, uid, body) VALUES (?1, ?2, ?3, ?4, \
                 ?5) ON CONFLICT(kind, namespace, name) DO UPDATE SET uid = excluded.uid, body = \
                 excluded.body",
                params![object.kind, namespace, object.metadata.name, object.metadata.uid, body],
            )
            .map_err(|err| db_error(&err))?;
        self.tx
            .execute(
                "DELETE FROM object_owners WHERE kind = ?1 AND namespace = ?2 AND name = ?3",
                params![object.kind, namespace, object.metadata.name],
            )
            .map_err(|err| db_error(&err))?;
        for owner in &object.metadata.owner_references {
            self.tx
                .execute(
                    "INSERT OR IGNORE INTO object_owners (owner_uid, kind, namespace, name) \
                     VALUES (?1, ?2, ?3, ?4)",
                    params![owner.uid, object.kind, namespace, object.metadata.name],
                )
                .map_err(|err| db_error(&err))?;
        }
        Ok(())
    }

    fn remove(&mut self, key: &ObjectKey) -> Result<(), StoreError> {
        let namespace = namespace_column(key.namespace.as_deref());
        self.tx
            .execute(
                "DELETE FROM object_owners WHERE kind = ?1 AND namespace = ?2 AND name = ?3",
                params![key.kind, namespace, key.name],
            )
            .map_err(|err| db_error(&err))?;
        self.tx
            .execute(
                "DELETE FROM objects WHERE kind = ?1 AND namespace = ?2 AND name = ?3",
                params![key.kind, namespace, key.name],
            )
            .map_err(|err| db_error(&err))?;
        Ok(())
    }

    fn next_revision(&mut self) -> Result<u64, StoreError> {
        let current: i64 = self
            .tx
            .query_row("SELECT revision FROM store_meta LIMIT 1", params![], |row| row.get(0))
            .map_err(|err| db_error(&err))?;
        let next = current
            .checked_add(1)
            .ok_or_else(|| StoreError::from(SqliteStoreError::Corrupt("revision overflow".to_string())))?;
        self.tx
            .execute("UPDATE store_meta SET revision = ?1", params![next])
            .map_err(|err| db_error(&err))?;
        u64::try_from(next)
            .map_err(|_| SqliteStoreError::Corrupt("negative revision".to_string()).into())
    }
}

// ============================================================================//
// SECTION: Helpers
// ============================================================================//

/// Returns the namespace column value; cluster-scoped objects use `''`.
fn namespace_column(namespace: Option<&str>) -> &str {
    namespace.unwrap_or("")
}

/// Decodes and size-checks a stored body.
fn decode_body(body: &[u8]) -> Result<RawObject, StoreError> {
    if body.len() > MAX_OBJECT_BYTES {
        return Err(SqliteStoreError::TooLarge {
            max_bytes: MAX_OBJECT_BYTES,
            actual_bytes: body.len(),
        }
        .into());
    }
    serde_json::from_slice(body).map_err(|err| SqliteStoreError::Invalid(err.to_string()).into())
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
    if path.as_os_str().len() > MAX_TOTAL_PATH_LENGTH {
        return Err(SqliteStoreError::Invalid("store path exceeds length limit".to_string()));
    }
    if path.components().any(|component| component.as_os_str().len() > MAX_PATH_COMPONENT_LENGTH) {
        return Err(SqliteStoreError::Invalid(
            "store path contains an overlong component".to_string(),
        ));
    }
    if path.is_dir() {
        return Err(SqliteStoreError::Invalid(
            "store path must be a file, not a directory".to_string(),
        ));
    }
    Ok(())
}

/// Opens an `SQLite` connection and applies pragmas.
fn open_connection(config: &SqliteStoreConfig) -> Result<Connection, SqliteStoreError> {
    let flags = OpenFlags::SQLITE_OPEN_READ_WRITE
        | OpenFlags::SQLITE_OPEN_CREATE
        | OpenFlags::SQLITE_OPEN_FULL_MUTEX;
    let connection = Connection::open_with_flags(&config.path, flags)
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    connection
        .execute_batch(&format!(
            "PRAGMA journal_mode = {}; PRAGMA synchronous = {};",
            config.journal_mode.pragma_value(),
            config.sync_mode.pragma_value()
        ))
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    connection
        .busy_timeout(std::time::Duration::from_millis(config.busy_timeout_ms))
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    Ok(connection)
}

/// Initializes the `SQLite` schema or validates the existing version.
fn initialize_schema(connection: &mut Connection) -> Result<(), SqliteStoreError> {
    let tx = connection.transaction().map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    tx.execute_batch(
        "CREATE TABLE IF NOT EXISTS store_meta (version INTEGER NOT NULL, revision INTEGER NOT \
         NULL);",
    )
    .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    let version: Option<i64> = tx
        .query_row("SELECT version FROM store_meta LIMIT 1", params![], |row| row.get(0))
        .optional()
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    match version {
        None => {
            tx.execute(
                "INSERT INTO store_meta (version, revision) VALUES (?1, 0)",
                params![SCHEMA_VERSION],
            )
            .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
            tx.execute_batch(
                "CREATE TABLE IF NOT EXISTS objects (
                    kind TEXT NOT NULL,
                    namespace TEXT NOT NULL,
                    name TEXT NOT NULL,
                    uid TEXT NOT NULL,
                    body BLOB NOT NULL,
                    PRIMARY KEY (kind, namespace, name)
                );
                CREATE TABLE IF NOT EXISTS object_owners (
                    owner_uid TEXT NOT NULL,
                    kind TEXT NOT NULL,
                    namespace TEXT NOT NULL,
                    name TEXT NOT NULL,
                    PRIMARY KEY (owner_uid, kind, namespace, name)
                );
                CREATE INDEX IF NOT EXISTS idx_objects_uid ON objects (uid);",
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
