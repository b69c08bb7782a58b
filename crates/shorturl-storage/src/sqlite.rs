use async_trait::async_trait;
use jiff::Timestamp;
use shorturl_core::time::{format_rfc3339, parse_rfc3339};
use shorturl_core::{NewShortLink, Result, ShortLink, ShortUrl, StorageError, UrlStore};
use sqlx::sqlite::{
    SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions, SqliteRow,
};
use sqlx::Row;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};
use typed_builder::TypedBuilder;

const CREATE_URLS_TABLE: &str = include_str!("../ddl/sqlite/urls.sql");

// Primary result codes, see https://www.sqlite.org/rescode.html
const SQLITE_BUSY: i64 = 5;
const SQLITE_LOCKED: i64 = 6;
const SQLITE_READONLY: i64 = 8;
const SQLITE_IOERR: i64 = 10;
const SQLITE_CORRUPT: i64 = 11;
const SQLITE_FULL: i64 = 13;
const SQLITE_CANTOPEN: i64 = 14;
const SQLITE_NOTADB: i64 = 26;

/// Connection settings for [`SqliteStore::open_with`].
#[derive(Debug, Clone, TypedBuilder)]
pub struct SqliteOptions {
    #[builder(default = 5)]
    pub max_connections: u32,
    /// How long a connection waits on a locked database before failing.
    #[builder(default = Duration::from_secs(5))]
    pub busy_timeout: Duration,
}

impl Default for SqliteOptions {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// SQLite implementation of the store contract.
///
/// Links live in a single `urls` table keyed by the unique `shorturl`
/// column. Timestamps are stored as RFC 3339 text and parsed back on read.
/// Cloning is cheap and shares the pool.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Creates a store from an existing pool. The schema is not touched;
    /// call [`SqliteStore::migrate`] if it may be missing.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Opens (creating if missing) the database file at `path` with default
    /// options and ensures the schema exists.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with(path, SqliteOptions::default()).await
    }

    pub async fn open_with(path: impl AsRef<Path>, options: SqliteOptions) -> Result<Self> {
        let path = path.as_ref();
        let connect_options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(options.busy_timeout);

        let pool = SqlitePoolOptions::new()
            .max_connections(options.max_connections)
            .connect_with(connect_options)
            .await
            .map_err(|e| {
                StorageError::Unavailable(format!(
                    "failed to open sqlite database '{}': {e}",
                    path.display()
                ))
            })?;

        let store = Self::new(pool);
        store.migrate().await?;

        info!(path = %path.display(), "opened sqlite store");
        Ok(store)
    }

    /// Creates the `urls` table if it does not exist. Safe to run repeatedly.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::query(CREATE_URLS_TABLE)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        Ok(())
    }

    /// Returns a reference to the underlying pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Closes the pool, waiting for checked-out connections to be returned.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .is_some_and(sqlx::error::DatabaseError::is_unique_violation)
}

/// Primary SQLite result code of a database error, if any.
fn primary_code(err: &sqlx::Error) -> Option<i64> {
    let code = err.as_database_error()?.code()?;
    code.parse::<i64>().ok().map(|extended| extended & 0xff)
}

fn map_sqlx_error(err: sqlx::Error) -> StorageError {
    let message = err.to_string();

    if let Some(code) = primary_code(&err) {
        return match code {
            SQLITE_BUSY | SQLITE_LOCKED | SQLITE_READONLY | SQLITE_IOERR | SQLITE_FULL
            | SQLITE_CANTOPEN => StorageError::Unavailable(message),
            SQLITE_CORRUPT | SQLITE_NOTADB => StorageError::Corrupt(message),
            _ => StorageError::Query(message),
        };
    }

    match err {
        sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed
        | sqlx::Error::Io(_)
        | sqlx::Error::Tls(_) => StorageError::Unavailable(message),
        sqlx::Error::ColumnIndexOutOfBounds { .. }
        | sqlx::Error::ColumnNotFound(_)
        | sqlx::Error::ColumnDecode { .. }
        | sqlx::Error::TypeNotFound { .. }
        | sqlx::Error::Decode(_) => StorageError::Corrupt(message),
        _ => StorageError::Query(message),
    }
}

fn link_from_row(row: &SqliteRow) -> Result<ShortLink> {
    let id: i64 = row.try_get("id").map_err(map_sqlx_error)?;
    let short_url: String = row.try_get("shorturl").map_err(map_sqlx_error)?;
    let long_url: String = row.try_get("longurl").map_err(map_sqlx_error)?;
    let created_at: String = row.try_get("createdAt").map_err(map_sqlx_error)?;
    let expires_at: String = row.try_get("ttl").map_err(map_sqlx_error)?;

    let created_at: Timestamp = parse_rfc3339("createdAt", &created_at)?;
    let expires_at: Timestamp = parse_rfc3339("ttl", &expires_at)?;

    Ok(ShortLink {
        id,
        short_url: ShortUrl::new(short_url),
        long_url,
        created_at,
        expires_at,
    })
}

#[async_trait]
impl UrlStore for SqliteStore {
    async fn save(&self, link: &NewShortLink) -> Result<i64> {
        let result = sqlx::query(
            r#"
            INSERT INTO urls (shorturl, longurl, createdAt, ttl)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(link.short_url.as_str())
        .bind(link.long_url.as_str())
        .bind(format_rfc3339(link.created_at))
        .bind(format_rfc3339(link.expires_at))
        .execute(&self.pool)
        .await;

        match result {
            Ok(done) => {
                let id = done.last_insert_rowid();
                debug!(id, short_url = %link.short_url, "inserted url row");
                Ok(id)
            }
            Err(err) if is_unique_violation(&err) => {
                Err(StorageError::Conflict(link.short_url.to_string()))
            }
            Err(err) => Err(map_sqlx_error(err)),
        }
    }

    async fn lookup(&self, short_url: &ShortUrl) -> Result<ShortLink> {
        let row = sqlx::query(
            r#"
            SELECT id, shorturl, longurl, createdAt, ttl
            FROM urls
            WHERE shorturl = ?
            LIMIT 1
            "#,
        )
        .bind(short_url.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        let Some(row) = row else {
            return Err(StorageError::NotFound(short_url.to_string()));
        };

        link_from_row(&row)
    }
}
