//! SQLite-backed entry collection.
//!
//! Each entry is one row; `date` is stored as epoch milliseconds so the range
//! filter is a plain `BETWEEN` on integers. rusqlite is blocking, so every
//! call runs on tokio's blocking pool behind a single shared connection.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};
use tracing::{debug, info};

use super::{EntryStore, StoreResult};
use crate::dates::{from_epoch_millis, DateRange};
use crate::model::{Entry, EntryId, EntryPatch, NewEntry};

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS entries (
        id       TEXT PRIMARY KEY NOT NULL,
        date_ms  INTEGER NOT NULL,
        in_time  TEXT NOT NULL,
        out_time TEXT NOT NULL,
        location TEXT
    );
";

const SELECT_ENTRIES: &str = "SELECT id, date_ms, in_time, out_time, location FROM entries";

#[derive(Clone)]
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    /// Opens (creating if needed) the database file at `path`.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref();
        let conn = Connection::open(path)?;
        info!(path = %path.display(), "opened entry database");
        Self::init(conn)
    }

    pub fn open_in_memory() -> StoreResult<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> StoreResult<Self> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    async fn with_conn<F, T>(&self, func: F) -> StoreResult<T>
    where
        F: FnOnce(&mut Connection) -> rusqlite::Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        let result = tokio::task::spawn_blocking(move || {
            let mut conn = conn.lock();
            func(&mut conn)
        })
        .await?;
        Ok(result?)
    }
}

#[async_trait]
impl EntryStore for SqliteStore {
    async fn find_all(&self) -> StoreResult<Vec<Entry>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!("{SELECT_ENTRIES} ORDER BY rowid"))?;
            let rows = stmt.query_map([], map_row)?;
            rows.collect()
        })
        .await
    }

    async fn find_in_range(&self, range: &DateRange) -> StoreResult<Vec<Entry>> {
        let (start, end) = (range.start.timestamp_millis(), range.end.timestamp_millis());
        self.with_conn(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "{SELECT_ENTRIES} WHERE date_ms BETWEEN ?1 AND ?2 ORDER BY rowid"
            ))?;
            let rows = stmt.query_map(params![start, end], map_row)?;
            rows.collect()
        })
        .await
    }

    async fn insert(&self, input: NewEntry) -> StoreResult<Entry> {
        let entry = Entry::new(EntryId::generate(), input);
        let row = entry.clone();
        self.with_conn(move |conn| {
            conn.execute(
                "INSERT INTO entries (id, date_ms, in_time, out_time, location)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    row.id.to_string(),
                    row.date.timestamp_millis(),
                    row.in_time,
                    row.out_time,
                    row.location,
                ],
            )
        })
        .await?;
        debug!(id = %entry.id, "inserted entry");
        Ok(entry)
    }

    async fn update_by_id(&self, id: &EntryId, patch: EntryPatch) -> StoreResult<Option<Entry>> {
        let key = id.to_string();
        let updated = self
            .with_conn(move |conn| {
                let tx = conn.transaction()?;
                let Some(mut entry) = select_by_id(&tx, &key)? else {
                    return Ok(None);
                };
                entry.apply(patch);
                tx.execute(
                    "UPDATE entries SET date_ms = ?2, in_time = ?3, out_time = ?4, location = ?5
                     WHERE id = ?1",
                    params![
                        key,
                        entry.date.timestamp_millis(),
                        entry.in_time,
                        entry.out_time,
                        entry.location,
                    ],
                )?;
                tx.commit()?;
                Ok(Some(entry))
            })
            .await?;
        if updated.is_some() {
            debug!(%id, "updated entry");
        }
        Ok(updated)
    }

    async fn delete_by_id(&self, id: &EntryId) -> StoreResult<Option<Entry>> {
        let key = id.to_string();
        let removed = self
            .with_conn(move |conn| {
                let tx = conn.transaction()?;
                let removed = select_by_id(&tx, &key)?;
                if removed.is_some() {
                    tx.execute("DELETE FROM entries WHERE id = ?1", [&key])?;
                }
                tx.commit()?;
                Ok(removed)
            })
            .await?;
        if removed.is_some() {
            debug!(%id, "deleted entry");
        }
        Ok(removed)
    }
}

fn select_by_id(conn: &Connection, key: &str) -> rusqlite::Result<Option<Entry>> {
    conn.query_row(&format!("{SELECT_ENTRIES} WHERE id = ?1"), [key], map_row)
        .optional()
}

fn map_row(row: &Row) -> rusqlite::Result<Entry> {
    let id: String = row.get("id")?;
    let id = id
        .parse::<EntryId>()
        .map_err(|err| rusqlite::Error::FromSqlConversionFailure(0, Type::Text, Box::new(err)))?;

    let millis: i64 = row.get("date_ms")?;
    let date = from_epoch_millis(millis)
        .map_err(|err| rusqlite::Error::FromSqlConversionFailure(1, Type::Integer, Box::new(err)))?;

    Ok(Entry {
        id,
        date,
        in_time: row.get("in_time")?,
        out_time: row.get("out_time")?,
        location: row.get("location")?,
    })
}
