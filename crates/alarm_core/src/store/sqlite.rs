//! SQLite alarm store.
//!
//! # Invariants
//! - The `alarms` table is created on open; a new database loads as an empty
//!   collection.
//! - Row order is carried by the `position` column, rewritten on every save.
//! - A save replaces all rows inside one transaction.
//! - Rows that violate alarm invariants are rejected on load, not masked.

use super::{AlarmStore, StoreError, StoreFailure, StoreResult};
use crate::model::alarm::{Alarm, AlarmId, FireTime};
use log::{error, info};
use rusqlite::{params, Connection, Row};
use std::path::Path;
use std::time::Duration;

/// Layout version written to `PRAGMA user_version`.
const SCHEMA_VERSION: u32 = 1;

const SCHEMA_SQL: &str = "CREATE TABLE IF NOT EXISTS alarms (
    id TEXT PRIMARY KEY NOT NULL,
    position INTEGER NOT NULL,
    name TEXT NOT NULL,
    fire_time_from_midnight INTEGER NOT NULL
        CHECK (fire_time_from_midnight >= 0 AND fire_time_from_midnight < 86400),
    enabled INTEGER NOT NULL DEFAULT 1 CHECK (enabled IN (0, 1))
);";

const ALARM_SELECT_SQL: &str = "SELECT
    id,
    name,
    fire_time_from_midnight,
    enabled
FROM alarms
ORDER BY position ASC";

/// SQLite-backed alarm store owning its connection.
pub struct SqliteAlarmStore {
    conn: Connection,
}

impl SqliteAlarmStore {
    /// Opens (or creates) an alarm database file.
    ///
    /// Parent directories are created when missing.
    ///
    /// # Errors
    /// - `StoreFailure::Sqlite` when the file cannot be opened or the table
    ///   cannot be created.
    /// - `StoreFailure::InvalidData` when the file was written with a newer
    ///   layout.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreFailure> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| StoreFailure::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let conn = Connection::open(path).map_err(StoreFailure::Sqlite)?;
        Self::from_connection(conn, "file")
    }

    pub fn open_in_memory() -> Result<Self, StoreFailure> {
        let conn = Connection::open_in_memory().map_err(StoreFailure::Sqlite)?;
        Self::from_connection(conn, "memory")
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    fn from_connection(conn: Connection, mode: &'static str) -> Result<Self, StoreFailure> {
        match ensure_schema(&conn) {
            Ok(()) => {
                info!("event=store_open module=store backend=sqlite status=ok mode={mode}");
                Ok(Self { conn })
            }
            Err(err) => {
                error!(
                    "event=store_open module=store backend=sqlite status=error mode={} error={}",
                    mode, err
                );
                Err(err)
            }
        }
    }

    fn read_rows(&self) -> Result<Vec<Alarm>, StoreFailure> {
        let mut stmt = self
            .conn
            .prepare(ALARM_SELECT_SQL)
            .map_err(StoreFailure::Sqlite)?;
        let mut rows = stmt.query([]).map_err(StoreFailure::Sqlite)?;

        let mut alarms = Vec::new();
        while let Some(row) = rows.next().map_err(StoreFailure::Sqlite)? {
            alarms.push(parse_alarm_row(row)?);
        }
        Ok(alarms)
    }

    fn replace_rows(&self, alarms: &[Alarm]) -> rusqlite::Result<()> {
        let tx = self.conn.unchecked_transaction()?;
        tx.execute("DELETE FROM alarms;", [])?;
        {
            let mut insert = tx.prepare(
                "INSERT INTO alarms (id, position, name, fire_time_from_midnight, enabled)
                 VALUES (?1, ?2, ?3, ?4, ?5);",
            )?;
            for (position, alarm) in alarms.iter().enumerate() {
                insert.execute(params![
                    alarm.id().as_str(),
                    position as i64,
                    alarm.name(),
                    alarm.fire_time().seconds(),
                    alarm.is_enabled(),
                ])?;
            }
        }
        tx.commit()
    }
}

impl AlarmStore for SqliteAlarmStore {
    fn load(&self) -> StoreResult<Vec<Alarm>> {
        self.read_rows().map_err(StoreError::Read)
    }

    fn save(&self, alarms: &[Alarm]) -> StoreResult<()> {
        self.replace_rows(alarms)
            .map_err(|err| StoreError::Write(StoreFailure::Sqlite(err)))?;
        info!(
            "event=store_save module=store backend=sqlite status=ok count={}",
            alarms.len()
        );
        Ok(())
    }
}

fn ensure_schema(conn: &Connection) -> Result<(), StoreFailure> {
    conn.busy_timeout(Duration::from_secs(5))
        .map_err(StoreFailure::Sqlite)?;
    let version: u32 = conn
        .query_row("PRAGMA user_version;", [], |row| row.get(0))
        .map_err(StoreFailure::Sqlite)?;
    if version > SCHEMA_VERSION {
        return Err(StoreFailure::InvalidData(format!(
            "alarm database layout {version} is newer than supported {SCHEMA_VERSION}"
        )));
    }
    conn.execute_batch(SCHEMA_SQL)
        .map_err(StoreFailure::Sqlite)?;
    if version < SCHEMA_VERSION {
        conn.execute_batch(&format!("PRAGMA user_version = {SCHEMA_VERSION};"))
            .map_err(StoreFailure::Sqlite)?;
    }
    Ok(())
}

fn parse_alarm_row(row: &Row<'_>) -> Result<Alarm, StoreFailure> {
    let id_text: String = row.get("id").map_err(StoreFailure::Sqlite)?;
    let id = AlarmId::parse(&id_text)
        .map_err(|err| StoreFailure::InvalidData(format!("alarms.id `{id_text}`: {err}")))?;

    let raw_fire_time: i64 = row
        .get("fire_time_from_midnight")
        .map_err(StoreFailure::Sqlite)?;
    let fire_time = u32::try_from(raw_fire_time)
        .ok()
        .and_then(|seconds| FireTime::new(seconds).ok())
        .ok_or_else(|| {
            StoreFailure::InvalidData(format!(
                "invalid fire_time_from_midnight `{raw_fire_time}` for alarm {id}"
            ))
        })?;

    let enabled = match row.get::<_, i64>("enabled").map_err(StoreFailure::Sqlite)? {
        0 => false,
        1 => true,
        other => {
            return Err(StoreFailure::InvalidData(format!(
                "invalid enabled value `{other}` for alarm {id}"
            )));
        }
    };

    let name: String = row.get("name").map_err(StoreFailure::Sqlite)?;
    Ok(Alarm::from_parts(id, name, fire_time, enabled))
}
