//! Station repository contract and SQLite implementation.
//!
//! # Invariants
//! - Names are normalized and validated before insert.
//! - A station referenced by any line cannot be deleted.

use crate::model::station::{normalize_station_name, Station, StationId};
use crate::repo::{ensure_connection_ready, EntityKind, RepoError, RepoResult};
use rusqlite::{params, Connection, OptionalExtension, Row};

const STATION_SELECT_SQL: &str = "SELECT id, name FROM station";
const STATION_COLUMNS: &[&str] = &["id", "name"];
const LINE_STATION_COLUMNS: &[&str] = &["line_id", "station_id"];

/// Repository interface for station persistence.
pub trait StationRepository {
    /// Persists a new station and returns it with its assigned id.
    fn create(&self, name: &str) -> RepoResult<Station>;
    fn find_by_id(&self, id: StationId) -> RepoResult<Station>;
    /// Returns every station ordered by id.
    fn find_all(&self) -> RepoResult<Vec<Station>>;
    /// Deletes an unreferenced station.
    fn delete(&self, id: StationId) -> RepoResult<()>;
}

/// SQLite-backed station repository.
pub struct SqliteStationRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteStationRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(
            conn,
            &[
                ("station", STATION_COLUMNS),
                ("line_station", LINE_STATION_COLUMNS),
            ],
        )?;
        Ok(Self { conn })
    }
}

impl StationRepository for SqliteStationRepository<'_> {
    fn create(&self, name: &str) -> RepoResult<Station> {
        let name = normalize_station_name(name)?;
        self.conn
            .execute("INSERT INTO station (name) VALUES (?1);", [name.as_str()])?;
        Ok(Station::new(self.conn.last_insert_rowid(), name))
    }

    fn find_by_id(&self, id: StationId) -> RepoResult<Station> {
        self.conn
            .query_row(
                &format!("{STATION_SELECT_SQL} WHERE id = ?1;"),
                [id],
                parse_station_row,
            )
            .optional()?
            .ok_or(RepoError::NotFound {
                entity: EntityKind::Station,
                id,
            })
    }

    fn find_all(&self) -> RepoResult<Vec<Station>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{STATION_SELECT_SQL} ORDER BY id ASC;"))?;
        let stations = stmt
            .query_map([], parse_station_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(stations)
    }

    fn delete(&self, id: StationId) -> RepoResult<()> {
        let referencing_lines: i64 = self.conn.query_row(
            "SELECT COUNT(DISTINCT line_id) FROM line_station WHERE station_id = ?1;",
            [id],
            |row| row.get(0),
        )?;
        if referencing_lines > 0 {
            return Err(RepoError::ConstraintViolation(format!(
                "station {id} is still referenced by {referencing_lines} line(s)"
            )));
        }

        let changed = self
            .conn
            .execute("DELETE FROM station WHERE id = ?1;", params![id])?;
        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: EntityKind::Station,
                id,
            });
        }

        Ok(())
    }
}

pub(crate) fn parse_station_row(row: &Row<'_>) -> rusqlite::Result<Station> {
    Ok(Station {
        id: row.get("id")?,
        name: row.get("name")?,
    })
}
