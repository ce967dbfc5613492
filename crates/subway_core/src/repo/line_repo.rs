//! Line repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Persist lines together with their `line_station` association rows.
//! - Load lines with their associated stations resolved by join.
//!
//! # Invariants
//! - `save` checks station existence and writes all rows inside one
//!   `IMMEDIATE` transaction; nothing is written on failure.
//! - Associated stations are returned in association insertion order.
//! - Deleting a line removes its association rows in the same transaction.

use crate::model::line::{normalize_line_labels, Line, LineId, NewLine};
use crate::model::station::Station;
use crate::repo::station_repo::parse_station_row;
use crate::repo::{ensure_connection_ready, EntityKind, RepoError, RepoResult};
use rusqlite::{params, Connection, OptionalExtension, Row, Transaction, TransactionBehavior};

const LINE_SELECT_SQL: &str = "SELECT
    id,
    name,
    color,
    up_station_id,
    down_station_id,
    distance
FROM line";

const LINE_COLUMNS: &[&str] = &[
    "id",
    "name",
    "color",
    "up_station_id",
    "down_station_id",
    "distance",
];
const LINE_STATION_COLUMNS: &[&str] = &["line_id", "station_id"];
const STATION_COLUMNS: &[&str] = &["id", "name"];

/// Repository interface for line persistence.
pub trait LineRepository {
    /// Persists a new line with its station associations.
    fn save(&self, line: &NewLine) -> RepoResult<Line>;
    fn find_by_id(&self, id: LineId) -> RepoResult<Line>;
    /// Returns every line ordered by id.
    fn find_all(&self) -> RepoResult<Vec<Line>>;
    /// Replaces name and color; stations and distance are untouched.
    fn update(&self, id: LineId, name: &str, color: &str) -> RepoResult<()>;
    fn delete(&self, id: LineId) -> RepoResult<()>;
}

/// SQLite-backed line repository.
pub struct SqliteLineRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteLineRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(
            conn,
            &[
                ("line", LINE_COLUMNS),
                ("line_station", LINE_STATION_COLUMNS),
                ("station", STATION_COLUMNS),
            ],
        )?;
        Ok(Self { conn })
    }
}

impl LineRepository for SqliteLineRepository<'_> {
    fn save(&self, line: &NewLine) -> RepoResult<Line> {
        line.validate()?;
        let (name, color) = normalize_line_labels(&line.name, &line.color)?;

        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        for station in line.stations() {
            if !station_exists(&tx, station.id)? {
                return Err(RepoError::NotFound {
                    entity: EntityKind::Station,
                    id: station.id,
                });
            }
        }

        tx.execute(
            "INSERT INTO line (
                name,
                color,
                up_station_id,
                down_station_id,
                distance
            ) VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                name.as_str(),
                color.as_str(),
                line.up_station.id,
                line.down_station.id,
                line.distance,
            ],
        )?;
        let line_id = tx.last_insert_rowid();

        for station in line.stations() {
            tx.execute(
                "INSERT INTO line_station (line_id, station_id) VALUES (?1, ?2);",
                params![line_id, station.id],
            )?;
        }

        let saved = load_line(&tx, line_id)?;
        tx.commit()?;
        Ok(saved)
    }

    fn find_by_id(&self, id: LineId) -> RepoResult<Line> {
        load_line(self.conn, id)
    }

    fn find_all(&self) -> RepoResult<Vec<Line>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{LINE_SELECT_SQL} ORDER BY id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut lines = Vec::new();
        while let Some(row) = rows.next()? {
            let mut line = parse_line_row(row)?;
            line.stations = load_stations_for_line(self.conn, line.id)?;
            lines.push(line);
        }
        Ok(lines)
    }

    fn update(&self, id: LineId, name: &str, color: &str) -> RepoResult<()> {
        let (name, color) = normalize_line_labels(name, color)?;

        let changed = self.conn.execute(
            "UPDATE line
             SET
                name = ?2,
                color = ?3
             WHERE id = ?1;",
            params![id, name.as_str(), color.as_str()],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: EntityKind::Line,
                id,
            });
        }

        Ok(())
    }

    fn delete(&self, id: LineId) -> RepoResult<()> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        tx.execute("DELETE FROM line_station WHERE line_id = ?1;", [id])?;
        let changed = tx.execute("DELETE FROM line WHERE id = ?1;", [id])?;
        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: EntityKind::Line,
                id,
            });
        }
        tx.commit()?;
        Ok(())
    }
}

fn load_line(conn: &Connection, id: LineId) -> RepoResult<Line> {
    let mut line = conn
        .query_row(
            &format!("{LINE_SELECT_SQL} WHERE id = ?1;"),
            [id],
            parse_line_row,
        )
        .optional()?
        .ok_or(RepoError::NotFound {
            entity: EntityKind::Line,
            id,
        })?;
    line.stations = load_stations_for_line(conn, id)?;
    Ok(line)
}

fn load_stations_for_line(conn: &Connection, line_id: LineId) -> RepoResult<Vec<Station>> {
    let mut stmt = conn.prepare(
        "SELECT s.id, s.name
         FROM line_station ls
         INNER JOIN station s ON s.id = ls.station_id
         WHERE ls.line_id = ?1
         ORDER BY ls.rowid ASC;",
    )?;
    let stations = stmt
        .query_map([line_id], parse_station_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(stations)
}

fn station_exists(conn: &Connection, id: i64) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM station WHERE id = ?1);",
        [id],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn parse_line_row(row: &Row<'_>) -> rusqlite::Result<Line> {
    Ok(Line {
        id: row.get("id")?,
        name: row.get("name")?,
        color: row.get("color")?,
        up_station_id: row.get("up_station_id")?,
        down_station_id: row.get("down_station_id")?,
        distance: row.get("distance")?,
        stations: Vec::new(),
    })
}
