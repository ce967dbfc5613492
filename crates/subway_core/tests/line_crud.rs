use rusqlite::Connection;
use std::path::Path;
use std::sync::{Arc, Barrier};
use std::thread;
use subway_core::db::migrations::latest_version;
use subway_core::db::{open_db, open_db_in_memory};
use subway_core::{
    EntityKind, LineRepository, LineRequest, LineService, LineValidationError, NewLine, RepoError,
    ServiceError, SqliteLineRepository, SqliteStationRepository, Station, StationRepository,
};

fn seed_stations(conn: &Connection, names: &[&str]) -> Vec<Station> {
    let repo = SqliteStationRepository::try_new(conn).unwrap();
    names.iter().map(|name| repo.create(name).unwrap()).collect()
}

fn association_count(conn: &Connection) -> i64 {
    conn.query_row("SELECT COUNT(*) FROM line_station;", [], |row| row.get(0))
        .unwrap()
}

fn line_count(conn: &Connection) -> i64 {
    conn.query_row("SELECT COUNT(*) FROM line;", [], |row| row.get(0))
        .unwrap()
}

#[test]
fn save_persists_line_with_both_endpoint_stations() {
    let conn = open_db_in_memory().unwrap();
    let stations = seed_stations(&conn, &["Saetgang", "Gwanaksan"]);
    let repo = SqliteLineRepository::try_new(&conn).unwrap();

    let saved = repo
        .save(&NewLine::new(
            "Sillim",
            "bg-navy-600",
            stations[0].clone(),
            stations[1].clone(),
            10,
        ))
        .unwrap();

    assert_eq!(saved.id, 1);
    assert_eq!(saved.up_station_id, stations[0].id);
    assert_eq!(saved.down_station_id, stations[1].id);
    assert_eq!(saved.distance, 10);
    assert_eq!(saved.stations, stations);
    assert_eq!(repo.find_by_id(saved.id).unwrap(), saved);
}

#[test]
fn stations_keep_up_then_down_order() {
    let conn = open_db_in_memory().unwrap();
    let stations = seed_stations(&conn, &["A", "B", "C"]);
    let repo = SqliteLineRepository::try_new(&conn).unwrap();

    let saved = repo
        .save(&NewLine::new(
            "Reverse",
            "red",
            stations[2].clone(),
            stations[0].clone(),
            4,
        ))
        .unwrap();

    let ids: Vec<i64> = saved.stations.iter().map(|station| station.id).collect();
    assert_eq!(ids, vec![3, 1]);
}

#[test]
fn save_with_missing_station_writes_nothing() {
    let conn = open_db_in_memory().unwrap();
    let stations = seed_stations(&conn, &["Saetgang"]);
    let repo = SqliteLineRepository::try_new(&conn).unwrap();

    let err = repo
        .save(&NewLine::new(
            "Ghost",
            "gray",
            stations[0].clone(),
            Station::new(99, "Nowhere"),
            5,
        ))
        .unwrap_err();

    assert!(matches!(
        err,
        RepoError::NotFound {
            entity: EntityKind::Station,
            id: 99
        }
    ));
    assert_eq!(line_count(&conn), 0);
    assert_eq!(association_count(&conn), 0);
}

#[test]
fn duplicate_name_is_a_constraint_violation_and_rolls_back() {
    let conn = open_db_in_memory().unwrap();
    let stations = seed_stations(&conn, &["A", "B", "C"]);
    let repo = SqliteLineRepository::try_new(&conn).unwrap();

    repo.save(&NewLine::new(
        "L1",
        "red",
        stations[0].clone(),
        stations[1].clone(),
        10,
    ))
    .unwrap();
    let err = repo
        .save(&NewLine::new(
            "L1",
            "blue",
            stations[1].clone(),
            stations[2].clone(),
            7,
        ))
        .unwrap_err();

    assert!(matches!(err, RepoError::ConstraintViolation(_)));
    assert_eq!(line_count(&conn), 1);
    assert_eq!(association_count(&conn), 2);
}

#[test]
fn save_rejects_invalid_scalars_before_touching_the_store() {
    let conn = open_db_in_memory().unwrap();
    let stations = seed_stations(&conn, &["A", "B"]);
    let repo = SqliteLineRepository::try_new(&conn).unwrap();

    let err = repo
        .save(&NewLine::new(
            "Flat",
            "red",
            stations[0].clone(),
            stations[1].clone(),
            0,
        ))
        .unwrap_err();

    assert!(matches!(
        err,
        RepoError::InvalidLine(LineValidationError::NonPositiveDistance(0))
    ));
    assert_eq!(line_count(&conn), 0);
}

#[test]
fn update_replaces_name_and_color_only() {
    let conn = open_db_in_memory().unwrap();
    let stations = seed_stations(&conn, &["A", "B"]);
    let repo = SqliteLineRepository::try_new(&conn).unwrap();
    let saved = repo
        .save(&NewLine::new(
            "Sillim",
            "bg-navy-600",
            stations[0].clone(),
            stations[1].clone(),
            10,
        ))
        .unwrap();

    repo.update(saved.id, "Everline", "bg-yellow-600").unwrap();

    let loaded = repo.find_by_id(saved.id).unwrap();
    assert_eq!(loaded.name, "Everline");
    assert_eq!(loaded.color, "bg-yellow-600");
    assert_eq!(loaded.distance, saved.distance);
    assert_eq!(loaded.stations, saved.stations);
}

#[test]
fn update_missing_line_returns_not_found() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteLineRepository::try_new(&conn).unwrap();

    assert!(matches!(
        repo.update(5, "Any", "red"),
        Err(RepoError::NotFound {
            entity: EntityKind::Line,
            id: 5
        })
    ));
}

#[test]
fn update_to_existing_name_is_a_constraint_violation() {
    let conn = open_db_in_memory().unwrap();
    let stations = seed_stations(&conn, &["A", "B"]);
    let repo = SqliteLineRepository::try_new(&conn).unwrap();
    let first = repo
        .save(&NewLine::new("One", "red", stations[0].clone(), stations[1].clone(), 1))
        .unwrap();
    let second = repo
        .save(&NewLine::new("Two", "blue", stations[0].clone(), stations[1].clone(), 2))
        .unwrap();

    let err = repo.update(second.id, "One", "blue").unwrap_err();
    assert!(matches!(err, RepoError::ConstraintViolation(_)));
    assert_eq!(repo.find_by_id(first.id).unwrap().name, "One");
    assert_eq!(repo.find_by_id(second.id).unwrap().name, "Two");
}

#[test]
fn delete_removes_line_and_its_associations() {
    let conn = open_db_in_memory().unwrap();
    let stations = seed_stations(&conn, &["A", "B"]);
    let repo = SqliteLineRepository::try_new(&conn).unwrap();
    let saved = repo
        .save(&NewLine::new("Gone", "red", stations[0].clone(), stations[1].clone(), 3))
        .unwrap();

    repo.delete(saved.id).unwrap();

    assert!(matches!(
        repo.find_by_id(saved.id),
        Err(RepoError::NotFound {
            entity: EntityKind::Line,
            ..
        })
    ));
    assert_eq!(association_count(&conn), 0);
    assert!(matches!(
        repo.delete(saved.id),
        Err(RepoError::NotFound { .. })
    ));
}

#[test]
fn find_all_returns_every_line_with_stations() {
    let conn = open_db_in_memory().unwrap();
    let stations = seed_stations(&conn, &["A", "B", "C"]);
    let repo = SqliteLineRepository::try_new(&conn).unwrap();
    repo.save(&NewLine::new("One", "red", stations[0].clone(), stations[1].clone(), 1))
        .unwrap();
    repo.save(&NewLine::new("Two", "blue", stations[0].clone(), stations[2].clone(), 2))
        .unwrap();

    let lines = repo.find_all().unwrap();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0].name, "One");
    assert_eq!(lines[1].stations, vec![stations[0].clone(), stations[2].clone()]);
}

#[test]
fn repository_rejects_connection_missing_line_column() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(
        "CREATE TABLE line (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            color TEXT NOT NULL
        );",
    )
    .unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    assert!(matches!(
        SqliteLineRepository::try_new(&conn),
        Err(RepoError::MissingRequiredColumn {
            table: "line",
            column: "up_station_id"
        })
    ));
}

#[test]
fn save_trims_labels_so_padded_duplicates_collide() {
    let conn = open_db_in_memory().unwrap();
    let stations = seed_stations(&conn, &["A", "B"]);
    let repo = SqliteLineRepository::try_new(&conn).unwrap();

    let first = repo
        .save(&NewLine::new("L1", "red", stations[0].clone(), stations[1].clone(), 10))
        .unwrap();
    assert_eq!(first.name, "L1");

    let padded = NewLine {
        name: " L1 ".to_string(),
        color: " blue ".to_string(),
        up_station: stations[0].clone(),
        down_station: stations[1].clone(),
        distance: 4,
    };
    let err = repo.save(&padded).unwrap_err();
    assert!(matches!(err, RepoError::ConstraintViolation(_)));
    assert_eq!(line_count(&conn), 1);

    let renamed = NewLine {
        name: "  L2\t".to_string(),
        ..padded
    };
    let saved = repo.save(&renamed).unwrap();
    assert_eq!(saved.name, "L2");
    assert_eq!(saved.color, "blue");
}

#[test]
fn update_stores_trimmed_labels() {
    let conn = open_db_in_memory().unwrap();
    let stations = seed_stations(&conn, &["A", "B"]);
    let repo = SqliteLineRepository::try_new(&conn).unwrap();
    let saved = repo
        .save(&NewLine::new("L1", "red", stations[0].clone(), stations[1].clone(), 10))
        .unwrap();

    repo.update(saved.id, "  Everline ", " yellow").unwrap();

    let loaded = repo.find_by_id(saved.id).unwrap();
    assert_eq!(loaded.name, "Everline");
    assert_eq!(loaded.color, "yellow");
    assert!(matches!(
        repo.update(saved.id, "   ", "red"),
        Err(RepoError::InvalidLine(LineValidationError::BlankName))
    ));
}

fn create_line_on_own_connection(path: &Path, barrier: &Barrier) -> Result<i64, ServiceError> {
    let conn = open_db(path).unwrap();
    let service = LineService::new(
        SqliteStationRepository::try_new(&conn).unwrap(),
        SqliteLineRepository::try_new(&conn).unwrap(),
    );
    barrier.wait();
    service
        .create_line(&LineRequest {
            name: "L1".to_string(),
            color: "red".to_string(),
            up_station_id: 1,
            down_station_id: 2,
            distance: 10,
        })
        .map(|line| line.id)
}

#[test]
fn concurrent_duplicate_names_are_decided_by_the_unique_constraint() {
    const WRITERS: usize = 4;
    let dir = tempfile::tempdir().unwrap();
    let path = Arc::new(dir.path().join("subway.db"));
    {
        let conn = open_db(path.as_path()).unwrap();
        seed_stations(&conn, &["A", "B"]);
    }

    let barrier = Arc::new(Barrier::new(WRITERS));
    let handles: Vec<_> = (0..WRITERS)
        .map(|_| {
            let path = Arc::clone(&path);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || create_line_on_own_connection(path.as_path(), &barrier))
        })
        .collect();
    let results: Vec<Result<i64, ServiceError>> = handles
        .into_iter()
        .map(|handle| handle.join().unwrap())
        .collect();

    let winners = results.iter().filter(|result| result.is_ok()).count();
    assert_eq!(winners, 1, "results: {results:?}");
    for result in &results {
        if let Err(err) = result {
            assert!(
                matches!(err, ServiceError::ConstraintViolation(_)),
                "unexpected error: {err}"
            );
        }
    }

    let conn = open_db(path.as_path()).unwrap();
    assert_eq!(line_count(&conn), 1);
    assert_eq!(association_count(&conn), 2);
}
