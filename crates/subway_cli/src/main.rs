//! Command-line front end for the subway core.
//!
//! # Responsibility
//! - Parse commands and runtime configuration (database path, logging).
//! - Call core services and print results as JSON.

mod commands;

use anyhow::{Context, Result};
use commands::{CommandLine, Commands, LineCommand, StationCommand};
use serde::Serialize;
use std::path::{Path, PathBuf};
use subway_core::db::open_db;
use subway_core::{
    default_log_level, init_logging, LineRequest, LineService, LineUpdateRequest,
    SqliteLineRepository, SqliteStationRepository, StationRequest, StationService,
};

fn main() -> Result<()> {
    let cli = CommandLine::parse_args();

    if let Some(log_dir) = cli.log_dir.as_deref() {
        let level = cli.log_level.as_deref().unwrap_or(default_log_level());
        init_logging(level, absolute(log_dir)?)
            .with_context(|| format!("failed to initialize logging in {}", log_dir.display()))?;
    }

    let conn = open_db(&cli.db)
        .with_context(|| format!("failed to open database {}", cli.db.display()))?;

    match cli.command {
        Commands::Station(command) => {
            let service = StationService::new(SqliteStationRepository::try_new(&conn)?);
            match command {
                StationCommand::Add { name } => {
                    print_json(&service.create_station(&StationRequest { name })?)
                }
                StationCommand::List => print_json(&service.find_all_stations()?),
                StationCommand::Show { id } => print_json(&service.find_station_by_id(id)?),
                StationCommand::Delete { id } => service.delete_station(id).map_err(Into::into),
            }
        }
        Commands::Line(command) => {
            let service = LineService::new(
                SqliteStationRepository::try_new(&conn)?,
                SqliteLineRepository::try_new(&conn)?,
            );
            match command {
                LineCommand::Add(args) => print_json(&service.create_line(&LineRequest {
                    name: args.name,
                    color: args.color,
                    up_station_id: args.up_station_id,
                    down_station_id: args.down_station_id,
                    distance: args.distance,
                })?),
                LineCommand::List => print_json(&service.find_all_lines()?),
                LineCommand::Show { id } => print_json(&service.find_line_by_id(id)?),
                LineCommand::Update { id, name, color } => service
                    .update_line(id, &LineUpdateRequest { name, color })
                    .map_err(Into::into),
                LineCommand::Delete { id } => service.delete_line(id).map_err(Into::into),
            }
        }
    }
}

fn print_json(value: &impl Serialize) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn absolute(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    let cwd = std::env::current_dir().context("failed to resolve current directory")?;
    Ok(cwd.join(path))
}
