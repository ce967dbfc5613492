use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "subway")]
#[command(about = "Manage subway stations and lines.", version)]
pub struct CommandLine {
    /// SQLite database file, created on first use
    #[arg(long, env = "SUBWAY_DB", default_value = "subway.db", global = true)]
    pub db: PathBuf,

    /// Directory for rolling log files; logging stays off when unset
    #[arg(long, env = "SUBWAY_LOG_DIR", global = true)]
    pub log_dir: Option<PathBuf>,

    /// trace|debug|info|warn|error
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Station operations
    #[command(subcommand)]
    Station(StationCommand),
    /// Line operations
    #[command(subcommand)]
    Line(LineCommand),
}

#[derive(Subcommand)]
pub enum StationCommand {
    /// Create a station
    Add { name: String },
    /// List all stations
    List,
    /// Show one station
    Show { id: i64 },
    /// Delete a station that no line references
    Delete { id: i64 },
}

#[derive(Subcommand)]
pub enum LineCommand {
    /// Create a line between two existing stations
    Add(AddLineArgs),
    /// List all lines
    List,
    /// Show one line with its stations
    Show { id: i64 },
    /// Replace a line's name and color
    Update {
        id: i64,
        #[arg(long)]
        name: String,
        #[arg(long)]
        color: String,
    },
    /// Delete a line
    Delete { id: i64 },
}

#[derive(Args)]
pub struct AddLineArgs {
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub color: String,
    /// Up endpoint station id
    #[arg(long = "up")]
    pub up_station_id: i64,
    /// Down endpoint station id
    #[arg(long = "down")]
    pub down_station_id: i64,
    #[arg(long)]
    pub distance: i64,
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
