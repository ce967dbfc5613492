//! Core domain logic for the subway network backend.
//! Stations, lines and their association live here, behind repository
//! traits backed by SQLite.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::line::{Line, LineId, LineValidationError, NewLine};
pub use model::station::{Station, StationId, StationValidationError, STATION_NAME_MAX_CHARS};
pub use repo::line_repo::{LineRepository, SqliteLineRepository};
pub use repo::station_repo::{SqliteStationRepository, StationRepository};
pub use repo::{EntityKind, RepoError, RepoResult};
pub use service::line_service::{LineRequest, LineResponse, LineService, LineUpdateRequest};
pub use service::station_service::{StationRequest, StationResponse, StationService};
pub use service::{ServiceError, ServiceResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
