//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into station/line use-cases.
//! - Map persisted entities to response views.
//! - Collapse repository failures into the caller-facing error taxonomy.
//!
//! # Invariants
//! - Services never bypass repository validation/persistence contracts.
//! - Services remain storage-agnostic; they only see repository traits.

pub mod line_service;
pub mod station_service;

use crate::repo::{EntityKind, RepoError};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

pub type ServiceResult<T> = Result<T, ServiceError>;

pub(crate) const NO_SUCH_STATION: &str = "No such Station";
pub(crate) const NO_SUCH_LINE: &str = "No such Line";

/// Caller-facing error for station and line use-cases.
#[derive(Debug)]
pub enum ServiceError {
    /// Referenced station or line does not exist.
    NotFound(String),
    /// Input or store rule rejected the request.
    ConstraintViolation(String),
    /// Storage-level failure.
    Repo(RepoError),
}

impl ServiceError {
    /// Stable short code used in log events.
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "not_found",
            Self::ConstraintViolation(_) => "constraint_violation",
            Self::Repo(_) => "repo_error",
        }
    }
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(message) => write!(f, "{message}"),
            Self::ConstraintViolation(message) => write!(f, "invalid request: {message}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound {
                entity: EntityKind::Station,
                ..
            } => Self::NotFound(NO_SUCH_STATION.to_string()),
            RepoError::NotFound {
                entity: EntityKind::Line,
                ..
            } => Self::NotFound(NO_SUCH_LINE.to_string()),
            RepoError::ConstraintViolation(message) => Self::ConstraintViolation(message),
            RepoError::InvalidStation(err) => Self::ConstraintViolation(err.to_string()),
            RepoError::InvalidLine(err) => Self::ConstraintViolation(err.to_string()),
            other => Self::Repo(other),
        }
    }
}

/// Emits one metadata-only event for a mutating use-case.
pub(crate) fn log_outcome<T>(
    event: &'static str,
    started_at: Instant,
    target_id: Option<i64>,
    result: &ServiceResult<T>,
) {
    let target = target_id.map_or_else(|| "none".to_string(), |id| id.to_string());
    match result {
        Ok(_) => info!(
            "event={} module=service status=ok id={} duration_ms={}",
            event,
            target,
            started_at.elapsed().as_millis()
        ),
        Err(err) => warn!(
            "event={} module=service status=error id={} duration_ms={} error_code={}",
            event,
            target,
            started_at.elapsed().as_millis(),
            err.code()
        ),
    }
}
