//! Station domain model.
//!
//! # Invariants
//! - `name` is non-blank and at most [`STATION_NAME_MAX_CHARS`] characters.
//! - Station names are not unique; two stations may share a name.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Store-assigned station identifier.
pub type StationId = i64;

/// Maximum station name length, counted in characters.
pub const STATION_NAME_MAX_CHARS: usize = 20;

/// Persisted subway stop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Station {
    pub id: StationId,
    pub name: String,
}

impl Station {
    pub fn new(id: StationId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// Field rule violations for station input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StationValidationError {
    BlankName,
    NameTooLong { chars: usize, max: usize },
}

impl Display for StationValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankName => write!(f, "station name must not be blank"),
            Self::NameTooLong { chars, max } => write!(
                f,
                "station name has {chars} characters; at most {max} are allowed"
            ),
        }
    }
}

impl Error for StationValidationError {}

/// Trims a station name and checks it against the station rules.
///
/// Returns the trimmed name to persist.
pub fn normalize_station_name(name: &str) -> Result<String, StationValidationError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(StationValidationError::BlankName);
    }

    let chars = trimmed.chars().count();
    if chars > STATION_NAME_MAX_CHARS {
        return Err(StationValidationError::NameTooLong {
            chars,
            max: STATION_NAME_MAX_CHARS,
        });
    }

    Ok(trimmed.to_string())
}
