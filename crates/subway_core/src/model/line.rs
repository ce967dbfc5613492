//! Line domain model.
//!
//! # Responsibility
//! - Define the persisted [`Line`] record and the unsaved [`NewLine`] aggregate.
//! - Validate line scalars before they reach the store.
//!
//! # Invariants
//! - `distance` is strictly positive.
//! - Up and down stations are distinct.
//! - `stations` always contains the endpoints the line was created with,
//!   up station first.

use crate::model::station::{Station, StationId};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Store-assigned line identifier.
pub type LineId = i64;

/// Persisted subway line with its associated stations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Line {
    pub id: LineId,
    pub name: String,
    pub color: String,
    pub up_station_id: StationId,
    pub down_station_id: StationId,
    pub distance: i64,
    /// Loaded from `line_station` in association order.
    pub stations: Vec<Station>,
}

/// Line aggregate built from resolved stations, not yet persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLine {
    pub name: String,
    pub color: String,
    pub up_station: Station,
    pub down_station: Station,
    pub distance: i64,
}

impl NewLine {
    pub fn new(
        name: impl Into<String>,
        color: impl Into<String>,
        up_station: Station,
        down_station: Station,
        distance: i64,
    ) -> Self {
        Self {
            name: name.into().trim().to_string(),
            color: color.into().trim().to_string(),
            up_station,
            down_station,
            distance,
        }
    }

    /// Checks line rules that do not need the store.
    pub fn validate(&self) -> Result<(), LineValidationError> {
        normalize_line_labels(&self.name, &self.color)?;
        if self.distance <= 0 {
            return Err(LineValidationError::NonPositiveDistance(self.distance));
        }
        if self.up_station.id == self.down_station.id {
            return Err(LineValidationError::SameEndpoints(self.up_station.id));
        }
        Ok(())
    }

    /// Stations associated with the line at creation time, up station first.
    pub fn stations(&self) -> [&Station; 2] {
        [&self.up_station, &self.down_station]
    }
}

/// Field rule violations for line input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineValidationError {
    BlankName,
    BlankColor,
    NonPositiveDistance(i64),
    SameEndpoints(StationId),
}

impl Display for LineValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankName => write!(f, "line name must not be blank"),
            Self::BlankColor => write!(f, "line color must not be blank"),
            Self::NonPositiveDistance(value) => {
                write!(f, "line distance must be positive, got {value}")
            }
            Self::SameEndpoints(id) => {
                write!(f, "line endpoints must differ, both are station {id}")
            }
        }
    }
}

impl Error for LineValidationError {}

/// Trims and checks the replaceable line scalars shared by create and update.
///
/// Returns the `(name, color)` pair to persist.
pub fn normalize_line_labels(
    name: &str,
    color: &str,
) -> Result<(String, String), LineValidationError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(LineValidationError::BlankName);
    }
    let color = color.trim();
    if color.is_empty() {
        return Err(LineValidationError::BlankColor);
    }
    Ok((name.to_string(), color.to_string()))
}
