//! Line use-case service.
//!
//! # Responsibility
//! - Resolve station references and build the line aggregate.
//! - Persist, update and delete lines through the line repository.
//! - Map lines to the `{id, name, color, stations}` response view.
//!
//! # Invariants
//! - A line is only created when both endpoint stations resolve.
//! - Update replaces `name` and `color` only.

use crate::model::line::{Line, LineId, NewLine};
use crate::model::station::StationId;
use crate::repo::line_repo::LineRepository;
use crate::repo::station_repo::StationRepository;
use crate::service::station_service::StationResponse;
use crate::service::{log_outcome, ServiceResult};
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Request body for line creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineRequest {
    pub name: String,
    pub color: String,
    pub up_station_id: StationId,
    pub down_station_id: StationId,
    pub distance: i64,
}

/// Request body for replacing a line's name and color.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineUpdateRequest {
    pub name: String,
    pub color: String,
}

/// Response view of one line with its stations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineResponse {
    pub id: LineId,
    pub name: String,
    pub color: String,
    pub stations: Vec<StationResponse>,
}

impl From<Line> for LineResponse {
    fn from(line: Line) -> Self {
        Self {
            id: line.id,
            name: line.name,
            color: line.color,
            stations: line
                .stations
                .into_iter()
                .map(StationResponse::from)
                .collect(),
        }
    }
}

/// Line service facade over station and line repositories.
pub struct LineService<S: StationRepository, L: LineRepository> {
    stations: S,
    lines: L,
}

impl<S: StationRepository, L: LineRepository> LineService<S, L> {
    pub fn new(stations: S, lines: L) -> Self {
        Self { stations, lines }
    }

    /// Creates a line between two existing stations.
    ///
    /// # Errors
    /// - `NotFound("No such Station")` when either endpoint is missing.
    /// - `ConstraintViolation` for a duplicate name or invalid scalars.
    pub fn create_line(&self, request: &LineRequest) -> ServiceResult<LineResponse> {
        let started_at = Instant::now();
        let result = self.save_line(request);
        log_outcome(
            "line_create",
            started_at,
            result.as_ref().ok().map(|line| line.id),
            &result,
        );
        result
    }

    pub fn find_all_lines(&self) -> ServiceResult<Vec<LineResponse>> {
        let lines = self.lines.find_all()?;
        Ok(lines.into_iter().map(LineResponse::from).collect())
    }

    /// Gets one line; `NotFound("No such Line")` when absent.
    pub fn find_line_by_id(&self, id: LineId) -> ServiceResult<LineResponse> {
        Ok(self.lines.find_by_id(id)?.into())
    }

    /// Replaces name and color of an existing line.
    pub fn update_line(&self, id: LineId, request: &LineUpdateRequest) -> ServiceResult<()> {
        let started_at = Instant::now();
        let result: ServiceResult<()> = self
            .lines
            .update(id, &request.name, &request.color)
            .map_err(Into::into);
        log_outcome("line_update", started_at, Some(id), &result);
        result
    }

    /// Deletes a line and its station associations.
    pub fn delete_line(&self, id: LineId) -> ServiceResult<()> {
        let started_at = Instant::now();
        let result: ServiceResult<()> = self.lines.delete(id).map_err(Into::into);
        log_outcome("line_delete", started_at, Some(id), &result);
        result
    }

    fn save_line(&self, request: &LineRequest) -> ServiceResult<LineResponse> {
        let up_station = self.stations.find_by_id(request.up_station_id)?;
        let down_station = self.stations.find_by_id(request.down_station_id)?;

        let line = NewLine::new(
            request.name.as_str(),
            request.color.as_str(),
            up_station,
            down_station,
            request.distance,
        );
        Ok(self.lines.save(&line)?.into())
    }
}
