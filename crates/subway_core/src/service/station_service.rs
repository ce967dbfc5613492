//! Station use-case service.
//!
//! # Responsibility
//! - Create, look up, list and delete stations.
//! - Map stations to the `{id, name}` response view.

use crate::model::station::{Station, StationId};
use crate::repo::station_repo::StationRepository;
use crate::service::{log_outcome, ServiceResult};
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Request body for station creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StationRequest {
    pub name: String,
}

/// Response view of one station.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StationResponse {
    pub id: StationId,
    pub name: String,
}

impl From<Station> for StationResponse {
    fn from(station: Station) -> Self {
        Self {
            id: station.id,
            name: station.name,
        }
    }
}

/// Station service facade over a repository implementation.
pub struct StationService<S: StationRepository> {
    stations: S,
}

impl<S: StationRepository> StationService<S> {
    pub fn new(stations: S) -> Self {
        Self { stations }
    }

    /// Creates one station. Names longer than 20 characters are rejected.
    pub fn create_station(&self, request: &StationRequest) -> ServiceResult<StationResponse> {
        let started_at = Instant::now();
        let result: ServiceResult<StationResponse> = self
            .stations
            .create(&request.name)
            .map(StationResponse::from)
            .map_err(Into::into);
        log_outcome(
            "station_create",
            started_at,
            result.as_ref().ok().map(|station| station.id),
            &result,
        );
        result
    }

    pub fn find_all_stations(&self) -> ServiceResult<Vec<StationResponse>> {
        let stations = self.stations.find_all()?;
        Ok(stations.into_iter().map(StationResponse::from).collect())
    }

    pub fn find_station_by_id(&self, id: StationId) -> ServiceResult<StationResponse> {
        Ok(self.stations.find_by_id(id)?.into())
    }

    /// Deletes one station; refused while any line references it.
    pub fn delete_station(&self, id: StationId) -> ServiceResult<()> {
        let started_at = Instant::now();
        let result: ServiceResult<()> = self.stations.delete(id).map_err(Into::into);
        log_outcome("station_delete", started_at, Some(id), &result);
        result
    }
}
