use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::models::mission::NewMission;

// Request para crear una misión
#[derive(Debug, Deserialize, Validate)]
pub struct CreateMissionRequest {
    pub vehicle_id: Option<Uuid>,
    pub driver_id: Option<Uuid>,
    pub start_at: Option<DateTime<Utc>>,
    pub end_at: Option<DateTime<Utc>>,
    #[validate(length(max = 500))]
    pub route: Option<String>,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
}

impl From<CreateMissionRequest> for NewMission {
    fn from(request: CreateMissionRequest) -> Self {
        NewMission {
            vehicle_id: request.vehicle_id,
            driver_id: request.driver_id,
            start_at: request.start_at,
            end_at: request.end_at,
            route: request.route,
            description: request.description,
        }
    }
}

// Request para validar una misión
#[derive(Debug, Deserialize, Validate)]
pub struct ValidateMissionRequest {
    #[serde(default)]
    #[validate(length(max = 1000))]
    pub comment: String,
    pub validator_id: Option<Uuid>,
}

// Request para terminar una misión
#[derive(Debug, Deserialize, Validate)]
pub struct FinishMissionRequest {
    #[serde(default)]
    #[validate(length(max = 1000))]
    pub comment: String,
}

/// Periodo `[from, to]` en query string (RFC 3339)
#[derive(Debug, Deserialize)]
pub struct PeriodQuery {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
}
