use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::models::maintenance::NewMaintenanceRecord;
use crate::utils::validation::validate_not_empty;

// Request para registrar un mantenimiento
#[derive(Debug, Deserialize, Validate)]
pub struct CreateMaintenanceRequest {
    pub vehicle_id: Uuid,
    pub date: Option<DateTime<Utc>>,
    #[validate(custom = "validate_not_empty")]
    pub maintenance_type: String,
    pub description: Option<String>,
}

impl From<CreateMaintenanceRequest> for NewMaintenanceRecord {
    fn from(request: CreateMaintenanceRequest) -> Self {
        NewMaintenanceRecord {
            vehicle_id: request.vehicle_id,
            date: request.date.unwrap_or_else(Utc::now),
            maintenance_type: request.maintenance_type,
            description: request.description,
        }
    }
}
