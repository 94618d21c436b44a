//! Modelo de mantenimiento ("entretien")

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct NewMaintenanceRecord {
    pub vehicle_id: Uuid,
    pub date: DateTime<Utc>,
    pub maintenance_type: String,
    pub description: Option<String>,
}

/// Intervención de mantenimiento sobre un vehículo
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct MaintenanceRecord {
    pub id: Uuid,
    pub vehicle_id: Uuid,
    pub date: DateTime<Utc>,
    pub maintenance_type: String,
    pub description: Option<String>,
}

impl MaintenanceRecord {
    pub fn new(draft: NewMaintenanceRecord) -> Self {
        Self {
            id: Uuid::new_v4(),
            vehicle_id: draft.vehicle_id,
            date: draft.date,
            maintenance_type: draft.maintenance_type,
            description: draft.description,
        }
    }
}
