//! Modelo de Vehicle
//!
//! Este módulo contiene el struct Vehicle, su historial de odómetro y sus
//! documentos. El núcleo sólo lo consulta por id; el odómetro y el estado
//! se modifican desde `VehicleService`.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::Type;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Estado operativo del vehículo - mapea al ENUM vehicle_status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq)]
#[sqlx(type_name = "vehicle_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VehicleStatus {
    Available,
    OnMission,
    InMaintenance,
    OutOfService,
}

impl VehicleStatus {
    pub const fn as_str(&self) -> &'static str {
        match self {
            VehicleStatus::Available => "AVAILABLE",
            VehicleStatus::OnMission => "ON_MISSION",
            VehicleStatus::InMaintenance => "IN_MAINTENANCE",
            VehicleStatus::OutOfService => "OUT_OF_SERVICE",
        }
    }
}

impl fmt::Display for VehicleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VehicleStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "AVAILABLE" => Ok(VehicleStatus::Available),
            "ON_MISSION" => Ok(VehicleStatus::OnMission),
            "IN_MAINTENANCE" => Ok(VehicleStatus::InMaintenance),
            "OUT_OF_SERVICE" => Ok(VehicleStatus::OutOfService),
            _ => Err(format!("unknown vehicle status '{}'", s)),
        }
    }
}

/// Lectura de odómetro registrada en el historial
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OdometerReading {
    pub date: DateTime<Utc>,
    pub reading: f64,
    pub comment: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DocumentType {
    Insurance,
    Registration,
    TechnicalInspection,
}

/// Documento asociado al vehículo (seguro, permiso de circulación, ITV)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VehicleDocument {
    pub document_type: DocumentType,
    pub number: String,
    pub expires_on: Option<NaiveDate>,
    /// URL o ruta del fichero
    pub file: Option<String>,
    pub valid: bool,
}

/// Datos de alta de un vehículo
#[derive(Debug, Clone, Default)]
pub struct NewVehicle {
    pub license_plate: String,
    pub make: Option<String>,
    pub model: Option<String>,
    pub year: Option<i32>,
    pub category: Option<String>,
    pub responsible: Option<String>,
    pub department: Option<String>,
    pub current_odometer: f64,
    pub next_revision_at: Option<DateTime<Utc>>,
}

/// Vehicle principal
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vehicle {
    pub id: Uuid,
    pub license_plate: String,
    pub make: Option<String>,
    pub model: Option<String>,
    pub year: Option<i32>,
    /// MISSION, SERVICE, POOL
    pub category: Option<String>,
    /// Id del responsable
    pub responsible: Option<String>,
    pub department: Option<String>,
    pub current_odometer: f64,
    pub odometer_history: Vec<OdometerReading>,
    pub status: VehicleStatus,
    pub last_maintenance_at: Option<DateTime<Utc>>,
    pub next_revision_at: Option<DateTime<Utc>>,
    pub documents: Vec<VehicleDocument>,
    pub created_at: DateTime<Utc>,
}

impl Vehicle {
    pub fn new(draft: NewVehicle, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            license_plate: draft.license_plate,
            make: draft.make,
            model: draft.model,
            year: draft.year,
            category: draft.category,
            responsible: draft.responsible,
            department: draft.department,
            current_odometer: draft.current_odometer,
            odometer_history: Vec::new(),
            status: VehicleStatus::Available,
            last_maintenance_at: None,
            next_revision_at: draft.next_revision_at,
            documents: Vec::new(),
            created_at: now,
        }
    }

    /// Revisión vencida: la fecha prevista es estrictamente anterior a `now`
    pub fn is_revision_overdue(&self, now: DateTime<Utc>) -> bool {
        matches!(self.next_revision_at, Some(next) if next < now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_revision_overdue_is_strict() {
        let now = Utc::now();
        let mut vehicle = Vehicle::new(NewVehicle::default(), now);

        assert!(!vehicle.is_revision_overdue(now));

        vehicle.next_revision_at = Some(now);
        assert!(!vehicle.is_revision_overdue(now));

        vehicle.next_revision_at = Some(now - Duration::seconds(1));
        assert!(vehicle.is_revision_overdue(now));
    }

    #[test]
    fn test_status_round_trip_through_str() {
        assert_eq!("in_maintenance".parse::<VehicleStatus>(), Ok(VehicleStatus::InMaintenance));
        assert_eq!(VehicleStatus::OnMission.to_string(), "ON_MISSION");
    }
}
