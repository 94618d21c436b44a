use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use validator::Validate;

use crate::models::vehicle::{DocumentType, NewVehicle, VehicleDocument, VehicleStatus};
use crate::utils::validation::{validate_license_plate, validate_not_empty, validate_odometer};

// Request para registrar un vehículo
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterVehicleRequest {
    #[validate(custom = "validate_license_plate")]
    pub license_plate: String,
    pub make: Option<String>,
    pub model: Option<String>,
    #[validate(range(min = 1900, max = 2100))]
    pub year: Option<i32>,
    pub category: Option<String>,
    pub responsible: Option<String>,
    pub department: Option<String>,
    #[serde(default)]
    #[validate(custom = "validate_odometer")]
    pub current_odometer: f64,
    pub next_revision_at: Option<DateTime<Utc>>,
}

impl From<RegisterVehicleRequest> for NewVehicle {
    fn from(request: RegisterVehicleRequest) -> Self {
        NewVehicle {
            license_plate: request.license_plate,
            make: request.make,
            model: request.model,
            year: request.year,
            category: request.category,
            responsible: request.responsible,
            department: request.department,
            current_odometer: request.current_odometer,
            next_revision_at: request.next_revision_at,
        }
    }
}

// Request para actualizar el odómetro
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateOdometerRequest {
    #[validate(custom = "validate_odometer")]
    pub reading: f64,
    pub comment: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: VehicleStatus,
}

fn default_valid() -> bool {
    true
}

// Request para adjuntar un documento
#[derive(Debug, Deserialize, Validate)]
pub struct AddDocumentRequest {
    pub document_type: DocumentType,
    #[validate(custom = "validate_not_empty")]
    pub number: String,
    pub expires_on: Option<NaiveDate>,
    pub file: Option<String>,
    #[serde(default = "default_valid")]
    pub valid: bool,
}

impl From<AddDocumentRequest> for VehicleDocument {
    fn from(request: AddDocumentRequest) -> Self {
        VehicleDocument {
            document_type: request.document_type,
            number: request.number,
            expires_on: request.expires_on,
            file: request.file,
            valid: request.valid,
        }
    }
}
