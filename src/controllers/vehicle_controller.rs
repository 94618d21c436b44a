use std::sync::Arc;

use uuid::Uuid;
use validator::Validate;

use crate::dto::api_response::ApiResponse;
use crate::dto::vehicle_dto::{AddDocumentRequest, RegisterVehicleRequest, UpdateOdometerRequest, UpdateStatusRequest};
use crate::models::vehicle::{OdometerReading, Vehicle};
use crate::services::VehicleService;
use crate::utils::errors::AppError;

pub struct VehicleController {
    service: Arc<VehicleService>,
}

impl VehicleController {
    pub fn new(service: Arc<VehicleService>) -> Self {
        Self { service }
    }

    pub async fn register(&self, request: RegisterVehicleRequest) -> Result<ApiResponse<Vehicle>, AppError> {
        request.validate()?;

        let vehicle = self.service.register(request.into()).await?;
        log::info!("🚗 Vehículo {} registrado", vehicle.license_plate);

        Ok(ApiResponse::success_with_message(vehicle, "Vehicle registered"))
    }

    pub async fn get(&self, id: Uuid) -> Result<ApiResponse<Vehicle>, AppError> {
        Ok(ApiResponse::success(self.service.get(id).await?))
    }

    pub async fn list(&self) -> Result<ApiResponse<Vec<Vehicle>>, AppError> {
        Ok(ApiResponse::success(self.service.list().await?))
    }

    pub async fn list_by_category(&self, category: &str) -> Result<ApiResponse<Vec<Vehicle>>, AppError> {
        Ok(ApiResponse::success(self.service.list_by_category(category).await?))
    }

    pub async fn list_by_responsible(&self, responsible: &str) -> Result<ApiResponse<Vec<Vehicle>>, AppError> {
        Ok(ApiResponse::success(self.service.list_by_responsible(responsible).await?))
    }

    pub async fn maintenance_due(&self) -> Result<ApiResponse<Vec<Vehicle>>, AppError> {
        let due = self.service.list_maintenance_due().await?;
        log::info!("🔧 {} vehículos con revisión vencida", due.len());
        Ok(ApiResponse::success(due))
    }

    pub async fn update_odometer(&self, id: Uuid, request: UpdateOdometerRequest) -> Result<ApiResponse<Vehicle>, AppError> {
        request.validate()?;

        let vehicle = self.service.update_odometer(id, request.reading, request.comment).await?;
        Ok(ApiResponse::success_with_message(vehicle, "Odometer updated"))
    }

    pub async fn odometer_history(&self, id: Uuid) -> Result<ApiResponse<Vec<OdometerReading>>, AppError> {
        Ok(ApiResponse::success(self.service.odometer_history(id).await?))
    }

    pub async fn update_status(&self, id: Uuid, request: UpdateStatusRequest) -> Result<ApiResponse<Vehicle>, AppError> {
        let vehicle = self.service.update_status(id, request.status).await?;
        Ok(ApiResponse::success_with_message(vehicle, "Vehicle status updated"))
    }

    pub async fn add_document(&self, id: Uuid, request: AddDocumentRequest) -> Result<ApiResponse<Vehicle>, AppError> {
        request.validate()?;

        let vehicle = self.service.add_document(id, request.into()).await?;
        log::info!("📄 Documento añadido al vehículo {}", vehicle.id);

        Ok(ApiResponse::success_with_message(vehicle, "Document added"))
    }
}
