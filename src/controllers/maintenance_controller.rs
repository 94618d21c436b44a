use std::sync::Arc;

use uuid::Uuid;
use validator::Validate;

use crate::dto::api_response::ApiResponse;
use crate::dto::maintenance_dto::CreateMaintenanceRequest;
use crate::models::maintenance::MaintenanceRecord;
use crate::services::MaintenanceService;
use crate::utils::errors::AppError;

pub struct MaintenanceController {
    service: Arc<MaintenanceService>,
}

impl MaintenanceController {
    pub fn new(service: Arc<MaintenanceService>) -> Self {
        Self { service }
    }

    pub async fn create(&self, request: CreateMaintenanceRequest) -> Result<ApiResponse<MaintenanceRecord>, AppError> {
        request.validate()?;

        let record = self.service.create(request.into()).await?;
        log::info!("🔧 Mantenimiento {} registrado", record.id);

        Ok(ApiResponse::success_with_message(record, "Maintenance record created"))
    }

    pub async fn get(&self, id: Uuid) -> Result<ApiResponse<MaintenanceRecord>, AppError> {
        Ok(ApiResponse::success(self.service.get(id).await?))
    }

    pub async fn list(&self) -> Result<ApiResponse<Vec<MaintenanceRecord>>, AppError> {
        Ok(ApiResponse::success(self.service.list().await?))
    }

    pub async fn list_by_vehicle(&self, vehicle_id: Uuid) -> Result<ApiResponse<Vec<MaintenanceRecord>>, AppError> {
        Ok(ApiResponse::success(self.service.list_by_vehicle(vehicle_id).await?))
    }
}
