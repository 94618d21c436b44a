use std::sync::Arc;

use chrono::{DateTime, Utc};
use uuid::Uuid;
use validator::Validate;

use crate::dto::api_response::ApiResponse;
use crate::dto::mission_dto::{CreateMissionRequest, FinishMissionRequest, ValidateMissionRequest};
use crate::models::mission::{Mission, MissionStatus};
use crate::services::MissionService;
use crate::utils::errors::{bad_request_error, AppError};
use crate::utils::validation::validate_period;

pub struct MissionController {
    service: Arc<MissionService>,
}

impl MissionController {
    pub fn new(service: Arc<MissionService>) -> Self {
        Self { service }
    }

    pub async fn create(&self, request: CreateMissionRequest) -> Result<ApiResponse<Mission>, AppError> {
        request.validate()?;

        let mission = self.service.create(request.into()).await?;
        log::info!("🗺️ Misión {} creada", mission.id);

        Ok(ApiResponse::success_with_message(mission, "Mission created"))
    }

    pub async fn validate(&self, id: Uuid, request: ValidateMissionRequest) -> Result<ApiResponse<Mission>, AppError> {
        request.validate()?;

        let mission = self.service.validate(id, request.comment, request.validator_id).await?;
        log::info!("✅ Misión {} validada", mission.id);

        Ok(ApiResponse::success_with_message(mission, "Mission validated"))
    }

    pub async fn start(&self, id: Uuid) -> Result<ApiResponse<Mission>, AppError> {
        let mission = self.service.start(id).await?;
        log::info!("🚀 Misión {} iniciada", mission.id);

        Ok(ApiResponse::success_with_message(mission, "Mission started"))
    }

    pub async fn finish(&self, id: Uuid, request: FinishMissionRequest) -> Result<ApiResponse<Mission>, AppError> {
        request.validate()?;

        let mission = self.service.finish(id, request.comment).await?;
        log::info!("🏁 Misión {} terminada", mission.id);

        Ok(ApiResponse::success_with_message(mission, "Mission finished"))
    }

    pub async fn get(&self, id: Uuid) -> Result<ApiResponse<Mission>, AppError> {
        Ok(ApiResponse::success(self.service.get(id).await?))
    }

    pub async fn list(&self) -> Result<ApiResponse<Vec<Mission>>, AppError> {
        Ok(ApiResponse::success(self.service.list_all().await?))
    }

    pub async fn list_in_progress(&self) -> Result<ApiResponse<Vec<Mission>>, AppError> {
        Ok(ApiResponse::success(self.service.list_in_progress().await?))
    }

    pub async fn list_by_status(&self, status: &str) -> Result<ApiResponse<Vec<Mission>>, AppError> {
        let status: MissionStatus = status.parse().map_err(|e: String| bad_request_error(&e))?;
        Ok(ApiResponse::success(self.service.list_by_status(status).await?))
    }

    pub async fn list_by_period(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<ApiResponse<Vec<Mission>>, AppError> {
        validate_period(from, to)?;
        Ok(ApiResponse::success(self.service.list_by_period(from, to).await?))
    }
}
