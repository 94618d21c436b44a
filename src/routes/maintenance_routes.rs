use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use uuid::Uuid;

use crate::controllers::maintenance_controller::MaintenanceController;
use crate::dto::api_response::ApiResponse;
use crate::dto::maintenance_dto::CreateMaintenanceRequest;
use crate::models::maintenance::MaintenanceRecord;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_maintenance_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_record).get(list_records))
        .route("/vehicle/:vehicle_id", get(list_by_vehicle))
        .route("/:id", get(get_record))
}

fn controller(state: &AppState) -> MaintenanceController {
    MaintenanceController::new(state.maintenance.clone())
}

async fn create_record(
    State(state): State<AppState>,
    Json(request): Json<CreateMaintenanceRequest>,
) -> Result<Json<ApiResponse<MaintenanceRecord>>, AppError> {
    Ok(Json(controller(&state).create(request).await?))
}

async fn list_records(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<MaintenanceRecord>>>, AppError> {
    Ok(Json(controller(&state).list().await?))
}

async fn list_by_vehicle(
    State(state): State<AppState>,
    Path(vehicle_id): Path<Uuid>,
) -> Result<Json<ApiResponse<Vec<MaintenanceRecord>>>, AppError> {
    Ok(Json(controller(&state).list_by_vehicle(vehicle_id).await?))
}

async fn get_record(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<MaintenanceRecord>>, AppError> {
    Ok(Json(controller(&state).get(id).await?))
}
