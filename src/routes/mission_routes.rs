use axum::{
    extract::{Path, Query, State},
    routing::{get, post, put},
    Json, Router,
};
use uuid::Uuid;

use crate::controllers::mission_controller::MissionController;
use crate::dto::api_response::ApiResponse;
use crate::dto::mission_dto::{CreateMissionRequest, FinishMissionRequest, PeriodQuery, ValidateMissionRequest};
use crate::models::mission::Mission;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_mission_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_mission).get(list_missions))
        .route("/in-progress", get(list_in_progress))
        .route("/period", get(list_by_period))
        .route("/by-status/:status", get(list_by_status))
        .route("/:id", get(get_mission))
        .route("/:id/validate", put(validate_mission))
        .route("/:id/start", put(start_mission))
        .route("/:id/finish", put(finish_mission))
}

fn controller(state: &AppState) -> MissionController {
    MissionController::new(state.missions.clone())
}

async fn create_mission(
    State(state): State<AppState>,
    Json(request): Json<CreateMissionRequest>,
) -> Result<Json<ApiResponse<Mission>>, AppError> {
    Ok(Json(controller(&state).create(request).await?))
}

async fn list_missions(State(state): State<AppState>) -> Result<Json<ApiResponse<Vec<Mission>>>, AppError> {
    Ok(Json(controller(&state).list().await?))
}

async fn list_in_progress(State(state): State<AppState>) -> Result<Json<ApiResponse<Vec<Mission>>>, AppError> {
    Ok(Json(controller(&state).list_in_progress().await?))
}

async fn list_by_status(
    State(state): State<AppState>,
    Path(status): Path<String>,
) -> Result<Json<ApiResponse<Vec<Mission>>>, AppError> {
    Ok(Json(controller(&state).list_by_status(&status).await?))
}

async fn list_by_period(
    State(state): State<AppState>,
    Query(period): Query<PeriodQuery>,
) -> Result<Json<ApiResponse<Vec<Mission>>>, AppError> {
    Ok(Json(controller(&state).list_by_period(period.from, period.to).await?))
}

async fn get_mission(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Mission>>, AppError> {
    Ok(Json(controller(&state).get(id).await?))
}

async fn validate_mission(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<ValidateMissionRequest>,
) -> Result<Json<ApiResponse<Mission>>, AppError> {
    Ok(Json(controller(&state).validate(id, request).await?))
}

async fn start_mission(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Mission>>, AppError> {
    Ok(Json(controller(&state).start(id).await?))
}

async fn finish_mission(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<FinishMissionRequest>,
) -> Result<Json<ApiResponse<Mission>>, AppError> {
    Ok(Json(controller(&state).finish(id, request).await?))
}
