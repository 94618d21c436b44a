use axum::{
    extract::{Path, State},
    routing::{get, post, put},
    Json, Router,
};
use uuid::Uuid;

use crate::controllers::vehicle_controller::VehicleController;
use crate::dto::api_response::ApiResponse;
use crate::dto::vehicle_dto::{AddDocumentRequest, RegisterVehicleRequest, UpdateOdometerRequest, UpdateStatusRequest};
use crate::models::vehicle::{OdometerReading, Vehicle};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_vehicle_router() -> Router<AppState> {
    Router::new()
        .route("/", post(register_vehicle).get(list_vehicles))
        .route("/maintenance-due", get(maintenance_due))
        .route("/category/:category", get(list_by_category))
        .route("/responsible/:responsible", get(list_by_responsible))
        .route("/:id", get(get_vehicle))
        .route("/:id/odometer", put(update_odometer).get(odometer_history))
        .route("/:id/status", put(update_status))
        .route("/:id/documents", post(add_document))
}

fn controller(state: &AppState) -> VehicleController {
    VehicleController::new(state.vehicles.clone())
}

async fn register_vehicle(
    State(state): State<AppState>,
    Json(request): Json<RegisterVehicleRequest>,
) -> Result<Json<ApiResponse<Vehicle>>, AppError> {
    Ok(Json(controller(&state).register(request).await?))
}

async fn list_vehicles(State(state): State<AppState>) -> Result<Json<ApiResponse<Vec<Vehicle>>>, AppError> {
    Ok(Json(controller(&state).list().await?))
}

async fn maintenance_due(State(state): State<AppState>) -> Result<Json<ApiResponse<Vec<Vehicle>>>, AppError> {
    Ok(Json(controller(&state).maintenance_due().await?))
}

async fn list_by_category(
    State(state): State<AppState>,
    Path(category): Path<String>,
) -> Result<Json<ApiResponse<Vec<Vehicle>>>, AppError> {
    Ok(Json(controller(&state).list_by_category(&category).await?))
}

async fn list_by_responsible(
    State(state): State<AppState>,
    Path(responsible): Path<String>,
) -> Result<Json<ApiResponse<Vec<Vehicle>>>, AppError> {
    Ok(Json(controller(&state).list_by_responsible(&responsible).await?))
}

async fn get_vehicle(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Vehicle>>, AppError> {
    Ok(Json(controller(&state).get(id).await?))
}

async fn update_odometer(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateOdometerRequest>,
) -> Result<Json<ApiResponse<Vehicle>>, AppError> {
    Ok(Json(controller(&state).update_odometer(id, request).await?))
}

async fn odometer_history(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Vec<OdometerReading>>>, AppError> {
    Ok(Json(controller(&state).odometer_history(id).await?))
}

async fn update_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateStatusRequest>,
) -> Result<Json<ApiResponse<Vehicle>>, AppError> {
    Ok(Json(controller(&state).update_status(id, request).await?))
}

async fn add_document(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<AddDocumentRequest>,
) -> Result<Json<ApiResponse<Vehicle>>, AppError> {
    Ok(Json(controller(&state).add_document(id, request).await?))
}
