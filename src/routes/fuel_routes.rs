use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use uuid::Uuid;

use crate::controllers::fuel_controller::FuelController;
use crate::dto::api_response::ApiResponse;
use crate::dto::fuel_dto::{CreateFuelCardRequest, IssueVoucherRequest, RecordFuelEventRequest};
use crate::dto::mission_dto::PeriodQuery;
use crate::models::fuel::{FuelCard, FuelEvent, FuelVoucher};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_fuel_router() -> Router<AppState> {
    Router::new()
        .route("/events", post(record_event).get(list_events))
        .route("/vehicles/:vehicle_id", get(vehicle_history))
        .route("/vouchers", post(issue_voucher))
        .route("/vouchers/unused", get(unused_vouchers))
        .route("/vouchers/vehicle/:vehicle_id", get(vouchers_for_vehicle))
        .route("/vouchers/:number/redeem", post(redeem_voucher))
        .route("/cards", post(create_card))
        .route("/cards/active", get(active_cards))
        .route("/cards/vehicle/:vehicle_id", get(cards_for_vehicle))
        .route("/cards/:number/validate", get(validate_card))
}

fn controller(state: &AppState) -> FuelController {
    FuelController::new(state.fuel.clone())
}

async fn record_event(
    State(state): State<AppState>,
    Json(request): Json<RecordFuelEventRequest>,
) -> Result<Json<ApiResponse<FuelEvent>>, AppError> {
    Ok(Json(controller(&state).record_event(request).await?))
}

async fn list_events(State(state): State<AppState>) -> Result<Json<ApiResponse<Vec<FuelEvent>>>, AppError> {
    Ok(Json(controller(&state).list_events().await?))
}

async fn vehicle_history(
    State(state): State<AppState>,
    Path(vehicle_id): Path<Uuid>,
    Query(period): Query<PeriodQuery>,
) -> Result<Json<ApiResponse<Vec<FuelEvent>>>, AppError> {
    Ok(Json(controller(&state).history(vehicle_id, period.from, period.to).await?))
}

async fn issue_voucher(
    State(state): State<AppState>,
    Json(request): Json<IssueVoucherRequest>,
) -> Result<Json<ApiResponse<FuelVoucher>>, AppError> {
    Ok(Json(controller(&state).issue_voucher(request).await?))
}

async fn redeem_voucher(
    State(state): State<AppState>,
    Path(number): Path<String>,
) -> Result<Json<ApiResponse<FuelVoucher>>, AppError> {
    Ok(Json(controller(&state).redeem_voucher(&number).await?))
}

async fn unused_vouchers(State(state): State<AppState>) -> Result<Json<ApiResponse<Vec<FuelVoucher>>>, AppError> {
    Ok(Json(controller(&state).unused_vouchers().await?))
}

async fn vouchers_for_vehicle(
    State(state): State<AppState>,
    Path(vehicle_id): Path<Uuid>,
) -> Result<Json<ApiResponse<Vec<FuelVoucher>>>, AppError> {
    Ok(Json(controller(&state).vouchers_for_vehicle(vehicle_id).await?))
}

async fn create_card(
    State(state): State<AppState>,
    Json(request): Json<CreateFuelCardRequest>,
) -> Result<Json<ApiResponse<FuelCard>>, AppError> {
    Ok(Json(controller(&state).create_card(request).await?))
}

async fn validate_card(
    State(state): State<AppState>,
    Path(number): Path<String>,
) -> Result<Json<ApiResponse<FuelCard>>, AppError> {
    Ok(Json(controller(&state).validate_card(&number).await?))
}

async fn active_cards(State(state): State<AppState>) -> Result<Json<ApiResponse<Vec<FuelCard>>>, AppError> {
    Ok(Json(controller(&state).active_cards().await?))
}

async fn cards_for_vehicle(
    State(state): State<AppState>,
    Path(vehicle_id): Path<Uuid>,
) -> Result<Json<ApiResponse<Vec<FuelCard>>>, AppError> {
    Ok(Json(controller(&state).cards_for_vehicle(vehicle_id).await?))
}
