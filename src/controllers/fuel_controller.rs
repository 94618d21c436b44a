use std::sync::Arc;

use chrono::{DateTime, Utc};
use uuid::Uuid;
use validator::Validate;

use crate::dto::api_response::ApiResponse;
use crate::dto::fuel_dto::{CreateFuelCardRequest, IssueVoucherRequest, RecordFuelEventRequest};
use crate::models::fuel::{FuelCard, FuelEvent, FuelVoucher};
use crate::services::FuelService;
use crate::utils::errors::AppError;
use crate::utils::validation::validate_period;

pub struct FuelController {
    service: Arc<FuelService>,
}

impl FuelController {
    pub fn new(service: Arc<FuelService>) -> Self {
        Self { service }
    }

    pub async fn record_event(&self, request: RecordFuelEventRequest) -> Result<ApiResponse<FuelEvent>, AppError> {
        request.validate()?;

        let event = self.service.record_fuel_event(request.into()).await?;
        if event.stats.anomaly {
            log::warn!("⚠️ Repostaje {} con consumo anómalo", event.id);
        } else {
            log::info!("⛽ Repostaje {} registrado", event.id);
        }

        Ok(ApiResponse::success_with_message(event, "Fuel event recorded"))
    }

    pub async fn list_events(&self) -> Result<ApiResponse<Vec<FuelEvent>>, AppError> {
        Ok(ApiResponse::success(self.service.list_all_fuel_events().await?))
    }

    pub async fn history(
        &self,
        vehicle_id: Uuid,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<ApiResponse<Vec<FuelEvent>>, AppError> {
        validate_period(from, to)?;
        Ok(ApiResponse::success(self.service.fuel_history(vehicle_id, from, to).await?))
    }

    pub async fn issue_voucher(&self, request: IssueVoucherRequest) -> Result<ApiResponse<FuelVoucher>, AppError> {
        request.validate()?;

        let voucher = self.service.issue_voucher(request.into()).await?;
        log::info!("🎟️ Bono {} emitido", voucher.number);

        Ok(ApiResponse::success_with_message(voucher, "Voucher issued"))
    }

    pub async fn redeem_voucher(&self, number: &str) -> Result<ApiResponse<FuelVoucher>, AppError> {
        let voucher = self.service.redeem_voucher(number).await?;
        Ok(ApiResponse::success_with_message(voucher, "Voucher redeemed"))
    }

    pub async fn unused_vouchers(&self) -> Result<ApiResponse<Vec<FuelVoucher>>, AppError> {
        Ok(ApiResponse::success(self.service.list_unused_vouchers().await?))
    }

    pub async fn vouchers_for_vehicle(&self, vehicle_id: Uuid) -> Result<ApiResponse<Vec<FuelVoucher>>, AppError> {
        Ok(ApiResponse::success(self.service.vouchers_for_vehicle(vehicle_id).await?))
    }

    pub async fn create_card(&self, request: CreateFuelCardRequest) -> Result<ApiResponse<FuelCard>, AppError> {
        request.validate()?;

        let card = self.service.create_card(request.into()).await?;
        log::info!("💳 Tarjeta {} creada", card.number);

        Ok(ApiResponse::success_with_message(card, "Fuel card created"))
    }

    pub async fn validate_card(&self, number: &str) -> Result<ApiResponse<FuelCard>, AppError> {
        let card = self.service.validate_fuel_card(number).await?;
        Ok(ApiResponse::success_with_message(card, "Fuel card is valid"))
    }

    pub async fn active_cards(&self) -> Result<ApiResponse<Vec<FuelCard>>, AppError> {
        Ok(ApiResponse::success(self.service.list_active_cards().await?))
    }

    pub async fn cards_for_vehicle(&self, vehicle_id: Uuid) -> Result<ApiResponse<Vec<FuelCard>>, AppError> {
        Ok(ApiResponse::success(self.service.cards_for_vehicle(vehicle_id).await?))
    }
}
