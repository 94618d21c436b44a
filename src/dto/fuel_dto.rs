use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::models::fuel::{NewFuelCard, NewFuelEvent, NewFuelVoucher, PaymentMode};
use crate::utils::validation::{validate_amount, validate_not_empty, validate_odometer};

// Request para registrar un repostaje
#[derive(Debug, Deserialize, Validate)]
pub struct RecordFuelEventRequest {
    pub vehicle_id: Option<Uuid>,
    pub mission_id: Option<Uuid>,
    pub user_id: Option<Uuid>,
    #[validate(custom = "validate_not_empty")]
    pub fuel_type: String,
    #[validate(range(min = 0.0))]
    pub quantity: f64,
    #[validate(range(min = 0.0))]
    pub unit_price: f64,
    #[validate(range(min = 0.0))]
    pub total_amount: f64,
    /// Por defecto, el momento de la petición
    pub event_at: Option<DateTime<Utc>>,
    pub station: Option<String>,
    #[validate(custom = "validate_odometer")]
    pub odometer: f64,
    pub payment_mode: PaymentMode,
    pub payment_reference: Option<String>,
}

impl From<RecordFuelEventRequest> for NewFuelEvent {
    fn from(request: RecordFuelEventRequest) -> Self {
        NewFuelEvent {
            vehicle_id: request.vehicle_id,
            mission_id: request.mission_id,
            user_id: request.user_id,
            fuel_type: request.fuel_type,
            quantity: request.quantity,
            unit_price: request.unit_price,
            total_amount: request.total_amount,
            event_at: request.event_at.unwrap_or_else(Utc::now),
            station: request.station,
            odometer: request.odometer,
            payment_mode: request.payment_mode,
            payment_reference: request.payment_reference,
        }
    }
}

// Request para emitir un bono
#[derive(Debug, Deserialize, Validate)]
pub struct IssueVoucherRequest {
    #[validate(custom = "validate_not_empty")]
    pub number: String,
    #[validate(custom = "validate_amount")]
    pub amount: Decimal,
    pub station: Option<String>,
    pub vehicle_id: Option<Uuid>,
    pub user_id: Option<Uuid>,
}

impl From<IssueVoucherRequest> for NewFuelVoucher {
    fn from(request: IssueVoucherRequest) -> Self {
        NewFuelVoucher {
            number: request.number,
            amount: request.amount,
            station: request.station,
            vehicle_id: request.vehicle_id,
            user_id: request.user_id,
        }
    }
}

// Request para crear una tarjeta
#[derive(Debug, Deserialize, Validate)]
pub struct CreateFuelCardRequest {
    #[validate(custom = "validate_not_empty")]
    pub number: String,
    pub access_code: Option<String>,
    pub expires_on: Option<NaiveDate>,
    #[validate(custom = "validate_amount")]
    pub monthly_cap: Decimal,
    pub provider: Option<String>,
    pub vehicle_id: Option<Uuid>,
}

impl From<CreateFuelCardRequest> for NewFuelCard {
    fn from(request: CreateFuelCardRequest) -> Self {
        NewFuelCard {
            number: request.number,
            access_code: request.access_code,
            expires_on: request.expires_on,
            monthly_cap: request.monthly_cap,
            provider: request.provider,
            vehicle_id: request.vehicle_id,
        }
    }
}
