//! Modelos de carburante
//!
//! Ravitaillements (eventos de repostaje), estadísticas de consumo derivadas,
//! bonos de carburante de un solo uso y tarjetas de carburante.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::Type;
use uuid::Uuid;

/// Modo de pago - mapea al ENUM payment_mode
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq)]
#[sqlx(type_name = "payment_mode", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMode {
    Card,
    Voucher,
}

/// Estadísticas derivadas de dos repostajes consecutivos del mismo vehículo.
///
/// No tienen identidad propia: se recalculan al crear cada `FuelEvent`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ConsumptionStats {
    /// Litros por cada 100 km
    pub average_consumption: f64,
    pub distance_traveled: f64,
    /// Coste por km
    pub cost_per_distance: f64,
    pub anomaly: bool,
    pub anomaly_message: Option<String>,
}

impl ConsumptionStats {
    pub fn empty() -> Self {
        Self::default()
    }
}

/// Datos de entrada de un repostaje
#[derive(Debug, Clone)]
pub struct NewFuelEvent {
    pub vehicle_id: Option<Uuid>,
    pub mission_id: Option<Uuid>,
    pub user_id: Option<Uuid>,
    pub fuel_type: String,
    pub quantity: f64,
    pub unit_price: f64,
    pub total_amount: f64,
    pub event_at: DateTime<Utc>,
    pub station: Option<String>,
    pub odometer: f64,
    pub payment_mode: PaymentMode,
    pub payment_reference: Option<String>,
}

/// Repostaje registrado
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FuelEvent {
    pub id: Uuid,
    pub vehicle_id: Option<Uuid>,
    pub mission_id: Option<Uuid>,
    pub user_id: Option<Uuid>,
    pub fuel_type: String,
    pub quantity: f64,
    pub unit_price: f64,
    pub total_amount: f64,
    pub event_at: DateTime<Utc>,
    pub station: Option<String>,
    pub odometer: f64,
    pub payment_mode: PaymentMode,
    pub payment_reference: Option<String>,
    pub stats: ConsumptionStats,
}

impl FuelEvent {
    pub fn new(draft: NewFuelEvent, vehicle_id: Option<Uuid>, stats: ConsumptionStats) -> Self {
        Self {
            id: Uuid::new_v4(),
            vehicle_id,
            mission_id: draft.mission_id,
            user_id: draft.user_id,
            fuel_type: draft.fuel_type,
            quantity: draft.quantity,
            unit_price: draft.unit_price,
            total_amount: draft.total_amount,
            event_at: draft.event_at,
            station: draft.station,
            odometer: draft.odometer,
            payment_mode: draft.payment_mode,
            payment_reference: draft.payment_reference,
            stats,
        }
    }
}

/// Datos de emisión de un bono
#[derive(Debug, Clone)]
pub struct NewFuelVoucher {
    pub number: String,
    pub amount: Decimal,
    pub station: Option<String>,
    pub vehicle_id: Option<Uuid>,
    pub user_id: Option<Uuid>,
}

/// Bono de carburante ("bon carburant"): se consume una sola vez.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct FuelVoucher {
    pub id: Uuid,
    pub number: String,
    pub amount: Decimal,
    pub issued_at: DateTime<Utc>,
    pub used_at: Option<DateTime<Utc>>,
    pub used: bool,
    pub station: Option<String>,
    pub vehicle_id: Option<Uuid>,
    pub user_id: Option<Uuid>,
}

/// Datos de alta de una tarjeta
#[derive(Debug, Clone)]
pub struct NewFuelCard {
    pub number: String,
    pub access_code: Option<String>,
    pub expires_on: Option<NaiveDate>,
    pub monthly_cap: Decimal,
    pub provider: Option<String>,
    pub vehicle_id: Option<Uuid>,
}

/// Tarjeta de carburante
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct FuelCard {
    pub id: Uuid,
    pub number: String,
    #[serde(skip_serializing)]
    pub access_code: Option<String>,
    pub expires_on: Option<NaiveDate>,
    pub active: bool,
    pub monthly_cap: Decimal,
    pub provider: Option<String>,
    pub vehicle_id: Option<Uuid>,
}
