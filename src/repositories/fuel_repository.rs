use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::fuel::{ConsumptionStats, FuelCard, FuelEvent, FuelVoucher, PaymentMode};
use crate::utils::errors::AppResult;

/// Libro de repostajes, ordenado por fecha de evento
#[async_trait]
pub trait FuelEventRepository: Send + Sync {
    async fn save(&self, event: &FuelEvent) -> AppResult<FuelEvent>;
    /// Último repostaje registrado del vehículo (por `event_at` y, en empate, por odómetro)
    async fn find_latest_for_vehicle(&self, vehicle_id: Uuid) -> AppResult<Option<FuelEvent>>;
    async fn find_by_vehicle_between(
        &self,
        vehicle_id: Uuid,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> AppResult<Vec<FuelEvent>>;
    async fn find_all(&self) -> AppResult<Vec<FuelEvent>>;
}

#[async_trait]
pub trait VoucherRepository: Send + Sync {
    async fn save(&self, voucher: &FuelVoucher) -> AppResult<FuelVoucher>;
    async fn find_by_number(&self, number: &str) -> AppResult<Option<FuelVoucher>>;
    /// Marca el bono como usado en una sola operación condicional.
    ///
    /// Devuelve `None` si el bono no existe o ya estaba usado.
    async fn mark_used(&self, number: &str, used_at: DateTime<Utc>) -> AppResult<Option<FuelVoucher>>;
    /// Deshace un `mark_used`: sólo si el bono sigue usado con ese mismo `used_at`.
    async fn release(&self, number: &str, used_at: DateTime<Utc>) -> AppResult<bool>;
    async fn find_unused(&self) -> AppResult<Vec<FuelVoucher>>;
    async fn find_by_vehicle(&self, vehicle_id: Uuid) -> AppResult<Vec<FuelVoucher>>;
}

#[async_trait]
pub trait FuelCardRepository: Send + Sync {
    async fn save(&self, card: &FuelCard) -> AppResult<FuelCard>;
    async fn find_by_number(&self, number: &str) -> AppResult<Option<FuelCard>>;
    async fn find_active(&self) -> AppResult<Vec<FuelCard>>;
    async fn find_by_vehicle(&self, vehicle_id: Uuid) -> AppResult<Vec<FuelCard>>;
}

#[derive(Debug, sqlx::FromRow)]
struct FuelEventRow {
    id: Uuid,
    vehicle_id: Option<Uuid>,
    mission_id: Option<Uuid>,
    user_id: Option<Uuid>,
    fuel_type: String,
    quantity: f64,
    unit_price: f64,
    total_amount: f64,
    event_at: DateTime<Utc>,
    station: Option<String>,
    odometer: f64,
    payment_mode: PaymentMode,
    payment_reference: Option<String>,
    stats: Json<ConsumptionStats>,
}

impl From<FuelEventRow> for FuelEvent {
    fn from(row: FuelEventRow) -> Self {
        Self {
            id: row.id,
            vehicle_id: row.vehicle_id,
            mission_id: row.mission_id,
            user_id: row.user_id,
            fuel_type: row.fuel_type,
            quantity: row.quantity,
            unit_price: row.unit_price,
            total_amount: row.total_amount,
            event_at: row.event_at,
            station: row.station,
            odometer: row.odometer,
            payment_mode: row.payment_mode,
            payment_reference: row.payment_reference,
            stats: row.stats.0,
        }
    }
}

pub struct PgFuelEventRepository {
    pool: PgPool,
}

impl PgFuelEventRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FuelEventRepository for PgFuelEventRepository {
    async fn save(&self, event: &FuelEvent) -> AppResult<FuelEvent> {
        // Las estadísticas se calculan una sola vez: no hay rama de UPDATE
        let row = sqlx::query_as::<_, FuelEventRow>(
            r#"
            INSERT INTO fuel_events (id, vehicle_id, mission_id, user_id, fuel_type, quantity, unit_price,
                                     total_amount, event_at, station, odometer, payment_mode, payment_reference, stats)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            RETURNING *
            "#,
        )
        .bind(event.id)
        .bind(event.vehicle_id)
        .bind(event.mission_id)
        .bind(event.user_id)
        .bind(&event.fuel_type)
        .bind(event.quantity)
        .bind(event.unit_price)
        .bind(event.total_amount)
        .bind(event.event_at)
        .bind(&event.station)
        .bind(event.odometer)
        .bind(event.payment_mode)
        .bind(&event.payment_reference)
        .bind(Json(&event.stats))
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            log::error!("Error guardando repostaje {}: {}", event.id, e);
            e
        })?;

        Ok(row.into())
    }

    async fn find_latest_for_vehicle(&self, vehicle_id: Uuid) -> AppResult<Option<FuelEvent>> {
        let row = sqlx::query_as::<_, FuelEventRow>(
            "SELECT * FROM fuel_events WHERE vehicle_id = $1 ORDER BY event_at DESC, odometer DESC LIMIT 1",
        )
        .bind(vehicle_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(FuelEvent::from))
    }

    async fn find_by_vehicle_between(
        &self,
        vehicle_id: Uuid,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> AppResult<Vec<FuelEvent>> {
        let rows = sqlx::query_as::<_, FuelEventRow>(
            r#"
            SELECT * FROM fuel_events
            WHERE vehicle_id = $1 AND event_at >= $2 AND event_at <= $3
            ORDER BY event_at
            "#,
        )
        .bind(vehicle_id)
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(FuelEvent::from).collect())
    }

    async fn find_all(&self) -> AppResult<Vec<FuelEvent>> {
        let rows = sqlx::query_as::<_, FuelEventRow>("SELECT * FROM fuel_events ORDER BY event_at")
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(FuelEvent::from).collect())
    }
}

pub struct PgVoucherRepository {
    pool: PgPool,
}

impl PgVoucherRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl VoucherRepository for PgVoucherRepository {
    async fn save(&self, voucher: &FuelVoucher) -> AppResult<FuelVoucher> {
        let saved = sqlx::query_as::<_, FuelVoucher>(
            r#"
            INSERT INTO fuel_vouchers (id, number, amount, issued_at, used_at, used, station, vehicle_id, user_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ON CONFLICT (id) DO UPDATE
            SET amount = EXCLUDED.amount,
                used_at = EXCLUDED.used_at,
                used = EXCLUDED.used,
                station = EXCLUDED.station,
                vehicle_id = EXCLUDED.vehicle_id,
                user_id = EXCLUDED.user_id
            RETURNING *
            "#,
        )
        .bind(voucher.id)
        .bind(&voucher.number)
        .bind(voucher.amount)
        .bind(voucher.issued_at)
        .bind(voucher.used_at)
        .bind(voucher.used)
        .bind(&voucher.station)
        .bind(voucher.vehicle_id)
        .bind(voucher.user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(saved)
    }

    async fn find_by_number(&self, number: &str) -> AppResult<Option<FuelVoucher>> {
        let voucher = sqlx::query_as::<_, FuelVoucher>("SELECT * FROM fuel_vouchers WHERE number = $1")
            .bind(number)
            .fetch_optional(&self.pool)
            .await?;

        Ok(voucher)
    }

    async fn mark_used(&self, number: &str, used_at: DateTime<Utc>) -> AppResult<Option<FuelVoucher>> {
        let voucher = sqlx::query_as::<_, FuelVoucher>(
            r#"
            UPDATE fuel_vouchers
            SET used = TRUE, used_at = $2
            WHERE number = $1 AND used = FALSE
            RETURNING *
            "#,
        )
        .bind(number)
        .bind(used_at)
        .fetch_optional(&self.pool)
        .await?;

        Ok(voucher)
    }

    async fn release(&self, number: &str, used_at: DateTime<Utc>) -> AppResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE fuel_vouchers
            SET used = FALSE, used_at = NULL
            WHERE number = $1 AND used = TRUE AND used_at = $2
            "#,
        )
        .bind(number)
        .bind(used_at)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn find_unused(&self) -> AppResult<Vec<FuelVoucher>> {
        let vouchers = sqlx::query_as::<_, FuelVoucher>(
            "SELECT * FROM fuel_vouchers WHERE used = FALSE ORDER BY issued_at",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(vouchers)
    }

    async fn find_by_vehicle(&self, vehicle_id: Uuid) -> AppResult<Vec<FuelVoucher>> {
        let vouchers = sqlx::query_as::<_, FuelVoucher>(
            "SELECT * FROM fuel_vouchers WHERE vehicle_id = $1 ORDER BY issued_at",
        )
        .bind(vehicle_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(vouchers)
    }
}

pub struct PgFuelCardRepository {
    pool: PgPool,
}

impl PgFuelCardRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FuelCardRepository for PgFuelCardRepository {
    async fn save(&self, card: &FuelCard) -> AppResult<FuelCard> {
        let saved = sqlx::query_as::<_, FuelCard>(
            r#"
            INSERT INTO fuel_cards (id, number, access_code, expires_on, active, monthly_cap, provider, vehicle_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (id) DO UPDATE
            SET access_code = EXCLUDED.access_code,
                expires_on = EXCLUDED.expires_on,
                active = EXCLUDED.active,
                monthly_cap = EXCLUDED.monthly_cap,
                provider = EXCLUDED.provider,
                vehicle_id = EXCLUDED.vehicle_id
            RETURNING *
            "#,
        )
        .bind(card.id)
        .bind(&card.number)
        .bind(&card.access_code)
        .bind(card.expires_on)
        .bind(card.active)
        .bind(card.monthly_cap)
        .bind(&card.provider)
        .bind(card.vehicle_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(saved)
    }

    async fn find_by_number(&self, number: &str) -> AppResult<Option<FuelCard>> {
        let card = sqlx::query_as::<_, FuelCard>("SELECT * FROM fuel_cards WHERE number = $1")
            .bind(number)
            .fetch_optional(&self.pool)
            .await?;

        Ok(card)
    }

    async fn find_active(&self) -> AppResult<Vec<FuelCard>> {
        let cards = sqlx::query_as::<_, FuelCard>("SELECT * FROM fuel_cards WHERE active = TRUE ORDER BY number")
            .fetch_all(&self.pool)
            .await?;

        Ok(cards)
    }

    async fn find_by_vehicle(&self, vehicle_id: Uuid) -> AppResult<Vec<FuelCard>> {
        let cards = sqlx::query_as::<_, FuelCard>(
            "SELECT * FROM fuel_cards WHERE vehicle_id = $1 ORDER BY number",
        )
        .bind(vehicle_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(cards)
    }
}
