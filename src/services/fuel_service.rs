//! Servicio de carburante
//!
//! Registro de repostajes con cálculo de estadísticas, emisión y consumo de
//! bonos, y alta/validación de tarjetas.
//!
//! Dos repostajes simultáneos del mismo vehículo pueden leer el mismo
//! "último repostaje" y calcular distancias divergentes: no se serializan
//! las escrituras por vehículo.

use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::models::fuel::{
    ConsumptionStats, FuelCard, FuelEvent, FuelVoucher, NewFuelCard, NewFuelEvent, NewFuelVoucher,
    PaymentMode,
};
use crate::repositories::{FuelCardRepository, FuelEventRepository, VehicleRepository, VoucherRepository};
use crate::services::consumption::{compute_stats, Refuel};
use crate::utils::errors::{conflict_error, validation_error, AppResult};

pub const VOUCHER_REJECTED: &str = "invalid or already-used voucher";
pub const CARD_REJECTED: &str = "invalid or inactive fuel card";
pub const NEGATIVE_ODOMETER: &str = "odometer reading must be non-negative";

pub struct FuelService {
    events: Arc<dyn FuelEventRepository>,
    vouchers: Arc<dyn VoucherRepository>,
    cards: Arc<dyn FuelCardRepository>,
    vehicles: Arc<dyn VehicleRepository>,
}

impl FuelService {
    pub fn new(
        events: Arc<dyn FuelEventRepository>,
        vouchers: Arc<dyn VoucherRepository>,
        cards: Arc<dyn FuelCardRepository>,
        vehicles: Arc<dyn VehicleRepository>,
    ) -> Self {
        Self {
            events,
            vouchers,
            cards,
            vehicles,
        }
    }

    /// Registra un repostaje.
    ///
    /// 1. Resuelve el vehículo a partir de su id.
    /// 2. Calcula las estadísticas frente al último repostaje del vehículo.
    /// 3. Si se paga con bono, lo consume (falla si no existe o ya está usado).
    /// 4. Persiste el repostaje con sus estadísticas.
    ///
    /// Si el repostaje no se puede guardar, el bono consumido se libera.
    /// La tarjeta de carburante no se valida en este camino.
    pub async fn record_fuel_event(&self, draft: NewFuelEvent) -> AppResult<FuelEvent> {
        if draft.odometer.is_nan() || draft.odometer < 0.0 {
            return Err(validation_error(NEGATIVE_ODOMETER));
        }

        let vehicle_id = match draft.vehicle_id {
            Some(id) => match self.vehicles.find_by_id(id).await? {
                Some(vehicle) => Some(vehicle.id),
                None => {
                    warn!("Vehículo {} desconocido, repostaje registrado sin vehículo", id);
                    None
                }
            },
            None => None,
        };

        let voucher_number = match draft.payment_mode {
            PaymentMode::Voucher => Some(
                draft
                    .payment_reference
                    .clone()
                    .ok_or_else(|| validation_error(VOUCHER_REJECTED))?,
            ),
            PaymentMode::Card => None,
        };

        let stats = match vehicle_id {
            Some(id) => {
                let previous = self.events.find_latest_for_vehicle(id).await?;
                let current = Refuel {
                    quantity: draft.quantity,
                    total_amount: draft.total_amount,
                    odometer: draft.odometer,
                };
                compute_stats(current, previous.map(|event| event.odometer))
            }
            None => ConsumptionStats::empty(),
        };

        if stats.anomaly {
            warn!(
                "Consumo anómalo para el vehículo {:?}: {:.2} L/100km",
                vehicle_id, stats.average_consumption
            );
        }

        let redeemed = match voucher_number.as_deref() {
            Some(number) => Some(self.redeem_voucher(number).await?),
            None => None,
        };

        let event = FuelEvent::new(draft, vehicle_id, stats);
        let saved = match self.events.save(&event).await {
            Ok(saved) => saved,
            Err(e) => {
                if let Some(voucher) = redeemed {
                    self.release_voucher(&voucher).await;
                }
                return Err(e);
            }
        };

        info!("Repostaje {} registrado ({} L)", saved.id, saved.quantity);
        Ok(saved)
    }

    /// Devuelve un bono recién consumido a su estado anterior.
    async fn release_voucher(&self, voucher: &FuelVoucher) {
        let Some(used_at) = voucher.used_at else {
            return;
        };
        match self.vouchers.release(&voucher.number, used_at).await {
            Ok(true) => warn!("Bono {} liberado tras fallo al guardar el repostaje", voucher.number),
            Ok(false) => error!("Bono {} no se pudo liberar: ya no está en el estado consumido", voucher.number),
            Err(e) => error!("Bono {} no se pudo liberar: {}", voucher.number, e),
        }
    }

    /// Consume un bono: comprobación y marcado en una sola operación.
    pub async fn redeem_voucher(&self, number: &str) -> AppResult<FuelVoucher> {
        let voucher = self
            .vouchers
            .mark_used(number, Utc::now())
            .await?
            .ok_or_else(|| validation_error(VOUCHER_REJECTED))?;

        info!("Bono {} consumido", voucher.number);
        Ok(voucher)
    }

    pub async fn issue_voucher(&self, draft: NewFuelVoucher) -> AppResult<FuelVoucher> {
        if self.vouchers.find_by_number(&draft.number).await?.is_some() {
            return Err(conflict_error("Voucher", "number", &draft.number));
        }

        let voucher = FuelVoucher {
            id: Uuid::new_v4(),
            number: draft.number,
            amount: draft.amount,
            issued_at: Utc::now(),
            used_at: None,
            used: false,
            station: draft.station,
            vehicle_id: draft.vehicle_id,
            user_id: draft.user_id,
        };

        let saved = self.vouchers.save(&voucher).await?;
        info!("Bono {} emitido por {}", saved.number, saved.amount);
        Ok(saved)
    }

    /// Alta de tarjeta: siempre activa, sin comprobar la caducidad.
    pub async fn create_card(&self, draft: NewFuelCard) -> AppResult<FuelCard> {
        let card = FuelCard {
            id: Uuid::new_v4(),
            number: draft.number,
            access_code: draft.access_code,
            expires_on: draft.expires_on,
            active: true,
            monthly_cap: draft.monthly_cap,
            provider: draft.provider,
            vehicle_id: draft.vehicle_id,
        };

        let saved = self.cards.save(&card).await?;
        info!("Tarjeta {} creada", saved.number);
        Ok(saved)
    }

    /// La tarjeta debe existir y estar activa.
    pub async fn validate_fuel_card(&self, number: &str) -> AppResult<FuelCard> {
        match self.cards.find_by_number(number).await? {
            Some(card) if card.active => Ok(card),
            _ => Err(validation_error(CARD_REJECTED)),
        }
    }

    pub async fn fuel_history(
        &self,
        vehicle_id: Uuid,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> AppResult<Vec<FuelEvent>> {
        self.events.find_by_vehicle_between(vehicle_id, from, to).await
    }

    pub async fn list_all_fuel_events(&self) -> AppResult<Vec<FuelEvent>> {
        self.events.find_all().await
    }

    pub async fn list_unused_vouchers(&self) -> AppResult<Vec<FuelVoucher>> {
        self.vouchers.find_unused().await
    }

    pub async fn vouchers_for_vehicle(&self, vehicle_id: Uuid) -> AppResult<Vec<FuelVoucher>> {
        self.vouchers.find_by_vehicle(vehicle_id).await
    }

    pub async fn list_active_cards(&self) -> AppResult<Vec<FuelCard>> {
        self.cards.find_active().await
    }

    pub async fn cards_for_vehicle(&self, vehicle_id: Uuid) -> AppResult<Vec<FuelCard>> {
        self.cards.find_by_vehicle(vehicle_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::vehicle::{NewVehicle, Vehicle};
    use crate::repositories::MemoryStore;
    use crate::services::consumption::HIGH_CONSUMPTION_MESSAGE;
    use crate::utils::errors::AppError;
    use chrono::Duration;
    use rust_decimal::Decimal;

    struct Fixture {
        store: Arc<MemoryStore>,
        service: FuelService,
    }

    fn fixture() -> Fixture {
        let store = Arc::new(MemoryStore::new());
        let service = FuelService::new(store.clone(), store.clone(), store.clone(), store.clone());
        Fixture { store, service }
    }

    async fn vehicle(store: &MemoryStore) -> Vehicle {
        let draft = NewVehicle {
            license_plate: "AB-123-CD".to_string(),
            current_odometer: 10000.0,
            ..NewVehicle::default()
        };
        VehicleRepository::save(store, &Vehicle::new(draft, Utc::now())).await.unwrap()
    }

    fn refuel(vehicle_id: Option<Uuid>, quantity: f64, odometer: f64, at: DateTime<Utc>) -> NewFuelEvent {
        NewFuelEvent {
            vehicle_id,
            mission_id: None,
            user_id: None,
            fuel_type: "GAZOLE".to_string(),
            quantity,
            unit_price: 2.0,
            total_amount: quantity * 2.0,
            event_at: at,
            station: Some("Total Gare de Lyon".to_string()),
            odometer,
            payment_mode: PaymentMode::Card,
            payment_reference: Some("CARD-1".to_string()),
        }
    }

    fn voucher_draft(number: &str) -> NewFuelVoucher {
        NewFuelVoucher {
            number: number.to_string(),
            amount: Decimal::new(5000, 2),
            station: None,
            vehicle_id: None,
            user_id: None,
        }
    }

    #[tokio::test]
    async fn test_first_event_has_empty_stats() {
        let f = fixture();
        let v = vehicle(&f.store).await;

        let event = f
            .service
            .record_fuel_event(refuel(Some(v.id), 40.0, 10000.0, Utc::now()))
            .await
            .unwrap();

        assert_eq!(event.vehicle_id, Some(v.id));
        assert_eq!(event.stats.distance_traveled, 0.0);
        assert_eq!(event.stats.average_consumption, 0.0);
        assert!(!event.stats.anomaly);
    }

    #[tokio::test]
    async fn test_second_event_derives_consumption() {
        let f = fixture();
        let v = vehicle(&f.store).await;
        let t0 = Utc::now() - Duration::days(7);

        f.service.record_fuel_event(refuel(Some(v.id), 35.0, 10000.0, t0)).await.unwrap();
        let event = f
            .service
            .record_fuel_event(refuel(Some(v.id), 40.0, 10500.0, t0 + Duration::days(3)))
            .await
            .unwrap();

        assert_eq!(event.stats.distance_traveled, 500.0);
        assert_eq!(event.stats.average_consumption, 8.0);
        assert!((event.stats.cost_per_distance - 0.16).abs() < 1e-9);
        assert!(!event.stats.anomaly);
    }

    #[tokio::test]
    async fn test_high_consumption_is_flagged() {
        let f = fixture();
        let v = vehicle(&f.store).await;
        let t0 = Utc::now() - Duration::days(7);

        f.service.record_fuel_event(refuel(Some(v.id), 35.0, 10000.0, t0)).await.unwrap();
        let event = f
            .service
            .record_fuel_event(refuel(Some(v.id), 70.0, 10500.0, t0 + Duration::days(1)))
            .await
            .unwrap();

        assert_eq!(event.stats.average_consumption, 14.0);
        assert!(event.stats.anomaly);
        assert_eq!(event.stats.anomaly_message.as_deref(), Some(HIGH_CONSUMPTION_MESSAGE));
    }

    #[tokio::test]
    async fn test_unknown_vehicle_is_dropped_and_stats_empty() {
        let f = fixture();
        let event = f
            .service
            .record_fuel_event(refuel(Some(Uuid::new_v4()), 40.0, 10500.0, Utc::now()))
            .await
            .unwrap();

        assert_eq!(event.vehicle_id, None);
        assert_eq!(event.stats, ConsumptionStats::empty());
    }

    #[tokio::test]
    async fn test_negative_odometer_is_rejected() {
        let f = fixture();
        let result = f.service.record_fuel_event(refuel(None, 40.0, -1.0, Utc::now())).await;
        assert!(matches!(result, Err(AppError::Validation(ref msg)) if msg == NEGATIVE_ODOMETER));
    }

    #[tokio::test]
    async fn test_voucher_payment_consumes_voucher_once() {
        let f = fixture();
        let v = vehicle(&f.store).await;
        f.service.issue_voucher(voucher_draft("BON-001")).await.unwrap();

        let mut paid = refuel(Some(v.id), 30.0, 10000.0, Utc::now());
        paid.payment_mode = PaymentMode::Voucher;
        paid.payment_reference = Some("BON-001".to_string());

        f.service.record_fuel_event(paid.clone()).await.unwrap();
        let stored = VoucherRepository::find_by_number(f.store.as_ref(), "BON-001").await.unwrap().unwrap();
        assert!(stored.used);
        assert!(stored.used_at.is_some());

        paid.odometer = 10400.0;
        let second = f.service.record_fuel_event(paid).await;
        assert!(matches!(second, Err(AppError::Validation(ref msg)) if msg == VOUCHER_REJECTED));

        let still_used = VoucherRepository::find_by_number(f.store.as_ref(), "BON-001").await.unwrap().unwrap();
        assert!(still_used.used);
        assert_eq!(f.service.list_all_fuel_events().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_voucher_payment_without_reference_fails() {
        let f = fixture();
        let mut paid = refuel(None, 30.0, 10000.0, Utc::now());
        paid.payment_mode = PaymentMode::Voucher;
        paid.payment_reference = None;

        assert!(matches!(
            f.service.record_fuel_event(paid).await,
            Err(AppError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_redeem_twice_fails() {
        let f = fixture();
        let issued = f.service.issue_voucher(voucher_draft("BON-002")).await.unwrap();
        assert!(!issued.used);
        assert!(issued.used_at.is_none());

        let redeemed = f.service.redeem_voucher("BON-002").await.unwrap();
        assert!(redeemed.used);

        assert!(matches!(
            f.service.redeem_voucher("BON-002").await,
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            f.service.redeem_voucher("BON-404").await,
            Err(AppError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_concurrent_redemption_single_winner() {
        let f = fixture();
        f.service.issue_voucher(voucher_draft("BON-003")).await.unwrap();

        let attempts = (0..8).map(|_| f.service.redeem_voucher("BON-003"));
        let results = futures::future::join_all(attempts).await;

        assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_voucher_number_conflicts() {
        let f = fixture();
        f.service.issue_voucher(voucher_draft("BON-004")).await.unwrap();
        assert!(matches!(
            f.service.issue_voucher(voucher_draft("BON-004")).await,
            Err(AppError::Conflict(_))
        ));
        assert_eq!(f.service.list_unused_vouchers().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_cards_are_created_active_and_validated() {
        let f = fixture();
        let draft = NewFuelCard {
            number: "CARD-9".to_string(),
            access_code: Some("1234".to_string()),
            expires_on: None,
            monthly_cap: Decimal::new(50000, 2),
            provider: Some("TotalEnergies".to_string()),
            vehicle_id: None,
        };
        let card = f.service.create_card(draft).await.unwrap();
        assert!(card.active);

        assert!(f.service.validate_fuel_card("CARD-9").await.is_ok());
        assert!(matches!(
            f.service.validate_fuel_card("CARD-0").await,
            Err(AppError::Validation(ref msg)) if msg == CARD_REJECTED
        ));

        let mut inactive = card.clone();
        inactive.active = false;
        FuelCardRepository::save(f.store.as_ref(), &inactive).await.unwrap();
        assert!(f.service.validate_fuel_card("CARD-9").await.is_err());
        assert!(f.service.list_active_cards().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_fuel_history_range_is_inclusive() {
        let f = fixture();
        let v = vehicle(&f.store).await;
        let t0 = Utc::now() - Duration::days(30);

        for (i, odometer) in [10000.0, 10400.0, 10800.0].into_iter().enumerate() {
            let at = t0 + Duration::days(10 * i as i64);
            f.service.record_fuel_event(refuel(Some(v.id), 30.0, odometer, at)).await.unwrap();
        }

        let history = f
            .service
            .fuel_history(v.id, t0, t0 + Duration::days(10))
            .await
            .unwrap();
        assert_eq!(history.len(), 2);
        assert!(history[0].event_at <= history[1].event_at);
    }

    struct FailingEvents;

    #[async_trait::async_trait]
    impl FuelEventRepository for FailingEvents {
        async fn save(&self, _event: &FuelEvent) -> AppResult<FuelEvent> {
            Err(crate::utils::errors::internal_error("storage down"))
        }

        async fn find_latest_for_vehicle(&self, _vehicle_id: Uuid) -> AppResult<Option<FuelEvent>> {
            Ok(None)
        }

        async fn find_by_vehicle_between(
            &self,
            _vehicle_id: Uuid,
            _from: DateTime<Utc>,
            _to: DateTime<Utc>,
        ) -> AppResult<Vec<FuelEvent>> {
            Ok(vec![])
        }

        async fn find_all(&self) -> AppResult<Vec<FuelEvent>> {
            Ok(vec![])
        }
    }

    #[tokio::test]
    async fn test_voucher_released_when_event_save_fails() {
        let store = Arc::new(MemoryStore::new());
        let service = FuelService::new(Arc::new(FailingEvents), store.clone(), store.clone(), store.clone());
        service.issue_voucher(voucher_draft("BON-X")).await.unwrap();

        let mut draft = refuel(None, 30.0, 12000.0, Utc::now());
        draft.payment_mode = PaymentMode::Voucher;
        draft.payment_reference = Some("BON-X".to_string());

        let result = service.record_fuel_event(draft).await;
        assert!(matches!(result, Err(AppError::Internal(_))));

        let voucher = VoucherRepository::find_by_number(store.as_ref(), "BON-X")
            .await
            .unwrap()
            .unwrap();
        assert!(!voucher.used);
        assert!(voucher.used_at.is_none());

        // El bono liberado puede volver a usarse.
        assert!(service.redeem_voucher("BON-X").await.is_ok());
    }
}
