//! Persistencia en memoria
//!
//! Implementa todos los repositorios sobre `RwLock<HashMap<Uuid, T>>`.
//! Se usa en los tests y cuando el servidor arranca sin `DATABASE_URL`.
//! Los listados se ordenan igual que las consultas SQL equivalentes.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::fuel::{FuelCard, FuelEvent, FuelVoucher};
use crate::models::maintenance::MaintenanceRecord;
use crate::models::mission::{Mission, MissionStatus};
use crate::models::vehicle::Vehicle;
use crate::repositories::fuel_repository::{FuelCardRepository, FuelEventRepository, VoucherRepository};
use crate::repositories::maintenance_repository::MaintenanceRepository;
use crate::repositories::mission_repository::MissionRepository;
use crate::repositories::vehicle_repository::VehicleRepository;
use crate::utils::errors::AppResult;

type Table<T> = RwLock<HashMap<Uuid, T>>;

#[derive(Default)]
pub struct MemoryStore {
    missions: Table<Mission>,
    fuel_events: Table<FuelEvent>,
    vouchers: Table<FuelVoucher>,
    cards: Table<FuelCard>,
    vehicles: Table<Vehicle>,
    maintenance: Table<MaintenanceRecord>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

async fn select<T, K, F>(table: &Table<T>, filter: F, sort_key: impl Fn(&T) -> K) -> Vec<T>
where
    T: Clone,
    K: Ord,
    F: Fn(&T) -> bool,
{
    let rows = table.read().await;
    let mut selected: Vec<T> = rows.values().filter(|row| filter(row)).cloned().collect();
    selected.sort_by_key(|row| sort_key(row));
    selected
}

#[async_trait]
impl MissionRepository for MemoryStore {
    async fn save(&self, mission: &Mission) -> AppResult<Mission> {
        let mut rows = self.missions.write().await;
        let mut stored = mission.clone();
        if let Some(existing) = rows.get(&mission.id) {
            stored.vehicle_id = existing.vehicle_id;
            stored.created_at = existing.created_at;
        }
        rows.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn update(&self, mission: &Mission, previous_updated_at: DateTime<Utc>) -> AppResult<Option<Mission>> {
        let mut rows = self.missions.write().await;
        let Some(existing) = rows.get_mut(&mission.id) else {
            return Ok(None);
        };
        if existing.updated_at != previous_updated_at {
            return Ok(None);
        }

        let mut stored = mission.clone();
        stored.vehicle_id = existing.vehicle_id;
        stored.created_at = existing.created_at;
        *existing = stored.clone();
        Ok(Some(stored))
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Mission>> {
        Ok(self.missions.read().await.get(&id).cloned())
    }

    async fn find_by_status(&self, status: MissionStatus) -> AppResult<Vec<Mission>> {
        Ok(select(&self.missions, |m| m.status == status, |m| m.created_at).await)
    }

    async fn find_by_start_between(&self, from: DateTime<Utc>, to: DateTime<Utc>) -> AppResult<Vec<Mission>> {
        Ok(select(
            &self.missions,
            |m| matches!(m.start_at, Some(start) if start >= from && start <= to),
            |m| m.start_at,
        )
        .await)
    }

    async fn find_all(&self) -> AppResult<Vec<Mission>> {
        Ok(select(&self.missions, |_| true, |m| m.created_at).await)
    }
}

#[async_trait]
impl FuelEventRepository for MemoryStore {
    async fn save(&self, event: &FuelEvent) -> AppResult<FuelEvent> {
        self.fuel_events.write().await.insert(event.id, event.clone());
        Ok(event.clone())
    }

    async fn find_latest_for_vehicle(&self, vehicle_id: Uuid) -> AppResult<Option<FuelEvent>> {
        let rows = self.fuel_events.read().await;
        Ok(rows
            .values()
            .filter(|e| e.vehicle_id == Some(vehicle_id))
            .max_by(|a, b| {
                a.event_at
                    .cmp(&b.event_at)
                    .then(a.odometer.total_cmp(&b.odometer))
            })
            .cloned())
    }

    async fn find_by_vehicle_between(
        &self,
        vehicle_id: Uuid,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> AppResult<Vec<FuelEvent>> {
        Ok(select(
            &self.fuel_events,
            |e| e.vehicle_id == Some(vehicle_id) && e.event_at >= from && e.event_at <= to,
            |e| e.event_at,
        )
        .await)
    }

    async fn find_all(&self) -> AppResult<Vec<FuelEvent>> {
        Ok(select(&self.fuel_events, |_| true, |e| e.event_at).await)
    }
}

#[async_trait]
impl VoucherRepository for MemoryStore {
    async fn save(&self, voucher: &FuelVoucher) -> AppResult<FuelVoucher> {
        self.vouchers.write().await.insert(voucher.id, voucher.clone());
        Ok(voucher.clone())
    }

    async fn find_by_number(&self, number: &str) -> AppResult<Option<FuelVoucher>> {
        let rows = self.vouchers.read().await;
        Ok(rows.values().find(|v| v.number == number).cloned())
    }

    async fn mark_used(&self, number: &str, used_at: DateTime<Utc>) -> AppResult<Option<FuelVoucher>> {
        // Comprobación y cambio bajo el mismo cerrojo de escritura
        let mut rows = self.vouchers.write().await;
        let voucher = rows.values_mut().find(|v| v.number == number && !v.used);
        Ok(voucher.map(|v| {
            v.used = true;
            v.used_at = Some(used_at);
            v.clone()
        }))
    }

    async fn release(&self, number: &str, used_at: DateTime<Utc>) -> AppResult<bool> {
        let mut rows = self.vouchers.write().await;
        let voucher = rows
            .values_mut()
            .find(|v| v.number == number && v.used && v.used_at == Some(used_at));
        Ok(voucher
            .map(|v| {
                v.used = false;
                v.used_at = None;
            })
            .is_some())
    }

    async fn find_unused(&self) -> AppResult<Vec<FuelVoucher>> {
        Ok(select(&self.vouchers, |v| !v.used, |v| v.issued_at).await)
    }

    async fn find_by_vehicle(&self, vehicle_id: Uuid) -> AppResult<Vec<FuelVoucher>> {
        Ok(select(&self.vouchers, |v| v.vehicle_id == Some(vehicle_id), |v| v.issued_at).await)
    }
}

#[async_trait]
impl FuelCardRepository for MemoryStore {
    async fn save(&self, card: &FuelCard) -> AppResult<FuelCard> {
        self.cards.write().await.insert(card.id, card.clone());
        Ok(card.clone())
    }

    async fn find_by_number(&self, number: &str) -> AppResult<Option<FuelCard>> {
        let rows = self.cards.read().await;
        Ok(rows.values().find(|c| c.number == number).cloned())
    }

    async fn find_active(&self) -> AppResult<Vec<FuelCard>> {
        Ok(select(&self.cards, |c| c.active, |c| c.number.clone()).await)
    }

    async fn find_by_vehicle(&self, vehicle_id: Uuid) -> AppResult<Vec<FuelCard>> {
        Ok(select(&self.cards, |c| c.vehicle_id == Some(vehicle_id), |c| c.number.clone()).await)
    }
}

#[async_trait]
impl VehicleRepository for MemoryStore {
    async fn save(&self, vehicle: &Vehicle) -> AppResult<Vehicle> {
        self.vehicles.write().await.insert(vehicle.id, vehicle.clone());
        Ok(vehicle.clone())
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Vehicle>> {
        Ok(self.vehicles.read().await.get(&id).cloned())
    }

    async fn find_all(&self) -> AppResult<Vec<Vehicle>> {
        Ok(select(&self.vehicles, |_| true, |v| v.created_at).await)
    }

    async fn find_by_category(&self, category: &str) -> AppResult<Vec<Vehicle>> {
        Ok(select(
            &self.vehicles,
            |v| v.category.as_deref() == Some(category),
            |v| v.created_at,
        )
        .await)
    }

    async fn find_by_responsible(&self, responsible: &str) -> AppResult<Vec<Vehicle>> {
        Ok(select(
            &self.vehicles,
            |v| v.responsible.as_deref() == Some(responsible),
            |v| v.created_at,
        )
        .await)
    }
}

#[async_trait]
impl MaintenanceRepository for MemoryStore {
    async fn save(&self, record: &MaintenanceRecord) -> AppResult<MaintenanceRecord> {
        self.maintenance.write().await.insert(record.id, record.clone());
        Ok(record.clone())
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<MaintenanceRecord>> {
        Ok(self.maintenance.read().await.get(&id).cloned())
    }

    async fn find_all(&self) -> AppResult<Vec<MaintenanceRecord>> {
        Ok(select(&self.maintenance, |_| true, |r| r.date).await)
    }

    async fn find_by_vehicle(&self, vehicle_id: Uuid) -> AppResult<Vec<MaintenanceRecord>> {
        Ok(select(&self.maintenance, |r| r.vehicle_id == vehicle_id, |r| r.date).await)
    }
}
