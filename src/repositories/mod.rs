//! Repositorios
//!
//! Colaborador de persistencia del núcleo: guardar, buscar por id, buscar
//! por campo y listar. Cada agregado tiene su trait con una implementación
//! PostgreSQL (`sqlx`) y otra en memoria (`MemoryStore`).

pub mod fuel_repository;
pub mod maintenance_repository;
pub mod memory;
pub mod mission_repository;
pub mod vehicle_repository;

use sqlx::PgPool;
use std::sync::Arc;

pub use fuel_repository::{
    FuelCardRepository, FuelEventRepository, PgFuelCardRepository, PgFuelEventRepository,
    PgVoucherRepository, VoucherRepository,
};
pub use maintenance_repository::{MaintenanceRepository, PgMaintenanceRepository};
pub use memory::MemoryStore;
pub use mission_repository::{MissionRepository, PgMissionRepository};
pub use vehicle_repository::{PgVehicleRepository, VehicleRepository};

/// Conjunto de repositorios que comparten los servicios
#[derive(Clone)]
pub struct Repositories {
    pub missions: Arc<dyn MissionRepository>,
    pub fuel_events: Arc<dyn FuelEventRepository>,
    pub vouchers: Arc<dyn VoucherRepository>,
    pub cards: Arc<dyn FuelCardRepository>,
    pub vehicles: Arc<dyn VehicleRepository>,
    pub maintenance: Arc<dyn MaintenanceRepository>,
}

impl Repositories {
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            missions: Arc::new(PgMissionRepository::new(pool.clone())),
            fuel_events: Arc::new(PgFuelEventRepository::new(pool.clone())),
            vouchers: Arc::new(PgVoucherRepository::new(pool.clone())),
            cards: Arc::new(PgFuelCardRepository::new(pool.clone())),
            vehicles: Arc::new(PgVehicleRepository::new(pool.clone())),
            maintenance: Arc::new(PgMaintenanceRepository::new(pool)),
        }
    }

    pub fn in_memory() -> Self {
        let store = Arc::new(MemoryStore::new());
        Self {
            missions: store.clone(),
            fuel_events: store.clone(),
            vouchers: store.clone(),
            cards: store.clone(),
            vehicles: store.clone(),
            maintenance: store,
        }
    }
}
