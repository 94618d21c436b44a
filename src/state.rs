//! Shared application state
//!
//! Este módulo define el estado compartido de la aplicación que se pasa
//! a través del router de Axum: la configuración y los servicios.

use std::sync::Arc;

use crate::config::environment::EnvironmentConfig;
use crate::repositories::Repositories;
use crate::services::{FuelService, MaintenanceService, MissionService, VehicleService};

#[derive(Clone)]
pub struct AppState {
    pub config: EnvironmentConfig,
    pub missions: Arc<MissionService>,
    pub fuel: Arc<FuelService>,
    pub vehicles: Arc<VehicleService>,
    pub maintenance: Arc<MaintenanceService>,
}

impl AppState {
    pub fn new(repositories: Repositories, config: EnvironmentConfig) -> Self {
        let missions = MissionService::new(repositories.missions, config.mission_transitions);
        let fuel = FuelService::new(
            repositories.fuel_events,
            repositories.vouchers,
            repositories.cards,
            repositories.vehicles.clone(),
        );
        let vehicles = VehicleService::new(repositories.vehicles.clone());
        let maintenance = MaintenanceService::new(repositories.maintenance, repositories.vehicles);

        Self {
            config,
            missions: Arc::new(missions),
            fuel: Arc::new(fuel),
            vehicles: Arc::new(vehicles),
            maintenance: Arc::new(maintenance),
        }
    }

    /// Estado sobre la persistencia en memoria
    pub fn in_memory(config: EnvironmentConfig) -> Self {
        Self::new(Repositories::in_memory(), config)
    }
}
