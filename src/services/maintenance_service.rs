//! Servicio de mantenimiento: registro y consulta de intervenciones.

use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::models::maintenance::{MaintenanceRecord, NewMaintenanceRecord};
use crate::repositories::{MaintenanceRepository, VehicleRepository};
use crate::utils::errors::{not_found_error, validation_error, AppResult};

pub struct MaintenanceService {
    records: Arc<dyn MaintenanceRepository>,
    vehicles: Arc<dyn VehicleRepository>,
}

impl MaintenanceService {
    pub fn new(records: Arc<dyn MaintenanceRepository>, vehicles: Arc<dyn VehicleRepository>) -> Self {
        Self { records, vehicles }
    }

    /// Registra una intervención sobre un vehículo existente.
    pub async fn create(&self, draft: NewMaintenanceRecord) -> AppResult<MaintenanceRecord> {
        if draft.maintenance_type.trim().is_empty() {
            return Err(validation_error("maintenance type is required"));
        }
        if self.vehicles.find_by_id(draft.vehicle_id).await?.is_none() {
            return Err(not_found_error("Vehicle", &draft.vehicle_id.to_string()));
        }

        let record = MaintenanceRecord::new(draft);
        let saved = self.records.save(&record).await?;

        info!("Mantenimiento {} registrado para el vehículo {}", saved.id, saved.vehicle_id);
        Ok(saved)
    }

    pub async fn get(&self, id: Uuid) -> AppResult<MaintenanceRecord> {
        self.records
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("MaintenanceRecord", &id.to_string()))
    }

    pub async fn list(&self) -> AppResult<Vec<MaintenanceRecord>> {
        self.records.find_all().await
    }

    pub async fn list_by_vehicle(&self, vehicle_id: Uuid) -> AppResult<Vec<MaintenanceRecord>> {
        self.records.find_by_vehicle(vehicle_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::vehicle::{NewVehicle, Vehicle};
    use crate::repositories::MemoryStore;
    use crate::utils::errors::AppError;
    use chrono::{Duration, Utc};

    #[tokio::test]
    async fn test_create_and_list_by_vehicle() {
        let store = Arc::new(MemoryStore::new());
        let service = MaintenanceService::new(store.clone(), store.clone());
        let vehicle = Vehicle::new(NewVehicle::default(), Utc::now());
        VehicleRepository::save(store.as_ref(), &vehicle).await.unwrap();

        let now = Utc::now();
        for (days, kind) in [(20, "VIDANGE"), (5, "PNEUS")] {
            service
                .create(NewMaintenanceRecord {
                    vehicle_id: vehicle.id,
                    date: now - Duration::days(days),
                    maintenance_type: kind.to_string(),
                    description: None,
                })
                .await
                .unwrap();
        }

        let records = service.list_by_vehicle(vehicle.id).await.unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].maintenance_type, "VIDANGE");
        assert_eq!(service.get(records[1].id).await.unwrap().maintenance_type, "PNEUS");
        assert!(service.list_by_vehicle(Uuid::new_v4()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_vehicle_or_record() {
        let store = Arc::new(MemoryStore::new());
        let service = MaintenanceService::new(store.clone(), store.clone());

        let result = service
            .create(NewMaintenanceRecord {
                vehicle_id: Uuid::new_v4(),
                date: Utc::now(),
                maintenance_type: "VIDANGE".to_string(),
                description: None,
            })
            .await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
        assert!(matches!(service.get(Uuid::new_v4()).await, Err(AppError::NotFound(_))));
        assert!(service.list().await.unwrap().is_empty());
    }
}
