//! Servicio de vehículos
//!
//! Alta y consulta de la flota, odómetro, estado operativo y documentos.

use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::models::vehicle::{NewVehicle, OdometerReading, Vehicle, VehicleDocument, VehicleStatus};
use crate::repositories::VehicleRepository;
use crate::utils::errors::{not_found_error, validation_error, AppResult};
use crate::utils::validation::{validate_license_plate, validate_odometer};

pub const INVALID_LICENSE_PLATE: &str = "invalid license plate";
pub const INVALID_ODOMETER: &str = "odometer reading must be non-negative";

pub struct VehicleService {
    vehicles: Arc<dyn VehicleRepository>,
}

impl VehicleService {
    pub fn new(vehicles: Arc<dyn VehicleRepository>) -> Self {
        Self { vehicles }
    }

    pub async fn register(&self, draft: NewVehicle) -> AppResult<Vehicle> {
        validate_license_plate(&draft.license_plate).map_err(|_| validation_error(INVALID_LICENSE_PLATE))?;
        validate_odometer(draft.current_odometer).map_err(|_| validation_error(INVALID_ODOMETER))?;

        let vehicle = Vehicle::new(draft, Utc::now());
        let saved = self.vehicles.save(&vehicle).await?;

        info!("Vehículo {} registrado ({})", saved.id, saved.license_plate);
        Ok(saved)
    }

    pub async fn get(&self, id: Uuid) -> AppResult<Vehicle> {
        self.vehicles
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Vehicle", &id.to_string()))
    }

    pub async fn list(&self) -> AppResult<Vec<Vehicle>> {
        self.vehicles.find_all().await
    }

    pub async fn list_by_category(&self, category: &str) -> AppResult<Vec<Vehicle>> {
        self.vehicles.find_by_category(category).await
    }

    pub async fn list_by_responsible(&self, responsible: &str) -> AppResult<Vec<Vehicle>> {
        self.vehicles.find_by_responsible(responsible).await
    }

    pub async fn list_maintenance_due(&self) -> AppResult<Vec<Vehicle>> {
        self.list_maintenance_due_at(Utc::now()).await
    }

    /// Vehículos con la próxima revisión estrictamente anterior a `now`
    pub async fn list_maintenance_due_at(&self, now: DateTime<Utc>) -> AppResult<Vec<Vehicle>> {
        let vehicles = self.vehicles.find_all().await?;
        Ok(vehicles
            .into_iter()
            .filter(|vehicle| vehicle.is_revision_overdue(now))
            .collect())
    }

    /// Fija el odómetro y añade la lectura al historial.
    pub async fn update_odometer(&self, id: Uuid, reading: f64, comment: Option<String>) -> AppResult<Vehicle> {
        validate_odometer(reading).map_err(|_| validation_error(INVALID_ODOMETER))?;
        let mut vehicle = self.get(id).await?;

        vehicle.current_odometer = reading;
        vehicle.odometer_history.push(OdometerReading {
            date: Utc::now(),
            reading,
            comment,
        });

        let saved = self.vehicles.save(&vehicle).await?;
        info!("Odómetro del vehículo {}: {} km", saved.id, saved.current_odometer);
        Ok(saved)
    }

    /// Cambia el estado. Pasar a IN_MAINTENANCE fecha el último mantenimiento.
    pub async fn update_status(&self, id: Uuid, status: VehicleStatus) -> AppResult<Vehicle> {
        let mut vehicle = self.get(id).await?;

        vehicle.status = status;
        if status == VehicleStatus::InMaintenance {
            vehicle.last_maintenance_at = Some(Utc::now());
        }

        let saved = self.vehicles.save(&vehicle).await?;
        info!("Vehículo {} -> {}", saved.id, saved.status);
        Ok(saved)
    }

    pub async fn add_document(&self, id: Uuid, document: VehicleDocument) -> AppResult<Vehicle> {
        let mut vehicle = self.get(id).await?;
        vehicle.documents.push(document);
        self.vehicles.save(&vehicle).await
    }

    pub async fn odometer_history(&self, id: Uuid) -> AppResult<Vec<OdometerReading>> {
        Ok(self.get(id).await?.odometer_history)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::vehicle::DocumentType;
    use crate::repositories::MemoryStore;
    use crate::utils::errors::AppError;
    use chrono::Duration;

    fn service() -> VehicleService {
        VehicleService::new(Arc::new(MemoryStore::new()))
    }

    fn draft(plate: &str) -> NewVehicle {
        NewVehicle {
            license_plate: plate.to_string(),
            make: Some("Renault".to_string()),
            model: Some("Kangoo".to_string()),
            category: Some("MISSION".to_string()),
            responsible: Some("resp-1".to_string()),
            current_odometer: 12000.0,
            ..NewVehicle::default()
        }
    }

    #[tokio::test]
    async fn test_register_and_get() {
        let service = service();
        let vehicle = service.register(draft("AB-123-CD")).await.unwrap();

        assert_eq!(vehicle.status, VehicleStatus::Available);
        assert_eq!(service.get(vehicle.id).await.unwrap().license_plate, "AB-123-CD");
        assert!(matches!(service.get(Uuid::new_v4()).await, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_register_rejects_bad_input() {
        let service = service();
        assert!(service.register(draft("")).await.is_err());

        let mut negative = draft("AB-123-CD");
        negative.current_odometer = -5.0;
        assert!(matches!(service.register(negative).await, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_update_odometer_appends_history() {
        let service = service();
        let vehicle = service.register(draft("AB-123-CD")).await.unwrap();

        service.update_odometer(vehicle.id, 12500.0, Some("retour mission".to_string())).await.unwrap();
        let updated = service.update_odometer(vehicle.id, 13000.0, None).await.unwrap();

        assert_eq!(updated.current_odometer, 13000.0);
        let history = service.odometer_history(vehicle.id).await.unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].reading, 12500.0);
        assert_eq!(history[0].comment.as_deref(), Some("retour mission"));

        assert!(matches!(
            service.update_odometer(Uuid::new_v4(), 1.0, None).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_maintenance_status_stamps_date() {
        let service = service();
        let vehicle = service.register(draft("AB-123-CD")).await.unwrap();

        let on_mission = service.update_status(vehicle.id, VehicleStatus::OnMission).await.unwrap();
        assert!(on_mission.last_maintenance_at.is_none());

        let in_shop = service.update_status(vehicle.id, VehicleStatus::InMaintenance).await.unwrap();
        assert_eq!(in_shop.status, VehicleStatus::InMaintenance);
        assert!(in_shop.last_maintenance_at.is_some());
    }

    #[tokio::test]
    async fn test_maintenance_due_is_strict() {
        let service = service();
        let now = Utc::now();

        let mut overdue = draft("AA-001-AA");
        overdue.next_revision_at = Some(now - Duration::days(1));
        let mut exact = draft("AA-002-AA");
        exact.next_revision_at = Some(now);
        let mut later = draft("AA-003-AA");
        later.next_revision_at = Some(now + Duration::days(30));

        let overdue = service.register(overdue).await.unwrap();
        service.register(exact).await.unwrap();
        service.register(later).await.unwrap();
        service.register(draft("AA-004-AA")).await.unwrap();

        let due = service.list_maintenance_due_at(now).await.unwrap();
        assert_eq!(due.len(), 1);
        assert_eq!(due[0].id, overdue.id);
    }

    #[tokio::test]
    async fn test_filters_and_documents() {
        let service = service();
        let vehicle = service.register(draft("AB-123-CD")).await.unwrap();
        let mut pool = draft("EF-456-GH");
        pool.category = Some("POOL".to_string());
        pool.responsible = None;
        service.register(pool).await.unwrap();

        assert_eq!(service.list().await.unwrap().len(), 2);
        assert_eq!(service.list_by_category("MISSION").await.unwrap().len(), 1);
        assert_eq!(service.list_by_responsible("resp-1").await.unwrap()[0].id, vehicle.id);

        let document = VehicleDocument {
            document_type: DocumentType::Insurance,
            number: "ASS-2024-01".to_string(),
            expires_on: None,
            file: None,
            valid: true,
        };
        let updated = service.add_document(vehicle.id, document.clone()).await.unwrap();
        assert_eq!(updated.documents, vec![document]);
    }
}
