use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::vehicle::{OdometerReading, Vehicle, VehicleDocument, VehicleStatus};
use crate::utils::errors::AppResult;

#[async_trait]
pub trait VehicleRepository: Send + Sync {
    async fn save(&self, vehicle: &Vehicle) -> AppResult<Vehicle>;
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Vehicle>>;
    async fn find_all(&self) -> AppResult<Vec<Vehicle>>;
    async fn find_by_category(&self, category: &str) -> AppResult<Vec<Vehicle>>;
    async fn find_by_responsible(&self, responsible: &str) -> AppResult<Vec<Vehicle>>;
}

// Fila de la tabla vehicles; historial y documentos van en JSONB
#[derive(Debug, sqlx::FromRow)]
struct VehicleRow {
    id: Uuid,
    license_plate: String,
    make: Option<String>,
    model: Option<String>,
    year: Option<i32>,
    category: Option<String>,
    responsible: Option<String>,
    department: Option<String>,
    current_odometer: f64,
    odometer_history: Json<Vec<OdometerReading>>,
    status: VehicleStatus,
    last_maintenance_at: Option<DateTime<Utc>>,
    next_revision_at: Option<DateTime<Utc>>,
    documents: Json<Vec<VehicleDocument>>,
    created_at: DateTime<Utc>,
}

impl From<VehicleRow> for Vehicle {
    fn from(row: VehicleRow) -> Self {
        Self {
            id: row.id,
            license_plate: row.license_plate,
            make: row.make,
            model: row.model,
            year: row.year,
            category: row.category,
            responsible: row.responsible,
            department: row.department,
            current_odometer: row.current_odometer,
            odometer_history: row.odometer_history.0,
            status: row.status,
            last_maintenance_at: row.last_maintenance_at,
            next_revision_at: row.next_revision_at,
            documents: row.documents.0,
            created_at: row.created_at,
        }
    }
}

pub struct PgVehicleRepository {
    pool: PgPool,
}

impl PgVehicleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl VehicleRepository for PgVehicleRepository {
    async fn save(&self, vehicle: &Vehicle) -> AppResult<Vehicle> {
        let row = sqlx::query_as::<_, VehicleRow>(
            r#"
            INSERT INTO vehicles (id, license_plate, make, model, year, category, responsible, department,
                                  current_odometer, odometer_history, status, last_maintenance_at,
                                  next_revision_at, documents, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
            ON CONFLICT (id) DO UPDATE
            SET license_plate = EXCLUDED.license_plate,
                make = EXCLUDED.make,
                model = EXCLUDED.model,
                year = EXCLUDED.year,
                category = EXCLUDED.category,
                responsible = EXCLUDED.responsible,
                department = EXCLUDED.department,
                current_odometer = EXCLUDED.current_odometer,
                odometer_history = EXCLUDED.odometer_history,
                status = EXCLUDED.status,
                last_maintenance_at = EXCLUDED.last_maintenance_at,
                next_revision_at = EXCLUDED.next_revision_at,
                documents = EXCLUDED.documents
            RETURNING *
            "#,
        )
        .bind(vehicle.id)
        .bind(&vehicle.license_plate)
        .bind(&vehicle.make)
        .bind(&vehicle.model)
        .bind(vehicle.year)
        .bind(&vehicle.category)
        .bind(&vehicle.responsible)
        .bind(&vehicle.department)
        .bind(vehicle.current_odometer)
        .bind(Json(&vehicle.odometer_history))
        .bind(vehicle.status)
        .bind(vehicle.last_maintenance_at)
        .bind(vehicle.next_revision_at)
        .bind(Json(&vehicle.documents))
        .bind(vehicle.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            log::error!("Error guardando vehículo {}: {}", vehicle.id, e);
            e
        })?;

        Ok(row.into())
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Vehicle>> {
        let row = sqlx::query_as::<_, VehicleRow>("SELECT * FROM vehicles WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(Vehicle::from))
    }

    async fn find_all(&self) -> AppResult<Vec<Vehicle>> {
        let rows = sqlx::query_as::<_, VehicleRow>("SELECT * FROM vehicles ORDER BY created_at")
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(Vehicle::from).collect())
    }

    async fn find_by_category(&self, category: &str) -> AppResult<Vec<Vehicle>> {
        let rows = sqlx::query_as::<_, VehicleRow>(
            "SELECT * FROM vehicles WHERE category = $1 ORDER BY created_at",
        )
        .bind(category)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Vehicle::from).collect())
    }

    async fn find_by_responsible(&self, responsible: &str) -> AppResult<Vec<Vehicle>> {
        let rows = sqlx::query_as::<_, VehicleRow>(
            "SELECT * FROM vehicles WHERE responsible = $1 ORDER BY created_at",
        )
        .bind(responsible)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Vehicle::from).collect())
    }
}
