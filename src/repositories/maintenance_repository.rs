use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::maintenance::MaintenanceRecord;
use crate::utils::errors::AppResult;

#[async_trait]
pub trait MaintenanceRepository: Send + Sync {
    async fn save(&self, record: &MaintenanceRecord) -> AppResult<MaintenanceRecord>;
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<MaintenanceRecord>>;
    async fn find_all(&self) -> AppResult<Vec<MaintenanceRecord>>;
    async fn find_by_vehicle(&self, vehicle_id: Uuid) -> AppResult<Vec<MaintenanceRecord>>;
}

pub struct PgMaintenanceRepository {
    pool: PgPool,
}

impl PgMaintenanceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MaintenanceRepository for PgMaintenanceRepository {
    async fn save(&self, record: &MaintenanceRecord) -> AppResult<MaintenanceRecord> {
        let saved = sqlx::query_as::<_, MaintenanceRecord>(
            r#"
            INSERT INTO maintenance_records (id, vehicle_id, date, maintenance_type, description)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (id) DO UPDATE
            SET date = EXCLUDED.date,
                maintenance_type = EXCLUDED.maintenance_type,
                description = EXCLUDED.description
            RETURNING *
            "#,
        )
        .bind(record.id)
        .bind(record.vehicle_id)
        .bind(record.date)
        .bind(&record.maintenance_type)
        .bind(&record.description)
        .fetch_one(&self.pool)
        .await?;

        Ok(saved)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<MaintenanceRecord>> {
        let record = sqlx::query_as::<_, MaintenanceRecord>("SELECT * FROM maintenance_records WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(record)
    }

    async fn find_all(&self) -> AppResult<Vec<MaintenanceRecord>> {
        let records = sqlx::query_as::<_, MaintenanceRecord>("SELECT * FROM maintenance_records ORDER BY date")
            .fetch_all(&self.pool)
            .await?;

        Ok(records)
    }

    async fn find_by_vehicle(&self, vehicle_id: Uuid) -> AppResult<Vec<MaintenanceRecord>> {
        let records = sqlx::query_as::<_, MaintenanceRecord>(
            "SELECT * FROM maintenance_records WHERE vehicle_id = $1 ORDER BY date",
        )
        .bind(vehicle_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }
}
