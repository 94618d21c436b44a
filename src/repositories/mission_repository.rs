use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::mission::{Mission, MissionStatus, StatusHistory};
use crate::utils::errors::AppResult;

/// Acceso a misiones. El `vehicle_id` de una misión existente nunca se reescribe.
///
/// El historial se guarda entero como JSONB, así que las transiciones usan
/// `update`: sólo escribe si `updated_at` sigue siendo el que se leyó.
#[async_trait]
pub trait MissionRepository: Send + Sync {
    async fn save(&self, mission: &Mission) -> AppResult<Mission>;
    /// Reescribe una misión existente si nadie la ha modificado desde
    /// `previous_updated_at`. Devuelve `None` si la comparación falla.
    async fn update(&self, mission: &Mission, previous_updated_at: DateTime<Utc>) -> AppResult<Option<Mission>>;
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Mission>>;
    async fn find_by_status(&self, status: MissionStatus) -> AppResult<Vec<Mission>>;
    /// Misiones con `start_at` en `[from, to]` (límites incluidos)
    async fn find_by_start_between(&self, from: DateTime<Utc>, to: DateTime<Utc>) -> AppResult<Vec<Mission>>;
    async fn find_all(&self) -> AppResult<Vec<Mission>>;
}

#[derive(Debug, sqlx::FromRow)]
struct MissionRow {
    id: Uuid,
    vehicle_id: Uuid,
    driver_id: Option<Uuid>,
    validator_id: Option<Uuid>,
    start_at: Option<DateTime<Utc>>,
    end_at: Option<DateTime<Utc>>,
    route: Option<String>,
    description: Option<String>,
    status: MissionStatus,
    validation_comment: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    history: Json<StatusHistory>,
}

impl From<MissionRow> for Mission {
    fn from(row: MissionRow) -> Self {
        Self {
            id: row.id,
            vehicle_id: row.vehicle_id,
            driver_id: row.driver_id,
            validator_id: row.validator_id,
            start_at: row.start_at,
            end_at: row.end_at,
            route: row.route,
            description: row.description,
            status: row.status,
            validation_comment: row.validation_comment,
            created_at: row.created_at,
            updated_at: row.updated_at,
            history: row.history.0,
        }
    }
}

pub struct PgMissionRepository {
    pool: PgPool,
}

impl PgMissionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MissionRepository for PgMissionRepository {
    async fn save(&self, mission: &Mission) -> AppResult<Mission> {
        let row = sqlx::query_as::<_, MissionRow>(
            r#"
            INSERT INTO missions (id, vehicle_id, driver_id, validator_id, start_at, end_at, route, description,
                                  status, validation_comment, created_at, updated_at, history)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            ON CONFLICT (id) DO UPDATE
            SET driver_id = EXCLUDED.driver_id,
                validator_id = EXCLUDED.validator_id,
                start_at = EXCLUDED.start_at,
                end_at = EXCLUDED.end_at,
                route = EXCLUDED.route,
                description = EXCLUDED.description,
                status = EXCLUDED.status,
                validation_comment = EXCLUDED.validation_comment,
                updated_at = EXCLUDED.updated_at,
                history = EXCLUDED.history
            RETURNING *
            "#,
        )
        .bind(mission.id)
        .bind(mission.vehicle_id)
        .bind(mission.driver_id)
        .bind(mission.validator_id)
        .bind(mission.start_at)
        .bind(mission.end_at)
        .bind(&mission.route)
        .bind(&mission.description)
        .bind(mission.status)
        .bind(&mission.validation_comment)
        .bind(mission.created_at)
        .bind(mission.updated_at)
        .bind(Json(&mission.history))
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            log::error!("Error guardando misión {}: {}", mission.id, e);
            e
        })?;

        Ok(row.into())
    }

    async fn update(&self, mission: &Mission, previous_updated_at: DateTime<Utc>) -> AppResult<Option<Mission>> {
        let row = sqlx::query_as::<_, MissionRow>(
            r#"
            UPDATE missions
            SET driver_id = $2,
                validator_id = $3,
                start_at = $4,
                end_at = $5,
                route = $6,
                description = $7,
                status = $8,
                validation_comment = $9,
                updated_at = $10,
                history = $11
            WHERE id = $1 AND updated_at = $12
            RETURNING *
            "#,
        )
        .bind(mission.id)
        .bind(mission.driver_id)
        .bind(mission.validator_id)
        .bind(mission.start_at)
        .bind(mission.end_at)
        .bind(&mission.route)
        .bind(&mission.description)
        .bind(mission.status)
        .bind(&mission.validation_comment)
        .bind(mission.updated_at)
        .bind(Json(&mission.history))
        .bind(previous_updated_at)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            log::error!("Error actualizando misión {}: {}", mission.id, e);
            e
        })?;

        Ok(row.map(Mission::from))
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Mission>> {
        let row = sqlx::query_as::<_, MissionRow>("SELECT * FROM missions WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(Mission::from))
    }

    async fn find_by_status(&self, status: MissionStatus) -> AppResult<Vec<Mission>> {
        let rows = sqlx::query_as::<_, MissionRow>(
            "SELECT * FROM missions WHERE status = $1 ORDER BY created_at",
        )
        .bind(status)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Mission::from).collect())
    }

    async fn find_by_start_between(&self, from: DateTime<Utc>, to: DateTime<Utc>) -> AppResult<Vec<Mission>> {
        let rows = sqlx::query_as::<_, MissionRow>(
            "SELECT * FROM missions WHERE start_at >= $1 AND start_at <= $2 ORDER BY start_at",
        )
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Mission::from).collect())
    }

    async fn find_all(&self) -> AppResult<Vec<Mission>> {
        let rows = sqlx::query_as::<_, MissionRow>("SELECT * FROM missions ORDER BY created_at")
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(Mission::from).collect())
    }
}
