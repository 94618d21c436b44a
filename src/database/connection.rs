//! Configuración de conexión a PostgreSQL

use sqlx::{Executor, PgPool};
use tracing::info;

use crate::config::database::DatabaseConfig;
use crate::database::schema::SCHEMA;

pub struct DatabaseConnection {
    pool: PgPool,
}

impl DatabaseConnection {
    /// Abre el pool y aplica el esquema
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, sqlx::Error> {
        info!("🗄️  Conectando a {}", config.masked_url());
        let pool = config.create_pool().await?;
        run_migrations(&pool).await?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// Ejecutar el esquema (protocolo simple: varias sentencias en un solo envío)
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::Error> {
    pool.execute(SCHEMA).await?;
    info!("✅ Esquema de base de datos aplicado");
    Ok(())
}
