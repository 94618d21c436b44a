use anyhow::Result;
use std::net::SocketAddr;
use tokio::signal;
use tracing::{error, info, warn};
use dotenvy::dotenv;

use fleet_management::config::{DatabaseConfig, EnvironmentConfig};
use fleet_management::database::DatabaseConnection;
use fleet_management::repositories::Repositories;
use fleet_management::routes::create_router;
use fleet_management::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    let config = EnvironmentConfig::from_env()?;

    // Configurar logging
    tracing_subscriber::fmt()
        .with_max_level(config.tracing_level())
        .init();

    info!("🚐 Fleet Management - API de gestión de flota");
    info!("================================================");

    // Persistencia: PostgreSQL si hay DATABASE_URL, memoria en otro caso
    let repositories = match DatabaseConfig::from_env()? {
        Some(db_config) => match DatabaseConnection::connect(&db_config).await {
            Ok(connection) => Repositories::postgres(connection.pool().clone()),
            Err(e) => {
                error!("❌ Error conectando a la base de datos: {}", e);
                return Err(anyhow::anyhow!("Error de base de datos: {}", e));
            }
        },
        None => {
            warn!("⚠️ DATABASE_URL no definida, usando persistencia en memoria");
            Repositories::in_memory()
        }
    };

    info!("🔀 Transiciones de misión: {:?}", config.mission_transitions);

    let addr: SocketAddr = config.server_url().parse()?;
    let app = create_router(AppState::new(repositories, config));

    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("🔍 Endpoints disponibles:");
    info!("   GET  /health - Health check");
    info!("🗺️ Misiones:");
    info!("   POST /api/v1/missions - Crear misión");
    info!("   GET  /api/v1/missions - Listar misiones");
    info!("   GET  /api/v1/missions/:id - Obtener misión");
    info!("   PUT  /api/v1/missions/:id/validate - Validar misión");
    info!("   PUT  /api/v1/missions/:id/start - Iniciar misión");
    info!("   PUT  /api/v1/missions/:id/finish - Terminar misión");
    info!("   GET  /api/v1/missions/in-progress - Misiones en curso");
    info!("   GET  /api/v1/missions/by-status/:status - Misiones por estado");
    info!("   GET  /api/v1/missions/period?from&to - Misiones por periodo");
    info!("⛽ Carburante:");
    info!("   POST /api/v1/fuel/events - Registrar repostaje");
    info!("   GET  /api/v1/fuel/events - Listar repostajes");
    info!("   GET  /api/v1/fuel/vehicles/:vehicle_id?from&to - Historial de un vehículo");
    info!("   POST /api/v1/fuel/vouchers - Emitir bono");
    info!("   POST /api/v1/fuel/vouchers/:number/redeem - Consumir bono");
    info!("   GET  /api/v1/fuel/vouchers/unused - Bonos sin usar");
    info!("   GET  /api/v1/fuel/vouchers/vehicle/:vehicle_id - Bonos de un vehículo");
    info!("   POST /api/v1/fuel/cards - Crear tarjeta");
    info!("   GET  /api/v1/fuel/cards/:number/validate - Validar tarjeta");
    info!("   GET  /api/v1/fuel/cards/active - Tarjetas activas");
    info!("   GET  /api/v1/fuel/cards/vehicle/:vehicle_id - Tarjetas de un vehículo");
    info!("🚗 Vehículos:");
    info!("   POST /api/v1/vehicles - Registrar vehículo");
    info!("   GET  /api/v1/vehicles - Listar vehículos");
    info!("   GET  /api/v1/vehicles/:id - Obtener vehículo");
    info!("   PUT  /api/v1/vehicles/:id/odometer - Actualizar odómetro");
    info!("   GET  /api/v1/vehicles/:id/odometer - Historial de odómetro");
    info!("   PUT  /api/v1/vehicles/:id/status - Cambiar estado");
    info!("   POST /api/v1/vehicles/:id/documents - Añadir documento");
    info!("   GET  /api/v1/vehicles/category/:category - Por categoría");
    info!("   GET  /api/v1/vehicles/responsible/:responsible - Por responsable");
    info!("   GET  /api/v1/vehicles/maintenance-due - Revisión vencida");
    info!("🔧 Mantenimiento:");
    info!("   POST /api/v1/maintenance - Registrar mantenimiento");
    info!("   GET  /api/v1/maintenance - Listar mantenimientos");
    info!("   GET  /api/v1/maintenance/:id - Obtener mantenimiento");
    info!("   GET  /api/v1/maintenance/vehicle/:vehicle_id - Mantenimientos de un vehículo");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("❌ Error del servidor: {}", e);
        return Err(e.into());
    }

    info!("👋 Servidor terminado");
    Ok(())
}

/// Señal de apagado graceful
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("❌ No se pudo instalar el manejador de Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("❌ No se pudo instalar el manejador de SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("🛑 Señal Ctrl+C recibida, apagando servidor...");
        },
        _ = terminate => {
            info!("🛑 Señal de terminación recibida, apagando servidor...");
        },
    }
}
