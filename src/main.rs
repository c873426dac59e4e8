use std::net::SocketAddr;
use std::time::Duration;

use anyhow::Result;
use dotenvy::dotenv;
use tokio::signal;
use tracing::{error, info, warn};

use gearguard::{build_router, repositories::MaintenanceRepository, AppState, ServerConfig};

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    // Configurar logging
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    info!("🛠️ GearGuard - Servidor de referencia");
    info!("================================================");

    let config = ServerConfig::from_env().map_err(|e| {
        error!("❌ Configuración inválida: {}", e);
        anyhow::anyhow!("Configuración inválida: {}", e)
    })?;

    let repository = if config.seed_demo_data {
        info!("🌱 Cargando datos de demostración");
        MaintenanceRepository::with_demo_data().await
    } else {
        MaintenanceRepository::new()
    };

    let state = AppState::new(config.clone(), repository);

    // Limpieza periódica de sesiones expiradas
    let cleanup_state = state.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(600));
        loop {
            interval.tick().await;
            cleanup_state.cleanup_expired_sessions().await;
        }
    });

    let app = build_router(state);
    let addr: SocketAddr = config.server_url().parse()?;

    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("🔍 Endpoints disponibles:");
    info!("   POST /login - Iniciar sesión");
    info!("   POST /signup - Crear cuenta");
    info!("   POST /logout - Cerrar sesión");
    info!("   GET  /api/equipment-data - Solicitudes, KPIs y catálogos");
    info!("   GET  /api/request/:id - Obtener solicitud");
    info!("   POST /api/request/update - Autoguardado de un campo");
    info!("   POST /api/request/save - Crear o reemplazar solicitud");
    info!("   POST /api/request/delete/:id - Eliminar solicitud");
    if config.is_production() && config.cors_origins.is_empty() {
        warn!("⚠️ CORS abierto en producción: define CORS_ORIGINS");
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| {
            error!("❌ Error del servidor: {}", e);
            e
        })?;

    info!("👋 Servidor terminado");
    Ok(())
}

/// Señal de apagado graceful
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("❌ No se pudo escuchar Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("❌ No se pudo escuchar SIGTERM: {}", e);
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
