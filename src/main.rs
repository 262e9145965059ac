use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::net::SocketAddr;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use car_rental::config::{DatabaseConfig, EnvironmentConfig};
use car_rental::database::{create_pool, run_migrations};
use car_rental::services::{ImageStore, PriceModel};
use car_rental::state::AppState;
use car_rental::{build_app, SERVICE_NAME};

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,tower_http=info,sqlx=warn")),
        )
        .init();

    info!("🚗 {}", SERVICE_NAME);
    info!("================================================");

    let config = EnvironmentConfig::from_env().context("configuración inválida")?;
    let db_config = DatabaseConfig::from_env().context("configuración de base de datos inválida")?;
    info!("⚙️ Entorno: {}", config.environment);

    // Inicializar base de datos
    let pool = match create_pool(&db_config).await {
        Ok(pool) => pool,
        Err(e) => {
            error!("❌ Error conectando a la base de datos: {}", e);
            return Err(anyhow::anyhow!("Error de base de datos: {}", e));
        }
    };
    run_migrations(&pool).await.context("error aplicando migraciones")?;
    info!("✅ Migraciones aplicadas");

    let price_model = PriceModel::load_or_train(&config.price_model_path)
        .context("no se pudo cargar ni entrenar el modelo de precios")?;
    info!("📈 Modelo de precios listo ({} muestras)", price_model.trained_samples());

    let images = ImageStore::new(config.upload_dir.clone(), config.max_image_bytes)
        .await
        .context("no se pudo preparar el directorio de imágenes")?;
    info!("🖼️ Imágenes en {}", images.root().display());

    if config.is_production() && config.cors_origins.is_empty() {
        warn!("⚠️ CORS_ORIGINS vacío en producción: se acepta cualquier origen");
    }

    let addr: SocketAddr = config
        .server_url()
        .parse()
        .context("HOST/PORT inválidos")?;
    let app = build_app(AppState::new(pool, config, price_model, images));

    info!("🌐 Servidor iniciando en http://{}", addr);
    log_endpoints();

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

fn log_endpoints() {
    info!("🔍 Endpoints disponibles:");
    info!("   GET  /api/health - Health check");
    info!("   GET  /api/statistics - Estadísticas");
    info!("🚗 Coches:");
    info!("   POST /api/cars - Crear coche");
    info!("   GET  /api/cars - Listar coches");
    info!("   GET|PUT|DELETE /api/cars/:id");
    info!("   GET  /api/cars/search/available | rented | by-plate/:plate | by-text?q=");
    info!("👤 Clientes:");
    info!("   POST /api/customers - Crear cliente");
    info!("   GET  /api/customers - Listar clientes");
    info!("   GET|PUT|DELETE /api/customers/:id");
    info!("   GET  /api/customers/search/by-code/:code | by-name?q=");
    info!("🔑 Alquileres:");
    info!("   POST /api/rentals - Alquilar coche");
    info!("   POST /api/rentals/:id/return - Devolver coche");
    info!("   GET|DELETE /api/rentals/:id");
    info!("   GET  /api/rentals/search/active | customer/:id | car/:id");
    info!("🖼️ Imágenes:");
    info!("   POST|DELETE /api/images/cars/:id");
    info!("   GET  /api/images/cars/:id/download");
    info!("📈 Precios:");
    info!("   POST /api/ml/predict-price");
    info!("   GET  /api/ml/supported-marques | ml-info");
}

/// Señal de apagado graceful
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("No se pudo instalar el handler de Ctrl+C: {}", e);
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
                error!("No se pudo instalar el handler de SIGTERM: {}", e);
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
