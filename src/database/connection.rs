//! Conexión a PostgreSQL
//!
//! Este módulo crea el pool de conexiones y aplica las migraciones embebidas.

use sqlx::PgPool;
use tracing::info;

use crate::config::DatabaseConfig;

/// Crear un pool de conexiones y verificar que la base de datos responde
pub async fn create_pool(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    info!("🗄️ Conectando a {}", mask_database_url(&config.url));
    let pool = config.create_pool().await?;
    test_connection(&pool).await?;
    info!("✅ Base de datos conectada");
    Ok(pool)
}

/// Verificar que la conexión funciona
pub async fn test_connection(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Ejecutar migraciones de la base de datos
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    info!("Ejecutando migraciones...");
    sqlx::migrate!("./migrations").run(pool).await?;
    info!("Migraciones aplicadas");
    Ok(())
}

/// Función helper para enmascarar la URL de la base de datos en logs
pub fn mask_database_url(url: &str) -> String {
    let Some(scheme_end) = url.find("://") else {
        return url.to_string();
    };
    let rest = &url[scheme_end + 3..];
    match rest.rfind('@') {
        Some(at_pos) if rest[..at_pos].contains(':') => {
            format!("{}***:***@{}", &url[..scheme_end + 3], &rest[at_pos + 1..])
        }
        _ => url.to_string(),
    }
}
