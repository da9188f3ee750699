use anyhow::{Context, Result};
use product::{handler::AppRouter, state::AppState};
use shared::{
    config::{Config, ConnectionManager, ConnectionPool},
    utils::{Telemetry, init_logger},
};
use tracing::{error, info};

const SERVICE_NAME: &str = "product-service";

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    let config = Config::init().context("Failed to load configuration")?;

    let mut telemetry = config
        .otel_endpoint
        .clone()
        .map(|endpoint| Telemetry::new(SERVICE_NAME, endpoint));

    let logger_provider = match telemetry.as_mut() {
        Some(telemetry) => {
            telemetry.init_tracer().context("Failed to init tracer")?;
            telemetry.init_meter().context("Failed to init meter")?;
            Some(telemetry.init_logger().context("Failed to init OTLP logger")?)
        }
        None => None,
    };

    let _log_guard = init_logger(
        logger_provider.as_ref(),
        SERVICE_NAME,
        config.dev_mode,
        config.enable_file_log,
    )
    .context("Failed to initialize logger")?;

    info!("🚀 Starting Product Service initialization...");

    let db_pool = ConnectionManager::new_pool(&config.database)
        .await
        .context("Failed to initialize database pool")?;

    if config.run_migrations {
        run_migrations(&db_pool)
            .await
            .context("Failed to run database migrations")?;
        info!("✅ Database migrations applied");
    }

    let state = AppState::new(db_pool).context("Failed to create AppState")?;

    info!("✅ Application setup completed successfully.");

    let served = AppRouter::serve(config.port, state).await;

    if let Some(telemetry) = telemetry {
        if let Err(e) = telemetry.shutdown() {
            error!("Failed to shutdown telemetry: {}", e);
        }
    }

    served?;
    info!("✅ Product Service shutdown complete.");
    Ok(())
}

pub async fn run_migrations(pool: &ConnectionPool) -> Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}
