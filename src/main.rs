use tracing_subscriber::EnvFilter;

use lexiguard::api::{self, ApiContext};
use lexiguard::config::{self, AppConfig};
use lexiguard::db::sqlite::open_database;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    let app_config = AppConfig::from_env();
    tracing::info!(
        version = config::APP_VERSION,
        data_dir = %app_config.data_dir.display(),
        debug = app_config.debug,
        "starting {}",
        config::APP_NAME
    );

    if app_config.gemini_api_key.is_empty() {
        tracing::warn!("GEMINI_API_KEY is not set; every analysis will fail");
    }

    std::fs::create_dir_all(&app_config.data_dir)?;
    std::fs::create_dir_all(app_config.uploads_dir())?;

    // Open once up front so migrations run before the first request
    let conn = open_database(&app_config.database_path())?;
    drop(conn);

    let ctx = ApiContext::new(app_config);
    api::server::serve(ctx).await?;

    tracing::info!("shut down cleanly");
    Ok(())
}
