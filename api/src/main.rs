use actix_web::{web, HttpServer};
use anyhow::Context;
use dotenv::dotenv;
use log::info;
use std::sync::Arc;

use carnet_api::app::create_app;
use carnet_api::routes::credential::AppState;
use carnet_core::repositories::{InMemoryTokenCache, StudentDirectory, TokenCache};
use carnet_core::services::{CredentialReaper, CredentialService};
use carnet_infra::cache::{RedisClient, RedisTokenCache};
use carnet_infra::database::DatabasePool;
use carnet_shared::{AppConfig, CacheBackend, Environment, LoggingConfig};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenv().ok();

    // Initialize logger
    let logging = LoggingConfig::for_environment(Environment::from_env());
    let mut logger = env_logger::Builder::from_env(
        env_logger::Env::new().default_filter_or(logging.filter.as_str()),
    );
    if !logging.timestamp {
        logger.format_timestamp(None);
    }
    logger.init();

    info!("Starting UFPS Carnet API Server");

    // A missing signing secret aborts startup here
    let config = AppConfig::from_env().context("Failed to load configuration")?;

    let pool = DatabasePool::new(&config.database)
        .await
        .context("Failed to connect to the student directory database")?;
    pool.health_check()
        .await
        .context("Student directory database failed its health check")?;
    let directory = Arc::new(pool.student_directory());

    match config.credential.cache_backend {
        CacheBackend::Memory => {
            info!("Using in-memory credential cache");
            serve(config, Arc::new(InMemoryTokenCache::new()), directory).await
        }
        CacheBackend::Redis => {
            info!("Using Redis credential cache");
            let client = RedisClient::new(config.cache.clone())
                .await
                .context("Failed to connect to Redis")?;
            serve(config, Arc::new(RedisTokenCache::new(client)), directory).await
        }
    }
}

/// Wire the credential services around the chosen cache and run the server
async fn serve<C, D>(config: AppConfig, cache: Arc<C>, directory: Arc<D>) -> anyhow::Result<()>
where
    C: TokenCache + 'static,
    D: StudentDirectory + 'static,
{
    let credential_service = CredentialService::new(cache.clone(), directory, &config.credential)
        .context("Failed to create credential service")?;

    let reaper = Arc::new(CredentialReaper::from_config(cache, &config.credential));
    let reaper_handle = reaper.start_background_task();

    let app_state = web::Data::new(AppState::new(Arc::new(credential_service)));

    let bind_address = config.server.bind_address();
    info!("Server will bind to: {}", bind_address);

    let mut server = HttpServer::new(move || create_app(app_state.clone()));
    if config.server.workers > 0 {
        server = server.workers(config.server.workers);
    }

    server.bind(&bind_address)?.run().await?;

    reaper_handle.abort();
    info!("Server stopped");
    Ok(())
}
