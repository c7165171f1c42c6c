/// API сервер прогнозов

use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use dengue_ml::{
    create_router,
    preprocessing::RandomWindow,
    store::{JsonlStore, MemoryStore, PersistenceQueue, PredictionStore},
    AppState, ModelState, ServiceConfig, StoreBackend,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Инициализация логирования
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = ServiceConfig::from_env();

    if let Some(models_dir) = config.sequence_model_path.parent() {
        if let Err(e) = std::fs::create_dir_all(models_dir) {
            tracing::warn!(path = %models_dir.display(), error = %e, "Could not create models directory");
        }
    }

    // Модели грузятся до приема запросов
    let models = ModelState::load(&config);
    tracing::info!(state = ?models.service_state(), "Model state fixed for this process");

    let store: Arc<dyn PredictionStore> = match &config.store {
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory prediction store, records are lost on restart");
            Arc::new(MemoryStore::new())
        }
        StoreBackend::Jsonl(path) => {
            tracing::info!(path = %path.display(), "Using JSON Lines prediction store");
            Arc::new(JsonlStore::new(path.clone()))
        }
    };
    let (persistence, writer) = PersistenceQueue::spawn(store.clone(), config.queue_capacity);

    let state = AppState::with_options(
        models,
        store,
        persistence,
        Arc::new(RandomWindow),
        config.max_forecast_days,
    );
    let app = create_router(state);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Роутер со всеми копиями очереди уже удален, писатель дописывает остаток
    match tokio::time::timeout(std::time::Duration::from_secs(5), writer).await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => tracing::warn!(error = %e, "Persistence writer ended abnormally"),
        Err(_) => tracing::warn!("Persistence writer did not drain in time"),
    }
    tracing::info!("Server shut down cleanly");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to install Ctrl+C handler");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
