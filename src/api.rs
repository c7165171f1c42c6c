/// HTTP API: маршруты и обработчики

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::Method,
    response::Json,
    routing::{get, post},
    Router,
};
use serde_json::Value;
use tower_http::cors::{Any, CorsLayer};

use crate::error::{Result, ServiceError};
use crate::preprocessing::{RandomWindow, WindowSource};
use crate::services::{health, ForecastService, PredictionService};
use crate::state::ModelState;
use crate::store::{PersistenceQueue, PredictionStore, RECENT_WINDOW_DAYS};
use crate::types::{ForecastQuery, ForecastResult, HealthStatus, PredictionResult, StoredPrediction};

/// Неизменяемый после старта контекст обработчиков
#[derive(Clone)]
pub struct AppState {
    pub models: Arc<ModelState>,
    pub prediction: PredictionService,
    pub forecast: ForecastService,
    pub store: Arc<dyn PredictionStore>,
}

impl AppState {
    pub fn new(
        models: ModelState,
        store: Arc<dyn PredictionStore>,
        persistence: PersistenceQueue,
    ) -> Self {
        Self::with_options(models, store, persistence, Arc::new(RandomWindow), None)
    }

    pub fn with_options(
        models: ModelState,
        store: Arc<dyn PredictionStore>,
        persistence: PersistenceQueue,
        window_source: Arc<dyn WindowSource>,
        max_forecast_days: Option<i64>,
    ) -> Self {
        let models = Arc::new(models);
        Self {
            prediction: PredictionService::new(models.clone(), persistence),
            forecast: ForecastService::new(models.clone(), window_source, max_forecast_days),
            models,
            store,
        }
    }
}

pub fn create_router(state: AppState) -> Router {
    // CORS для фронтенда
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any);

    Router::new()
        .route("/", get(root))
        .route("/api/health", get(health_check))
        .route("/api/predict", post(predict))
        .route("/api/forecast", get(forecast))
        .route("/api/predictions", get(list_predictions))
        .route("/api/predictions/recent", get(list_recent_predictions))
        .layer(cors)
        .with_state(state)
}

async fn root() -> Json<Value> {
    Json(serde_json::json!({
        "message": "Dengue ML API (Rust)",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

async fn health_check(State(state): State<AppState>) -> Json<HealthStatus> {
    Json(health::report(&state.models))
}

async fn predict(
    State(state): State<AppState>,
    payload: std::result::Result<Json<Value>, JsonRejection>,
) -> Result<Json<PredictionResult>> {
    let Json(payload) = payload.map_err(|e| ServiceError::Validation(e.body_text()))?;
    tracing::debug!("Predict request");

    state.prediction.predict(&payload).map(Json)
}

async fn forecast(
    State(state): State<AppState>,
    Query(query): Query<ForecastQuery>,
) -> Result<Json<ForecastResult>> {
    tracing::debug!(days = ?query.days, "Forecast request");

    let today = chrono::Local::now().date_naive();
    state.forecast.forecast(query.days.as_deref(), today).map(Json)
}

async fn list_predictions(State(state): State<AppState>) -> Result<Json<Vec<StoredPrediction>>> {
    Ok(Json(state.store.list_all().await?))
}

async fn list_recent_predictions(
    State(state): State<AppState>,
) -> Result<Json<Vec<StoredPrediction>>> {
    Ok(Json(state.store.list_recent(RECENT_WINDOW_DAYS).await?))
}
