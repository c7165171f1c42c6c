//! Integration test: model artifacts on disk served through the API

use std::path::Path;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use ndarray::{Array1, Array2};
use serde_json::{json, Value};
use tower::ServiceExt;

use dengue_ml::models::artifact::{save_regression, save_sequence};
use dengue_ml::models::{
    ArtifactMetadata, DenseSequenceModel, RandomForestClassifier, RandomForestRegressor,
    RegressionArtifact, SequenceArtifact, TreeNode,
};
use dengue_ml::store::{MemoryStore, PersistenceQueue};
use dengue_ml::{create_router, AppState, ModelState, ServiceConfig, ServiceState, StoreBackend};

fn config(dir: &Path) -> ServiceConfig {
    ServiceConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        regression_model_path: dir.join("res").join("random_forest_regression_model.bin"),
        sequence_model_path: dir.join("models").join("timeseries_model.bin"),
        store: StoreBackend::Memory,
        queue_capacity: 16,
        max_forecast_days: None,
    }
}

fn metadata(name: &str, model_type: &str) -> ArtifactMetadata {
    ArtifactMetadata {
        name: name.to_string(),
        model_type: model_type.to_string(),
        trained_at: "2026-09-30T00:00:00Z".to_string(),
        feature_names: vec![
            "rainfall".to_string(),
            "temperature".to_string(),
            "waterContent".to_string(),
            "Rainfall_7d_avg".to_string(),
            "WaterContent_7d_avg".to_string(),
        ],
    }
}

/// Дождь > 10 мм и влажность > 0.5 -> высокий индекс
fn rainfall_forest() -> RandomForestRegressor {
    let by_rain = TreeNode::Split {
        feature: 0,
        threshold: 10.0,
        left: Box::new(TreeNode::Leaf { value: 20.0 }),
        right: Box::new(TreeNode::Leaf { value: 80.0 }),
    };
    let by_water = TreeNode::Split {
        feature: 2,
        threshold: 0.5,
        left: Box::new(TreeNode::Leaf { value: 40.0 }),
        right: Box::new(TreeNode::Leaf { value: 70.0 }),
    };
    RandomForestRegressor::new(5, vec![by_rain, by_water])
}

/// Горизонт 30, выход не зависит от входа: 60 + 1 * i
fn ramp_sequence() -> DenseSequenceModel {
    DenseSequenceModel {
        window: 30,
        n_features: 3,
        hidden_weights: Array2::zeros((90, 8)),
        hidden_bias: Array1::zeros(8),
        output_weights: Array2::zeros((8, 30)),
        output_bias: Array1::from_iter((0..30).map(|i| 60.0 + i as f64)),
    }
}

fn serve(state: ModelState) -> axum::Router {
    let store = Arc::new(MemoryStore::new());
    let (queue, _writer) = PersistenceQueue::spawn(store.clone(), 16);
    create_router(AppState::new(state, store, queue))
}

async fn send(app: axum::Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

fn predict_request(rainfall: f64, water: f64) -> Request<Body> {
    let body = json!({
        "rainfall": rainfall,
        "temperature": 27.0,
        "waterContent": water,
        "Rainfall_7d_avg": rainfall,
        "WaterContent_7d_avg": water
    });
    Request::builder()
        .method("POST")
        .uri("/api/predict")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_loaded_artifacts_serve_predictions_and_forecasts() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = config(dir.path());
    save_regression(
        &cfg.regression_model_path,
        metadata("random_forest", "forest_regressor"),
        &RegressionArtifact::ForestRegressor(rainfall_forest()),
    )
    .unwrap();
    save_sequence(
        &cfg.sequence_model_path,
        metadata("timeseries", "dense"),
        &SequenceArtifact::Dense(ramp_sequence()),
    )
    .unwrap();

    let state = ModelState::load(&cfg);
    assert_eq!(state.service_state(), ServiceState::Ready);
    let app = serve(state);

    let (status, body) = send(app.clone(), predict_request(2.0, 0.2)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["premiseIndex"], 30.0);
    assert_eq!(body["riskLevel"], "medium");
    assert_eq!(body["confidence"], 0.85);

    let (_, body) = send(app.clone(), predict_request(15.0, 0.8)).await;
    assert_eq!(body["premiseIndex"], 75.0);
    assert_eq!(body["riskLevel"], "high");

    let request = Request::builder()
        .uri("/api/forecast?days=35")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(app, request).await;
    assert_eq!(status, StatusCode::OK);
    let predictions: Vec<f64> = body["predictions"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_f64().unwrap())
        .collect();
    assert_eq!(predictions.len(), 35);
    assert_eq!(predictions[0], 60.0);
    assert_eq!(predictions[29], 89.0);
    assert!(predictions[30..].iter().all(|p| *p == 89.0));
    assert_eq!(body["confidence_intervals"]["upper"][29], 99.0);
    assert_eq!(body["confidence_intervals"]["upper"][0], 70.0);
}

#[tokio::test]
async fn test_classifier_artifact_reports_probability_confidence() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = config(dir.path());
    let classifier = RandomForestClassifier::new(
        5,
        vec![15.0, 45.0, 75.0],
        vec![TreeNode::Split {
            feature: 0,
            threshold: 10.0,
            left: Box::new(TreeNode::Leaf {
                value: vec![6.0, 3.0, 1.0],
            }),
            right: Box::new(TreeNode::Leaf {
                value: vec![0.0, 1.0, 9.0],
            }),
        }],
    );
    save_regression(
        &cfg.regression_model_path,
        metadata("random_forest", "forest_classifier"),
        &RegressionArtifact::ForestClassifier(classifier),
    )
    .unwrap();

    let state = ModelState::load(&cfg);
    assert_eq!(state.service_state(), ServiceState::Degraded);
    let app = serve(state);

    let (status, body) = send(app.clone(), predict_request(20.0, 0.6)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["premiseIndex"], 75.0);
    assert_eq!(body["riskLevel"], "high");
    assert_eq!(body["confidence"], 0.9);

    let (status, body) = send(
        app,
        Request::builder().uri("/api/health").body(Body::empty()).unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "unhealthy");
}

#[tokio::test]
async fn test_corrupt_artifact_degrades_service() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = config(dir.path());
    std::fs::create_dir_all(cfg.sequence_model_path.parent().unwrap()).unwrap();
    std::fs::write(&cfg.sequence_model_path, b"HDF\x89 not ours").unwrap();

    let state = ModelState::load(&cfg);
    assert!(state.sequence().is_none());

    let request = Request::builder()
        .uri("/api/forecast?days=5")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(serve(state), request).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Sequence model not loaded");
}

#[tokio::test]
async fn test_classifier_with_negative_counts_is_not_loaded() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = config(dir.path());
    let classifier = RandomForestClassifier::new(
        5,
        vec![15.0, 75.0],
        vec![TreeNode::Split {
            feature: 0,
            threshold: 10.0,
            left: Box::new(TreeNode::Leaf {
                value: vec![1.0, 1.0],
            }),
            right: Box::new(TreeNode::Leaf {
                value: vec![-1.0, 3.0],
            }),
        }],
    );
    save_regression(
        &cfg.regression_model_path,
        metadata("random_forest", "forest_classifier"),
        &RegressionArtifact::ForestClassifier(classifier),
    )
    .unwrap();

    let state = ModelState::load(&cfg);
    assert!(state.regression().is_none());

    let (status, body) = send(serve(state), predict_request(20.0, 0.6)).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Regression model not loaded");
}
