//! Прогноз индекса по данным датчиков

use std::sync::Arc;

use serde_json::Value;

use crate::error::{Result, ServiceError};
use crate::models::{risk, RegressionModel};
use crate::preprocessing::FeatureEngineer;
use crate::state::ModelState;
use crate::store::PersistenceQueue;
use crate::types::{PredictionRecord, PredictionResult};

/// Уверенность для регрессоров без вероятностей.
/// Это константа-заглушка, а не откалиброванная оценка.
pub const DEFAULT_CONFIDENCE: f64 = 0.85;

#[derive(Clone)]
pub struct PredictionService {
    models: Arc<ModelState>,
    persistence: PersistenceQueue,
}

impl PredictionService {
    pub fn new(models: Arc<ModelState>, persistence: PersistenceQueue) -> Self {
        Self {
            models,
            persistence,
        }
    }

    pub fn predict(&self, payload: &Value) -> Result<PredictionResult> {
        // Важна только регрессионная модель, общий флаг готовности не смотрим
        let model = self
            .models
            .regression()
            .ok_or(ServiceError::ModelUnavailable("Regression"))?;

        let input = FeatureEngineer::validate(payload)?;
        let features = FeatureEngineer::feature_matrix(&input);

        let premise_index = *model
            .predict(&features)?
            .first()
            .ok_or_else(|| ServiceError::Internal("model returned no prediction".to_string()))?;

        let confidence = match model {
            RegressionModel::Point(_) => DEFAULT_CONFIDENCE,
            RegressionModel::Probabilistic(classifier) => {
                let proba = classifier.predict_proba(&features)?;
                let row = proba.rows().into_iter().next().ok_or_else(|| {
                    ServiceError::Internal("classifier returned no probabilities".to_string())
                })?;
                if row.is_empty() || row.iter().any(|p| !p.is_finite()) {
                    return Err(ServiceError::Internal(
                        "classifier returned no finite probabilities".to_string(),
                    ));
                }
                let best = row.iter().copied().fold(f64::NEG_INFINITY, f64::max);
                best.clamp(0.0, 1.0)
            }
        };

        let risk_level = risk::classify(premise_index);
        let result = PredictionResult {
            premise_index,
            risk_level,
            confidence,
            timestamp: crate::services::now_timestamp(),
        };

        // Сохранение не влияет на ответ
        self.persistence.submit(PredictionRecord::new(&result, input));

        tracing::info!(
            premise_index = %format!("{:.2}", premise_index),
            risk_level = risk_level.as_str(),
            confidence,
            "Prediction made"
        );
        Ok(result)
    }
}
