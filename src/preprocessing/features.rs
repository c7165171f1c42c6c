//! Проверка входных данных и вектор признаков

use ndarray::{array, Array2};
use serde_json::Value;

use crate::error::ServiceError;
use crate::types::PredictionInput;

/// Порядок признаков, на котором обучалась модель
pub const FEATURE_ORDER: [&str; 5] = [
    "rainfall",
    "temperature",
    "waterContent",
    "Rainfall_7d_avg",
    "WaterContent_7d_avg",
];

pub struct FeatureEngineer;

impl FeatureEngineer {
    /// Сначала проверяем наличие всех полей, потом приводим к числам
    pub fn validate(payload: &Value) -> Result<PredictionInput, ServiceError> {
        let object = payload.as_object().ok_or_else(|| {
            ServiceError::Validation("Request body must be a JSON object".to_string())
        })?;

        if let Some(missing) = FEATURE_ORDER.iter().find(|f| !object.contains_key(**f)) {
            return Err(ServiceError::Validation(format!(
                "Missing required field: {}",
                missing
            )));
        }

        let mut values = [0.0; 5];
        for (slot, field) in values.iter_mut().zip(FEATURE_ORDER) {
            *slot = Self::coerce(field, &object[field])?;
        }

        Ok(PredictionInput {
            rainfall: values[0],
            temperature: values[1],
            water_content: values[2],
            rainfall_7d_avg: values[3],
            water_content_7d_avg: values[4],
        })
    }

    /// Число или строка с числом
    fn coerce(field: &str, value: &Value) -> Result<f64, ServiceError> {
        let parsed = match value {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        };

        parsed.ok_or_else(|| {
            ServiceError::Validation(format!("Field {} must be numeric", field))
        })
    }

    /// Матрица 1 x 5 в порядке `FEATURE_ORDER`
    pub fn feature_matrix(input: &PredictionInput) -> Array2<f64> {
        array![[
            input.rainfall,
            input.temperature,
            input.water_content,
            input.rainfall_7d_avg,
            input.water_content_7d_avg,
        ]]
    }
}
