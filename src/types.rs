/// Типы данных API и хранилища

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Уровень риска по индексу
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
        }
    }
}

/// Проверенные входные данные с датчиков
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictionInput {
    pub rainfall: f64,
    pub temperature: f64,
    #[serde(rename = "waterContent")]
    pub water_content: f64,
    #[serde(rename = "Rainfall_7d_avg")]
    pub rainfall_7d_avg: f64,
    #[serde(rename = "WaterContent_7d_avg")]
    pub water_content_7d_avg: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    #[serde(rename = "premiseIndex")]
    pub premise_index: f64,
    #[serde(rename = "riskLevel")]
    pub risk_level: RiskLevel,
    pub confidence: f64,
    pub timestamp: String,
}

/// Документ, который уходит в хранилище: результат + исходные поля
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionRecord {
    pub timestamp: String,
    #[serde(rename = "premiseIndex")]
    pub premise_index: f64,
    #[serde(flatten)]
    pub input: PredictionInput,
    #[serde(rename = "riskLevel")]
    pub risk_level: RiskLevel,
    pub confidence: f64,
}

impl PredictionRecord {
    pub fn new(result: &PredictionResult, input: PredictionInput) -> Self {
        Self {
            timestamp: result.timestamp.clone(),
            premise_index: result.premise_index,
            input,
            risk_level: result.risk_level,
            confidence: result.confidence,
        }
    }
}

/// Сохраненный документ с идентификатором и временем создания
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredPrediction {
    pub id: String,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    pub record: PredictionRecord,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ForecastQuery {
    pub days: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceIntervals {
    pub lower: Vec<f64>,
    pub upper: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastResult {
    pub dates: Vec<String>,
    pub predictions: Vec<f64>,
    pub confidence_intervals: ConfidenceIntervals,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String, // "healthy" | "unhealthy"
    pub models_loaded: bool,
    pub timestamp: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_uses_wire_field_names() {
        let result = PredictionResult {
            premise_index: 45.0,
            risk_level: RiskLevel::Medium,
            confidence: 0.85,
            timestamp: "2026-01-01T00:00:00.000000Z".to_string(),
        };
        let input = PredictionInput {
            rainfall: 5.0,
            temperature: 20.0,
            water_content: 0.3,
            rainfall_7d_avg: 4.0,
            water_content_7d_avg: 0.28,
        };

        let value = serde_json::to_value(PredictionRecord::new(&result, input)).unwrap();
        assert_eq!(value["premiseIndex"], 45.0);
        assert_eq!(value["riskLevel"], "medium");
        assert_eq!(value["waterContent"], 0.3);
        assert_eq!(value["Rainfall_7d_avg"], 4.0);
        assert_eq!(value["WaterContent_7d_avg"], 0.28);
        assert_eq!(value["timestamp"], "2026-01-01T00:00:00.000000Z");
    }
}
