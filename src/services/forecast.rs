//! Прогноз временного ряда на `days` дней

use std::sync::Arc;

use chrono::{Days, NaiveDate};
use ndarray::ArrayD;

use crate::error::{Result, ServiceError};
use crate::preprocessing::WindowSource;
use crate::state::ModelState;
use crate::types::{ConfidenceIntervals, ForecastResult};

pub const DEFAULT_FORECAST_DAYS: i64 = 90;
/// Значение, если модель не вернула ничего
pub const FALLBACK_PREDICTION: f64 = 50.0;
pub const BAND_HALF_WIDTH: f64 = 10.0;
pub const BAND_MIN: f64 = 0.0;
pub const BAND_MAX: f64 = 100.0;

#[derive(Clone)]
pub struct ForecastService {
    models: Arc<ModelState>,
    window_source: Arc<dyn WindowSource>,
    max_days: Option<i64>,
}

impl ForecastService {
    pub fn new(
        models: Arc<ModelState>,
        window_source: Arc<dyn WindowSource>,
        max_days: Option<i64>,
    ) -> Self {
        Self {
            models,
            window_source,
            max_days,
        }
    }

    /// `days` без значения -> 90, строка не-число -> ошибка валидации
    pub fn parse_days(raw: Option<&str>) -> Result<i64> {
        match raw {
            None => Ok(DEFAULT_FORECAST_DAYS),
            Some(value) => value.trim().parse::<i64>().map_err(|_| {
                ServiceError::Validation(format!("Invalid value for days: {}", value))
            }),
        }
    }

    /// Модель проверяется раньше разбора `days`
    pub fn forecast(&self, raw_days: Option<&str>, start: NaiveDate) -> Result<ForecastResult> {
        let model = self
            .models
            .sequence()
            .ok_or(ServiceError::ModelUnavailable("Sequence"))?;

        let days = Self::parse_days(raw_days)?;
        if let Some(max_days) = self.max_days {
            if days > max_days {
                return Err(ServiceError::Validation(format!(
                    "days must not exceed {}",
                    max_days
                )));
            }
        }

        // Неположительное значение дает пустой прогноз
        let days = days.max(0) as u64;
        if start.checked_add_days(Days::new(days)).is_none() {
            return Err(ServiceError::Internal(format!(
                "forecast horizon of {} days is out of calendar range",
                days
            )));
        }
        let days = usize::try_from(days).map_err(|_| {
            ServiceError::Internal(format!("forecast horizon of {} days is too large", days))
        })?;

        let dates = forecast_dates(start, days)?;

        let (window_len, n_features) = model.input_shape();
        let window = self.window_source.window(window_len, n_features);
        let raw = model.predict(&window)?;

        let predictions = shape_predictions(&raw, days);
        let confidence_intervals = confidence_band(&predictions);

        tracing::info!(days, "Forecast generated");
        Ok(ForecastResult {
            dates,
            predictions,
            confidence_intervals,
        })
    }
}

/// Последовательные даты начиная со `start`, формат YYYY-MM-DD
pub fn forecast_dates(start: NaiveDate, days: usize) -> Result<Vec<String>> {
    let mut dates = Vec::new();
    dates.try_reserve_exact(days).map_err(|e| {
        ServiceError::Internal(format!("cannot allocate {} forecast dates: {}", days, e))
    })?;
    let mut day = start;
    for i in 0..days {
        if i > 0 {
            day = day.succ_opt().ok_or_else(|| {
                ServiceError::Internal(format!("date after {} is out of range", day))
            })?;
        }
        dates.push(day.format("%Y-%m-%d").to_string());
    }
    Ok(dates)
}

/// Выход модели в плоский ряд длины `days`: лишнее отбрасывается,
/// недостающее добивается последним значением (или 50.0)
pub fn shape_predictions(raw: &ArrayD<f64>, days: usize) -> Vec<f64> {
    let mut predictions: Vec<f64> = raw.iter().copied().take(days).collect();
    let last = predictions.last().copied().unwrap_or(FALLBACK_PREDICTION);
    predictions.resize(days, last);
    predictions
}

pub fn confidence_band(predictions: &[f64]) -> ConfidenceIntervals {
    ConfidenceIntervals {
        lower: predictions
            .iter()
            .map(|p| (p - BAND_HALF_WIDTH).max(BAND_MIN))
            .collect(),
        upper: predictions
            .iter()
            .map(|p| (p + BAND_HALF_WIDTH).min(BAND_MAX))
            .collect(),
    }
}
