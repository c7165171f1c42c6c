/// Сервисы API

pub mod forecast;
pub mod health;
pub mod prediction;

pub use forecast::ForecastService;
pub use prediction::PredictionService;

/// ISO-8601 метка времени, она же id документа прогноза
pub fn now_timestamp() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Micros, true)
}
