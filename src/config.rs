//! Конфигурация сервиса из переменных окружения

use std::path::{Path, PathBuf};

use crate::store::queue::DEFAULT_QUEUE_CAPACITY;

const REGRESSION_MODEL_FILE: &str = "res/random_forest_regression_model.bin";
const SEQUENCE_MODEL_FILE: &str = "models/timeseries_model.bin";
const STORE_FILE: &str = "data/predictions.jsonl";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreBackend {
    Memory,
    Jsonl(PathBuf),
}

#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub host: String,
    pub port: u16,
    pub regression_model_path: PathBuf,
    pub sequence_model_path: PathBuf,
    pub store: StoreBackend,
    pub queue_capacity: usize,
    /// None: без ограничения
    pub max_forecast_days: Option<i64>,
}

impl ServiceConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Пути по умолчанию считаются от каталога установки
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let base_dir = lookup("MODEL_BASE_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(install_dir);

        let store = match lookup("PREDICTION_STORE") {
            Some(value) if value.eq_ignore_ascii_case("memory") => StoreBackend::Memory,
            Some(value) if !value.trim().is_empty() => StoreBackend::Jsonl(PathBuf::from(value)),
            _ => StoreBackend::Jsonl(base_dir.join(STORE_FILE)),
        };

        Self {
            host: lookup("API_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: lookup("API_PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(5000),
            regression_model_path: lookup("REGRESSION_MODEL_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| base_dir.join(REGRESSION_MODEL_FILE)),
            sequence_model_path: lookup("SEQUENCE_MODEL_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| base_dir.join(SEQUENCE_MODEL_FILE)),
            store,
            queue_capacity: lookup("PERSISTENCE_QUEUE_CAPACITY")
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_QUEUE_CAPACITY),
            max_forecast_days: lookup("FORECAST_MAX_DAYS").and_then(|s| s.parse().ok()),
        }
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

/// Каталог исполняемого файла, иначе текущий
fn install_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."))
}
