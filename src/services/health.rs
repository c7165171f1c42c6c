//! Состояние сервиса для мониторинга

use crate::state::ModelState;
use crate::types::HealthStatus;

/// healthy только если загружены обе модели
pub fn report(models: &ModelState) -> HealthStatus {
    let loaded = models.regression().is_some() && models.sequence().is_some();
    HealthStatus {
        status: if loaded { "healthy" } else { "unhealthy" }.to_string(),
        models_loaded: loaded,
        timestamp: super::now_timestamp(),
    }
}
