//! Загруженные модели и состояние сервиса

use std::path::Path;
use std::sync::Arc;

use crate::config::ServiceConfig;
use crate::models::artifact::{self, ArtifactError, ArtifactMetadata};
use crate::models::{RegressionModel, SequencePredictor};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceState {
    Ready,
    Degraded,
}

/// Заполняется один раз при старте и дальше не меняется
#[derive(Clone, Default)]
pub struct ModelState {
    regression: Option<RegressionModel>,
    sequence: Option<Arc<dyn SequencePredictor>>,
    ready: bool,
}

impl ModelState {
    pub fn new(
        regression: Option<RegressionModel>,
        sequence: Option<Arc<dyn SequencePredictor>>,
    ) -> Self {
        let ready = regression.is_some() && sequence.is_some();
        Self {
            regression,
            sequence,
            ready,
        }
    }

    /// Загрузка обоих артефактов. Отсутствующий файл пропускается,
    /// ошибка чтения оставляет модель пустой; повторных попыток нет.
    pub fn load(config: &ServiceConfig) -> Self {
        let regression = load_artifact(
            "Regression",
            &config.regression_model_path,
            artifact::load_regression,
        );
        let sequence = load_artifact(
            "Sequence",
            &config.sequence_model_path,
            artifact::load_sequence,
        );

        let state = Self::new(regression, sequence);
        match state.service_state() {
            ServiceState::Ready => tracing::info!("All models loaded successfully"),
            ServiceState::Degraded => tracing::error!(
                regression_loaded = state.regression.is_some(),
                sequence_loaded = state.sequence.is_some(),
                "Failed to load one or more models"
            ),
        }
        state
    }

    pub fn regression(&self) -> Option<&RegressionModel> {
        self.regression.as_ref()
    }

    pub fn sequence(&self) -> Option<&Arc<dyn SequencePredictor>> {
        self.sequence.as_ref()
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    pub fn service_state(&self) -> ServiceState {
        if self.ready {
            ServiceState::Ready
        } else {
            ServiceState::Degraded
        }
    }
}

fn load_artifact<T>(
    name: &str,
    path: &Path,
    load: impl FnOnce(&Path) -> Result<(ArtifactMetadata, T), ArtifactError>,
) -> Option<T> {
    if !path.exists() {
        tracing::warn!(path = %path.display(), "{} model not found", name);
        return None;
    }

    match load(path) {
        Ok((metadata, model)) => {
            tracing::info!(
                path = %path.display(),
                model_name = %metadata.name,
                model_type = %metadata.model_type,
                trained_at = %metadata.trained_at,
                "{} model loaded successfully",
                name
            );
            Some(model)
        }
        Err(e) => {
            tracing::error!(path = %path.display(), error = %e, "Error loading {} model", name);
            None
        }
    }
}
