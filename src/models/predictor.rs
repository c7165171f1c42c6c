//! Интерфейсы предсказателей

use std::sync::Arc;

use ndarray::{Array1, Array2, Array3, ArrayD};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ModelError {
    #[error("expected {expected} features, got {actual}")]
    FeatureMismatch { expected: usize, actual: usize },

    #[error("expected input window {expected:?}, got {actual:?}")]
    ShapeMismatch {
        expected: (usize, usize),
        actual: (usize, usize),
    },

    #[error("invalid model: {0}")]
    Invalid(String),

    #[error("inference failed: {0}")]
    Inference(String),
}

/// Табличная модель, умеющая только точечный прогноз
pub trait PointPredictor: Send + Sync {
    /// Одна строка `features` -> одно значение
    fn predict(&self, features: &Array2<f64>) -> Result<Array1<f64>, ModelError>;
}

/// Классификатор с вероятностями классов
pub trait ProbabilisticPredictor: PointPredictor {
    fn predict_proba(&self, features: &Array2<f64>) -> Result<Array2<f64>, ModelError>;
}

/// Модель временного ряда
pub trait SequencePredictor: Send + Sync {
    /// (длина окна, число признаков)
    fn input_shape(&self) -> (usize, usize);

    /// `window` имеет форму (batch, window, features); форма выхода зависит от модели
    fn predict(&self, window: &Array3<f64>) -> Result<ArrayD<f64>, ModelError>;
}

/// Регрессионная модель с явной возможностью
#[derive(Clone)]
pub enum RegressionModel {
    Point(Arc<dyn PointPredictor>),
    Probabilistic(Arc<dyn ProbabilisticPredictor>),
}

impl RegressionModel {
    pub fn point<P: PointPredictor + 'static>(predictor: P) -> Self {
        RegressionModel::Point(Arc::new(predictor))
    }

    pub fn probabilistic<P: ProbabilisticPredictor + 'static>(predictor: P) -> Self {
        RegressionModel::Probabilistic(Arc::new(predictor))
    }

    pub fn predict(&self, features: &Array2<f64>) -> Result<Array1<f64>, ModelError> {
        match self {
            RegressionModel::Point(model) => model.predict(features),
            RegressionModel::Probabilistic(model) => model.predict(features),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            RegressionModel::Point(_) => "point",
            RegressionModel::Probabilistic(_) => "probabilistic",
        }
    }
}

impl std::fmt::Debug for RegressionModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "RegressionModel::{}", self.kind())
    }
}
