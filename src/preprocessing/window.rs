//! Входное окно для модели временного ряда

use ndarray::Array3;
use rand::Rng;

/// Источник истории для прогноза.
///
/// Реального конвейера исторических признаков пока нет: сервис подключает
/// `RandomWindow`, а настоящая история должна прийти через эту же точку.
pub trait WindowSource: Send + Sync {
    /// Окно формы (1, window_len, n_features)
    fn window(&self, window_len: usize, n_features: usize) -> Array3<f64>;
}

/// Заглушка: равномерный шум в [0, 1)
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomWindow;

impl WindowSource for RandomWindow {
    fn window(&self, window_len: usize, n_features: usize) -> Array3<f64> {
        let mut rng = rand::thread_rng();
        Array3::from_shape_fn((1, window_len, n_features), |_| rng.gen::<f64>())
    }
}
