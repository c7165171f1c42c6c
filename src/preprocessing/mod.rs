/// Модуль предобработки данных

pub mod features;
pub mod window;

pub use features::{FeatureEngineer, FEATURE_ORDER};
pub use window::{RandomWindow, WindowSource};
