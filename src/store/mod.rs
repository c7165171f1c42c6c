//! Хранилище прогнозов (append-only документы)

pub mod jsonl;
pub mod memory;
pub mod queue;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use thiserror::Error;

use crate::types::{PredictionRecord, StoredPrediction};

pub use jsonl::JsonlStore;
pub use memory::MemoryStore;
pub use queue::PersistenceQueue;

/// Окно для "последних" прогнозов, в днях
pub const RECENT_WINDOW_DAYS: i64 = 30;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[async_trait]
pub trait PredictionStore: Send + Sync {
    /// Сохраняет документ, возвращает сгенерированный id
    async fn save(&self, record: PredictionRecord) -> Result<String, StoreError>;

    /// Все документы, новые первыми
    async fn list_all(&self) -> Result<Vec<StoredPrediction>, StoreError>;

    /// Документы с `createdAt >= since`, новые первыми
    async fn list_since(&self, since: DateTime<Utc>) -> Result<Vec<StoredPrediction>, StoreError>;

    async fn list_recent(&self, days: i64) -> Result<Vec<StoredPrediction>, StoreError> {
        self.list_since(Utc::now() - Duration::days(days)).await
    }
}

/// Новые первыми
pub(crate) fn newest_first(docs: &mut [StoredPrediction]) {
    docs.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}
