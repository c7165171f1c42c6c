//! Фоновая запись прогнозов в хранилище
//!
//! Доставка "не более одного раза": запрос не ждет записи, ошибки только в лог.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use super::PredictionStore;
use crate::types::PredictionRecord;

pub const DEFAULT_QUEUE_CAPACITY: usize = 1024;

#[derive(Clone)]
pub struct PersistenceQueue {
    tx: mpsc::Sender<PredictionRecord>,
}

impl PersistenceQueue {
    /// Запускает писателя; он завершается, когда закрыты все копии очереди
    pub fn spawn(store: Arc<dyn PredictionStore>, capacity: usize) -> (Self, JoinHandle<()>) {
        let (tx, mut rx) = mpsc::channel::<PredictionRecord>(capacity.max(1));

        let handle = tokio::spawn(async move {
            while let Some(record) = rx.recv().await {
                let timestamp = record.timestamp.clone();
                match store.save(record).await {
                    Ok(id) => tracing::info!(id = %id, timestamp = %timestamp, "Prediction persisted"),
                    Err(e) => tracing::error!(
                        timestamp = %timestamp,
                        error = %e,
                        "Failed to persist prediction"
                    ),
                }
            }
            tracing::debug!("Persistence writer stopped");
        });

        (Self { tx }, handle)
    }

    /// Не блокирует: при переполнении или закрытой очереди запись теряется
    pub fn submit(&self, record: PredictionRecord) -> bool {
        match self.tx.try_send(record) {
            Ok(()) => true,
            Err(mpsc::error::TrySendError::Full(record)) => {
                tracing::warn!(timestamp = %record.timestamp, "Persistence queue full, dropping prediction");
                false
            }
            Err(mpsc::error::TrySendError::Closed(record)) => {
                tracing::warn!(timestamp = %record.timestamp, "Persistence queue closed, dropping prediction");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryStore, StoreError};
    use crate::types::{PredictionInput, RiskLevel, StoredPrediction};
    use async_trait::async_trait;
    use chrono::{DateTime, Utc};

    struct FailingStore;

    fn offline() -> StoreError {
        StoreError::Io(std::io::Error::new(
            std::io::ErrorKind::ConnectionRefused,
            "offline",
        ))
    }

    #[async_trait]
    impl PredictionStore for FailingStore {
        async fn save(&self, _record: PredictionRecord) -> Result<String, StoreError> {
            Err(offline())
        }
        async fn list_all(&self) -> Result<Vec<StoredPrediction>, StoreError> {
            Err(offline())
        }
        async fn list_since(&self, _since: DateTime<Utc>) -> Result<Vec<StoredPrediction>, StoreError> {
            Err(offline())
        }
    }

    fn record(ts: &str) -> PredictionRecord {
        PredictionRecord {
            timestamp: ts.to_string(),
            premise_index: 45.0,
            input: PredictionInput {
                rainfall: 5.0,
                temperature: 20.0,
                water_content: 0.3,
                rainfall_7d_avg: 4.0,
                water_content_7d_avg: 0.28,
            },
            risk_level: RiskLevel::Medium,
            confidence: 0.85,
        }
    }

    #[tokio::test]
    async fn records_reach_the_store() {
        let store = Arc::new(MemoryStore::new());
        let (queue, writer) = PersistenceQueue::spawn(store.clone(), 8);

        assert!(queue.submit(record("a")));
        assert!(queue.submit(record("b")));
        drop(queue);
        writer.await.unwrap();

        assert_eq!(store.len().await, 2);
    }

    #[tokio::test]
    async fn store_failures_do_not_stop_the_writer() {
        let (queue, writer) = PersistenceQueue::spawn(Arc::new(FailingStore), 8);

        assert!(queue.submit(record("a")));
        assert!(queue.submit(record("b")));
        drop(queue);
        writer.await.unwrap();
    }

    #[tokio::test]
    async fn submit_after_writer_exit_is_dropped() {
        let (queue, writer) = PersistenceQueue::spawn(Arc::new(MemoryStore::new()), 1);
        writer.abort();
        let _ = writer.await;

        assert!(!queue.submit(record("late")));
    }
}
