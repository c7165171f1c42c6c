//! Хранилище в памяти

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use super::{newest_first, PredictionStore, StoreError};
use crate::types::{PredictionRecord, StoredPrediction};

#[derive(Default)]
pub struct MemoryStore {
    docs: RwLock<Vec<StoredPrediction>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.docs.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.docs.read().await.is_empty()
    }

    /// Вставка готового документа (импорт, тесты)
    pub async fn insert(&self, doc: StoredPrediction) {
        self.docs.write().await.push(doc);
    }
}

#[async_trait]
impl PredictionStore for MemoryStore {
    async fn save(&self, record: PredictionRecord) -> Result<String, StoreError> {
        let id = uuid::Uuid::new_v4().to_string();
        self.docs.write().await.push(StoredPrediction {
            id: id.clone(),
            created_at: Utc::now(),
            record,
        });
        Ok(id)
    }

    async fn list_all(&self) -> Result<Vec<StoredPrediction>, StoreError> {
        let mut docs = self.docs.read().await.clone();
        newest_first(&mut docs);
        Ok(docs)
    }

    async fn list_since(&self, since: DateTime<Utc>) -> Result<Vec<StoredPrediction>, StoreError> {
        let mut docs: Vec<StoredPrediction> = self
            .docs
            .read()
            .await
            .iter()
            .filter(|d| d.created_at >= since)
            .cloned()
            .collect();
        newest_first(&mut docs);
        Ok(docs)
    }
}
