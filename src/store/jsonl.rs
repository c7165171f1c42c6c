//! Append-only хранилище в файле JSON Lines

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use super::{newest_first, PredictionStore, StoreError};
use crate::types::{PredictionRecord, StoredPrediction};

/// Один документ на строку, файл только дописывается
pub struct JsonlStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonlStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_all(&self) -> Result<Vec<StoredPrediction>, StoreError> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut docs = Vec::new();
        for (line_no, line) in content.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<StoredPrediction>(line) {
                Ok(doc) => docs.push(doc),
                Err(e) => {
                    // Оборванная запись не должна ломать чтение остальных
                    tracing::warn!(
                        path = %self.path.display(),
                        line = line_no + 1,
                        error = %e,
                        "Skipping unreadable prediction document"
                    );
                }
            }
        }
        Ok(docs)
    }
}

#[async_trait]
impl PredictionStore for JsonlStore {
    async fn save(&self, record: PredictionRecord) -> Result<String, StoreError> {
        let doc = StoredPrediction {
            id: uuid::Uuid::new_v4().to_string(),
            created_at: Utc::now(),
            record,
        };
        let mut line = serde_json::to_string(&doc)?;
        line.push('\n');

        let _guard = self.write_lock.lock().await;
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(line.as_bytes()).await?;
        file.flush().await?;

        tracing::debug!(id = %doc.id, "Prediction saved");
        Ok(doc.id)
    }

    async fn list_all(&self) -> Result<Vec<StoredPrediction>, StoreError> {
        let mut docs = self.read_all().await?;
        newest_first(&mut docs);
        Ok(docs)
    }

    async fn list_since(&self, since: DateTime<Utc>) -> Result<Vec<StoredPrediction>, StoreError> {
        let mut docs: Vec<StoredPrediction> = self
            .read_all()
            .await?
            .into_iter()
            .filter(|d| d.created_at >= since)
            .collect();
        newest_first(&mut docs);
        Ok(docs)
    }
}
