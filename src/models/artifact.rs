//! Бинарный формат артефактов моделей
//!
//! Файл: bincode-конверт с magic `DGML`, версией формата, метаданными и моделью.
//! Модели обучаются отдельно, сервис только читает файлы.

use std::fs;
use std::path::Path;

use bincode::Options;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;

use super::forest::{RandomForestClassifier, RandomForestRegressor};
use super::predictor::{ModelError, RegressionModel, SequencePredictor};
use super::sequence::DenseSequenceModel;

pub const ARTIFACT_MAGIC: [u8; 4] = *b"DGML";
pub const ARTIFACT_FORMAT_VERSION: u32 = 1;
const MAX_ARTIFACT_BYTES: u64 = 512 * 1024 * 1024;

#[derive(Error, Debug)]
pub enum ArtifactError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("decode error: {0}")]
    Codec(#[from] bincode::Error),

    #[error("not a model artifact (bad magic)")]
    BadMagic,

    #[error("unsupported artifact format version {0}")]
    UnsupportedVersion(u32),

    #[error("invalid model: {0}")]
    Model(#[from] ModelError),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArtifactMetadata {
    pub name: String,
    pub model_type: String,
    pub trained_at: String,
    pub feature_names: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Envelope<T> {
    magic: [u8; 4],
    format_version: u32,
    metadata: ArtifactMetadata,
    payload: T,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RegressionArtifact {
    ForestRegressor(RandomForestRegressor),
    ForestClassifier(RandomForestClassifier),
}

impl RegressionArtifact {
    /// Классификатор дает вероятности, регрессор только точку
    pub fn into_model(self) -> Result<RegressionModel, ModelError> {
        match self {
            RegressionArtifact::ForestRegressor(forest) => {
                forest.validate()?;
                Ok(RegressionModel::point(forest))
            }
            RegressionArtifact::ForestClassifier(forest) => {
                forest.validate()?;
                Ok(RegressionModel::probabilistic(forest))
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SequenceArtifact {
    Dense(DenseSequenceModel),
}

impl SequenceArtifact {
    pub fn into_model(self) -> Result<std::sync::Arc<dyn SequencePredictor>, ModelError> {
        match self {
            SequenceArtifact::Dense(model) => {
                model.validate()?;
                Ok(std::sync::Arc::new(model))
            }
        }
    }
}

fn codec() -> impl Options {
    bincode::DefaultOptions::new()
        .with_fixint_encoding()
        .with_limit(MAX_ARTIFACT_BYTES)
}

fn save<T: Serialize>(path: &Path, metadata: ArtifactMetadata, payload: &T) -> Result<(), ArtifactError> {
    let envelope = Envelope {
        magic: ARTIFACT_MAGIC,
        format_version: ARTIFACT_FORMAT_VERSION,
        metadata,
        payload,
    };
    let bytes = codec().serialize(&envelope)?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(path, bytes)?;
    Ok(())
}

fn load<T: DeserializeOwned>(path: &Path) -> Result<(ArtifactMetadata, T), ArtifactError> {
    let bytes = fs::read(path)?;

    // Заголовок проверяем до разбора, чтобы не тратить время на чужие файлы
    if bytes.len() < ARTIFACT_MAGIC.len() || bytes[..ARTIFACT_MAGIC.len()] != ARTIFACT_MAGIC {
        return Err(ArtifactError::BadMagic);
    }

    let envelope: Envelope<T> = codec().deserialize(&bytes)?;
    if envelope.format_version != ARTIFACT_FORMAT_VERSION {
        return Err(ArtifactError::UnsupportedVersion(envelope.format_version));
    }

    Ok((envelope.metadata, envelope.payload))
}

pub fn save_regression(
    path: &Path,
    metadata: ArtifactMetadata,
    artifact: &RegressionArtifact,
) -> Result<(), ArtifactError> {
    save(path, metadata, artifact)
}

pub fn load_regression(path: &Path) -> Result<(ArtifactMetadata, RegressionModel), ArtifactError> {
    let (metadata, artifact): (_, RegressionArtifact) = load(path)?;
    Ok((metadata, artifact.into_model()?))
}

pub fn save_sequence(
    path: &Path,
    metadata: ArtifactMetadata,
    artifact: &SequenceArtifact,
) -> Result<(), ArtifactError> {
    save(path, metadata, artifact)
}

pub fn load_sequence(
    path: &Path,
) -> Result<(ArtifactMetadata, std::sync::Arc<dyn SequencePredictor>), ArtifactError> {
    let (metadata, artifact): (_, SequenceArtifact) = load(path)?;
    Ok((metadata, artifact.into_model()?))
}
