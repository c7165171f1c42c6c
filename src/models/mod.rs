/// ML модели

pub mod artifact;
pub mod forest;
pub mod predictor;
pub mod risk;
pub mod sequence;

pub use artifact::{ArtifactError, ArtifactMetadata, RegressionArtifact, SequenceArtifact};
pub use forest::{RandomForestClassifier, RandomForestRegressor, TreeNode};
pub use predictor::{
    ModelError, PointPredictor, ProbabilisticPredictor, RegressionModel, SequencePredictor,
};
pub use sequence::DenseSequenceModel;
