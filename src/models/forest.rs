//! Случайный лес: регрессия и классификация
//!
//! Деревья обучаются вне сервиса, здесь только инференс по готовой структуре.

#![allow(non_snake_case)]

use ndarray::{Array1, Array2, ArrayView1};
use serde::{Deserialize, Serialize};

use super::predictor::{ModelError, PointPredictor, ProbabilisticPredictor};

/// Узел дерева, лист хранит `L` (число для регрессии, распределение для классов)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TreeNode<L> {
    Leaf {
        value: L,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: Box<TreeNode<L>>,
        right: Box<TreeNode<L>>,
    },
}

impl<L> TreeNode<L> {
    /// Спуск до листа: `x <= threshold` идет влево
    fn leaf_for(&self, sample: ArrayView1<f64>) -> &L {
        let mut node = self;
        loop {
            match node {
                TreeNode::Leaf { value } => return value,
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    node = if sample[*feature] <= *threshold {
                        left
                    } else {
                        right
                    };
                }
            }
        }
    }

    fn max_feature(&self) -> Option<usize> {
        match self {
            TreeNode::Leaf { .. } => None,
            TreeNode::Split {
                feature,
                left,
                right,
                ..
            } => [Some(*feature), left.max_feature(), right.max_feature()]
                .into_iter()
                .flatten()
                .max(),
        }
    }

    fn leaves(&self) -> Vec<&L> {
        match self {
            TreeNode::Leaf { value } => vec![value],
            TreeNode::Split { left, right, .. } => {
                let mut out = left.leaves();
                out.extend(right.leaves());
                out
            }
        }
    }
}

fn check_features(X: &Array2<f64>, n_features: usize) -> Result<(), ModelError> {
    if X.ncols() != n_features {
        return Err(ModelError::FeatureMismatch {
            expected: n_features,
            actual: X.ncols(),
        });
    }
    Ok(())
}

fn check_trees<L>(trees: &[TreeNode<L>], n_features: usize) -> Result<(), ModelError> {
    if trees.is_empty() {
        return Err(ModelError::Invalid("forest has no trees".to_string()));
    }
    for tree in trees {
        if let Some(feature) = tree.max_feature() {
            if feature >= n_features {
                return Err(ModelError::Invalid(format!(
                    "split on feature {} but model has {} features",
                    feature, n_features
                )));
            }
        }
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomForestRegressor {
    pub n_features: usize,
    pub trees: Vec<TreeNode<f64>>,
}

impl RandomForestRegressor {
    pub fn new(n_features: usize, trees: Vec<TreeNode<f64>>) -> Self {
        Self { n_features, trees }
    }

    pub fn validate(&self) -> Result<(), ModelError> {
        check_trees(&self.trees, self.n_features)
    }
}

impl PointPredictor for RandomForestRegressor {
    fn predict(&self, X: &Array2<f64>) -> Result<Array1<f64>, ModelError> {
        check_features(X, self.n_features)?;
        if self.trees.is_empty() {
            return Err(ModelError::Inference("forest has no trees".to_string()));
        }

        // Среднее по деревьям
        let predictions = X
            .rows()
            .into_iter()
            .map(|row| {
                self.trees.iter().map(|tree| *tree.leaf_for(row)).sum::<f64>()
                    / self.trees.len() as f64
            })
            .collect();

        Ok(predictions)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomForestClassifier {
    pub n_features: usize,
    /// Метка каждого класса, `predict` возвращает ее как число
    pub classes: Vec<f64>,
    pub trees: Vec<TreeNode<Vec<f64>>>,
}

impl RandomForestClassifier {
    pub fn new(n_features: usize, classes: Vec<f64>, trees: Vec<TreeNode<Vec<f64>>>) -> Self {
        Self {
            n_features,
            classes,
            trees,
        }
    }

    pub fn validate(&self) -> Result<(), ModelError> {
        check_trees(&self.trees, self.n_features)?;
        if self.classes.is_empty() {
            return Err(ModelError::Invalid("classifier has no classes".to_string()));
        }
        for tree in &self.trees {
            if tree.leaves().iter().any(|dist| dist.len() != self.classes.len()) {
                return Err(ModelError::Invalid(format!(
                    "leaf distribution does not match {} classes",
                    self.classes.len()
                )));
            }
            if tree
                .leaves()
                .iter()
                .any(|dist| dist.iter().any(|c| !c.is_finite() || *c < 0.0))
            {
                return Err(ModelError::Invalid(
                    "leaf counts must be finite and non-negative".to_string(),
                ));
            }
        }
        Ok(())
    }
}

impl ProbabilisticPredictor for RandomForestClassifier {
    fn predict_proba(&self, X: &Array2<f64>) -> Result<Array2<f64>, ModelError> {
        check_features(X, self.n_features)?;
        if self.trees.is_empty() {
            return Err(ModelError::Inference("forest has no trees".to_string()));
        }

        let n_classes = self.classes.len();
        let mut proba = Array2::zeros((X.nrows(), n_classes));

        for (i, row) in X.rows().into_iter().enumerate() {
            for tree in &self.trees {
                let dist = tree.leaf_for(row);
                if dist.len() != n_classes {
                    return Err(ModelError::Inference(
                        "leaf distribution size mismatch".to_string(),
                    ));
                }
                if dist.iter().any(|c| !c.is_finite() || *c < 0.0) {
                    return Err(ModelError::Inference("invalid leaf count".to_string()));
                }
                // Лист хранит счетчики, нормируем до вероятностей
                let total: f64 = dist.iter().sum();
                for (k, count) in dist.iter().enumerate() {
                    if total > 0.0 {
                        proba[[i, k]] += count / total;
                    }
                }
            }
        }

        proba.mapv_inplace(|p| p / self.trees.len() as f64);
        Ok(proba)
    }
}

impl PointPredictor for RandomForestClassifier {
    fn predict(&self, X: &Array2<f64>) -> Result<Array1<f64>, ModelError> {
        let proba = self.predict_proba(X)?;

        let labels = proba
            .rows()
            .into_iter()
            .map(|row| {
                let mut best = 0;
                for (k, p) in row.iter().enumerate() {
                    if *p > row[best] {
                        best = k;
                    }
                }
                self.classes[best]
            })
            .collect();

        Ok(labels)
    }
}
