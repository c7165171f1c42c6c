//! Полносвязная модель временного ряда

use ndarray::{Array1, Array2, Array3, ArrayD, Axis};
use serde::{Deserialize, Serialize};

use super::predictor::{ModelError, SequencePredictor};

/// Окно (window x features) разворачивается в вектор,
/// дальше скрытый слой с ReLU и линейный выход длины горизонта.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DenseSequenceModel {
    pub window: usize,
    pub n_features: usize,
    pub hidden_weights: Array2<f64>,
    pub hidden_bias: Array1<f64>,
    pub output_weights: Array2<f64>,
    pub output_bias: Array1<f64>,
}

impl DenseSequenceModel {
    pub fn horizon(&self) -> usize {
        self.output_bias.len()
    }

    pub fn validate(&self) -> Result<(), ModelError> {
        let n_inputs = self
            .window
            .checked_mul(self.n_features)
            .ok_or_else(|| ModelError::Invalid("input window size overflows".to_string()))?;
        if n_inputs == 0 {
            return Err(ModelError::Invalid("empty input window".to_string()));
        }
        if self.hidden_weights.nrows() != n_inputs {
            return Err(ModelError::Invalid(format!(
                "hidden layer expects {} inputs, window provides {}",
                self.hidden_weights.nrows(),
                n_inputs
            )));
        }
        if self.hidden_weights.ncols() != self.hidden_bias.len() {
            return Err(ModelError::Invalid("hidden bias size mismatch".to_string()));
        }
        if self.output_weights.nrows() != self.hidden_bias.len() {
            return Err(ModelError::Invalid(
                "output layer does not match hidden layer".to_string(),
            ));
        }
        if self.output_weights.ncols() != self.output_bias.len() {
            return Err(ModelError::Invalid("output bias size mismatch".to_string()));
        }
        Ok(())
    }
}

impl SequencePredictor for DenseSequenceModel {
    fn input_shape(&self) -> (usize, usize) {
        (self.window, self.n_features)
    }

    fn predict(&self, window: &Array3<f64>) -> Result<ArrayD<f64>, ModelError> {
        let (batch, steps, features) = window.dim();
        if (steps, features) != self.input_shape() {
            return Err(ModelError::ShapeMismatch {
                expected: self.input_shape(),
                actual: (steps, features),
            });
        }

        let flat = window
            .as_standard_layout()
            .into_owned()
            .into_shape((batch, steps * features))
            .map_err(|e| ModelError::Inference(e.to_string()))?;

        let hidden = (flat.dot(&self.hidden_weights) + &self.hidden_bias.view().insert_axis(Axis(0)))
            .mapv(|v| v.max(0.0));
        let output = hidden.dot(&self.output_weights) + &self.output_bias.view().insert_axis(Axis(0));

        Ok(output.into_dyn())
    }
}
