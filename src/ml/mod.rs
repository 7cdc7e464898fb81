//! Classifier artifacts and the inference seam.
//!
//! Models are trained elsewhere and loaded once at startup. Every format
//! implements [`Classifier`], so the rest of the service never sees which
//! one is in use.

pub mod dense;
pub mod forest;
#[cfg(feature = "onnx")]
pub mod onnx;

pub use dense::{Activation, DenseLayer, DenseNetwork};
pub use forest::{DecisionTree, TreeEnsemble, TreeNode};
#[cfg(feature = "onnx")]
pub use onnx::OnnxModel;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

use crate::error::{MedriskError, Result};

/// Scores above 1 or below 0 by at most this much are clamped rather than rejected.
const PROBABILITY_TOLERANCE: f64 = 1e-6;

/// A trained multi-class classifier.
#[cfg_attr(test, mockall::automock)]
pub trait Classifier: Send + Sync {
    /// Short name of the artifact format, used in logs and health output.
    fn kind(&self) -> &'static str;

    /// Number of input features the model expects.
    fn input_dim(&self) -> usize;

    /// Number of classes the model scores.
    fn output_dim(&self) -> usize;

    /// One score per class for a single feature row.
    fn predict_proba(&self, features: &[f64]) -> Result<Vec<f64>>;

    /// Index of the most probable class; the first index wins ties.
    fn predict(&self, features: &[f64]) -> Result<usize> {
        let probs = self.predict_proba(features)?;
        argmax(&probs).ok_or_else(|| MedriskError::Inference("model produced no scores".into()))
    }
}

pub fn argmax(values: &[f64]) -> Option<usize> {
    let mut best: Option<usize> = None;
    for (idx, v) in values.iter().enumerate() {
        match best {
            Some(b) if values[b] >= *v => {}
            _ => best = Some(idx),
        }
    }
    best
}

/// Check a probability row from the model: expected length, finite, within [0, 1].
pub fn check_probabilities(mut probs: Vec<f64>, expected_len: usize) -> Result<Vec<f64>> {
    if probs.len() != expected_len {
        return Err(MedriskError::Inference(format!(
            "model returned {} scores, expected {expected_len}",
            probs.len()
        )));
    }
    for (idx, p) in probs.iter_mut().enumerate() {
        if !p.is_finite() || *p < -PROBABILITY_TOLERANCE || *p > 1.0 + PROBABILITY_TOLERANCE {
            return Err(MedriskError::Inference(format!(
                "model score at index {idx} is {p}, expected a probability"
            )));
        }
        *p = p.clamp(0.0, 1.0);
    }
    Ok(probs)
}

/// On-disk model format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelFormat {
    /// JSON decision-tree ensemble (random forest export)
    #[default]
    Forest,
    /// JSON dense network
    Dense,
    /// ONNX graph (requires the `onnx` feature)
    Onnx,
}

impl fmt::Display for ModelFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Forest => "forest",
            Self::Dense => "dense",
            Self::Onnx => "onnx",
        };
        f.write_str(s)
    }
}

/// Load a classifier artifact. `input_dim` is the symptom catalog length and
/// `n_classes` the class catalog length.
pub fn load_classifier(
    path: &Path,
    format: ModelFormat,
    input_dim: usize,
    n_classes: usize,
) -> Result<Box<dyn Classifier>> {
    if !path.exists() {
        return Err(MedriskError::artifact(
            path.display().to_string(),
            "model file not found",
        ));
    }
    match format {
        ModelFormat::Forest => Ok(Box::new(TreeEnsemble::from_file(path)?)),
        ModelFormat::Dense => Ok(Box::new(DenseNetwork::from_file(path)?)),
        #[cfg(feature = "onnx")]
        ModelFormat::Onnx => Ok(Box::new(OnnxModel::load_for_vec_input(
            path, input_dim, n_classes,
        )?)),
        #[cfg(not(feature = "onnx"))]
        ModelFormat::Onnx => {
            let _ = (input_dim, n_classes);
            Err(MedriskError::artifact(
                path.display().to_string(),
                "onnx models require building with the `onnx` feature",
            ))
        }
    }
}
