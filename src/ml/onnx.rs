//! ONNX classifier (pure Rust via `tract-onnx`).
//!
//! Intended for forests exported with a probability output. When the graph
//! has several outputs (label + probabilities), the first `f32` output whose
//! element count matches the class count is used; a graph with no such
//! output is rejected at load time.

use std::path::Path;

use tract_onnx::prelude::*;

use super::{check_probabilities, Classifier};
use crate::error::{MedriskError, Result};

#[derive(Clone)]
pub struct OnnxModel {
    plan: TypedRunnableModel<TypedModel>,
    input_dim: usize,
    output_dim: usize,
    /// Which graph output carries the class scores
    output_index: usize,
}

impl std::fmt::Debug for OnnxModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OnnxModel")
            .field("input_dim", &self.input_dim)
            .field("output_dim", &self.output_dim)
            .field("output_index", &self.output_index)
            .finish()
    }
}

fn onnx_err(path: &Path, stage: &str, e: impl std::fmt::Display) -> MedriskError {
    MedriskError::artifact(path.display().to_string(), format!("onnx {stage} failed: {e}"))
}

impl OnnxModel {
    /// Load an ONNX model and specialize it to a fixed `[1, input_dim]` f32 input.
    pub fn load_for_vec_input(path: &Path, input_dim: usize, n_classes: usize) -> Result<Self> {
        if input_dim == 0 || n_classes == 0 {
            return Err(MedriskError::Validation(
                "input_dim and n_classes must be > 0".to_string(),
            ));
        }

        let plan = tract_onnx::onnx()
            .model_for_path(path)
            .map_err(|e| onnx_err(path, "load", e))?
            .with_input_fact(0, InferenceFact::dt_shape(f32::datum_type(), tvec!(1, input_dim)))
            .map_err(|e| onnx_err(path, "input fact", e))?
            .into_optimized()
            .map_err(|e| onnx_err(path, "optimize", e))?
            .into_runnable()
            .map_err(|e| onnx_err(path, "runnable", e))?;

        // One all-zero row reveals the output shapes.
        let dummy = tract_ndarray::Array2::<f32>::zeros((1, input_dim)).into_tvalue();
        let outputs = plan
            .run(tvec!(dummy))
            .map_err(|e| onnx_err(path, "probe run", e))?;
        let output_lens: Vec<Option<usize>> = outputs
            .iter()
            .map(|o| o.to_array_view::<f32>().ok().map(|a| a.len()))
            .collect();
        let output_index = probability_output_index(&output_lens, n_classes).ok_or_else(|| {
            onnx_err(
                path,
                "output decode",
                format!("no f32 output with {n_classes} elements (outputs: {output_lens:?})"),
            )
        })?;

        Ok(Self {
            plan,
            input_dim,
            output_dim: n_classes,
            output_index,
        })
    }
}

/// First output that decodes as `f32` with exactly `n_classes` elements.
fn probability_output_index(output_lens: &[Option<usize>], n_classes: usize) -> Option<usize> {
    output_lens.iter().position(|len| *len == Some(n_classes))
}

impl Classifier for OnnxModel {
    fn kind(&self) -> &'static str {
        "onnx"
    }

    fn input_dim(&self) -> usize {
        self.input_dim
    }

    fn output_dim(&self) -> usize {
        self.output_dim
    }

    fn predict_proba(&self, features: &[f64]) -> Result<Vec<f64>> {
        if features.len() != self.input_dim {
            return Err(MedriskError::MalformedInput(format!(
                "onnx input dim mismatch: got {}, expected {}",
                features.len(),
                self.input_dim
            )));
        }

        let row: Vec<f32> = features.iter().map(|v| *v as f32).collect();
        let tensor = tract_ndarray::Array2::<f32>::from_shape_vec((1, self.input_dim), row)
            .map_err(|e| MedriskError::Inference(format!("onnx input reshape failed: {e}")))?
            .into_tvalue();

        let outputs = self
            .plan
            .run(tvec!(tensor))
            .map_err(|e| MedriskError::Inference(format!("onnx run failed: {e}")))?;
        let out = outputs
            .get(self.output_index)
            .ok_or_else(|| MedriskError::Inference("onnx produced no outputs".to_string()))?;
        let arr = out
            .to_array_view::<f32>()
            .map_err(|e| MedriskError::Inference(format!("onnx output decode failed: {e}")))?;

        check_probabilities(arr.iter().map(|v| f64::from(*v)).collect(), self.output_dim)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn picks_output_matching_class_count() {
        // label output (not f32), then a [1, 3] probability row
        assert_eq!(probability_output_index(&[None, Some(3)], 3), Some(1));
        // a single-element f32 output is skipped when it is not the class count
        assert_eq!(probability_output_index(&[Some(1), Some(4)], 4), Some(1));
        assert_eq!(probability_output_index(&[Some(2), Some(5)], 3), None);
    }
}
