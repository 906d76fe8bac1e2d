//! ONNX inference wrapper (pure Rust via `tract-onnx`).
//!
//! Serves the exported classifier without Python or a native runtime.

use crate::error::{BreedScanError, Result};
use crate::ml::ImageClassifier;

use std::path::Path;
use tract_onnx::prelude::*;

#[derive(Clone)]
pub struct OnnxModel {
    plan: TypedRunnableModel<TypedModel>,
    input_shape: Vec<usize>,
    output_dim: usize,
}

impl std::fmt::Debug for OnnxModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OnnxModel")
            .field("input_shape", &self.input_shape)
            .field("output_dim", &self.output_dim)
            .finish()
    }
}

impl OnnxModel {
    /// Load an ONNX model and specialize it to a fixed `f32` tensor input.
    ///
    /// `input_shape` must include the batch dimension (typically `1`).
    pub fn load_for_tensor_input<P: AsRef<Path>>(path: P, input_shape: &[usize]) -> Result<Self> {
        let path = path.as_ref();
        if input_shape.is_empty() {
            return Err(BreedScanError::Validation(
                "input_shape must have at least 1 dimension".to_string(),
            ));
        }
        if input_shape.iter().any(|d| *d == 0) {
            return Err(BreedScanError::Validation(
                "input_shape dimensions must all be > 0".to_string(),
            ));
        }
        if !path.is_file() {
            return Err(BreedScanError::ModelLoad(format!(
                "model file not found: {}",
                path.display()
            )));
        }

        let model = tract_onnx::onnx()
            .model_for_path(path)
            .map_err(|e| BreedScanError::ModelLoad(format!("onnx load failed: {e}")))?;

        let shape: TVec<usize> = input_shape.iter().copied().collect();

        let model = model
            .with_input_fact(0, InferenceFact::dt_shape(f32::datum_type(), shape))
            .map_err(|e| BreedScanError::ModelLoad(format!("onnx input fact failed: {e}")))?;

        let plan = model
            .into_optimized()
            .map_err(|e| BreedScanError::ModelLoad(format!("onnx optimize failed: {e}")))?
            .into_runnable()
            .map_err(|e| BreedScanError::ModelLoad(format!("onnx runnable failed: {e}")))?;

        // Infer output_dim by running a dummy forward pass.
        let dummy = tract_ndarray::ArrayD::<f32>::zeros(tract_ndarray::IxDyn(input_shape))
            .into_tvalue();
        let outputs = plan
            .run(tvec!(dummy))
            .map_err(|e| BreedScanError::ModelLoad(format!("onnx warmup run failed: {e}")))?;
        let output_dim = outputs
            .first()
            .ok_or_else(|| BreedScanError::ModelLoad("onnx produced no outputs".to_string()))?
            .to_array_view::<f32>()
            .map_err(|e| BreedScanError::ModelLoad(format!("onnx output decode failed: {e}")))?
            .len();
        if output_dim == 0 {
            return Err(BreedScanError::ModelLoad(
                "onnx output has zero elements".to_string(),
            ));
        }

        Ok(Self {
            plan,
            input_shape: input_shape.to_vec(),
            output_dim,
        })
    }

    pub fn input_elem_count(&self) -> usize {
        self.input_shape.iter().product()
    }
}

impl ImageClassifier for OnnxModel {
    fn input_shape(&self) -> &[usize] {
        &self.input_shape
    }

    fn output_dim(&self) -> usize {
        self.output_dim
    }

    fn predict(&self, input: &[f32]) -> Result<Vec<f32>> {
        let expected = self.input_elem_count();
        if input.len() != expected {
            return Err(BreedScanError::Validation(format!(
                "onnx input dim mismatch: got {}, expected {} (shape={:?})",
                input.len(),
                expected,
                self.input_shape
            )));
        }

        let tensor = tract_ndarray::ArrayD::<f32>::from_shape_vec(
            tract_ndarray::IxDyn(&self.input_shape),
            input.to_vec(),
        )
        .map_err(|e| BreedScanError::Internal(format!("onnx input reshape failed: {e}")))?
        .into_tvalue();

        let outputs = self
            .plan
            .run(tvec!(tensor))
            .map_err(|e| BreedScanError::Inference(format!("onnx run failed: {e}")))?;
        let first = outputs
            .first()
            .ok_or_else(|| BreedScanError::Inference("onnx produced no outputs".to_string()))?;

        let arr = first
            .to_array_view::<f32>()
            .map_err(|e| BreedScanError::Inference(format!("onnx output decode failed: {e}")))?;

        Ok(arr.iter().copied().collect())
    }
}
