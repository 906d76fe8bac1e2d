//! Startup loader and request-time prediction pipeline.
//!
//! The model and label list are read once at process start and shared
//! read-only afterwards. A failed load leaves the corresponding half unset;
//! the service keeps running and reports itself as not ready.

use std::sync::Arc;

use tracing::{error, info, warn};

use crate::config::ModelConfig;
use crate::error::{BreedScanError, Result};
use crate::ml::{preprocess, top_prediction, ImageClassifier, InputSpec, LabelList, Prediction};

#[derive(Clone)]
pub struct Predictor {
    classifier: Option<Arc<dyn ImageClassifier>>,
    labels: Arc<LabelList>,
    input: InputSpec,
}

impl std::fmt::Debug for Predictor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Predictor")
            .field("model_loaded", &self.classifier.is_some())
            .field("label_count", &self.labels.len())
            .field("input", &self.input)
            .finish()
    }
}

impl Predictor {
    pub fn from_parts(
        classifier: Option<Arc<dyn ImageClassifier>>,
        labels: LabelList,
        input: InputSpec,
    ) -> Self {
        Self {
            classifier,
            labels: Arc::new(labels),
            input,
        }
    }

    /// Load model and labels, degrading instead of failing.
    ///
    /// Each failure is logged and leaves that half unset.
    pub fn load(config: &ModelConfig) -> Self {
        let input = config.input_spec();

        let classifier = match load_model(config, &input) {
            Ok(model) => {
                info!(
                    path = %config.path.display(),
                    input_shape = ?model.input_shape(),
                    output_dim = model.output_dim(),
                    "Model loaded successfully"
                );
                Some(model)
            }
            Err(e) => {
                error!(path = %config.path.display(), "Error loading model: {}", e);
                None
            }
        };

        let labels = match LabelList::load(&config.labels_path) {
            Ok(labels) => {
                info!(
                    path = %config.labels_path.display(),
                    "Loaded {} class names", labels.len()
                );
                labels
            }
            Err(e) => {
                error!(path = %config.labels_path.display(), "Error loading class names: {}", e);
                LabelList::default()
            }
        };

        if let Some(model) = &classifier {
            if !labels.is_empty() && model.output_dim() != labels.len() {
                warn!(
                    output_dim = model.output_dim(),
                    label_count = labels.len(),
                    "Model output size does not match label count"
                );
            }
        }

        Self::from_parts(classifier, labels, input)
    }

    /// Like [`Predictor::load`], but refuses to return a degraded predictor
    /// when `require_loaded` is set.
    pub fn try_load(config: &ModelConfig) -> Result<Self> {
        let predictor = Self::load(config);
        if config.require_loaded && !predictor.is_ready() {
            return Err(BreedScanError::NotLoaded);
        }
        Ok(predictor)
    }

    pub fn model_loaded(&self) -> bool {
        self.classifier.is_some()
    }

    pub fn labels_loaded(&self) -> bool {
        !self.labels.is_empty()
    }

    /// Both model and labels are available.
    pub fn is_ready(&self) -> bool {
        self.model_loaded() && self.labels_loaded()
    }

    pub fn labels(&self) -> &LabelList {
        &self.labels
    }

    pub fn input_spec(&self) -> &InputSpec {
        &self.input
    }

    /// Decode, preprocess and classify one uploaded image.
    ///
    /// CPU bound; call it from a blocking context.
    pub fn predict_bytes(&self, bytes: &[u8]) -> Result<Prediction> {
        let classifier = match &self.classifier {
            Some(c) if self.labels_loaded() => c,
            _ => return Err(BreedScanError::NotLoaded),
        };

        let input = preprocess::preprocess(bytes, &self.input)?;
        let scores = classifier.predict(&input)?;
        top_prediction(&scores, &self.labels)
    }
}

#[cfg(feature = "onnx")]
fn load_model(config: &ModelConfig, input: &InputSpec) -> Result<Arc<dyn ImageClassifier>> {
    input.validate()?;
    let model = crate::ml::OnnxModel::load_for_tensor_input(&config.path, &input.shape())?;
    Ok(Arc::new(model))
}

#[cfg(not(feature = "onnx"))]
fn load_model(_config: &ModelConfig, _input: &InputSpec) -> Result<Arc<dyn ImageClassifier>> {
    Err(BreedScanError::ModelLoad(
        "built without the `onnx` feature".to_string(),
    ))
}
