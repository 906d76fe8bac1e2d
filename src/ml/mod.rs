//! Model-facing pieces: label list, image preprocessing, score decoding and
//! the ONNX runtime wrapper.

pub mod classifier;
pub mod labels;
#[cfg(feature = "onnx")]
pub mod onnx;
pub mod preprocess;

pub use classifier::{argmax, top_prediction, ImageClassifier, Prediction};
pub use labels::LabelList;
#[cfg(feature = "onnx")]
pub use onnx::OnnxModel;
pub use preprocess::{InputSpec, Normalization, TensorLayout};
