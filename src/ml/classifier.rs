use crate::error::{BreedScanError, Result};
use crate::ml::LabelList;

/// A loaded model that maps one preprocessed image to a score vector.
///
/// Implementations are shared across request handlers, so they must be
/// usable from several threads at once without external locking.
pub trait ImageClassifier: Send + Sync {
    /// Input tensor shape, batch dimension included.
    fn input_shape(&self) -> &[usize];

    /// Number of scores produced per image.
    fn output_dim(&self) -> usize;

    /// Run inference on a single-item batch laid out as `input_shape`.
    fn predict(&self, input: &[f32]) -> Result<Vec<f32>>;
}

/// Top-1 result of a classification.
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub class_index: usize,
    /// Display form of the label (underscores replaced by spaces)
    pub label: String,
    /// Raw maximum score, typically a softmax probability
    pub score: f32,
}

impl Prediction {
    /// Score as a percentage with exactly two decimals, e.g. `"93.21"`.
    pub fn confidence_percent(&self) -> String {
        format!("{:.2}", self.score * 100.0)
    }
}

/// Index and value of the largest score; the first one wins ties and NaN is skipped.
pub fn argmax(scores: &[f32]) -> Option<(usize, f32)> {
    scores
        .iter()
        .copied()
        .enumerate()
        .filter(|(_, v)| !v.is_nan())
        .fold(None, |best, (i, v)| match best {
            Some((_, b)) if b >= v => best,
            _ => Some((i, v)),
        })
}

/// Pick the best class from a score vector and resolve its label.
pub fn top_prediction(scores: &[f32], labels: &LabelList) -> Result<Prediction> {
    let (class_index, score) = argmax(scores).ok_or_else(|| {
        BreedScanError::Inference("model produced no usable scores".to_string())
    })?;

    let label = labels.display_name(class_index).ok_or_else(|| {
        BreedScanError::Inference(format!(
            "predicted class index {} is out of range for {} labels",
            class_index,
            labels.len()
        ))
    })?;

    Ok(Prediction {
        class_index,
        label,
        score,
    })
}
