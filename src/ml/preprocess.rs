//! Image decoding and tensor preparation.
//!
//! Turns an uploaded byte stream into the flat `f32` buffer the model
//! expects: decode, force RGB, resize to the fixed input size, then lay the
//! pixels out with a leading batch dimension of 1 and normalize.

use crate::error::{BreedScanError, Result};
use image::{imageops::FilterType, DynamicImage, RgbImage};
use serde::{Deserialize, Serialize};

const IMAGENET_MEAN: [f32; 3] = [0.485, 0.456, 0.406];
const IMAGENET_STD: [f32; 3] = [0.229, 0.224, 0.225];

/// Memory order of the model's input tensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TensorLayout {
    /// `[1, height, width, 3]` (Keras/TensorFlow exports)
    #[default]
    Nhwc,
    /// `[1, 3, height, width]` (PyTorch exports)
    Nchw,
}

/// Per-pixel scaling applied before inference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Normalization {
    /// `x / 127.5 - 1`, the InceptionV3 convention
    #[default]
    Inception,
    /// `x / 255`
    Unit,
    /// `(x / 255 - mean) / std` with ImageNet channel statistics
    Imagenet,
}

impl Normalization {
    fn apply(self, value: u8, channel: usize) -> f32 {
        let v = value as f32;
        match self {
            Normalization::Inception => v / 127.5 - 1.0,
            Normalization::Unit => v / 255.0,
            Normalization::Imagenet => (v / 255.0 - IMAGENET_MEAN[channel]) / IMAGENET_STD[channel],
        }
    }
}

/// Fixed input contract of the loaded model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputSpec {
    pub width: u32,
    pub height: u32,
    pub layout: TensorLayout,
    pub normalization: Normalization,
}

impl Default for InputSpec {
    fn default() -> Self {
        Self {
            width: 299,
            height: 299,
            layout: TensorLayout::Nhwc,
            normalization: Normalization::Inception,
        }
    }
}

impl InputSpec {
    /// Tensor shape including the batch dimension.
    pub fn shape(&self) -> [usize; 4] {
        let (h, w) = (self.height as usize, self.width as usize);
        match self.layout {
            TensorLayout::Nhwc => [1, h, w, 3],
            TensorLayout::Nchw => [1, 3, h, w],
        }
    }

    pub fn elem_count(&self) -> usize {
        self.shape().iter().product()
    }

    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(BreedScanError::Validation(format!(
                "input dimensions must be > 0 (got {}x{})",
                self.width, self.height
            )));
        }
        Ok(())
    }
}

/// Decode an uploaded byte stream, guessing the format from its content.
pub fn decode_image(bytes: &[u8]) -> Result<DynamicImage> {
    Ok(image::load_from_memory(bytes)?)
}

/// Resize to the model's input size and flatten into a normalized tensor buffer.
///
/// Both axes are scaled independently; aspect ratio is not preserved.
pub fn image_to_input(image: &DynamicImage, spec: &InputSpec) -> Vec<f32> {
    let rgb = image
        .resize_exact(spec.width, spec.height, FilterType::CatmullRom)
        .to_rgb8();
    rgb_to_input(&rgb, spec)
}

fn rgb_to_input(rgb: &RgbImage, spec: &InputSpec) -> Vec<f32> {
    let norm = spec.normalization;
    match spec.layout {
        TensorLayout::Nhwc => rgb
            .pixels()
            .flat_map(|p| (0..3).map(move |c| norm.apply(p[c], c)))
            .collect(),
        TensorLayout::Nchw => {
            let mut out = Vec::with_capacity(spec.elem_count());
            for c in 0..3 {
                out.extend(rgb.pixels().map(|p| norm.apply(p[c], c)));
            }
            out
        }
    }
}

/// Full pipeline from raw upload bytes to a model-ready buffer.
pub fn preprocess(bytes: &[u8], spec: &InputSpec) -> Result<Vec<f32>> {
    let image = decode_image(bytes)?;
    Ok(image_to_input(&image, spec))
}
