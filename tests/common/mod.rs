#![allow(dead_code)]

use axum::{
    body::{to_bytes, Body},
    http::{Method, Request, StatusCode},
    Router,
};
use breedscan::{
    api::{create_router, AppState},
    error::{BreedScanError, Result},
    ml::{ImageClassifier, InputSpec, LabelList, Normalization, TensorLayout},
    services::Predictor,
};
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use serde_json::Value;
use std::{io::Cursor, sync::Arc, time::Duration};
use tower::ServiceExt;

pub const BOUNDARY: &str = "breedscan-test-boundary";

/// Classifier that returns a fixed score vector after checking the input size.
pub struct FixedClassifier {
    pub shape: Vec<usize>,
    pub scores: Vec<f32>,
}

impl ImageClassifier for FixedClassifier {
    fn input_shape(&self) -> &[usize] {
        &self.shape
    }

    fn output_dim(&self) -> usize {
        self.scores.len()
    }

    fn predict(&self, input: &[f32]) -> Result<Vec<f32>> {
        let expected: usize = self.shape.iter().product();
        if input.len() != expected {
            return Err(BreedScanError::Validation(format!(
                "got {} values, expected {}",
                input.len(),
                expected
            )));
        }
        if input.iter().any(|v| !(-1.0..=1.0).contains(v)) {
            return Err(BreedScanError::Validation("input not normalized".to_string()));
        }
        Ok(self.scores.clone())
    }
}

/// Classifier that spends `delay` on every call and then fails.
pub struct SlowFailingClassifier {
    pub shape: Vec<usize>,
    pub delay: Duration,
}

impl ImageClassifier for SlowFailingClassifier {
    fn input_shape(&self) -> &[usize] {
        &self.shape
    }

    fn output_dim(&self) -> usize {
        breed_labels().len()
    }

    fn predict(&self, _input: &[f32]) -> Result<Vec<f32>> {
        std::thread::sleep(self.delay);
        Err(BreedScanError::Inference("backend unavailable".to_string()))
    }
}

pub fn input_spec() -> InputSpec {
    InputSpec {
        width: 8,
        height: 8,
        layout: TensorLayout::Nhwc,
        normalization: Normalization::Inception,
    }
}

pub fn breed_labels() -> Vec<String> {
    ["golden_retriever", "siberian_husky", "pug"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

pub fn ready_predictor(scores: Vec<f32>) -> Predictor {
    let classifier: Arc<dyn ImageClassifier> = Arc::new(FixedClassifier {
        shape: input_spec().shape().to_vec(),
        scores,
    });
    Predictor::from_parts(Some(classifier), LabelList::new(breed_labels()), input_spec())
}

pub fn slow_failing_predictor(delay: Duration) -> Predictor {
    let classifier: Arc<dyn ImageClassifier> = Arc::new(SlowFailingClassifier {
        shape: input_spec().shape().to_vec(),
        delay,
    });
    Predictor::from_parts(Some(classifier), LabelList::new(breed_labels()), input_spec())
}

pub fn app(predictor: Predictor) -> Router {
    create_router(AppState::new(predictor), 1024 * 1024)
}

pub fn png_bytes() -> Vec<u8> {
    let mut buf = Vec::new();
    DynamicImage::ImageRgb8(RgbImage::from_pixel(20, 14, Rgb([180, 140, 90])))
        .write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
        .expect("failed to encode test png");
    buf
}

pub struct Part<'a> {
    pub name: &'a str,
    pub filename: Option<&'a str>,
    pub data: Vec<u8>,
}

pub fn multipart_body(parts: &[Part<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        let disposition = match part.filename {
            Some(filename) => format!(
                "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: application/octet-stream\r\n\r\n",
                part.name, filename
            ),
            None => format!(
                "Content-Disposition: form-data; name=\"{}\"\r\n\r\n",
                part.name
            ),
        };
        body.extend_from_slice(disposition.as_bytes());
        body.extend_from_slice(&part.data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, String) {
    let response = app
        .clone()
        .oneshot(request)
        .await
        .expect("router request failed");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("failed to read response body");
    (status, String::from_utf8_lossy(&bytes).to_string())
}

pub async fn post_multipart(app: &Router, parts: &[Part<'_>]) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(Method::POST)
        .uri("/predict")
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(multipart_body(parts)))
        .expect("failed to build multipart request");
    let (status, body) = send(app, request).await;
    let json = serde_json::from_str(&body)
        .unwrap_or_else(|e| panic!("response is not JSON ({e}): {body}"));
    (status, json)
}

pub async fn get(app: &Router, uri: &str) -> (StatusCode, String) {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .expect("failed to build empty request");
    send(app, request).await
}
