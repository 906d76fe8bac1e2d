mod common;

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
};
use breedscan::{ml::LabelList, services::Predictor};
use common::*;
use serde_json::json;

#[tokio::test]
async fn valid_image_returns_label_and_confidence() {
    let app = app(ready_predictor(vec![0.1, 0.7321, 0.1679]));

    let (status, body) = post_multipart(
        &app,
        &[Part {
            name: "image",
            filename: Some("husky.png"),
            data: png_bytes(),
        }],
    )
    .await;

    assert_eq!(status, StatusCode::OK, "body: {body}");
    assert_eq!(body, json!({"breed": "siberian husky", "confidence": "73.21"}));
}

#[tokio::test]
async fn confidence_is_a_two_decimal_percentage() {
    let app = app(ready_predictor(vec![1.0, 0.0, 0.0]));

    let (status, body) = post_multipart(
        &app,
        &[Part {
            name: "image",
            filename: Some("retriever.png"),
            data: png_bytes(),
        }],
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let known: Vec<String> = breed_labels().iter().map(|l| l.replace('_', " ")).collect();
    let breed = body["breed"].as_str().unwrap();
    assert!(known.iter().any(|l| l == breed), "unknown breed {breed}");

    let confidence = body["confidence"].as_str().unwrap();
    assert_eq!(confidence, "100.00");
    let (_, decimals) = confidence.split_once('.').unwrap();
    assert_eq!(decimals.len(), 2);
    let value: f64 = confidence.parse().unwrap();
    assert!((0.0..=100.0).contains(&value));
}

#[tokio::test]
async fn other_fields_are_ignored() {
    let app = app(ready_predictor(vec![0.2, 0.2, 0.6]));

    let (status, body) = post_multipart(
        &app,
        &[
            Part {
                name: "note",
                filename: None,
                data: b"hello".to_vec(),
            },
            Part {
                name: "image",
                filename: Some("pug.png"),
                data: png_bytes(),
            },
        ],
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["breed"], "pug");
}

#[tokio::test]
async fn missing_image_field_is_no_file_part() {
    let app = app(ready_predictor(vec![0.2, 0.2, 0.6]));

    let (status, body) = post_multipart(
        &app,
        &[Part {
            name: "photo",
            filename: Some("pug.png"),
            data: png_bytes(),
        }],
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "No file part"}));
}

#[tokio::test]
async fn image_form_field_without_filename_is_no_file_part() {
    let app = app(ready_predictor(vec![0.2, 0.2, 0.6]));

    let (status, body) = post_multipart(
        &app,
        &[Part {
            name: "image",
            filename: None,
            data: png_bytes(),
        }],
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "No file part");
}

#[tokio::test]
async fn non_multipart_body_is_no_file_part() {
    let app = app(ready_predictor(vec![0.2, 0.2, 0.6]));

    let request = Request::builder()
        .method(Method::POST)
        .uri("/predict")
        .header("content-type", "application/json")
        .body(Body::from(r#"{"image": "pug.png"}"#))
        .unwrap();
    let (status, body) = send(&app, request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, r#"{"error":"No file part"}"#);
}

#[tokio::test]
async fn empty_filename_is_no_selected_file() {
    let app = app(ready_predictor(vec![0.2, 0.2, 0.6]));

    let (status, body) = post_multipart(
        &app,
        &[Part {
            name: "image",
            filename: Some(""),
            data: Vec::new(),
        }],
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "No selected file"}));
}

#[tokio::test]
async fn unloaded_model_is_a_server_error() {
    let predictor = Predictor::from_parts(None, LabelList::new(breed_labels()), input_spec());
    let app = app(predictor);

    let (status, body) = post_multipart(
        &app,
        &[Part {
            name: "image",
            filename: Some("pug.png"),
            data: png_bytes(),
        }],
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({"error": "Model or class names not loaded"}));
}

#[tokio::test]
async fn load_check_runs_before_upload_inspection() {
    let predictor = Predictor::from_parts(None, LabelList::default(), input_spec());
    let app = app(predictor);

    let (status, body) = post_multipart(&app, &[]).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Model or class names not loaded");
}

#[tokio::test]
async fn non_image_bytes_surface_decode_error() {
    let app = app(ready_predictor(vec![0.2, 0.2, 0.6]));

    let (status, body) = post_multipart(
        &app,
        &[Part {
            name: "image",
            filename: Some("notes.txt"),
            data: b"this is plain text, not pixels".to_vec(),
        }],
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let message = body["error"].as_str().unwrap();
    assert!(!message.is_empty());
}

#[tokio::test]
async fn label_index_out_of_range_is_a_server_error() {
    let app = app(ready_predictor(vec![0.1, 0.1, 0.1, 0.7]));

    let (status, body) = post_multipart(
        &app,
        &[Part {
            name: "image",
            filename: Some("mystery.png"),
            data: png_bytes(),
        }],
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].as_str().unwrap().contains("out of range"));
}

#[tokio::test]
async fn oversized_upload_is_rejected() {
    let state = breedscan::api::AppState::new(ready_predictor(vec![0.2, 0.2, 0.6]));
    let app = breedscan::api::create_router(state, 64);

    let (status, body) = post_multipart(
        &app,
        &[Part {
            name: "image",
            filename: Some("big.png"),
            data: vec![0u8; 4096],
        }],
    )
    .await;

    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    let message = body["error"].as_str().unwrap();
    assert!(message.contains("64 byte"), "{message}");
}

#[tokio::test]
async fn cross_origin_requests_are_allowed() {
    let app = app(ready_predictor(vec![0.2, 0.2, 0.6]));

    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/predict")
        .header("origin", "http://localhost:5173")
        .header("access-control-request-method", "POST")
        .body(Body::empty())
        .unwrap();
    let response = tower::ServiceExt::oneshot(app, request).await.unwrap();

    assert!(response.status().is_success());
    assert_eq!(response.headers()["access-control-allow-origin"], "*");
}
