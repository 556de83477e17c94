use actix_web::{http::StatusCode, test, web, App};
use serde_json::{json, Value};
use std::sync::Arc;

use crate::models::FeatureVector;
use crate::routes;
use crate::services::prediction::PredictionService;
use crate::services::scorer::{GenreScorer, ProbaTensor};
use crate::utils::error::AppResult;

struct FixedScorer;

impl GenreScorer for FixedScorer {
    fn predict_proba(&self, samples: &[FeatureVector]) -> AppResult<ProbaTensor> {
        Ok(ProbaTensor::rows(
            samples
                .iter()
                .map(|_| vec![0.8, 0.05, 0.0, 0.0, 0.6, 0.0, 0.1, 0.0, 0.0, 0.0])
                .collect(),
        ))
    }

    fn model_version(&self) -> &str {
        "SVM-v2.0"
    }
}

fn blinding_lights() -> Value {
    json!({
        "track_name": "Blinding Lights",
        "artists": "The Weeknd",
        "album_name": "After Hours",
        "danceability": 0.8,
        "energy": 0.7,
        "loudness": -5.2,
        "speechiness": 0.1,
        "acousticness": 0.2,
        "instrumentalness": 0.0,
        "liveness": 0.1,
        "valence": 0.6,
        "tempo": 120.0,
        "popularity": 95.0
    })
}

macro_rules! app {
    ($service:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($service))
                .configure(routes::configure),
        )
        .await
    };
}

#[actix_web::test]
async fn health_reports_model_state() {
    let app = app!(PredictionService::demo());
    let req = test::TestRequest::get().uri("/api/health").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["model_loaded"], false);
    assert_eq!(body["version"], "2.0.0");
    assert!(body["timestamp"].is_string());

    let app = app!(PredictionService::new(Some(Arc::new(FixedScorer)), None, false));
    let req = test::TestRequest::get().uri("/api/health").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["model_loaded"], true);
}

#[actix_web::test]
async fn genres_are_listed_in_model_order() {
    let app = app!(PredictionService::demo());
    let req = test::TestRequest::get().uri("/api/genres").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(
        body["genres"],
        json!([
            "pop",
            "rock",
            "hip_hop",
            "jazz",
            "electronic",
            "classical",
            "r_b",
            "country",
            "metal",
            "folk",
        ])
    );
}

#[actix_web::test]
async fn metrics_report_demo_mode() {
    let app = app!(PredictionService::demo());
    let req = test::TestRequest::get().uri("/api/metrics").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["model_name"], "Support Vector Machine (SVM)");
    assert_eq!(body["accuracy"], 0.948);
    assert_eq!(body["f1_score"], 0.451);
    assert_eq!(body["training_samples"], 114000);
    assert_eq!(body["last_trained"], "2025-11-11");
    assert_eq!(body["genres_supported"], 10);
    assert_eq!(body["demo_mode"], true);
}

#[actix_web::test]
async fn predict_in_demo_mode() {
    let app = app!(PredictionService::demo());
    let req = test::TestRequest::post()
        .uri("/api/predict")
        .set_json(blinding_lights())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["track"], "Blinding Lights");
    assert_eq!(body["artists"], "The Weeknd");
    assert_eq!(body["model_version"], "DEMO-MODE");
    assert_eq!(body["top_genres"], json!([]));

    let predictions = body["predictions"].as_object().unwrap();
    assert_eq!(predictions.len(), 10);
    let total: f64 = predictions.values().map(|v| v.as_f64().unwrap()).sum();
    assert!((total - 0.8).abs() < 1e-9);
    let pop = predictions["pop"].as_f64().unwrap();
    assert!((pop - 0.70 / 4.09 * 0.8).abs() < 1e-9);
}

#[actix_web::test]
async fn predict_with_trained_model() {
    let app = app!(PredictionService::new(Some(Arc::new(FixedScorer)), None, false));
    let req = test::TestRequest::post()
        .uri("/api/predict")
        .set_json(blinding_lights())
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["model_version"], "SVM-v2.0");
    assert_eq!(body["predictions"]["pop"], 0.8);
    assert_eq!(body["predictions"]["folk"], 0.0);
    assert_eq!(body["top_genres"], json!(["pop", "electronic"]));
    let confidence = body["confidence"].as_f64().unwrap();
    assert!((confidence - 0.88).abs() < 1e-9);
}

#[actix_web::test]
async fn predict_uses_defaults_for_missing_features() {
    let app = app!(PredictionService::demo());
    let req = test::TestRequest::post()
        .uri("/api/predict")
        .set_json(json!({"track_name": "Untitled", "artists": "Unknown"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn malformed_body_is_rejected() {
    let app = app!(PredictionService::demo());
    let req = test::TestRequest::post()
        .uri("/api/predict")
        .set_json(json!({"artists": "No Title", "energy": "loud"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn out_of_range_is_advisory_unless_strict() {
    let mut payload = blinding_lights();
    payload["tempo"] = json!(250.0);

    let app = app!(PredictionService::demo());
    let req = test::TestRequest::post().uri("/api/predict").set_json(&payload).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let app = app!(PredictionService::new(None, None, true));
    let req = test::TestRequest::post().uri("/api/predict").set_json(&payload).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "validation_error");
    assert!(body["message"].as_str().unwrap().contains("tempo"));
}

#[actix_web::test]
async fn batch_preserves_order_and_averages() {
    let tracks: Vec<Value> = ["first", "second", "third"]
        .iter()
        .map(|name| {
            let mut t = blinding_lights();
            t["track_name"] = json!(name);
            t
        })
        .collect();

    let app = app!(PredictionService::new(Some(Arc::new(FixedScorer)), None, false));
    let req = test::TestRequest::post()
        .uri("/api/predict/batch")
        .set_json(json!({ "tracks": tracks }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["total_tracks"], 3);
    let names: Vec<&str> = body["predictions"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["track"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["first", "second", "third"]);
    assert!((body["average_confidence"].as_f64().unwrap() - 0.88).abs() < 1e-9);
}

#[actix_web::test]
async fn empty_batch() {
    let app = app!(PredictionService::demo());
    let req = test::TestRequest::post()
        .uri("/api/predict/batch")
        .set_json(json!({ "tracks": [] }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["total_tracks"], 0);
    assert_eq!(body["average_confidence"], 0.0);
    assert_eq!(body["predictions"], json!([]));
}
