use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::{test, web, App};
use serde_json::{json, Value};
use student_predictor::api;
use student_predictor::model::FallbackPredictor;
use student_predictor::{PredictionEngine, Predictor};

macro_rules! app {
    () => {{
        let predictor: Arc<dyn Predictor> = Arc::new(FallbackPredictor);
        test::init_service(
            App::new()
                .app_data(web::Data::new(PredictionEngine::default()))
                .app_data(web::Data::from(predictor))
                .configure(api::configure),
        )
        .await
    }};
}

#[actix_web::test]
async fn health_responds() {
    let app = app!();
    let resp = test::call_service(&app, test::TestRequest::get().uri("/health").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn semester_subjects_listed() {
    let app = app!();
    let req = test::TestRequest::get().uri("/semesters/3/subjects").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["semester"], 3);
    assert_eq!(body["name"], "Third Semester");
    assert_eq!(body["subjects"].as_array().unwrap().len(), 6);
    assert_eq!(body["subjects"][0]["type"], "Core");
}

#[actix_web::test]
async fn invalid_semester_is_bad_request() {
    let app = app!();
    let req = test::TestRequest::get().uri("/semesters/9/subjects").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["detail"], "Invalid semester 9. Must be between 1 and 8.");
}

#[actix_web::test]
async fn prediction_generated() {
    let app = app!();
    let req = test::TestRequest::post()
        .uri("/prediction/generate")
        .set_json(json!({
            "semester": 3,
            "subject_marks": {"23CS301": 85, "23CS302": 72},
            "test_scores": [60, 80]
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["sgpa"], 8.5);
    assert_eq!(body["academic_status"], "Good");
    assert_eq!(body["improvement_trend"], "Improving");
    assert_eq!(body["test_consistency"], 70.0);
}

#[actix_web::test]
async fn empty_marks_rejected() {
    let app = app!();
    let req = test::TestRequest::post()
        .uri("/prediction/generate")
        .set_json(json!({"semester": 3, "subject_marks": {}}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn predict_uses_injected_model() {
    let app = app!();
    let req = test::TestRequest::post()
        .uri("/predict")
        .set_json(json!({
            "study_hours": 5.0,
            "attendance": 80.0,
            "assignments_score": 75.0,
            "past_marks": 68.0,
            "engagement_score": 6.0
        }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["predicted_score"], 65.0);
    assert_eq!(body["pass_fail"], "Pass");
    assert_eq!(body["risk_category"], "Medium");
}

#[actix_web::test]
async fn out_of_range_feature_rejected() {
    let app = app!();
    let req = test::TestRequest::post()
        .uri("/predict")
        .set_json(json!({
            "study_hours": 5.0,
            "attendance": 120.0,
            "assignments_score": 75.0,
            "past_marks": 68.0,
            "engagement_score": 6.0
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["detail"], "attendance must be between 0 and 100, got 120");
}

#[actix_web::test]
async fn model_info_reports_fallback() {
    let app = app!();
    let req = test::TestRequest::get().uri("/model/info").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["fallback"], true);
    assert_eq!(body["features"].as_array().unwrap().len(), 5);
}

#[actix_web::test]
async fn semester_outside_u8_is_bad_request_with_detail() {
    let app = app!();
    for (raw, detail) in [
        ("256", "Invalid semester 256. Must be between 1 and 8."),
        ("-1", "Invalid semester -1. Must be between 1 and 8."),
    ] {
        let req = test::TestRequest::get()
            .uri(&format!("/semesters/{raw}/subjects"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "semester {raw}");

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["detail"], detail);
    }
}

#[actix_web::test]
async fn non_numeric_semester_is_bad_request_with_detail() {
    let app = app!();
    let req = test::TestRequest::get().uri("/semesters/third/subjects").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert!(body["detail"].is_string());
}

#[actix_web::test]
async fn generate_with_wide_semester_is_validation_error() {
    let app = app!();
    let req = test::TestRequest::post()
        .uri("/prediction/generate")
        .set_json(json!({"semester": 300, "subject_marks": {"23CS301": 70}}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["detail"], "Invalid semester 300. Must be between 1 and 8.");
}

#[actix_web::test]
async fn malformed_json_body_has_detail() {
    let app = app!();
    let req = test::TestRequest::post()
        .uri("/prediction/generate")
        .set_json(json!({"semester": "three"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert!(body["detail"].is_string());
}

fn features(attendance: f64) -> Value {
    json!({
        "study_hours": 5.0,
        "attendance": attendance,
        "assignments_score": 75.0,
        "past_marks": 68.0,
        "engagement_score": 6.0
    })
}

#[actix_web::test]
async fn batch_returns_predictions_and_summary() {
    let app = app!();
    let req = test::TestRequest::post()
        .uri("/predict/batch")
        .set_json(json!([features(80.0), features(92.0)]))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["predictions"].as_array().unwrap().len(), 2);
    assert_eq!(body["summary"]["total_predictions"], 2);
    assert_eq!(body["summary"]["average_score"], 65.0);
    assert_eq!(body["summary"]["pass_rate"], 100.0);
    assert_eq!(body["summary"]["risk_distribution"]["medium_risk"], 2);
}

#[actix_web::test]
async fn empty_batch_has_zero_summary() {
    let app = app!();
    let req = test::TestRequest::post()
        .uri("/predict/batch")
        .set_json(json!([]))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["summary"]["total_predictions"], 0);
    assert_eq!(body["summary"]["pass_rate"], 0.0);
}

#[actix_web::test]
async fn batch_rejects_out_of_range_row() {
    let app = app!();
    let req = test::TestRequest::post()
        .uri("/predict/batch")
        .set_json(json!([features(80.0), features(130.0)]))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["detail"], "attendance must be between 0 and 100, got 130");
}
