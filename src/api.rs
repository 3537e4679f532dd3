use actix_web::error::InternalError;
use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse, ResponseError};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::analytics::{class_analytics, ClassAnalytics};
use crate::curriculum::semester_number;
use crate::error::EngineError;
use crate::model::{PredictionOutcome, Predictor, StudentFeatures};
use crate::prediction::{PredictionEngine, PredictionRequest};

#[derive(Serialize)]
struct ErrorBody {
    detail: String,
}

impl ResponseError for EngineError {
    fn status_code(&self) -> StatusCode {
        if self.is_validation() {
            return StatusCode::BAD_REQUEST;
        }
        match self {
            EngineError::EnrollmentNotFound(_) | EngineError::PredictionNotFound => StatusCode::NOT_FOUND,
            EngineError::ModelUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            warn!(error = %self, "request failed");
        } else {
            debug!(error = %self, status = status.as_u16(), "request rejected");
        }
        HttpResponse::build(status).json(ErrorBody {
            detail: self.to_string(),
        })
    }
}

/// Malformed paths and bodies get the same 400 `{"detail"}` shape as
/// validation errors instead of actix's plain-text default.
fn bad_request<E>(err: E) -> actix_web::Error
where
    E: std::fmt::Display + std::fmt::Debug + 'static,
{
    let detail = err.to_string();
    debug!(error = %detail, "malformed request");
    InternalError::from_response(err, HttpResponse::BadRequest().json(ErrorBody { detail })).into()
}

#[derive(Serialize)]
struct BatchResult {
    predictions: Vec<PredictionOutcome>,
    summary: ClassAnalytics,
}

async fn health_check() -> HttpResponse {
    HttpResponse::Ok().body("Student Performance API is running!")
}

async fn semester_subjects(
    semester: web::Path<i64>,
    engine: web::Data<PredictionEngine>,
) -> Result<HttpResponse, EngineError> {
    let semester = semester_number(semester.into_inner())?;
    let catalog = engine.catalog().semester(semester)?;
    Ok(HttpResponse::Ok().json(catalog))
}

async fn generate_prediction(
    req: web::Json<PredictionRequest>,
    engine: web::Data<PredictionEngine>,
) -> Result<HttpResponse, EngineError> {
    let prediction = engine.generate_for(&req)?;
    Ok(HttpResponse::Ok().json(prediction))
}

async fn predict(
    req: web::Json<StudentFeatures>,
    predictor: web::Data<dyn Predictor>,
) -> Result<HttpResponse, EngineError> {
    let outcome = predictor.predict(&req)?;
    Ok(HttpResponse::Ok().json(outcome))
}

/// Scores every student, failing the whole batch on the first invalid row.
async fn batch_predict(
    web::Json(students): web::Json<Vec<StudentFeatures>>,
    predictor: web::Data<dyn Predictor>,
) -> Result<HttpResponse, EngineError> {
    let predictions = students
        .iter()
        .map(|features| predictor.predict(features))
        .collect::<Result<Vec<_>, _>>()?;
    let summary = class_analytics(&predictions);
    info!(
        students = summary.total_predictions,
        pass_rate = summary.pass_rate,
        "batch prediction complete"
    );

    Ok(HttpResponse::Ok().json(BatchResult { predictions, summary }))
}

async fn model_info(predictor: web::Data<dyn Predictor>) -> HttpResponse {
    HttpResponse::Ok().json(predictor.model_info())
}

/// Routes and extractor error handlers; callers register
/// `web::Data<PredictionEngine>` and `web::Data<dyn Predictor>` on the app.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::PathConfig::default().error_handler(|err, _| bad_request(err)))
        .app_data(web::JsonConfig::default().error_handler(|err, _| bad_request(err)))
        .route("/health", web::get().to(health_check))
        .route("/semesters/{semester}/subjects", web::get().to(semester_subjects))
        .route("/prediction/generate", web::post().to(generate_prediction))
        .route("/predict", web::post().to(predict))
        .route("/predict/batch", web::post().to(batch_predict))
        .route("/model/info", web::get().to(model_info));
}
