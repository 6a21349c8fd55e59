use crate::infra::{AppState, SurveyService};
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use serde_json::json;
use std::sync::Arc;
use survey_runner::answers::AnswerSet;
use survey_runner::export::ExportDocument;
use survey_runner::scoring::Assessment;

pub(crate) fn survey_router(service: Arc<SurveyService>) -> Router {
    Router::new()
        .route("/api/v1/catalog", get(catalog_endpoint))
        .route("/api/v1/assessments/score", post(score_endpoint))
        .route("/api/v1/assessments/export", post(export_endpoint))
        .with_state(service)
}

pub(crate) fn with_survey_routes(service: Arc<SurveyService>) -> Router {
    survey_router(service)
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn catalog_endpoint(State(service): State<Arc<SurveyService>>) -> Response {
    Json(service.catalog.as_ref()).into_response()
}

pub(crate) async fn score_endpoint(
    State(service): State<Arc<SurveyService>>,
    Json(answers): Json<AnswerSet>,
) -> Json<Assessment> {
    Json(service.score(&answers))
}

pub(crate) async fn export_endpoint(
    State(service): State<Arc<SurveyService>>,
    Json(answers): Json<AnswerSet>,
) -> Json<ExportDocument> {
    let assessment = service.score(&answers);
    Json(ExportDocument::new(&assessment, answers))
}
