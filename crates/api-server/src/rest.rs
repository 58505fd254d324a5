//! REST API handlers for classification, analytics, and operational endpoints.

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, Utc};
use segment_analytics::{AnalyticsSnapshot, AnalyticsStore, InsightsReport, PredictionFilter};
use segment_classifier::SegmentClassifier;
use segment_core::{CustomerAttributes, PredictionResult, SegmentError, SegmentId, SegmentProfile};
use serde::Serialize;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{error, info, warn};
use uuid::Uuid;

/// Shared application state for REST handlers.
#[derive(Clone)]
pub struct AppState {
    pub classifier: Arc<SegmentClassifier>,
    pub store: AnalyticsStore,
    pub node_id: String,
    pub start_time: Instant,
    /// Artificial wait before a prediction is recorded and returned.
    pub simulated_latency: Duration,
}

impl AppState {
    pub fn new(store: AnalyticsStore, node_id: impl Into<String>) -> Self {
        Self {
            classifier: Arc::new(SegmentClassifier::new()),
            store,
            node_id: node_id.into(),
            start_time: Instant::now(),
            simulated_latency: Duration::ZERO,
        }
    }

    pub fn with_simulated_latency(mut self, latency: Duration) -> Self {
        self.simulated_latency = latency;
        self
    }
}

type ApiResult<T> = Result<Json<T>, (StatusCode, Json<ErrorResponse>)>;

fn error_response(
    status: StatusCode,
    error: &str,
    message: impl Into<String>,
) -> (StatusCode, Json<ErrorResponse>) {
    (
        status,
        Json(ErrorResponse {
            error: error.to_string(),
            message: message.into(),
        }),
    )
}

impl From<SegmentError> for ErrorResponse {
    fn from(err: SegmentError) -> Self {
        let error = match &err {
            SegmentError::Validation { .. } => "invalid_customer_attributes",
            SegmentError::UnknownSegment(_) => "unknown_segment",
            _ => "internal_error",
        };
        ErrorResponse {
            error: error.to_string(),
            message: err.to_string(),
        }
    }
}

fn segment_error(err: SegmentError) -> (StatusCode, Json<ErrorResponse>) {
    let status = match &err {
        SegmentError::UnknownSegment(_) => StatusCode::NOT_FOUND,
        e if e.is_client_error() => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(err.into()))
}

/// POST /v1/predictions — classify a customer and record the prediction.
pub async fn create_prediction(
    State(state): State<AppState>,
    payload: Result<Json<CustomerAttributes>, JsonRejection>,
) -> ApiResult<PredictionResponse> {
    let Json(attributes) = payload.map_err(|rejection| {
        warn!(error = %rejection.body_text(), "Prediction request rejected");
        metrics::counter!("api.validation_errors").increment(1);
        error_response(
            StatusCode::BAD_REQUEST,
            "invalid_customer_attributes",
            rejection.body_text(),
        )
    })?;

    if !state.simulated_latency.is_zero() {
        tokio::time::sleep(state.simulated_latency).await;
    }

    let prediction = state.classifier.classify(&attributes).map_err(|e| {
        warn!(error = %e, "Customer attributes failed validation");
        metrics::counter!("api.validation_errors").increment(1);
        segment_error(e)
    })?;

    let record = state.store.add_prediction(attributes, prediction);

    Ok(Json(PredictionResponse {
        record_id: record.id,
        created_at: record.created_at,
        prediction: record.result,
    }))
}

/// GET /v1/segments — the six fixed segment profiles.
pub async fn list_segments(State(state): State<AppState>) -> Json<&'static [SegmentProfile]> {
    Json(state.classifier.profiles())
}

/// GET /v1/segments/:id
pub async fn get_segment(
    State(state): State<AppState>,
    id: Result<Path<u8>, PathRejection>,
) -> ApiResult<SegmentProfile> {
    let Path(id) = id.map_err(|rejection| {
        error_response(StatusCode::BAD_REQUEST, "invalid_segment_id", rejection.body_text())
    })?;
    let id = SegmentId::new(id).map_err(segment_error)?;
    let profile = state
        .classifier
        .profiles()
        .iter()
        .find(|p| p.id == id)
        .cloned()
        .ok_or_else(|| segment_error(SegmentError::UnknownSegment(id.as_u8())))?;
    Ok(Json(profile))
}

/// GET /v1/analytics — current snapshot.
pub async fn get_analytics(State(state): State<AppState>) -> Json<AnalyticsSnapshot> {
    Json(state.store.snapshot().as_ref().clone())
}

/// POST /v1/analytics/query — snapshot over a filtered history.
pub async fn query_analytics(
    State(state): State<AppState>,
    payload: Result<Json<PredictionFilter>, JsonRejection>,
) -> ApiResult<AnalyticsSnapshot> {
    let Json(filter) = payload.map_err(|rejection| {
        metrics::counter!("api.validation_errors").increment(1);
        error_response(StatusCode::BAD_REQUEST, "invalid_filter", rejection.body_text())
    })?;
    Ok(Json(state.store.filtered_snapshot(&filter)))
}

/// GET /v1/analytics/insights
pub async fn get_insights(State(state): State<AppState>) -> Json<InsightsReport> {
    Json(InsightsReport::from_snapshot(&state.store.snapshot()))
}

/// DELETE /v1/analytics — drop all recorded predictions.
pub async fn reset_analytics(State(state): State<AppState>) -> StatusCode {
    let dropped = state.store.len();
    state.store.reset();
    info!(dropped, "Prediction history cleared via API");
    StatusCode::NO_CONTENT
}

/// GET /health — Health check endpoint.
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        node_id: state.node_id.clone(),
        uptime_secs: state.start_time.elapsed().as_secs(),
        total_predictions: state.store.len(),
    })
}

/// GET /ready — Readiness probe.
pub async fn readiness(State(state): State<AppState>) -> StatusCode {
    if state.classifier.profiles().is_empty() {
        error!("No segment profiles loaded");
        StatusCode::SERVICE_UNAVAILABLE
    } else {
        StatusCode::OK
    }
}

/// GET /live — Liveness probe.
pub async fn liveness() -> StatusCode {
    StatusCode::OK
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionResponse {
    pub record_id: Uuid,
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    pub prediction: PredictionResult,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub node_id: String,
    pub uptime_secs: u64,
    pub total_predictions: usize,
}
