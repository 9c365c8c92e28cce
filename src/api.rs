// src/api.rs
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::any::Any;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tracing::debug;

use crate::content::{self, GeneratedContent};
use crate::error::{ApiError, ApiResult};
use crate::matcher::{Confidence, Placeholders};
use crate::service::{AnswerView, QuestionService, QuestionStatus};

const ID_SUFFIX_LEN: usize = 9;
const ID_CHARSET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

#[derive(Clone, Default)]
pub struct AppState {
    pub service: QuestionService,
}

impl AppState {
    pub fn new(service: QuestionService) -> Self {
        Self { service }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/api/questions", post(ask_question))
        .route("/api/answers", get(list_answers))
        .route("/api/answers/{id}/content", get(answer_content))
        .layer(catch_panic_layer())
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

pub type PanicHandler = fn(Box<dyn Any + Send + 'static>) -> Response;

/// Turns a handler panic into the generic 500 body instead of a dropped connection.
pub fn catch_panic_layer() -> CatchPanicLayer<PanicHandler> {
    CatchPanicLayer::custom(panic_response as PanicHandler)
}

fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = panic
        .downcast_ref::<String>()
        .cloned()
        .or_else(|| panic.downcast_ref::<&str>().map(|s| s.to_string()))
        .unwrap_or_else(|| "handler panicked".to_string());
    ApiError::Internal(detail).into_response()
}

/* ----------------------------
Wire types
---------------------------- */

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionRequest {
    pub question: String,
    // accepted for the dashboard, not used for matching
    #[serde(default)]
    pub context: Option<QuestionContext>,
    #[serde(default)]
    pub placeholders: Option<Placeholders>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionContext {
    #[serde(default)]
    pub accounts: Vec<String>,
    #[serde(default)]
    pub timeframe: Option<String>,
    #[serde(default)]
    pub selection_mode: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct QuestionResponse {
    pub id: String,
    pub status: QuestionStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub answer: Option<AnswerView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<Confidence>,
    pub message: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerSummary {
    pub id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub answer_type: &'static str,
}

/// `<unix-millis>-<9 lower-case alphanumerics>`
pub fn correlation_id() -> String {
    let mut rng = rand::rng();
    let suffix: String = (0..ID_SUFFIX_LEN)
        .map(|_| ID_CHARSET[rng.random_range(0..ID_CHARSET.len())] as char)
        .collect();
    format!("{}-{}", Utc::now().timestamp_millis(), suffix)
}

/* ----------------------------
Handlers
---------------------------- */

async fn ask_question(
    State(state): State<AppState>,
    payload: Result<Json<QuestionRequest>, JsonRejection>,
) -> ApiResult<Json<QuestionResponse>> {
    let Json(req) = payload.map_err(|rejection| {
        debug!(target: "portfolio_qa", reason = %rejection.body_text(), "rejected question body");
        ApiError::invalid(rejection.body_text())
    })?;

    if req.question.trim().is_empty() {
        return Err(ApiError::invalid("question must not be empty"));
    }

    let outcome = state
        .service
        .answer(&req.question, req.placeholders.as_ref());

    Ok(Json(QuestionResponse {
        id: correlation_id(),
        status: outcome.status(),
        answer: outcome.answer(),
        confidence: outcome.confidence(),
        message: outcome.message(),
    }))
}

async fn list_answers(State(state): State<AppState>) -> Json<Vec<AnswerSummary>> {
    let out = state
        .service
        .catalog()
        .answers()
        .iter()
        .map(|a| AnswerSummary {
            id: a.id.clone(),
            title: a.title.clone(),
            category: a.category.clone(),
            answer_type: a.answer_type.as_str(),
        })
        .collect();
    Json(out)
}

async fn answer_content(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<GeneratedContent>> {
    let rec = state
        .service
        .catalog()
        .get(&id)
        .ok_or_else(|| ApiError::NotFound(id.clone()))?;
    Ok(Json(content::generate(&rec.content, &rec.data)))
}
