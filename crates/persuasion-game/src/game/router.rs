use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::domain::{Argument, Stance, TonalStyle};
use super::features::TextFeatureExtractor;
use super::sentiment::SentimentOracle;
use super::service::GameService;
use crate::error::EngineError;

#[derive(Debug, Deserialize)]
pub struct EvaluateRequest {
    pub argument: String,
    #[serde(default)]
    pub tone: Option<String>,
    #[serde(default)]
    pub topic: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct EvaluateResponse {
    pub score: u8,
    pub persuaded: bool,
    pub feedback: String,
    pub sentiment_degraded: bool,
}

#[derive(Debug, Deserialize)]
pub struct DialogueRequest {
    pub scenario: String,
    pub user_argument: String,
    #[serde(default = "default_stance")]
    pub ai_stance: String,
    #[serde(default)]
    pub tone: Option<String>,
}

fn default_stance() -> String {
    Stance::Disagree.label().to_string()
}

#[derive(Debug, Serialize)]
pub struct DialogueResponse {
    pub ai_response: String,
    pub new_stance: Stance,
    pub reasoning: String,
    pub score: u8,
}

fn declared_tone(raw: Option<&str>) -> TonalStyle {
    raw.map(TonalStyle::parse_lenient).unwrap_or_default()
}

/// Router builder exposing argument scoring and dialogue turns.
pub fn game_router<O, X>(service: Arc<GameService<O, X>>) -> Router
where
    O: SentimentOracle + 'static,
    X: TextFeatureExtractor + 'static,
{
    Router::new()
        .route("/api/v1/arguments/evaluate", post(evaluate_handler::<O, X>))
        .route("/api/v1/dialogue/turn", post(dialogue_handler::<O, X>))
        .with_state(service)
}

pub(crate) fn engine_error_response(error: &EngineError) -> Response {
    let payload = json!({ "error": error.to_string() });
    (error.status_code(), axum::Json(payload)).into_response()
}

pub(crate) async fn evaluate_handler<O, X>(
    State(service): State<Arc<GameService<O, X>>>,
    axum::Json(request): axum::Json<EvaluateRequest>,
) -> Response
where
    O: SentimentOracle + 'static,
    X: TextFeatureExtractor + 'static,
{
    let argument = Argument {
        text: request.argument,
        declared_tone: declared_tone(request.tone.as_deref()),
        topic: request.topic,
    };

    match service.evaluate(&argument) {
        Ok(evaluation) => {
            let body = EvaluateResponse {
                score: evaluation.score,
                persuaded: evaluation.persuaded,
                feedback: evaluation.feedback_text(),
                sentiment_degraded: evaluation.sentiment_degraded,
            };
            (StatusCode::OK, axum::Json(body)).into_response()
        }
        Err(error) => engine_error_response(&error),
    }
}

pub(crate) async fn dialogue_handler<O, X>(
    State(service): State<Arc<GameService<O, X>>>,
    axum::Json(request): axum::Json<DialogueRequest>,
) -> Response
where
    O: SentimentOracle + 'static,
    X: TextFeatureExtractor + 'static,
{
    let current = match request.ai_stance.parse::<Stance>() {
        Ok(stance) => stance,
        Err(error) => return engine_error_response(&error),
    };
    let argument = Argument::new(
        request.user_argument,
        declared_tone(request.tone.as_deref()),
    );

    match service.advance_dialogue(&request.scenario, &argument, current) {
        Ok(turn) => {
            let body = DialogueResponse {
                ai_response: turn.ai_response,
                new_stance: turn.new_stance,
                reasoning: turn.reasoning,
                score: turn.score,
            };
            (StatusCode::OK, axum::Json(body)).into_response()
        }
        Err(error) => engine_error_response(&error),
    }
}
