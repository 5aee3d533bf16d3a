use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::domain::{GameSummary, UserId};
use super::repository::{ProgressionRepository, RepositoryError};
use super::service::{ProgressionService, ProgressionServiceError};
use crate::game::router::engine_error_response;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub user_id: String,
}

#[derive(Debug, Deserialize)]
pub struct GrantRequest {
    pub base_amount: u32,
    pub activity_type: String,
}

#[derive(Debug, Serialize)]
pub struct GrantResponse {
    pub final_amount: u64,
    pub current_streak: u32,
    pub xp_multiplier: f64,
    pub level: u32,
    pub leveled_up: bool,
}

#[derive(Debug, Deserialize)]
pub struct AwardRequest {
    pub badge_type: String,
}

/// Router builder exposing streak, XP, level and badge endpoints.
pub fn progression_router<R>(service: Arc<ProgressionService<R>>) -> Router
where
    R: ProgressionRepository + 'static,
{
    Router::new()
        .route("/api/v1/users", post(register_handler::<R>))
        .route(
            "/api/v1/users/:user_id/streak",
            get(streak_handler::<R>),
        )
        .route(
            "/api/v1/users/:user_id/streak/touch",
            post(touch_handler::<R>),
        )
        .route(
            "/api/v1/users/:user_id/streak/reset",
            post(reset_handler::<R>),
        )
        .route("/api/v1/users/:user_id/xp", post(grant_handler::<R>))
        .route("/api/v1/users/:user_id/level", get(level_handler::<R>))
        .route(
            "/api/v1/users/:user_id/badges",
            post(award_handler::<R>).get(list_badges_handler::<R>),
        )
        .route(
            "/api/v1/users/:user_id/badges/check",
            post(check_badges_handler::<R>),
        )
        .route(
            "/api/v1/users/:user_id/badges/:badge_type",
            delete(revoke_handler::<R>),
        )
        .with_state(service)
}

pub(crate) fn progression_error_response(error: &ProgressionServiceError) -> Response {
    match error {
        ProgressionServiceError::Engine(error) => engine_error_response(error),
        ProgressionServiceError::Repository(RepositoryError::Conflict) => {
            let payload = json!({ "error": "record already exists" });
            (StatusCode::CONFLICT, axum::Json(payload)).into_response()
        }
        ProgressionServiceError::Repository(RepositoryError::NotFound) => {
            let payload = json!({ "error": error.to_string() });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        ProgressionServiceError::Repository(RepositoryError::Unavailable(_)) => {
            let payload = json!({ "error": error.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

fn respond<T: Serialize>(
    status: StatusCode,
    result: Result<T, ProgressionServiceError>,
) -> Response {
    match result {
        Ok(body) => (status, axum::Json(body)).into_response(),
        Err(error) => progression_error_response(&error),
    }
}

pub(crate) async fn register_handler<R>(
    State(service): State<Arc<ProgressionService<R>>>,
    axum::Json(request): axum::Json<RegisterRequest>,
) -> Response
where
    R: ProgressionRepository + 'static,
{
    let user_id = match UserId::parse(&request.user_id) {
        Ok(user_id) => user_id,
        Err(error) => return engine_error_response(&error),
    };
    respond(StatusCode::CREATED, service.register_user(&user_id))
}

pub(crate) async fn streak_handler<R>(
    State(service): State<Arc<ProgressionService<R>>>,
    Path(user_id): Path<String>,
) -> Response
where
    R: ProgressionRepository + 'static,
{
    match UserId::parse(&user_id) {
        Ok(user_id) => respond(StatusCode::OK, service.streak(&user_id)),
        Err(error) => engine_error_response(&error),
    }
}

pub(crate) async fn touch_handler<R>(
    State(service): State<Arc<ProgressionService<R>>>,
    Path(user_id): Path<String>,
) -> Response
where
    R: ProgressionRepository + 'static,
{
    match UserId::parse(&user_id) {
        Ok(user_id) => respond(StatusCode::OK, service.touch_streak(&user_id)),
        Err(error) => engine_error_response(&error),
    }
}

pub(crate) async fn reset_handler<R>(
    State(service): State<Arc<ProgressionService<R>>>,
    Path(user_id): Path<String>,
) -> Response
where
    R: ProgressionRepository + 'static,
{
    match UserId::parse(&user_id) {
        Ok(user_id) => respond(StatusCode::OK, service.reset_streak(&user_id)),
        Err(error) => engine_error_response(&error),
    }
}

pub(crate) async fn grant_handler<R>(
    State(service): State<Arc<ProgressionService<R>>>,
    Path(user_id): Path<String>,
    axum::Json(request): axum::Json<GrantRequest>,
) -> Response
where
    R: ProgressionRepository + 'static,
{
    let user_id = match UserId::parse(&user_id) {
        Ok(user_id) => user_id,
        Err(error) => return engine_error_response(&error),
    };
    let result = service
        .grant_xp(&user_id, request.base_amount, &request.activity_type)
        .map(|award| GrantResponse {
            final_amount: award.grant.final_amount,
            current_streak: award.current_streak,
            xp_multiplier: award.xp_multiplier,
            level: award.level,
            leveled_up: award.leveled_up,
        });
    respond(StatusCode::OK, result)
}

pub(crate) async fn level_handler<R>(
    State(service): State<Arc<ProgressionService<R>>>,
    Path(user_id): Path<String>,
) -> Response
where
    R: ProgressionRepository + 'static,
{
    match UserId::parse(&user_id) {
        Ok(user_id) => respond(StatusCode::OK, service.level(&user_id)),
        Err(error) => engine_error_response(&error),
    }
}

pub(crate) async fn award_handler<R>(
    State(service): State<Arc<ProgressionService<R>>>,
    Path(user_id): Path<String>,
    axum::Json(request): axum::Json<AwardRequest>,
) -> Response
where
    R: ProgressionRepository + 'static,
{
    match UserId::parse(&user_id) {
        Ok(user_id) => respond(
            StatusCode::OK,
            service.award_badge(&user_id, &request.badge_type),
        ),
        Err(error) => engine_error_response(&error),
    }
}

pub(crate) async fn list_badges_handler<R>(
    State(service): State<Arc<ProgressionService<R>>>,
    Path(user_id): Path<String>,
) -> Response
where
    R: ProgressionRepository + 'static,
{
    match UserId::parse(&user_id) {
        Ok(user_id) => respond(
            StatusCode::OK,
            service
                .badges(&user_id)
                .map(|badges| json!({ "badges": badges })),
        ),
        Err(error) => engine_error_response(&error),
    }
}

pub(crate) async fn check_badges_handler<R>(
    State(service): State<Arc<ProgressionService<R>>>,
    Path(user_id): Path<String>,
    axum::Json(summary): axum::Json<GameSummary>,
) -> Response
where
    R: ProgressionRepository + 'static,
{
    match UserId::parse(&user_id) {
        Ok(user_id) => respond(
            StatusCode::OK,
            service
                .check_badges(&user_id, &summary)
                .map(|awarded| json!({ "awarded": awarded })),
        ),
        Err(error) => engine_error_response(&error),
    }
}

pub(crate) async fn revoke_handler<R>(
    State(service): State<Arc<ProgressionService<R>>>,
    Path((user_id, badge_type)): Path<(String, String)>,
) -> Response
where
    R: ProgressionRepository + 'static,
{
    match UserId::parse(&user_id) {
        Ok(user_id) => respond(
            StatusCode::OK,
            service.revoke_badge(&user_id, &badge_type),
        ),
        Err(error) => engine_error_response(&error),
    }
}
