use axum::extract::State;
use axum::routing::post;
use axum::Router;
use serde::{Deserialize, Serialize};

use crate::extractors::{JsonBody, LearnerId};
use crate::quiz::session::{placement_quiz, start_session};
use crate::quiz::types::Question;
use crate::response::{ok, AppError};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/session", post(create_session))
        .route("/placement", post(create_placement))
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SessionRequest {
    mode: Option<String>,
    count: Option<f64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SessionResponse {
    mode: &'static str,
    questions: Vec<Question>,
    ability_score: f64,
    word_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<&'static str>,
}

async fn create_session(
    learner: LearnerId,
    State(state): State<AppState>,
    JsonBody(req): JsonBody<SessionRequest>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let plan = start_session(
        state.store(),
        &mut rand::thread_rng(),
        learner.as_str(),
        req.mode.as_deref(),
        req.count,
        state.distractor_pool_size(),
    )?;

    let message = plan
        .questions
        .is_empty()
        .then_some("No words available for this mode");

    Ok(ok(SessionResponse {
        mode: plan.mode,
        questions: plan.questions,
        ability_score: plan.ability_score,
        word_count: plan.word_count,
        message,
    }))
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlacementRequest {
    target_difficulty: Option<f64>,
    count: Option<f64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PlacementResponse {
    questions: Vec<Question>,
}

async fn create_placement(
    _learner: LearnerId,
    State(state): State<AppState>,
    JsonBody(req): JsonBody<PlacementRequest>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let questions = placement_quiz(
        state.store(),
        &mut rand::thread_rng(),
        req.target_difficulty,
        req.count,
        state.distractor_pool_size(),
    )?;

    Ok(ok(PlacementResponse { questions }))
}
