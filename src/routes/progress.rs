use axum::extract::State;
use axum::routing::{get, post};
use axum::Router;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_ABILITY_LOG_LIMIT, MAX_ABILITY_LOG_LIMIT, PRACTICE_HISTORY_LIMIT};
use crate::extractors::{JsonBody, LearnerId, QueryParams};
use crate::quiz::modes::resolve_mode;
use crate::quiz::session::record_answer;
use crate::quiz::QuizError;
use crate::response::{ok, AppError};
use crate::state::AppState;
use crate::store::operations::ability_log::AbilityLogEntry;
use crate::store::operations::practice_sessions::PracticeSession;
use crate::store::operations::word_stats::UserWordStat;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/answer", post(submit_answer))
        .route("/ability", get(get_ability))
        .route("/words", get(list_word_stats))
        .route("/ability-log", get(list_ability_log))
        .route("/session", post(record_session))
        .route("/history", get(list_history))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AnswerRequest {
    word_id: String,
    is_correct: bool,
}

async fn submit_answer(
    learner: LearnerId,
    State(state): State<AppState>,
    JsonBody(req): JsonBody<AnswerRequest>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let word_id = req.word_id.trim();
    if word_id.is_empty() {
        return Err(AppError::bad_request("VALIDATION_ERROR", "wordId 不能为空"));
    }

    let outcome = record_answer(
        state.store(),
        learner.as_str(),
        word_id,
        req.is_correct,
        Utc::now(),
    )?;
    Ok(ok(outcome))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AbilityResponse {
    ability_score: f64,
}

async fn get_ability(
    learner: LearnerId,
    State(state): State<AppState>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let ability_score = state.store().get_ability(learner.as_str())?;
    Ok(ok(AbilityResponse { ability_score }))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct WordStatsResponse {
    stats: Vec<UserWordStat>,
    total: usize,
}

async fn list_word_stats(
    learner: LearnerId,
    State(state): State<AppState>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let stats = state.store().list_user_word_stats(learner.as_str())?;
    let total = stats.len();
    Ok(ok(WordStatsResponse { stats, total }))
}

#[derive(Debug, Deserialize)]
struct AbilityLogQuery {
    limit: Option<usize>,
}

async fn list_ability_log(
    learner: LearnerId,
    State(state): State<AppState>,
    QueryParams(query): QueryParams<AbilityLogQuery>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let limit = query
        .limit
        .unwrap_or(DEFAULT_ABILITY_LOG_LIMIT)
        .clamp(1, MAX_ABILITY_LOG_LIMIT);
    let entries: Vec<AbilityLogEntry> = state
        .store()
        .list_ability_log(learner.as_str(), limit)?;
    Ok(ok(entries))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PracticeSessionRequest {
    mode: Option<String>,
    score: u32,
    total: u32,
    completed_at: DateTime<Utc>,
}

async fn record_session(
    learner: LearnerId,
    State(state): State<AppState>,
    JsonBody(req): JsonBody<PracticeSessionRequest>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let preset = resolve_mode(req.mode.as_deref())
        .ok_or_else(|| QuizError::UnknownMode(req.mode.clone().unwrap_or_default()))?;
    if req.total == 0 {
        return Err(AppError::bad_request("VALIDATION_ERROR", "total 必须大于 0"));
    }

    let session = PracticeSession {
        id: uuid::Uuid::new_v4().to_string(),
        user_id: learner.as_str().to_string(),
        mode: preset.name.to_string(),
        score: req.score,
        total: req.total,
        completed_at: req.completed_at,
    };
    state.store().record_practice_session(&session)?;

    tracing::info!(
        user_id = %session.user_id,
        mode = %session.mode,
        score = session.score,
        total = session.total,
        "Practice session recorded"
    );
    Ok(ok(session))
}

#[derive(Debug, Serialize)]
struct HistoryResponse {
    sessions: Vec<PracticeSession>,
}

async fn list_history(
    learner: LearnerId,
    State(state): State<AppState>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let sessions = state
        .store()
        .list_practice_sessions(learner.as_str(), PRACTICE_HISTORY_LIMIT)?;
    Ok(ok(HistoryResponse { sessions }))
}
