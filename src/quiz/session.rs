//! 测验编排：开始一轮测验、定级小测、记录作答。

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::Serialize;

use crate::constants::{DEFAULT_PLACEMENT_WORDS, MAX_PLACEMENT_WORDS, MAX_SESSION_WORDS};
use crate::quiz::assembler::build_questions;
use crate::quiz::modes::{resolve_count, resolve_difficulty, resolve_mode};
use crate::quiz::repository::QuizRepository;
use crate::quiz::selector::{nearest_by_difficulty, select_words};
use crate::quiz::types::Question;
use crate::store::StoreError;

#[derive(Debug, thiserror::Error)]
pub enum QuizError {
    #[error("unknown mode: {0}")]
    UnknownMode(String),
    #[error("word not found: {0}")]
    WordNotFound(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionPlan {
    pub mode: &'static str,
    pub questions: Vec<Question>,
    pub ability_score: f64,
    pub word_count: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerOutcome {
    pub word_id: String,
    pub is_correct: bool,
    /// 保留一位小数
    pub ability_score: f64,
    pub previous_ability: f64,
    pub ability_delta: f64,
    pub streak: u32,
    pub interval_hours: f64,
    pub next_review_at: DateTime<Utc>,
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

pub fn start_session<Repo, R>(
    repo: &Repo,
    rng: &mut R,
    user_id: &str,
    mode: Option<&str>,
    count: Option<f64>,
    pool_size: usize,
) -> Result<SessionPlan, QuizError>
where
    Repo: QuizRepository + ?Sized,
    R: Rng + ?Sized,
{
    let preset = resolve_mode(mode)
        .ok_or_else(|| QuizError::UnknownMode(mode.unwrap_or_default().to_string()))?;
    let count = resolve_count(count, preset.count, MAX_SESSION_WORDS);
    let options = preset.select_options();

    let ability = repo.get_ability(user_id)?;
    let words = select_words(repo, rng, user_id, ability, count, &options)?;
    let questions = build_questions(repo, rng, &words, options.question_type, pool_size)?;

    tracing::info!(
        user_id,
        mode = preset.name,
        count,
        words = words.len(),
        questions = questions.len(),
        ability,
        "Quiz session assembled"
    );

    Ok(SessionPlan {
        mode: preset.name,
        questions,
        ability_score: ability,
        word_count: words.len(),
    })
}

/// 定级小测：取离目标难度最近的若干词出题，不看用户历史
pub fn placement_quiz<Repo, R>(
    repo: &Repo,
    rng: &mut R,
    target_difficulty: Option<f64>,
    count: Option<f64>,
    pool_size: usize,
) -> Result<Vec<Question>, QuizError>
where
    Repo: QuizRepository + ?Sized,
    R: Rng + ?Sized,
{
    let target = resolve_difficulty(target_difficulty);
    let count = resolve_count(count, DEFAULT_PLACEMENT_WORDS, MAX_PLACEMENT_WORDS);

    let words = nearest_by_difficulty(repo.list_words(None)?, target, count, rng);
    let questions = build_questions(repo, rng, &words, None, pool_size)?;

    tracing::info!(
        target_difficulty = target,
        count,
        questions = questions.len(),
        "Placement quiz assembled"
    );
    Ok(questions)
}

/// 记录一次作答：能力值、词统计与能力日志在一次提交里写入
pub fn record_answer<Repo>(
    repo: &Repo,
    user_id: &str,
    word_id: &str,
    is_correct: bool,
    now: DateTime<Utc>,
) -> Result<AnswerOutcome, QuizError>
where
    Repo: QuizRepository + ?Sized,
{
    let word = repo
        .get_word(word_id)?
        .ok_or_else(|| QuizError::WordNotFound(word_id.to_string()))?;

    let commit = repo.commit_answer(
        user_id,
        &word.id,
        word.difficulty_score(),
        is_correct,
        now,
    )?;
    let (update, stat) = (commit.ability, commit.stat);

    tracing::info!(
        user_id,
        word_id = %word.id,
        is_correct,
        old = update.old,
        new = update.new,
        streak = stat.streak,
        interval_hours = stat.srs_interval_hours,
        "Answer recorded"
    );

    Ok(AnswerOutcome {
        word_id: word.id,
        is_correct,
        ability_score: round_one_decimal(update.new),
        previous_ability: update.old,
        ability_delta: update.delta(),
        streak: stat.streak,
        interval_hours: stat.srs_interval_hours,
        next_review_at: stat.next_review_at.unwrap_or(now),
    })
}
