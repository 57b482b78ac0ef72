use std::collections::HashSet;

use chrono::{DateTime, Utc};
use rand::seq::SliceRandom;
use rand::Rng;

use crate::constants::OPTIONS_PER_QUESTION;
use crate::quiz::distractors::{fetch_distractor_pool, pick_distractors};
use crate::quiz::repository::QuizRepository;
use crate::quiz::types::{Question, QuestionType};
use crate::store::operations::words::Word;
use crate::store::StoreError;

fn to_base36(mut value: u64) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if value == 0 {
        return "0".to_string();
    }
    let mut out = Vec::new();
    while value > 0 {
        out.push(DIGITS[(value % 36) as usize]);
        value /= 36;
    }
    out.reverse();
    String::from_utf8_lossy(&out).into_owned()
}

pub fn question_id(word_id: &str, issued_at: DateTime<Utc>) -> String {
    let millis = u64::try_from(issued_at.timestamp_millis()).unwrap_or(0);
    format!("q_{word_id}_{}", to_base36(millis))
}

fn resolve_type<R: Rng + ?Sized>(
    target: &Word,
    type_override: Option<QuestionType>,
    rng: &mut R,
) -> QuestionType {
    let chosen = match type_override {
        Some(question_type) => question_type,
        None => {
            let available: &[QuestionType] = if target.has_gap_sentence() {
                &QuestionType::ALL
            } else {
                &[QuestionType::GuessWord, QuestionType::MeaningMatch]
            };
            available
                .choose(rng)
                .copied()
                .unwrap_or(QuestionType::GuessWord)
        }
    };

    // 没有挖空句时无法出填空题
    if chosen == QuestionType::FillGap && !target.has_gap_sentence() {
        QuestionType::GuessWord
    } else {
        chosen
    }
}

/// 把目标词与两个干扰项组装成一道三选一题目，正确答案位置均匀随机。
pub fn assemble_question<R: Rng + ?Sized>(
    target: &Word,
    distractors: [&Word; 2],
    type_override: Option<QuestionType>,
    rng: &mut R,
    issued_at: DateTime<Utc>,
) -> Question {
    let question_type = resolve_type(target, type_override, rng);

    let option_text = |word: &Word| -> String {
        match question_type {
            QuestionType::MeaningMatch => word.definition.clone(),
            QuestionType::GuessWord | QuestionType::FillGap => word.text.clone(),
        }
    };
    let prompt = match question_type {
        QuestionType::MeaningMatch => target.text.clone(),
        QuestionType::FillGap => target
            .gap_sentence
            .clone()
            .unwrap_or_else(|| target.definition.clone()),
        QuestionType::GuessWord => target.definition.clone(),
    };

    let correct_index = rng.gen_range(0..OPTIONS_PER_QUESTION);
    let [first, second] = distractors.map(|w| option_text(w));
    let correct = option_text(target);
    let options = match correct_index {
        0 => [correct, first, second],
        1 => [first, correct, second],
        _ => [first, second, correct],
    };

    let sentence = target
        .sentence
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| format!("The word is \"{}\".", target.text));

    Question {
        id: question_id(&target.id, issued_at),
        word_id: target.id.clone(),
        question_type,
        prompt,
        options,
        correct_option_index: correct_index as u8,
        word: target.text.clone(),
        phonetic: target.phonetic.clone(),
        definition: target.definition.clone(),
        sentence,
        difficulty_score: target.difficulty_score(),
    }
}

/// 为选出的词批量出题：一次取干扰项池，凑不齐两个干扰项的词直接跳过。
pub fn build_questions<Repo, R>(
    repo: &Repo,
    rng: &mut R,
    words: &[Word],
    type_override: Option<QuestionType>,
    pool_size: usize,
) -> Result<Vec<Question>, StoreError>
where
    Repo: QuizRepository + ?Sized,
    R: Rng + ?Sized,
{
    if words.is_empty() {
        return Ok(Vec::new());
    }

    let center =
        words.iter().map(Word::difficulty_score).sum::<f64>() / words.len() as f64;
    let exclude: HashSet<&str> = words.iter().map(|w| w.id.as_str()).collect();
    let pool = fetch_distractor_pool(repo, rng, &exclude, center, pool_size)?;

    let issued_at = Utc::now();
    let mut questions = Vec::with_capacity(words.len());
    for word in words {
        match pick_distractors(&pool, word) {
            Some(distractors) => {
                questions.push(assemble_question(word, distractors, type_override, rng, issued_at));
            }
            None => {
                tracing::debug!(word_id = %word.id, pool = pool.len(), "Skipping word without enough distractors");
            }
        }
    }

    Ok(questions)
}
