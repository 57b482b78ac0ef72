//! 每个测验共享一批干扰项候选，避免按词逐个查询。

use std::collections::HashSet;

use rand::Rng;

use crate::constants::{DEFAULT_DIFFICULTY, DISTRACTOR_NEARBY_RADIUS};
use crate::quiz::ability::clamp_score;
use crate::quiz::repository::QuizRepository;
use crate::quiz::selector::nearest_by_difficulty;
use crate::store::operations::words::Word;
use crate::store::StoreError;

/// 取一批干扰项候选：排除本次题目词，按与 `center_difficulty` 的距离排序，
/// 距离相同随机；不限 tier。
pub fn fetch_distractor_pool<Repo, R>(
    repo: &Repo,
    rng: &mut R,
    exclude_ids: &HashSet<&str>,
    center_difficulty: f64,
    pool_size: usize,
) -> Result<Vec<Word>, StoreError>
where
    Repo: QuizRepository + ?Sized,
    R: Rng + ?Sized,
{
    let center = clamp_score(center_difficulty, DEFAULT_DIFFICULTY);
    let candidates: Vec<Word> = repo
        .list_words(None)?
        .into_iter()
        .filter(|w| !exclude_ids.contains(w.id.as_str()))
        .collect();
    let pool = nearest_by_difficulty(candidates, center, pool_size, rng);

    tracing::debug!(
        pool = pool.len(),
        excluded = exclude_ids.len(),
        center,
        "Distractor pool fetched"
    );
    Ok(pool)
}

fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}

/// 为目标词挑两个干扰项：难度 ±20 以内优先，其余按池内顺序。
///
/// 词形或释义与目标词（或已选干扰项）重复的候选会被跳过，
/// 保证无论哪种题型三个选项都互不相同。
pub fn pick_distractors<'a>(pool: &'a [Word], target: &Word) -> Option<[&'a Word; 2]> {
    let target_difficulty = target.difficulty_score();
    let (nearby, rest): (Vec<&Word>, Vec<&Word>) = pool
        .iter()
        .filter(|w| w.id != target.id)
        .partition(|w| (w.difficulty_score() - target_difficulty).abs() <= DISTRACTOR_NEARBY_RADIUS);

    let mut seen_texts = HashSet::from([normalize(&target.text)]);
    let mut seen_definitions = HashSet::from([normalize(&target.definition)]);
    let mut picked: Vec<&'a Word> = Vec::with_capacity(2);

    for candidate in nearby.into_iter().chain(rest) {
        let text = normalize(&candidate.text);
        let definition = normalize(&candidate.definition);
        if seen_texts.contains(&text) || seen_definitions.contains(&definition) {
            continue;
        }
        seen_texts.insert(text);
        seen_definitions.insert(definition);
        picked.push(candidate);
        if picked.len() == 2 {
            return Some([picked[0], picked[1]]);
        }
    }

    None
}
