//! 选词策略：到期错词 / 前沿新词 / 到期熟词三个桶 + 补位，
//! 以及弱词与分层抽样两种变体。
//!
//! 策略函数只操作内存中的 [`Candidate`]，存储访问集中在 [`select_words`]。

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use rand::seq::SliceRandom;
use rand::Rng;

use crate::constants::{
    DEFAULT_ABILITY, DIFFICULTY_QUINTILES, DUE_WRONG_SHARE, FRONTIER_OFFSET, FRONTIER_SHARE,
    MAX_SESSION_WORDS, SCORE_MAX, WEAK_ACCURACY_THRESHOLD,
};
use crate::quiz::ability::clamp_score;
use crate::quiz::repository::QuizRepository;
use crate::quiz::types::{QuestionType, SelectOptions};
use crate::store::operations::word_stats::UserWordStat;
use crate::store::operations::words::Word;
use crate::store::StoreError;

/// 词条及该用户对它的作答统计（未作答时为 `None`）
#[derive(Debug, Clone)]
pub struct Candidate {
    pub word: Word,
    pub stat: Option<UserWordStat>,
}

impl Candidate {
    pub fn new(word: Word, stat: Option<UserWordStat>) -> Self {
        Self { word, stat }
    }

    pub fn times_seen(&self) -> u32 {
        self.stat.as_ref().map_or(0, |s| s.times_seen)
    }

    fn next_review_at(&self) -> Option<DateTime<Utc>> {
        self.stat.as_ref().and_then(|s| s.next_review_at)
    }

    fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.stat.as_ref().is_some_and(|s| s.is_due(now))
    }

    pub fn is_due_wrong(&self, now: DateTime<Utc>) -> bool {
        self.is_due(now)
            && self
                .stat
                .as_ref()
                .is_some_and(|s| s.times_incorrect >= s.times_correct)
    }

    pub fn is_due_correct(&self, now: DateTime<Utc>) -> bool {
        self.is_due(now)
            && self
                .stat
                .as_ref()
                .is_some_and(|s| s.times_correct > s.times_incorrect)
    }

    /// 未见过的词，或已到期但从未答对过的词
    pub fn is_frontier(&self, now: DateTime<Utc>) -> bool {
        match &self.stat {
            None => true,
            Some(stat) if stat.times_seen == 0 => true,
            Some(stat) => stat.times_correct == 0 && stat.is_due(now),
        }
    }

    pub fn is_weak(&self) -> bool {
        self.stat
            .as_ref()
            .is_some_and(|s| s.times_seen >= 1 && s.accuracy() < WEAK_ACCURACY_THRESHOLD)
    }

    fn accuracy(&self) -> f64 {
        self.stat.as_ref().map_or(0.0, UserWordStat::accuracy)
    }

    fn distance_to(&self, target: f64) -> f64 {
        (self.word.difficulty_score() - target).abs()
    }
}

/// 自适应模式下三个桶的目标数量
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BucketPlan {
    pub due_wrong: usize,
    pub frontier: usize,
    pub due_correct: usize,
}

impl BucketPlan {
    pub fn for_count(count: usize) -> Self {
        let due_wrong = (count as f64 * DUE_WRONG_SHARE).round() as usize;
        let frontier = (count as f64 * FRONTIER_SHARE).round() as usize;
        Self {
            due_wrong,
            frontier,
            due_correct: count.saturating_sub(due_wrong + frontier),
        }
    }
}

/// 期望正确率约 70% 的目标难度
pub fn frontier_target(ability: f64) -> f64 {
    ability + FRONTIER_OFFSET
}

/// 所属难度五分位（0..=4），100 归入最后一段
pub fn quintile_of(difficulty: f64) -> usize {
    let width = SCORE_MAX / DIFFICULTY_QUINTILES as f64;
    ((difficulty / width).floor() as usize).min(DIFFICULTY_QUINTILES - 1)
}

/// 按与 `target` 的难度距离升序取前 `limit` 个，距离相同时随机
pub fn nearest_by_difficulty<R: Rng + ?Sized>(
    mut words: Vec<Word>,
    target: f64,
    limit: usize,
    rng: &mut R,
) -> Vec<Word> {
    words.shuffle(rng);
    words.sort_by(|a, b| {
        let da = (a.difficulty_score() - target).abs();
        let db = (b.difficulty_score() - target).abs();
        da.total_cmp(&db)
    });
    words.truncate(limit);
    words
}

/// 随机打乱后稳定排序，相同排序键之间即为随机次序；
/// 跳过已被前面桶选中的词。
fn take_ranked<'a, R, I, F>(
    pool: I,
    limit: usize,
    taken: &mut HashSet<&'a str>,
    rng: &mut R,
    mut order: F,
) -> Vec<&'a Candidate>
where
    R: Rng + ?Sized,
    I: IntoIterator<Item = &'a Candidate>,
    F: FnMut(&Candidate, &Candidate) -> Ordering,
{
    if limit == 0 {
        return Vec::new();
    }

    let mut ranked: Vec<&Candidate> = pool.into_iter().collect();
    ranked.shuffle(rng);
    ranked.sort_by(|a, b| order(*a, *b));

    let mut picked = Vec::with_capacity(limit.min(ranked.len()));
    for candidate in ranked {
        if picked.len() >= limit {
            break;
        }
        if taken.insert(candidate.word.id.as_str()) {
            picked.push(candidate);
        }
    }
    picked
}

fn by_next_review(a: &Candidate, b: &Candidate) -> Ordering {
    a.next_review_at().cmp(&b.next_review_at())
}

/// 补位：最少见过的优先，其次难度接近能力值
fn pad_least_seen<'a, R: Rng + ?Sized>(
    candidates: &'a [Candidate],
    limit: usize,
    ability: f64,
    taken: &mut HashSet<&'a str>,
    rng: &mut R,
) -> Vec<&'a Candidate> {
    take_ranked(candidates, limit, taken, rng, |a, b| {
        a.times_seen()
            .cmp(&b.times_seen())
            .then_with(|| a.distance_to(ability).total_cmp(&b.distance_to(ability)))
    })
}

fn finalize<R: Rng + ?Sized>(selected: Vec<&Candidate>, count: usize, rng: &mut R) -> Vec<Word> {
    let mut words: Vec<Word> = selected.into_iter().map(|c| c.word.clone()).collect();
    words.shuffle(rng);
    words.truncate(count);
    words
}

pub fn pick_adaptive<R: Rng + ?Sized>(
    candidates: &[Candidate],
    ability: f64,
    count: usize,
    now: DateTime<Utc>,
    rng: &mut R,
) -> Vec<Word> {
    let plan = BucketPlan::for_count(count);
    let target = frontier_target(ability);
    let mut taken = HashSet::with_capacity(count);
    let mut selected = Vec::with_capacity(count);

    let due_wrong = take_ranked(
        candidates.iter().filter(|c| c.is_due_wrong(now)),
        plan.due_wrong,
        &mut taken,
        rng,
        by_next_review,
    );
    let frontier = take_ranked(
        candidates.iter().filter(|c| c.is_frontier(now)),
        plan.frontier,
        &mut taken,
        rng,
        |a, b| a.distance_to(target).total_cmp(&b.distance_to(target)),
    );
    let due_correct = take_ranked(
        candidates.iter().filter(|c| c.is_due_correct(now)),
        plan.due_correct,
        &mut taken,
        rng,
        by_next_review,
    );

    tracing::debug!(
        due_wrong = due_wrong.len(),
        frontier = frontier.len(),
        due_correct = due_correct.len(),
        target_difficulty = target,
        "Adaptive buckets filled"
    );

    selected.extend(due_wrong);
    selected.extend(frontier);
    selected.extend(due_correct);

    if selected.len() < count {
        let padding = pad_least_seen(candidates, count - selected.len(), ability, &mut taken, rng);
        tracing::debug!(padding = padding.len(), "Padding adaptive selection");
        selected.extend(padding);
    }

    finalize(selected, count, rng)
}

pub fn pick_weak<R: Rng + ?Sized>(
    candidates: &[Candidate],
    ability: f64,
    count: usize,
    rng: &mut R,
) -> Vec<Word> {
    let mut taken = HashSet::with_capacity(count);
    let mut selected = take_ranked(
        candidates.iter().filter(|c| c.is_weak()),
        count,
        &mut taken,
        rng,
        |a, b| a.accuracy().total_cmp(&b.accuracy()),
    );

    if selected.len() < count {
        let padding = pad_least_seen(candidates, count - selected.len(), ability, &mut taken, rng);
        selected.extend(padding);
    }

    finalize(selected, count, rng)
}

/// 定级用：每个难度五分位各取 `ceil(count / 5)` 个，不足时随机补齐
pub fn pick_stratified<R: Rng + ?Sized>(
    candidates: &[Candidate],
    count: usize,
    rng: &mut R,
) -> Vec<Word> {
    let per_quintile = count.div_ceil(DIFFICULTY_QUINTILES);
    let mut taken = HashSet::with_capacity(count);
    let mut selected = Vec::with_capacity(per_quintile * DIFFICULTY_QUINTILES);

    for quintile in 0..DIFFICULTY_QUINTILES {
        selected.extend(take_ranked(
            candidates
                .iter()
                .filter(|c| quintile_of(c.word.difficulty_score()) == quintile),
            per_quintile,
            &mut taken,
            rng,
            |_, _| Ordering::Equal,
        ));
    }

    if selected.len() < count {
        selected.extend(take_ranked(
            candidates,
            count - selected.len(),
            &mut taken,
            rng,
            |_, _| Ordering::Equal,
        ));
    }

    finalize(selected, count, rng)
}

/// 纯策略入口：按选项分派到对应模式
pub fn select_from_candidates<R: Rng + ?Sized>(
    candidates: &[Candidate],
    ability: f64,
    count: usize,
    options: &SelectOptions,
    now: DateTime<Utc>,
    rng: &mut R,
) -> Vec<Word> {
    let ability = clamp_score(ability, DEFAULT_ABILITY);
    let count = count.min(MAX_SESSION_WORDS);
    if count == 0 || candidates.is_empty() {
        return Vec::new();
    }

    if options.weak_only {
        pick_weak(candidates, ability, count, rng)
    } else if options.stratified {
        pick_stratified(candidates, count, rng)
    } else {
        pick_adaptive(candidates, ability, count, now, rng)
    }
}

/// 限定题型时先收窄词库：填空题只取有挖空句的词；
/// 一个都没有时保留原词库，由出题阶段回退题型
pub fn restrict_to_question_type(words: &mut Vec<Word>, question_type: Option<QuestionType>) {
    if question_type == Some(QuestionType::FillGap) && words.iter().any(Word::has_gap_sentence) {
        words.retain(Word::has_gap_sentence);
    }
}

/// 为一次测验选出至多 `count` 个互不重复的词。
///
/// 找不到词时返回空列表；只有存储错误会向上传播。
pub fn select_words<Repo, R>(
    repo: &Repo,
    rng: &mut R,
    user_id: &str,
    ability: f64,
    count: usize,
    options: &SelectOptions,
) -> Result<Vec<Word>, StoreError>
where
    Repo: QuizRepository + ?Sized,
    R: Rng + ?Sized,
{
    if count == 0 {
        return Ok(Vec::new());
    }

    let mut words = repo.list_words(options.tier_filter.as_deref())?;
    restrict_to_question_type(&mut words, options.question_type);
    let mut stats_by_word: HashMap<String, UserWordStat> = if options.stratified {
        HashMap::new()
    } else {
        repo.list_user_word_stats(user_id)?
            .into_iter()
            .map(|stat| (stat.word_id.clone(), stat))
            .collect()
    };

    let candidates: Vec<Candidate> = words
        .into_iter()
        .map(|word| {
            let stat = stats_by_word.remove(&word.id);
            Candidate::new(word, stat)
        })
        .collect();

    let selected = select_from_candidates(&candidates, ability, count, options, Utc::now(), rng);

    tracing::info!(
        user_id,
        requested = count,
        selected = selected.len(),
        catalog = candidates.len(),
        tier = options.tier_filter.as_deref().unwrap_or("*"),
        weak_only = options.weak_only,
        stratified = options.stratified,
        "Words selected"
    );

    Ok(selected)
}
