use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::quiz::scheduler::next_interval;
use crate::store::keys;
use crate::store::{Store, StoreError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserWordStat {
    pub user_id: String,
    pub word_id: String,
    pub times_seen: u32,
    pub times_correct: u32,
    pub times_incorrect: u32,
    pub streak: u32,
    pub next_review_at: Option<DateTime<Utc>>,
    pub srs_interval_hours: f64,
    pub last_seen_at: Option<DateTime<Utc>>,
}

impl UserWordStat {
    pub fn new(user_id: &str, word_id: &str) -> Self {
        Self {
            user_id: user_id.to_string(),
            word_id: word_id.to_string(),
            times_seen: 0,
            times_correct: 0,
            times_incorrect: 0,
            streak: 0,
            next_review_at: None,
            srs_interval_hours: 0.0,
            last_seen_at: None,
        }
    }

    /// 正确率；从未作答时为 0
    pub fn accuracy(&self) -> f64 {
        f64::from(self.times_correct) / f64::from(self.times_seen.max(1))
    }

    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.next_review_at.is_some_and(|at| at <= now)
    }

    /// 作答一次后的新状态，纯函数（事务冲突重试时可能被调用多次）
    pub fn apply_answer(&self, is_correct: bool, now: DateTime<Utc>) -> Self {
        let mut next = self.clone();
        next.times_seen = next.times_seen.saturating_add(1);
        if is_correct {
            next.times_correct = next.times_correct.saturating_add(1);
            next.streak = next.streak.saturating_add(1);
        } else {
            next.times_incorrect = next.times_incorrect.saturating_add(1);
            next.streak = 0;
        }

        let schedule = next_interval(next.streak, is_correct, now);
        next.srs_interval_hours = schedule.interval_hours;
        next.next_review_at = Some(schedule.next_review_at);
        next.last_seen_at = Some(now);
        next
    }
}

impl Store {
    pub fn get_user_word_stat(
        &self,
        user_id: &str,
        word_id: &str,
    ) -> Result<Option<UserWordStat>, StoreError> {
        let key = keys::user_word_stat_key(user_id, word_id)?;
        match self.user_word_stats.get(key.as_bytes())? {
            Some(raw) => Ok(Some(Self::deserialize(&raw)?)),
            None => Ok(None),
        }
    }

    pub fn list_user_word_stats(&self, user_id: &str) -> Result<Vec<UserWordStat>, StoreError> {
        let prefix = keys::user_word_stat_prefix(user_id)?;
        let mut stats = Vec::new();
        for item in self.user_word_stats.scan_prefix(prefix.as_bytes()) {
            let (_, v) = item?;
            stats.push(Self::deserialize::<UserWordStat>(&v)?);
        }
        Ok(stats)
    }
}
