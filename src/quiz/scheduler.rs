//! 复习间隔调度：固定阶梯，答错回到最短间隔。

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::{MILLIS_PER_HOUR, SRS_LADDER_HOURS};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewSchedule {
    pub interval_hours: f64,
    pub next_review_at: DateTime<Utc>,
}

/// 阶梯下标。`streak` 为本次作答之后的连对次数。
fn ladder_index(streak: u32, is_correct: bool) -> usize {
    if !is_correct {
        return 0;
    }
    let last = SRS_LADDER_HOURS.len() - 1;
    (streak.saturating_sub(1) as usize).min(last)
}

pub fn interval_hours(streak: u32, is_correct: bool) -> f64 {
    SRS_LADDER_HOURS[ladder_index(streak, is_correct)]
}

pub fn next_interval(streak: u32, is_correct: bool, now: DateTime<Utc>) -> ReviewSchedule {
    let interval_hours = interval_hours(streak, is_correct);
    let millis = (interval_hours * MILLIS_PER_HOUR as f64).round() as i64;

    ReviewSchedule {
        interval_hours,
        next_review_at: now + Duration::milliseconds(millis),
    }
}
