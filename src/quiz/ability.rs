//! 能力估计：基于 logistic 期望得分的 Elo 式单标量更新。

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_ABILITY, DEFAULT_DIFFICULTY, ELO_K, ELO_SCALE, SCORE_MAX, SCORE_MIN,
};

/// 一次原子更新的结果，显式携带更新前后的值
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AbilityUpdate {
    pub old: f64,
    pub new: f64,
}

impl AbilityUpdate {
    pub fn delta(&self) -> f64 {
        self.new - self.old
    }
}

/// 将分数收敛到 [0, 100]，非有限值回退为 `fallback`
pub fn clamp_score(value: f64, fallback: f64) -> f64 {
    if value.is_finite() {
        value.clamp(SCORE_MIN, SCORE_MAX)
    } else {
        fallback
    }
}

/// 能力为 `ability` 的学习者答对难度为 `difficulty` 的词的期望概率
pub fn expected_score(ability: f64, difficulty: f64) -> f64 {
    1.0 / (1.0 + ((difficulty - ability) / ELO_SCALE).exp())
}

pub fn update_ability(ability: f64, difficulty: f64, is_correct: bool) -> f64 {
    let ability = clamp_score(ability, DEFAULT_ABILITY);
    let difficulty = clamp_score(difficulty, DEFAULT_DIFFICULTY);

    let expected = expected_score(ability, difficulty);
    let actual = if is_correct { 1.0 } else { 0.0 };

    clamp_score(ability + ELO_K * (actual - expected), ability)
}
