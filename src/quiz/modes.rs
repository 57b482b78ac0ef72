//! 测验模式预设与请求参数收敛。

use crate::constants::{DEFAULT_DIFFICULTY, SCORE_MAX, SCORE_MIN};
use crate::quiz::types::{QuestionType, SelectOptions};

pub const DEFAULT_MODE: &str = "shuffle";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModePreset {
    pub name: &'static str,
    pub count: usize,
    pub tier_filter: Option<&'static str>,
    pub weak_only: bool,
    pub question_type: Option<QuestionType>,
    pub stratified: bool,
}

impl ModePreset {
    const fn plain(name: &'static str, count: usize) -> Self {
        Self {
            name,
            count,
            tier_filter: None,
            weak_only: false,
            question_type: None,
            stratified: false,
        }
    }

    const fn typed(name: &'static str, question_type: QuestionType) -> Self {
        Self {
            question_type: Some(question_type),
            ..Self::plain(name, 15)
        }
    }

    const fn tier(name: &'static str) -> Self {
        Self {
            tier_filter: Some(name),
            ..Self::plain(name, 15)
        }
    }

    pub fn select_options(&self) -> SelectOptions {
        SelectOptions {
            tier_filter: self.tier_filter.map(str::to_string),
            weak_only: self.weak_only,
            question_type: self.question_type,
            stratified: self.stratified,
        }
    }
}

pub const MODE_PRESETS: &[ModePreset] = &[
    ModePreset::plain("shuffle", 15),
    ModePreset::typed("guess_word", QuestionType::GuessWord),
    ModePreset::typed("meaning_match", QuestionType::MeaningMatch),
    ModePreset::typed("fill_gap", QuestionType::FillGap),
    ModePreset {
        weak_only: true,
        ..ModePreset::plain("weak_words", 15)
    },
    ModePreset::plain("sprint", 10),
    ModePreset::plain("perfection", 10),
    ModePreset::plain("rush", 10),
    ModePreset {
        stratified: true,
        ..ModePreset::plain("level_test", 30)
    },
    ModePreset::tier("kids_beginner"),
    ModePreset::tier("kids_intermediate"),
    ModePreset::tier("kids_advanced"),
    ModePreset::tier("adult_beginner"),
    ModePreset::tier("adult_intermediate"),
    ModePreset::tier("adult_advanced"),
];

/// 缺省为 `shuffle`；未知模式返回 `None`
pub fn resolve_mode(mode: Option<&str>) -> Option<&'static ModePreset> {
    let name = mode.map(str::trim).unwrap_or(DEFAULT_MODE);
    MODE_PRESETS.iter().find(|preset| preset.name == name)
}

/// 四舍五入后夹到 `[1, max]`；缺失或非有限值用 `default`
pub fn resolve_count(raw: Option<f64>, default: usize, max: usize) -> usize {
    match raw {
        Some(value) if value.is_finite() => {
            let rounded = value.round().clamp(1.0, max as f64);
            rounded as usize
        }
        _ => default.clamp(1, max.max(1)),
    }
}

pub fn resolve_difficulty(raw: Option<f64>) -> f64 {
    match raw {
        Some(value) if value.is_finite() => value.clamp(SCORE_MIN, SCORE_MAX),
        _ => DEFAULT_DIFFICULTY,
    }
}
