use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    GuessWord,
    MeaningMatch,
    FillGap,
}

impl QuestionType {
    pub const ALL: [QuestionType; 3] = [
        QuestionType::GuessWord,
        QuestionType::MeaningMatch,
        QuestionType::FillGap,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionType::GuessWord => "guess_word",
            QuestionType::MeaningMatch => "meaning_match",
            QuestionType::FillGap => "fill_gap",
        }
    }
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QuestionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "guess_word" => Ok(QuestionType::GuessWord),
            "meaning_match" => Ok(QuestionType::MeaningMatch),
            "fill_gap" => Ok(QuestionType::FillGap),
            other => Err(format!("unknown question type: {other}")),
        }
    }
}

/// 渲染用的选择题，不落库
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: String,
    pub word_id: String,
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    pub prompt: String,
    pub options: [String; 3],
    pub correct_option_index: u8,
    pub word: String,
    pub phonetic: String,
    pub definition: String,
    pub sentence: String,
    pub difficulty_score: f64,
}

impl Question {
    pub fn correct_option(&self) -> &str {
        &self.options[self.correct_option_index as usize]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectOptions {
    pub tier_filter: Option<String>,
    pub weak_only: bool,
    pub question_type: Option<QuestionType>,
    pub stratified: bool,
}
