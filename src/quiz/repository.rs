//! 选词/出题策略与存储之间的窄接口。

use chrono::{DateTime, Utc};

use crate::store::operations::answers::AnswerCommit;
use crate::store::operations::word_stats::UserWordStat;
use crate::store::operations::words::Word;
use crate::store::{Store, StoreError};

pub trait QuizRepository {
    /// 词库；`tier` 为 `Some` 时只返回该 tier
    fn list_words(&self, tier: Option<&str>) -> Result<Vec<Word>, StoreError>;

    fn get_word(&self, word_id: &str) -> Result<Option<Word>, StoreError>;

    fn list_user_word_stats(&self, user_id: &str) -> Result<Vec<UserWordStat>, StoreError>;

    fn get_ability(&self, user_id: &str) -> Result<f64, StoreError>;

    /// 能力值、词统计、能力日志三处写入必须一起成功或一起失败
    fn commit_answer(
        &self,
        user_id: &str,
        word_id: &str,
        difficulty: f64,
        is_correct: bool,
        now: DateTime<Utc>,
    ) -> Result<AnswerCommit, StoreError>;
}

impl QuizRepository for Store {
    fn list_words(&self, tier: Option<&str>) -> Result<Vec<Word>, StoreError> {
        Store::list_words(self, tier)
    }

    fn get_word(&self, word_id: &str) -> Result<Option<Word>, StoreError> {
        Store::get_word(self, word_id)
    }

    fn list_user_word_stats(&self, user_id: &str) -> Result<Vec<UserWordStat>, StoreError> {
        Store::list_user_word_stats(self, user_id)
    }

    fn get_ability(&self, user_id: &str) -> Result<f64, StoreError> {
        Store::get_ability(self, user_id)
    }

    fn commit_answer(
        &self,
        user_id: &str,
        word_id: &str,
        difficulty: f64,
        is_correct: bool,
        now: DateTime<Utc>,
    ) -> Result<AnswerCommit, StoreError> {
        Store::commit_answer(self, user_id, word_id, difficulty, is_correct, now)
    }
}
