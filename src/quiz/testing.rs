//! 单元测试用的内存仓储。

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::{DateTime, Utc};

use crate::constants::DEFAULT_ABILITY;
use crate::quiz::ability::{update_ability, AbilityUpdate};
use crate::quiz::repository::QuizRepository;
use crate::store::operations::ability_log::AbilityLogEntry;
use crate::store::operations::answers::AnswerCommit;
use crate::store::operations::word_stats::UserWordStat;
use crate::store::operations::words::Word;
use crate::store::StoreError;

#[derive(Default)]
pub struct MemoryRepository {
    words: Vec<Word>,
    stats: Mutex<HashMap<(String, String), UserWordStat>>,
    abilities: Mutex<HashMap<String, f64>>,
    log: Mutex<Vec<AbilityLogEntry>>,
}

impl MemoryRepository {
    pub fn with_words(words: Vec<Word>) -> Self {
        Self {
            words,
            ..Self::default()
        }
    }

    pub fn set_ability(&self, user_id: &str, ability: f64) {
        self.abilities
            .lock()
            .unwrap()
            .insert(user_id.to_string(), ability);
    }

    pub fn put_stat(&self, stat: UserWordStat) {
        self.stats
            .lock()
            .unwrap()
            .insert((stat.user_id.clone(), stat.word_id.clone()), stat);
    }

    pub fn log_entries(&self) -> Vec<AbilityLogEntry> {
        self.log.lock().unwrap().clone()
    }
}

pub fn word(id: &str, difficulty: f64, tier: &str) -> Word {
    Word {
        id: id.to_string(),
        text: format!("word-{id}"),
        phonetic: format!("/{id}/"),
        definition: format!("meaning of {id}"),
        sentence: Some(format!("A sentence with word-{id}.")),
        gap_sentence: Some("A sentence with ____.".to_string()),
        difficulty,
        tier: tier.to_string(),
    }
}

impl QuizRepository for MemoryRepository {
    fn list_words(&self, tier: Option<&str>) -> Result<Vec<Word>, StoreError> {
        Ok(self
            .words
            .iter()
            .filter(|w| tier.map_or(true, |t| w.tier == t))
            .cloned()
            .collect())
    }

    fn get_word(&self, word_id: &str) -> Result<Option<Word>, StoreError> {
        Ok(self.words.iter().find(|w| w.id == word_id).cloned())
    }

    fn list_user_word_stats(&self, user_id: &str) -> Result<Vec<UserWordStat>, StoreError> {
        Ok(self
            .stats
            .lock()
            .unwrap()
            .values()
            .filter(|s| s.user_id == user_id)
            .cloned()
            .collect())
    }

    fn get_ability(&self, user_id: &str) -> Result<f64, StoreError> {
        Ok(self
            .abilities
            .lock()
            .unwrap()
            .get(user_id)
            .copied()
            .unwrap_or(DEFAULT_ABILITY))
    }

    fn commit_answer(
        &self,
        user_id: &str,
        word_id: &str,
        difficulty: f64,
        is_correct: bool,
        now: DateTime<Utc>,
    ) -> Result<AnswerCommit, StoreError> {
        // 按固定顺序持有全部锁，三处写入对外表现为一次提交
        let mut abilities = self.abilities.lock().unwrap();
        let mut stats = self.stats.lock().unwrap();
        let mut log = self.log.lock().unwrap();

        let old = abilities.get(user_id).copied().unwrap_or(DEFAULT_ABILITY);
        let new = update_ability(old, difficulty, is_correct);

        let key = (user_id.to_string(), word_id.to_string());
        let stat = stats
            .get(&key)
            .cloned()
            .unwrap_or_else(|| UserWordStat::new(user_id, word_id))
            .apply_answer(is_correct, now);

        let entry = AbilityLogEntry {
            id: format!("log-{}", log.len() + 1),
            user_id: user_id.to_string(),
            word_id: word_id.to_string(),
            is_correct,
            old_score: old,
            new_score: new,
            created_at: now,
        };

        abilities.insert(user_id.to_string(), new);
        stats.insert(key, stat.clone());
        log.push(entry.clone());

        Ok(AnswerCommit {
            ability: AbilityUpdate { old, new },
            stat,
            entry,
        })
    }
}
