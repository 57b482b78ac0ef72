use serde::{Deserialize, Serialize};
use sled::Transactional;

use crate::constants::DEFAULT_DIFFICULTY;
use crate::quiz::ability::clamp_score;
use crate::store::keys;
use crate::store::{map_tx_error, Store, StoreError};

fn default_difficulty() -> f64 {
    DEFAULT_DIFFICULTY
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Word {
    pub id: String,
    pub text: String,
    pub phonetic: String,
    pub definition: String,
    pub sentence: Option<String>,
    pub gap_sentence: Option<String>,
    #[serde(default = "default_difficulty")]
    pub difficulty: f64,
    pub tier: String,
}

impl Word {
    /// 收敛后的难度，导入数据里的越界/非有限值按默认难度处理
    pub fn difficulty_score(&self) -> f64 {
        clamp_score(self.difficulty, DEFAULT_DIFFICULTY)
    }

    pub fn has_gap_sentence(&self) -> bool {
        self.gap_sentence
            .as_deref()
            .is_some_and(|s| !s.trim().is_empty())
    }
}

impl Store {
    /// 写入词条并维护 tier 索引；tier 变化时移除旧索引
    pub fn upsert_word(&self, word: &Word) -> Result<(), StoreError> {
        let key = keys::word_key(&word.id)?;
        let tier_key = keys::word_tier_key(&word.tier, &word.id)?;
        let value = Self::serialize(word)?;

        (&self.words, &self.words_by_tier)
            .transaction(|(tx_words, tx_tier)| {
                if let Some(old_raw) = tx_words.get(key.as_bytes())? {
                    let old: Word = serde_json::from_slice(&old_raw).map_err(|error| {
                        sled::transaction::ConflictableTransactionError::Abort(
                            StoreError::Serialization(error),
                        )
                    })?;
                    if old.tier != word.tier {
                        let old_tier_key = keys::word_tier_key(&old.tier, &old.id)
                            .map_err(sled::transaction::ConflictableTransactionError::Abort)?;
                        tx_tier.remove(old_tier_key.as_bytes())?;
                    }
                }

                tx_words.insert(key.as_bytes(), value.as_slice())?;
                tx_tier.insert(tier_key.as_bytes(), word.id.as_bytes())?;
                Ok(())
            })
            .map_err(map_tx_error)?;

        Ok(())
    }

    pub fn get_word(&self, word_id: &str) -> Result<Option<Word>, StoreError> {
        let key = keys::word_key(word_id)?;
        match self.words.get(key.as_bytes())? {
            Some(raw) => Ok(Some(Self::deserialize(&raw)?)),
            None => Ok(None),
        }
    }

    /// 列出词库；指定 tier 时走 `words_by_tier` 索引
    pub fn list_words(&self, tier: Option<&str>) -> Result<Vec<Word>, StoreError> {
        let Some(tier) = tier else {
            let mut words = Vec::with_capacity(self.words.len());
            for item in self.words.iter() {
                let (_, v) = item?;
                words.push(Self::deserialize::<Word>(&v)?);
            }
            return Ok(words);
        };

        let prefix = keys::word_tier_prefix(tier)?;
        let mut words = Vec::new();
        for item in self.words_by_tier.scan_prefix(prefix.as_bytes()) {
            let (_, value) = item?;
            let word_id = match std::str::from_utf8(&value) {
                Ok(id) => id,
                Err(e) => {
                    tracing::warn!(error = %e, tier, "Invalid UTF-8 in tier index");
                    continue;
                }
            };
            // 索引可能短暂落后于主表，按主表为准
            if let Some(word) = self.get_word(word_id)? {
                if word.tier == tier {
                    words.push(word);
                }
            }
        }
        Ok(words)
    }

    pub fn count_words(&self) -> Result<u64, StoreError> {
        Ok(self.words.len() as u64)
    }
}
