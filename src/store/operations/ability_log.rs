use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::store::keys;
use crate::store::{Store, StoreError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AbilityLogEntry {
    pub id: String,
    pub user_id: String,
    pub word_id: String,
    pub is_correct: bool,
    pub old_score: f64,
    pub new_score: f64,
    pub created_at: DateTime<Utc>,
}

impl Store {
    /// 最近的能力变化记录，新的在前
    pub fn list_ability_log(
        &self,
        user_id: &str,
        limit: usize,
    ) -> Result<Vec<AbilityLogEntry>, StoreError> {
        let prefix = keys::ability_log_prefix(user_id)?;
        let mut entries = Vec::with_capacity(limit.min(64));
        for item in self.ability_log.scan_prefix(prefix.as_bytes()) {
            if entries.len() >= limit {
                break;
            }
            let (_, v) = item?;
            entries.push(Self::deserialize(&v)?);
        }
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};

    use crate::store::Store;

    #[test]
    fn newest_entries_come_first() {
        let store = Store::temporary().unwrap();
        let now = Utc::now();
        store
            .commit_answer("u1", "w-old", 50.0, true, now - Duration::minutes(10))
            .unwrap();
        store
            .commit_answer("u1", "w-new", 50.0, true, now - Duration::minutes(1))
            .unwrap();
        store
            .commit_answer("u1", "w-mid", 50.0, true, now - Duration::minutes(5))
            .unwrap();

        let entries = store.list_ability_log("u1", 2).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].word_id, "w-new");
        assert_eq!(entries[1].word_id, "w-mid");
    }

    #[test]
    fn same_millisecond_entries_keep_write_order() {
        let store = Store::temporary().unwrap();
        let now = Utc::now();
        for word_id in ["w1", "w2", "w3", "w4"] {
            store.commit_answer("u1", word_id, 50.0, true, now).unwrap();
        }

        let entries = store.list_ability_log("u1", 10).unwrap();
        let words: Vec<&str> = entries.iter().map(|e| e.word_id.as_str()).collect();
        assert_eq!(words, ["w4", "w3", "w2", "w1"]);
        // 新的在前，且每条的旧值接上前一条的新值
        assert_eq!(entries[0].old_score, entries[1].new_score);
    }

    #[test]
    fn log_is_scoped_to_user() {
        let store = Store::temporary().unwrap();
        store.commit_answer("u1", "w1", 50.0, true, Utc::now()).unwrap();
        assert!(store.list_ability_log("u10", 10).unwrap().is_empty());
    }
}
