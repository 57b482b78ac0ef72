use chrono::{DateTime, Utc};
use sled::transaction::ConflictableTransactionError;
use sled::Transactional;

use crate::quiz::ability::{update_ability, AbilityUpdate};
use crate::store::keys;
use crate::store::operations::abilities::{decode_ability, encode_ability};
use crate::store::operations::ability_log::AbilityLogEntry;
use crate::store::operations::word_stats::UserWordStat;
use crate::store::{map_tx_error, Store, StoreError};

/// 一次作答提交后的结果
#[derive(Debug, Clone)]
pub struct AnswerCommit {
    pub ability: AbilityUpdate,
    pub stat: UserWordStat,
    pub entry: AbilityLogEntry,
}

impl Store {
    /// 在同一个 sled 事务里写入能力值、词统计与能力日志。
    ///
    /// 任一步失败则三棵树都不变。冲突时 sled 会重跑闭包，
    /// 新值只由事务内读到的旧值算出，并发提交不会丢失更新。
    pub fn commit_answer(
        &self,
        user_id: &str,
        word_id: &str,
        difficulty: f64,
        is_correct: bool,
        now: DateTime<Utc>,
    ) -> Result<AnswerCommit, StoreError> {
        let ability_key = keys::user_ability_key(user_id)?;
        let stat_key = keys::user_word_stat_key(user_id, word_id)?;
        let seq = self.db.generate_id()?;
        let log_key = keys::ability_log_key(user_id, now.timestamp_millis(), seq)?;
        let entry_id = uuid::Uuid::new_v4().to_string();

        let commit = (&self.user_abilities, &self.user_word_stats, &self.ability_log)
            .transaction(|(tx_abilities, tx_stats, tx_log)| {
                let old = decode_ability(tx_abilities.get(ability_key.as_bytes())?.as_deref());
                let new = update_ability(old, difficulty, is_correct);

                let current = match tx_stats.get(stat_key.as_bytes())? {
                    Some(raw) => serde_json::from_slice::<UserWordStat>(&raw).map_err(|_| {
                        ConflictableTransactionError::Abort(StoreError::Corrupt {
                            entity: "user_word_stat".to_string(),
                            key: stat_key.clone(),
                        })
                    })?,
                    None => UserWordStat::new(user_id, word_id),
                };
                let stat = current.apply_answer(is_correct, now);

                let entry = AbilityLogEntry {
                    id: entry_id.clone(),
                    user_id: user_id.to_string(),
                    word_id: word_id.to_string(),
                    is_correct,
                    old_score: old,
                    new_score: new,
                    created_at: now,
                };

                let stat_bytes = Self::serialize(&stat).map_err(ConflictableTransactionError::Abort)?;
                let entry_bytes =
                    Self::serialize(&entry).map_err(ConflictableTransactionError::Abort)?;

                tx_abilities.insert(ability_key.as_bytes(), encode_ability(new).to_vec())?;
                tx_stats.insert(stat_key.as_bytes(), stat_bytes)?;
                tx_log.insert(log_key.as_bytes(), entry_bytes)?;

                Ok(AnswerCommit {
                    ability: AbilityUpdate { old, new },
                    stat,
                    entry,
                })
            })
            .map_err(map_tx_error)?;

        tracing::debug!(
            user_id,
            word_id,
            old = commit.ability.old,
            new = commit.ability.new,
            streak = commit.stat.streak,
            "Answer committed"
        );
        Ok(commit)
    }
}
