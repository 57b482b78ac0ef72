use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::store::keys;
use crate::store::{Store, StoreError};

/// 一轮已完成的练习
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PracticeSession {
    pub id: String,
    pub user_id: String,
    pub mode: String,
    pub score: u32,
    pub total: u32,
    pub completed_at: DateTime<Utc>,
}

impl Store {
    pub fn record_practice_session(&self, session: &PracticeSession) -> Result<(), StoreError> {
        if session.score > session.total {
            return Err(StoreError::Validation(format!(
                "score {} exceeds total {}",
                session.score, session.total
            )));
        }

        let seq = self.db.generate_id()?;
        let key = keys::practice_session_key(
            &session.user_id,
            session.completed_at.timestamp_millis(),
            seq,
        )?;
        self.practice_sessions
            .insert(key.as_bytes(), Self::serialize(session)?)?;
        Ok(())
    }

    /// 按完成时间倒序
    pub fn list_practice_sessions(
        &self,
        user_id: &str,
        limit: usize,
    ) -> Result<Vec<PracticeSession>, StoreError> {
        let prefix = keys::practice_session_prefix(user_id)?;
        let mut sessions = Vec::with_capacity(limit.min(64));
        for item in self.practice_sessions.scan_prefix(prefix.as_bytes()) {
            if sessions.len() >= limit {
                break;
            }
            let (_, v) = item?;
            sessions.push(Self::deserialize(&v)?);
        }
        Ok(sessions)
    }
}
