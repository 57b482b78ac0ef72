use crate::store::StoreError;

/// 键片段不能为空，也不能包含分隔符 `:`，否则前缀扫描会串到别的用户/词
fn segment<'a>(name: &str, value: &'a str) -> Result<&'a str, StoreError> {
    if value.is_empty() {
        return Err(StoreError::Validation(format!("{name} must not be empty")));
    }
    if value.contains(':') {
        return Err(StoreError::Validation(format!(
            "{name} must not contain ':'"
        )));
    }
    Ok(value)
}

pub fn word_key(word_id: &str) -> Result<String, StoreError> {
    Ok(segment("word_id", word_id)?.to_string())
}

pub fn word_tier_key(tier: &str, word_id: &str) -> Result<String, StoreError> {
    Ok(format!(
        "{}:{}",
        segment("tier", tier)?,
        segment("word_id", word_id)?
    ))
}

pub fn word_tier_prefix(tier: &str) -> Result<String, StoreError> {
    Ok(format!("{}:", segment("tier", tier)?))
}

pub fn user_word_stat_key(user_id: &str, word_id: &str) -> Result<String, StoreError> {
    Ok(format!(
        "{}:{}",
        segment("user_id", user_id)?,
        segment("word_id", word_id)?
    ))
}

pub fn user_word_stat_prefix(user_id: &str) -> Result<String, StoreError> {
    Ok(format!("{}:", segment("user_id", user_id)?))
}

pub fn user_ability_key(user_id: &str) -> Result<String, StoreError> {
    Ok(segment("user_id", user_id)?.to_string())
}

/// `user:reverse_ts:reverse_seq`，前缀扫描即新的在前；
/// 同一毫秒内按单调序号区分先后
fn newest_first_key(user_id: &str, timestamp_ms: i64, seq: u64) -> Result<String, StoreError> {
    let ts = timestamp_ms.max(0) as u64;
    Ok(format!(
        "{}:{:020}:{:020}",
        segment("user_id", user_id)?,
        u64::MAX - ts,
        u64::MAX - seq
    ))
}

pub fn ability_log_key(user_id: &str, timestamp_ms: i64, seq: u64) -> Result<String, StoreError> {
    newest_first_key(user_id, timestamp_ms, seq)
}

pub fn ability_log_prefix(user_id: &str) -> Result<String, StoreError> {
    Ok(format!("{}:", segment("user_id", user_id)?))
}

pub fn practice_session_key(user_id: &str, timestamp_ms: i64, seq: u64) -> Result<String, StoreError> {
    newest_first_key(user_id, timestamp_ms, seq)
}

pub fn practice_session_prefix(user_id: &str) -> Result<String, StoreError> {
    Ok(format!("{}:", segment("user_id", user_id)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ability_log_key_orders_by_time_desc() {
        let k_new = ability_log_key("u1", 2000, 1).unwrap();
        let k_old = ability_log_key("u1", 1000, 2).unwrap();
        assert!(k_new < k_old);
    }

    #[test]
    fn same_millisecond_orders_by_sequence_desc() {
        let first = ability_log_key("u1", 1000, 7).unwrap();
        let second = ability_log_key("u1", 1000, 8).unwrap();
        assert!(second < first);
        assert!(first.starts_with(&ability_log_prefix("u1").unwrap()));
    }

    #[test]
    fn separator_in_segment_is_rejected() {
        assert!(matches!(
            user_word_stat_key("u:1", "w1"),
            Err(StoreError::Validation(_))
        ));
        assert!(matches!(word_key(""), Err(StoreError::Validation(_))));
    }

    #[test]
    fn tier_prefix_matches_tier_keys() {
        let key = word_tier_key("kids_beginner", "w1").unwrap();
        assert!(key.starts_with(&word_tier_prefix("kids_beginner").unwrap()));
    }
}
