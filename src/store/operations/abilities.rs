use crate::constants::DEFAULT_ABILITY;
use crate::quiz::ability::clamp_score;
use crate::store::keys;
use crate::store::{Store, StoreError};

/// 缺失或长度不对的值按默认中点处理
pub(crate) fn decode_ability(raw: Option<&[u8]>) -> f64 {
    raw.and_then(|bytes| <[u8; 8]>::try_from(bytes).ok())
        .map(f64::from_be_bytes)
        .map(|value| clamp_score(value, DEFAULT_ABILITY))
        .unwrap_or(DEFAULT_ABILITY)
}

pub(crate) fn encode_ability(value: f64) -> [u8; 8] {
    value.to_be_bytes()
}

impl Store {
    /// 获取用户能力值，不存在时返回默认中点
    pub fn get_ability(&self, user_id: &str) -> Result<f64, StoreError> {
        let key = keys::user_ability_key(user_id)?;
        let raw = self.user_abilities.get(key.as_bytes())?;
        Ok(decode_ability(raw.as_deref()))
    }
}
