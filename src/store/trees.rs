pub const WORDS: &str = "words";
pub const WORDS_BY_TIER: &str = "words_by_tier";
pub const USER_WORD_STATS: &str = "user_word_stats";
pub const USER_ABILITIES: &str = "user_abilities";
pub const ABILITY_LOG: &str = "ability_log";
pub const CONFIG_VERSIONS: &str = "config_versions";
pub const PRACTICE_SESSIONS: &str = "practice_sessions";
