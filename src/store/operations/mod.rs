pub mod abilities;
pub mod ability_log;
pub mod answers;
pub mod practice_sessions;
pub mod word_stats;
pub mod words;
