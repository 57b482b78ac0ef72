pub mod keys;
pub mod migrate;
pub mod operations;
pub mod trees;

use serde::de::DeserializeOwned;
use serde::Serialize;
use sled::Db;
use thiserror::Error;

#[derive(Debug)]
pub struct Store {
    db: Db,
    pub words: sled::Tree,
    pub user_word_stats: sled::Tree,
    pub user_abilities: sled::Tree,
    pub ability_log: sled::Tree,
    pub practice_sessions: sled::Tree,
    pub config_versions: sled::Tree,
    // Secondary index trees
    pub words_by_tier: sled::Tree,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("sled error: {0}")]
    Sled(#[from] sled::Error),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("not found: entity={entity}, key={key}")]
    NotFound { entity: String, key: String },
    #[error("validation error: {0}")]
    Validation(String),
    #[error("corrupt value: entity={entity}, key={key}")]
    Corrupt { entity: String, key: String },
    #[error("migration error at version {version}: {message}")]
    Migration { version: u32, message: String },
}

pub(crate) fn map_tx_error(error: sled::transaction::TransactionError<StoreError>) -> StoreError {
    match error {
        sled::transaction::TransactionError::Abort(store_error) => store_error,
        sled::transaction::TransactionError::Storage(storage_error) => {
            StoreError::Sled(storage_error)
        }
    }
}

impl Store {
    pub fn open(sled_path: &str) -> Result<Self, StoreError> {
        let db = sled::open(sled_path)?;
        Self::from_db(db)
    }

    /// 内存数据库，进程退出即丢弃
    pub fn temporary() -> Result<Self, StoreError> {
        let db = sled::Config::new().temporary(true).open()?;
        Self::from_db(db)
    }

    fn from_db(db: Db) -> Result<Self, StoreError> {
        let words = db.open_tree(trees::WORDS)?;
        let user_word_stats = db.open_tree(trees::USER_WORD_STATS)?;
        let user_abilities = db.open_tree(trees::USER_ABILITIES)?;
        let ability_log = db.open_tree(trees::ABILITY_LOG)?;
        let practice_sessions = db.open_tree(trees::PRACTICE_SESSIONS)?;
        let config_versions = db.open_tree(trees::CONFIG_VERSIONS)?;
        let words_by_tier = db.open_tree(trees::WORDS_BY_TIER)?;

        Ok(Self {
            db,
            words,
            user_word_stats,
            user_abilities,
            ability_log,
            practice_sessions,
            config_versions,
            words_by_tier,
        })
    }

    pub fn run_migrations(&self) -> Result<(), StoreError> {
        migrate::run(self)
    }

    pub fn flush(&self) -> Result<(), StoreError> {
        self.db.flush()?;
        Ok(())
    }

    pub(crate) fn serialize<T: Serialize>(value: &T) -> Result<Vec<u8>, StoreError> {
        Ok(serde_json::to_vec(value)?)
    }

    pub(crate) fn deserialize<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, StoreError> {
        Ok(serde_json::from_slice(bytes)?)
    }
}
