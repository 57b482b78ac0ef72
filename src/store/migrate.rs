use crate::store::keys;
use crate::store::operations::words::Word;
use crate::store::{Store, StoreError};

const VERSION_KEY: &str = "_meta:version";

type MigrationFn = fn(&Store) -> Result<(), StoreError>;

fn migrations() -> Vec<(&'static str, MigrationFn)> {
    vec![
        ("001_initial", m001_initial),
        ("002_words_by_tier_index", m002_words_by_tier_index),
    ]
}

/// 执行所有未应用的迁移。
///
/// 每个迁移必须幂等：迁移函数成功而版本号尚未写入时进程可能中断，
/// 重启后会再次执行。版本号只前进不后退。
pub fn run(store: &Store) -> Result<(), StoreError> {
    let current = get_current_version(store)?;

    for (index, (name, func)) in migrations().iter().enumerate() {
        let version = (index + 1) as u32;
        if version > current {
            tracing::info!(version, name, "Running migration");
            func(store)?;
            set_version(store, version)?;
            tracing::info!(version, name, "Migration complete");
        } else {
            tracing::debug!(version, name, "Migration already applied, skipping");
        }
    }

    Ok(())
}

pub fn get_current_version(store: &Store) -> Result<u32, StoreError> {
    match store.config_versions.get(VERSION_KEY.as_bytes())? {
        Some(raw) => match <[u8; 4]>::try_from(raw.as_ref()) {
            Ok(bytes) => Ok(u32::from_be_bytes(bytes)),
            Err(_) => Err(StoreError::Corrupt {
                entity: "schema_version".to_string(),
                key: VERSION_KEY.to_string(),
            }),
        },
        None => Ok(0),
    }
}

pub fn set_version(store: &Store, version: u32) -> Result<(), StoreError> {
    let current = get_current_version(store)?;
    if version < current {
        return Err(StoreError::Migration {
            version,
            message: format!("Refuse to downgrade from {} to {}", current, version),
        });
    }

    store
        .config_versions
        .insert(VERSION_KEY.as_bytes(), version.to_be_bytes().to_vec())?;
    Ok(())
}

fn m001_initial(_store: &Store) -> Result<(), StoreError> {
    Ok(())
}

/// 由词表重建 tier 索引，覆盖早于索引写入的数据
fn m002_words_by_tier_index(store: &Store) -> Result<(), StoreError> {
    let mut rebuilt = 0usize;
    for item in store.words.iter() {
        let (_, value) = item?;
        let word: Word = Store::deserialize(&value)?;
        let tier_key = keys::word_tier_key(&word.tier, &word.id)?;
        store
            .words_by_tier
            .insert(tier_key.as_bytes(), word.id.as_bytes())?;
        rebuilt += 1;
    }
    tracing::info!(rebuilt, "Rebuilt words_by_tier index");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn migration_is_idempotent() {
        let store = Store::temporary().unwrap();

        run(&store).unwrap();
        let first = get_current_version(&store).unwrap();
        run(&store).unwrap();
        let second = get_current_version(&store).unwrap();

        assert_eq!(first, 2);
        assert_eq!(second, 2);
    }

    #[test]
    fn downgrade_is_rejected() {
        let store = Store::temporary().unwrap();

        set_version(&store, 3).unwrap();
        let err = set_version(&store, 2).unwrap_err();
        assert!(matches!(err, StoreError::Migration { .. }));
    }

    #[test]
    fn tier_index_is_rebuilt_from_words() {
        let store = Store::temporary().unwrap();
        let word = Word {
            id: "w1".to_string(),
            text: "apple".to_string(),
            phonetic: String::new(),
            definition: "a fruit".to_string(),
            sentence: None,
            gap_sentence: None,
            difficulty: 20.0,
            tier: "kids_beginner".to_string(),
        };
        // 绕过 upsert_word，模拟索引缺失的旧数据
        store
            .words
            .insert(b"w1", Store::serialize(&word).unwrap())
            .unwrap();
        assert!(store.list_words(Some("kids_beginner")).unwrap().is_empty());

        run(&store).unwrap();
        assert_eq!(store.list_words(Some("kids_beginner")).unwrap().len(), 1);
    }
}
