use vocab_quiz_backend::store::operations::words::Word;
use vocab_quiz_backend::store::Store;

pub const TIERS: [&str; 6] = [
    "kids_beginner",
    "kids_intermediate",
    "kids_advanced",
    "adult_beginner",
    "adult_intermediate",
    "adult_advanced",
];

pub fn make_word(idx: usize, difficulty: f64, tier: &str) -> Word {
    Word {
        id: format!("w{idx:03}"),
        text: format!("word{idx}"),
        phonetic: format!("/wɜːd{idx}/"),
        definition: format!("meaning number {idx}"),
        sentence: (idx % 3 != 0).then(|| format!("This is word{idx} in a sentence.")),
        gap_sentence: (idx % 2 == 0).then(|| "This is ____ in a sentence.".to_string()),
        difficulty,
        tier: tier.to_string(),
    }
}

/// 难度均匀铺满 [0, 100)，tier 轮流分配
pub fn seed_catalog(store: &Store, count: usize) -> Vec<Word> {
    let mut out = Vec::with_capacity(count);
    for idx in 0..count {
        let difficulty = (idx as f64) * 100.0 / count as f64;
        let word = make_word(idx, difficulty, TIERS[idx % TIERS.len()]);
        store.upsert_word(&word).expect("upsert seed word");
        out.push(word);
    }
    out
}
