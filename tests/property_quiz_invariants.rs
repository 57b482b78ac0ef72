use std::collections::HashSet;

use chrono::{Duration, Utc};
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

use vocab_quiz_backend::constants::SRS_LADDER_HOURS;
use vocab_quiz_backend::quiz::ability::update_ability;
use vocab_quiz_backend::quiz::assembler::assemble_question;
use vocab_quiz_backend::quiz::distractors::pick_distractors;
use vocab_quiz_backend::quiz::scheduler::next_interval;
use vocab_quiz_backend::quiz::selector::{select_from_candidates, Candidate};
use vocab_quiz_backend::quiz::types::SelectOptions;
use vocab_quiz_backend::store::operations::word_stats::UserWordStat;
use vocab_quiz_backend::store::operations::words::Word;

fn word(idx: usize, difficulty: f64) -> Word {
    Word {
        id: format!("w{idx}"),
        text: format!("word{idx}"),
        phonetic: String::new(),
        definition: format!("meaning {idx}"),
        sentence: None,
        gap_sentence: (idx % 2 == 0).then(|| "a ____ here".to_string()),
        difficulty,
        tier: "adult_beginner".to_string(),
    }
}

proptest! {
    #[test]
    fn pt_ability_stays_in_range(
        ability in 0.0_f64..=100.0,
        difficulty in 0.0_f64..=100.0,
        correct in any::<bool>(),
    ) {
        let next = update_ability(ability, difficulty, correct);
        prop_assert!((0.0..=100.0).contains(&next));
        if correct {
            prop_assert!(next >= ability);
        } else {
            prop_assert!(next <= ability);
        }
    }

    #[test]
    fn pt_ability_handles_any_float(ability in any::<f64>(), difficulty in any::<f64>(), correct in any::<bool>()) {
        let next = update_ability(ability, difficulty, correct);
        prop_assert!(next.is_finite());
        prop_assert!((0.0..=100.0).contains(&next));
    }

    #[test]
    fn pt_incorrect_always_resets_interval(streak in 0_u32..10_000) {
        let schedule = next_interval(streak, false, Utc::now());
        prop_assert_eq!(schedule.interval_hours, 4.0);
    }

    #[test]
    fn pt_correct_interval_is_monotone_and_capped(streak in 0_u32..10_000) {
        let now = Utc::now();
        let a = next_interval(streak, true, now).interval_hours;
        let b = next_interval(streak + 1, true, now).interval_hours;
        prop_assert!(a <= b);
        prop_assert!(b <= SRS_LADDER_HOURS[SRS_LADDER_HOURS.len() - 1]);
    }

    #[test]
    fn pt_selection_is_bounded_and_unique(
        difficulties in proptest::collection::vec(0.0_f64..=100.0, 0..80),
        seen in proptest::collection::vec((0_u32..5, 0_u32..5, -48_i64..48), 0..80),
        ability in 0.0_f64..=100.0,
        count in 0_usize..60,
        weak_only in any::<bool>(),
        stratified in any::<bool>(),
        seed in any::<u64>(),
    ) {
        let now = Utc::now();
        let candidates: Vec<Candidate> = difficulties
            .iter()
            .enumerate()
            .map(|(i, d)| {
                let w = word(i, *d);
                let stat = seen.get(i).map(|(correct, incorrect, due_in)| UserWordStat {
                    user_id: "u1".to_string(),
                    word_id: w.id.clone(),
                    times_seen: correct + incorrect,
                    times_correct: *correct,
                    times_incorrect: *incorrect,
                    streak: 0,
                    next_review_at: Some(now + Duration::hours(*due_in)),
                    srs_interval_hours: 4.0,
                    last_seen_at: Some(now),
                });
                Candidate::new(w, stat)
            })
            .collect();
        let options = SelectOptions { weak_only, stratified, ..SelectOptions::default() };
        let mut rng = StdRng::seed_from_u64(seed);

        let picked = select_from_candidates(&candidates, ability, count, &options, now, &mut rng);
        prop_assert!(picked.len() <= count.min(50));
        prop_assert_eq!(picked.len(), count.min(50).min(candidates.len()));
        let ids: HashSet<&str> = picked.iter().map(|w| w.id.as_str()).collect();
        prop_assert_eq!(ids.len(), picked.len());
    }

    #[test]
    fn pt_questions_are_well_formed(
        difficulties in proptest::collection::vec(0.0_f64..=100.0, 3..30),
        target_idx in 0_usize..30,
        seed in any::<u64>(),
    ) {
        let pool: Vec<Word> = difficulties.iter().enumerate().map(|(i, d)| word(i, *d)).collect();
        let target = &pool[target_idx % pool.len()];
        let mut rng = StdRng::seed_from_u64(seed);

        let distractors = pick_distractors(&pool, target);
        prop_assert!(distractors.is_some());
        let distractors = distractors.unwrap();
        prop_assert!(distractors.iter().all(|d| d.id != target.id));

        let q = assemble_question(target, distractors, None, &mut rng, Utc::now());
        let distinct: HashSet<String> = q.options.iter().map(|o| o.trim().to_lowercase()).collect();
        prop_assert_eq!(distinct.len(), 3);
        prop_assert!(q.correct_option_index < 3);
        let truth = match q.question_type {
            vocab_quiz_backend::quiz::types::QuestionType::MeaningMatch => &target.definition,
            _ => &target.text,
        };
        prop_assert_eq!(q.correct_option(), truth.as_str());
    }
}
