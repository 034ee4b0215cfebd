//! Randomized consistency tests
//!
//! Drive the engine with random host edits and formatting commands and check it against a
//! `ropey::Rope` reference holding the host text:
//! 1. The concatenated run text always equals the host text.
//! 2. The run list is canonical after every command.
//! 3. Diffs reconstruct the next snapshot from the previous one.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use richtext_core::{
    AnnotationFlag, AnnotationSet, CommandExecutor, Document, Run, diff, normalize,
};
use ropey::Rope;

const SAMPLES: [&str; 6] = ["X", "ab", "你好", "👋", " ", "aaa"];

fn random_flag(rng: &mut StdRng) -> AnnotationFlag {
    AnnotationFlag::ALL[rng.gen_range(0..AnnotationFlag::ALL.len())]
}

/// Apply one random host edit to `reference`.
fn random_edit(rng: &mut StdRng, reference: &mut Rope) {
    let len = reference.len_chars();
    match rng.gen_range(0..3) {
        0 => {
            let offset = rng.gen_range(0..=len);
            reference.insert(offset, SAMPLES[rng.gen_range(0..SAMPLES.len())]);
        }
        1 if len > 0 => {
            let start = rng.gen_range(0..len);
            let end = rng.gen_range(start + 1..=len.min(start + 8));
            reference.remove(start..end);
        }
        _ => {
            let start = rng.gen_range(0..=len);
            let end = rng.gen_range(start..=len.min(start + 5));
            reference.remove(start..end);
            reference.insert(start, SAMPLES[rng.gen_range(0..SAMPLES.len())]);
        }
    }
}

#[test]
fn test_random_session_stays_consistent() {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    let mut executor = CommandExecutor::new("The quick brown fox");
    let mut reference = Rope::from_str("The quick brown fox");

    for step in 0..2_000 {
        match rng.gen_range(0..4) {
            0 | 1 => {
                let before = reference.to_string();
                random_edit(&mut rng, &mut reference);
                let after = reference.to_string();

                executor.on_text_changed(&after).unwrap();
                assert_eq!(
                    diff(&before, &after).apply_to(&before).unwrap(),
                    after,
                    "step {step}"
                );
            }
            2 => {
                let len = reference.len_chars();
                let a = rng.gen_range(0..=len);
                let b = rng.gen_range(0..=len);
                executor.on_selection_changed(a, b).unwrap();
            }
            _ => {
                executor.toggle_annotation(random_flag(&mut rng)).unwrap();
            }
        }

        let text = reference.to_string();
        assert_eq!(executor.document().text(), text, "step {step}");
        assert_eq!(executor.text(), text, "step {step}");
        assert!(executor.document().is_canonical(), "step {step}");
        assert!(executor.check_baseline().is_ok(), "step {step}");
    }
}

#[test]
fn test_random_double_toggle_restores_uniform_selection() {
    let mut rng = StdRng::seed_from_u64(7);

    for _ in 0..200 {
        let len = rng.gen_range(1..20);
        let text: String = (0..len).map(|i| (b'a' + (i % 26) as u8) as char).collect();
        let mut executor = CommandExecutor::new(&text);

        // Uniformly plain selection: toggling twice must restore the original runs.
        let start = rng.gen_range(0..len);
        let end = rng.gen_range(start + 1..=len);
        let flag = random_flag(&mut rng);
        executor.on_selection_changed(start, end).unwrap();
        executor.toggle_annotation(flag).unwrap();
        executor.toggle_annotation(flag).unwrap();

        assert_eq!(executor.runs(), &[Run::plain(text.as_str())]);
    }
}

#[test]
fn test_random_diff_is_minimal() {
    let mut rng = StdRng::seed_from_u64(42);
    let alphabet = ['a', 'b', 'é', '👋'];

    for _ in 0..1_000 {
        let prev: String = (0..rng.gen_range(0..10))
            .map(|_| alphabet[rng.gen_range(0..alphabet.len())])
            .collect();
        let next: String = (0..rng.gen_range(0..10))
            .map(|_| alphabet[rng.gen_range(0..alphabet.len())])
            .collect();

        let change = diff(&prev, &next);
        assert_eq!(change.apply_to(&prev).unwrap(), next);

        // No common character remains at either edge of the replaced span.
        let removed: Vec<char> = change.removed_text.chars().collect();
        let added: Vec<char> = change.added_text.chars().collect();
        if let (Some(r), Some(a)) = (removed.first(), added.first()) {
            assert_ne!(r, a, "{prev:?} -> {next:?}");
        }
        if let (Some(r), Some(a)) = (removed.last(), added.last()) {
            assert_ne!(r, a, "{prev:?} -> {next:?}");
        }
    }
}

#[test]
fn test_random_normalize_is_idempotent() {
    let mut rng = StdRng::seed_from_u64(99);

    for _ in 0..500 {
        let runs: Vec<Run> = (0..rng.gen_range(0..8))
            .map(|_| {
                let text = ["", "a", "bc", "你"][rng.gen_range(0..4)];
                let annotations = if rng.gen_bool(0.5) {
                    AnnotationSet::plain()
                } else {
                    AnnotationSet::from(random_flag(&mut rng))
                };
                Run::new(text, annotations)
            })
            .collect();
        let text: String = runs.iter().map(|run| run.text.as_str()).collect();

        let once = Document::from_runs(runs);
        assert!(once.is_canonical());
        assert_eq!(once.text(), text);
        assert_eq!(normalize(once.clone()), once);
    }
}
