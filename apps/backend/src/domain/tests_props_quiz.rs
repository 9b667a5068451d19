//! Property tests for quiz cursor monotonicity and reward parsing.

use proptest::prelude::*;

use crate::domain::cards::Question;
use crate::domain::quiz::QuizRun;
use crate::domain::rewards::parse_reward_pattern;
use crate::domain::test_prelude;

fn run() -> QuizRun {
    let questions = (1..=3u8)
        .map(|d| Question {
            id: u32::from(d),
            category: "Explorers history".into(),
            difficulty: d,
            description: format!("q{d}"),
            options: vec!["yes".into(), "no".into()],
            answer: "yes".into(),
        })
        .collect();
    QuizRun::new("Explorers history".into(), questions, vec![1, 2, 3])
}

proptest! {
    #![proptest_config(test_prelude::proptest_config())]

    /// Duplicate submissions never move the cursor past one step per question.
    #[test]
    fn prop_cursor_advances_once_per_question(
        repeats in prop::collection::vec(1usize..5, 3),
        answers in prop::collection::vec(prop::bool::ANY, 3),
    ) {
        let mut q = run();
        for (i, (n, right)) in repeats.iter().zip(&answers).enumerate() {
            let ans = if *right { "yes" } else { "no" };
            let mut accepted = 0;
            for _ in 0..*n {
                if q.answer(ans, None).is_ok() {
                    accepted += 1;
                }
            }
            prop_assert_eq!(accepted, 1);
            prop_assert_eq!(q.cursor, i + 1);
            q.release();
        }
        let expected: u32 = answers
            .iter()
            .enumerate()
            .filter(|(_, r)| **r)
            .map(|(i, _)| i as u32 + 1)
            .sum();
        prop_assert_eq!(q.earned, expected);
    }

    /// Reward patterns parse entry by entry.
    #[test]
    fn prop_reward_pattern_parses(values in prop::collection::vec(0u32..1000, 0..6)) {
        let pattern = values
            .iter()
            .map(|v| format!("{v}b"))
            .collect::<Vec<_>>()
            .join(";");
        prop_assert_eq!(parse_reward_pattern(&pattern).unwrap(), values);
    }
}
