// src/services/scoring.rs

use std::collections::HashSet;

use crate::{
    models::{attempt::AnswerRecord, result::ScoreSummary},
    services::answer_key::AnswerKey,
};

/// Scores a set of recorded answers against an answer key.
///
/// An answer counts when its chosen label equals the key's label exactly.
/// Answers to questions missing from the key, and answers with no chosen
/// label, count as incorrect. Each question is counted at most once.
pub fn score(answers: &[AnswerRecord], key: &AnswerKey, total: i64) -> ScoreSummary {
    let mut seen = HashSet::new();
    let correct = answers
        .iter()
        .filter(|answer| {
            match (answer.chosen.as_deref(), key.correct_for(answer.question_id)) {
                (Some(chosen), Some(expected)) => chosen == expected,
                _ => false,
            }
        })
        .filter(|answer| seen.insert(answer.question_id))
        .count() as i64;

    ScoreSummary {
        correct,
        total,
        percent: percent(correct, total),
    }
}

/// `round(correct / total * 100)` with halves rounded up; 0 for an empty exam.
///
/// Integer arithmetic keeps every export surface on the same figure.
pub fn percent(correct: i64, total: i64) -> i64 {
    if total <= 0 {
        return 0;
    }
    (correct * 200 + total) / (total * 2)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    fn key(entries: &[(i64, &str)]) -> AnswerKey {
        AnswerKey::new(
            entries
                .iter()
                .map(|(id, label)| (*id, label.to_string()))
                .collect::<BTreeMap<_, _>>(),
        )
    }

    fn answer(question_id: i64, chosen: &str) -> AnswerRecord {
        AnswerRecord {
            question_id,
            chosen: Some(chosen.to_string()),
        }
    }

    #[test]
    fn all_correct_is_full_marks() {
        let key = key(&[(1, "A"), (2, "B")]);
        let result = score(&[answer(1, "A"), answer(2, "B")], &key, key.total());
        assert_eq!(
            result,
            ScoreSummary {
                correct: 2,
                total: 2,
                percent: 100
            }
        );
    }

    #[test]
    fn empty_answers_score_zero() {
        let key = key(&[(1, "A"), (2, "B")]);
        let result = score(&[], &key, 2);
        assert_eq!(result.correct, 0);
        assert_eq!(result.percent, 0);
    }

    #[test]
    fn zero_total_never_divides() {
        let result = score(&[answer(1, "A")], &AnswerKey::default(), 0);
        assert_eq!(result.correct, 0);
        assert_eq!(result.percent, 0);
    }

    #[test]
    fn order_does_not_matter() {
        let key = key(&[(1, "A"), (2, "B"), (3, "C")]);
        let forward = vec![answer(1, "A"), answer(2, "D"), answer(3, "C")];
        let mut reversed = forward.clone();
        reversed.reverse();
        assert_eq!(score(&forward, &key, 3), score(&reversed, &key, 3));
    }

    #[test]
    fn comparison_is_exact() {
        let key = key(&[(1, "A"), (2, "B")]);
        let result = score(&[answer(1, "a"), answer(2, " B")], &key, 2);
        assert_eq!(result.correct, 0);
    }

    #[test]
    fn unknown_questions_and_blank_choices_are_incorrect() {
        let key = key(&[(1, "A")]);
        let answers = vec![
            answer(99, "A"),
            AnswerRecord {
                question_id: 1,
                chosen: None,
            },
        ];
        assert_eq!(score(&answers, &key, 1).correct, 0);
    }

    #[test]
    fn repeated_slot_counts_once() {
        let key = key(&[(1, "A"), (2, "B")]);
        let result = score(&[answer(1, "A"), answer(1, "A")], &key, 2);
        assert_eq!(result.correct, 1);

        let mixed = score(&[answer(1, "B"), answer(1, "A")], &key, 2);
        let flipped = score(&[answer(1, "A"), answer(1, "B")], &key, 2);
        assert_eq!(mixed, flipped);
    }

    #[test]
    fn key_lookup_is_by_question_id() {
        let key = key(&[(3, "C"), (1, "A"), (2, "B")]);
        assert_eq!(key.correct_for(1), Some("A"));
        assert_eq!(key.correct_for(3), Some("C"));
        assert_eq!(key.correct_for(4), None);
        assert_eq!(key.total(), 3);
    }

    #[test]
    fn percent_rounds_half_up() {
        assert_eq!(percent(1, 2), 50);
        assert_eq!(percent(1, 3), 33);
        assert_eq!(percent(2, 3), 67);
        assert_eq!(percent(1, 8), 13);
        assert_eq!(percent(3, 8), 38);
        assert_eq!(percent(0, 5), 0);
        assert_eq!(percent(5, 5), 100);
    }
}
