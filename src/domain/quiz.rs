//! Quiz definitions and attempt scoring.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Minimum share of correct answers needed to earn the completion badge.
pub const PASS_THRESHOLD_PERCENT: u32 = 70;

/// One multiple-choice question; `correct_answer` indexes into `options`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizQuestion {
    pub id: u32,
    pub question: String,
    pub options: Vec<String>,
    pub correct_answer: usize,
    pub explanation: String,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum QuizError {
    #[error("quiz has no questions")]
    Empty,
    #[error("question {id} has no options")]
    NoOptions { id: u32 },
    #[error("question {id} marks option {index} correct but only {available} options exist")]
    CorrectAnswerOutOfRange {
        id: u32,
        index: usize,
        available: usize,
    },
}

/// Result of scoring a finished attempt.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuizOutcome {
    /// Fraction of correct answers in `[0, 1]`.
    pub score: f64,
    /// Rounded integer percentage, the value recorded on the badge.
    pub percent: u32,
    pub passed: bool,
    pub correct: usize,
    pub total: usize,
}

/// Reject structurally broken quiz definitions before they reach readers.
pub fn validate(questions: &[QuizQuestion]) -> Result<(), QuizError> {
    if questions.is_empty() {
        return Err(QuizError::Empty);
    }

    for question in questions {
        if question.options.is_empty() {
            return Err(QuizError::NoOptions { id: question.id });
        }
        if question.correct_answer >= question.options.len() {
            return Err(QuizError::CorrectAnswerOutOfRange {
                id: question.id,
                index: question.correct_answer,
                available: question.options.len(),
            });
        }
    }

    Ok(())
}

/// Score a submitted answer vector by exact match against each question's
/// declared correct option.
///
/// `answers` is sparse: a hole counts as an unanswered, incorrect question.
/// The pass decision is made in integer arithmetic so the 70% boundary is
/// exact (7/10 passes, 69/100 does not).
pub fn score_answers(questions: &[QuizQuestion], answers: &[Option<usize>]) -> QuizOutcome {
    let total = questions.len();
    let correct = questions
        .iter()
        .enumerate()
        .filter(|(index, question)| answers.get(*index).copied().flatten() == Some(question.correct_answer))
        .count();

    if total == 0 {
        return QuizOutcome {
            score: 0.0,
            percent: 0,
            passed: false,
            correct: 0,
            total: 0,
        };
    }

    let score = correct as f64 / total as f64;
    let percent = ((correct * 200 + total) / (2 * total)) as u32;
    let passed = correct * 100 >= total * PASS_THRESHOLD_PERCENT as usize;

    QuizOutcome {
        score,
        percent,
        passed,
        correct,
        total,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn questions(n: usize) -> Vec<QuizQuestion> {
        (0..n)
            .map(|i| QuizQuestion {
                id: i as u32,
                question: format!("Q{i}"),
                options: vec!["a".into(), "b".into(), "c".into(), "d".into()],
                correct_answer: i % 4,
                explanation: String::new(),
            })
            .collect()
    }

    fn answers_with_matches(questions: &[QuizQuestion], matches: usize) -> Vec<Option<usize>> {
        questions
            .iter()
            .enumerate()
            .map(|(i, q)| {
                if i < matches {
                    Some(q.correct_answer)
                } else {
                    Some((q.correct_answer + 1) % q.options.len())
                }
            })
            .collect()
    }

    #[test]
    fn seven_of_ten_is_exactly_passing() {
        let qs = questions(10);
        let outcome = score_answers(&qs, &answers_with_matches(&qs, 7));

        assert_eq!(outcome.correct, 7);
        assert_eq!(outcome.total, 10);
        assert!((outcome.score - 0.7).abs() < f64::EPSILON);
        assert_eq!(outcome.percent, 70);
        assert!(outcome.passed);
    }

    #[test]
    fn sixty_nine_percent_fails_seventy_passes() {
        let qs = questions(100);
        assert!(!score_answers(&qs, &answers_with_matches(&qs, 69)).passed);
        assert!(score_answers(&qs, &answers_with_matches(&qs, 70)).passed);
    }

    #[test]
    fn holes_count_as_incorrect() {
        let qs = questions(4);
        let mut answers = answers_with_matches(&qs, 4);
        answers[2] = None;
        answers.truncate(3);

        let outcome = score_answers(&qs, &answers);
        assert_eq!(outcome.correct, 2);
        assert_eq!(outcome.percent, 50);
        assert!(!outcome.passed);
    }

    #[test]
    fn empty_quiz_never_passes() {
        let outcome = score_answers(&[], &[]);
        assert_eq!(outcome.total, 0);
        assert!(!outcome.passed);
    }

    #[test]
    fn validate_rejects_out_of_range_answers() {
        let mut qs = questions(2);
        qs[1].correct_answer = 9;

        let err = validate(&qs).expect_err("broken quiz rejected");
        assert_eq!(
            err,
            QuizError::CorrectAnswerOutOfRange {
                id: 1,
                index: 9,
                available: 4
            }
        );
    }

    #[test]
    fn validate_rejects_empty_quiz() {
        assert_eq!(validate(&[]), Err(QuizError::Empty));
    }
}
