//! Reader progression: per-series quiz attempts and completion badges.
//!
//! All state lives behind the injected [`ProgressStore`] so the tracker is
//! testable without a browser-style backend. Values are JSON-encoded; a
//! corrupt or missing value always reads as "no saved state". Operations
//! assume a single writer; with multiple writers the last write wins.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use time::OffsetDateTime;
use tracing::debug;

use crate::domain::quiz::{QuizOutcome, QuizQuestion, score_answers};
use crate::domain::slug::{SlugError, derive_slug};

const EARNED_BADGES_KEY: &str = "earned-badges";
const BADGE_DETAILS_KEY: &str = "badge-details";
const ATTEMPT_KEY_PREFIX: &str = "quiz-progress-";

/// Reader-scoped string key-value storage, the shape of browser local
/// storage. Implementations live in `infra::storage`.
pub trait ProgressStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: String);
    fn remove(&mut self, key: &str);
}

/// Saved state of one in-progress quiz attempt. This is the only persisted
/// attempt state: completion clears it, leaving a badge on pass and nothing
/// on failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizAttemptState {
    pub current_question: usize,
    /// Sparse: index = question index, value = selected option index.
    pub answers: Vec<Option<usize>>,
    pub started: bool,
    pub showing_explanation: bool,
    pub timestamp: OffsetDateTime,
}

/// A completion badge. Created only on a passing score and never revoked; a
/// later failing retake leaves it untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BadgeRecord {
    pub badge_id: String,
    pub earned_date: OffsetDateTime,
    /// Rounded integer percentage, 0–100.
    pub score: u32,
}

#[derive(Debug, Error)]
pub enum ProgressError {
    #[error("cannot derive a progress key for series name: {0}")]
    Key(#[from] SlugError),
    #[error("failed to encode progress state: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Owns per-reader, per-series quiz and badge state.
pub struct ProgressionTracker<S: ProgressStore> {
    store: S,
}

impl<S: ProgressStore> ProgressionTracker<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Begin a fresh attempt, clearing any saved progress for the series.
    pub fn start_attempt(&mut self, series_name: &str) -> Result<(), ProgressError> {
        let key = attempt_key(series_name)?;
        let state = QuizAttemptState {
            current_question: 0,
            answers: Vec::new(),
            started: true,
            showing_explanation: false,
            timestamp: OffsetDateTime::now_utc(),
        };
        self.store.set(&key, serde_json::to_string(&state)?);
        Ok(())
    }

    /// Saved progress for the series, if any. Corrupt state reads as `None`.
    pub fn resume_attempt(
        &self,
        series_name: &str,
    ) -> Result<Option<QuizAttemptState>, ProgressError> {
        let key = attempt_key(series_name)?;
        Ok(self.read_attempt(&key))
    }

    /// Record the selected option for a question. Re-recording overwrites;
    /// the answer list never grows a duplicate entry for the same index.
    pub fn record_answer(
        &mut self,
        series_name: &str,
        question_index: usize,
        option_index: usize,
    ) -> Result<(), ProgressError> {
        let key = attempt_key(series_name)?;
        let mut state = self.read_attempt(&key).unwrap_or_else(new_attempt);

        if state.answers.len() <= question_index {
            state.answers.resize(question_index + 1, None);
        }
        state.answers[question_index] = Some(option_index);
        state.current_question = state.current_question.max(question_index);
        state.showing_explanation = true;
        state.timestamp = OffsetDateTime::now_utc();

        self.store.set(&key, serde_json::to_string(&state)?);
        Ok(())
    }

    /// Move past the explanation to the next question, if one remains.
    pub fn advance(
        &mut self,
        series_name: &str,
        total_questions: usize,
    ) -> Result<(), ProgressError> {
        let key = attempt_key(series_name)?;
        let Some(mut state) = self.read_attempt(&key) else {
            return Ok(());
        };

        state.showing_explanation = false;
        if state.current_question + 1 < total_questions {
            state.current_question += 1;
        }
        state.timestamp = OffsetDateTime::now_utc();

        self.store.set(&key, serde_json::to_string(&state)?);
        Ok(())
    }

    /// Score the saved answers against the quiz and close out the attempt.
    ///
    /// The in-progress record is cleared whether the reader passed or not;
    /// a failed attempt leaves no persisted trace. A pass writes the badge
    /// idempotently: finishing twice never duplicates an entry in the
    /// earned set.
    pub fn finish_attempt(
        &mut self,
        series_name: &str,
        questions: &[QuizQuestion],
    ) -> Result<QuizOutcome, ProgressError> {
        let key = attempt_key(series_name)?;
        let answers = self
            .read_attempt(&key)
            .map(|state| state.answers)
            .unwrap_or_default();

        let outcome = score_answers(questions, &answers);
        self.store.remove(&key);

        if outcome.passed {
            self.award_badge(series_name, outcome.percent)?;
        } else {
            debug!(
                series = series_name,
                percent = outcome.percent,
                "attempt below pass threshold; no state retained"
            );
        }

        Ok(outcome)
    }

    pub fn has_badge(&self, series_name: &str) -> Result<bool, ProgressError> {
        let id = badge_id(series_name)?;
        Ok(self.earned_badges().contains(&id))
    }

    /// Identifiers of every earned badge.
    pub fn earned_badges(&self) -> BTreeSet<String> {
        self.read_json(EARNED_BADGES_KEY).unwrap_or_default()
    }

    pub fn badge_detail(&self, series_name: &str) -> Result<Option<BadgeRecord>, ProgressError> {
        let id = badge_id(series_name)?;
        Ok(self.badge_details().remove(&id))
    }

    fn award_badge(&mut self, series_name: &str, percent: u32) -> Result<(), ProgressError> {
        let id = badge_id(series_name)?;

        let mut earned = self.earned_badges();
        earned.insert(id.clone());
        self.store
            .set(EARNED_BADGES_KEY, serde_json::to_string(&earned)?);

        let mut details = self.badge_details();
        details.insert(
            id.clone(),
            BadgeRecord {
                badge_id: id,
                earned_date: OffsetDateTime::now_utc(),
                score: percent,
            },
        );
        self.store
            .set(BADGE_DETAILS_KEY, serde_json::to_string(&details)?);

        Ok(())
    }

    fn badge_details(&self) -> BTreeMap<String, BadgeRecord> {
        self.read_json(BADGE_DETAILS_KEY).unwrap_or_default()
    }

    fn read_attempt(&self, key: &str) -> Option<QuizAttemptState> {
        self.read_json(key)
    }

    fn read_json<T: serde::de::DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = self.store.get(key)?;
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(err) => {
                debug!(key, error = %err, "discarding unreadable saved state");
                None
            }
        }
    }
}

fn new_attempt() -> QuizAttemptState {
    QuizAttemptState {
        current_question: 0,
        answers: Vec::new(),
        started: true,
        showing_explanation: false,
        timestamp: OffsetDateTime::now_utc(),
    }
}

fn attempt_key(series_name: &str) -> Result<String, ProgressError> {
    Ok(format!("{ATTEMPT_KEY_PREFIX}{}", derive_slug(series_name)?))
}

/// Deterministic badge identifier for a series.
pub fn badge_id(series_name: &str) -> Result<String, ProgressError> {
    Ok(format!("{}-completion", derive_slug(series_name)?))
}
