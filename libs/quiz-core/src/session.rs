//! Practice session engine.
//!
//! A [`Session`] is a plain value owned by the caller. Every user action
//! consumes the current value and returns the next one, so there is no
//! hidden mutable state between actions.
//!
//! Advancing is two-phase: the first advance on a question grades it (an
//! absent answer grades as incorrect), the second moves on.

use crate::error::SessionError;
use crate::grading::{grade, render_answer, render_expected, Grade};
use crate::types::{CanonicalQuestion, QuestionKind, UserAnswer};
use chrono::{DateTime, Utc};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// How a session walks the bank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SessionMode {
    /// Cycle through the bank forever, reshuffling after every pass.
    Endless,
    /// Ask at most `length` questions, then finish.
    Sprint { length: usize },
}

impl Default for SessionMode {
    fn default() -> Self {
        Self::Endless
    }
}

/// One graded submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Index into the question bank.
    pub question: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer: Option<UserAnswer>,
    pub is_correct: bool,
    pub answered_at: DateTime<Utc>,
}

/// Session state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub mode: SessionMode,
    /// Bank indices in presentation order for the current pass.
    pub order: Vec<usize>,
    pub position: usize,
    pub score: u32,
    pub current_streak: u32,
    pub max_streak: u32,
    pub answered_count: u32,
    /// Completed passes over the bank (endless mode).
    pub passes: u32,
    /// Whether the current question has been graded already.
    pub submitted: bool,
    pub finished: bool,
    pub history: Vec<HistoryEntry>,
    pub started_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Outcome of one advance action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum Step {
    /// The current question was graded.
    Graded(Grade),
    /// Moved on to the bank question at `question`.
    Next { question: usize },
    /// The sprint is over.
    Finished(SessionSummary),
}

/// End-of-session totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub answered: u32,
    pub score: u32,
    pub max_streak: u32,
    pub current_streak: u32,
    /// Fraction of answered questions graded correct, 0.0 when none.
    pub accuracy: f64,
    pub passes: u32,
    pub started_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One row of the review/export listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewItem {
    /// 1-based submission number.
    pub number: usize,
    pub kind: QuestionKind,
    pub prompt: String,
    pub your_answer: String,
    pub expected: String,
    pub is_correct: bool,
    pub answered_at: DateTime<Utc>,
}

impl Session {
    /// Start a session over a bank of `bank_len` questions.
    pub fn start<R: Rng + ?Sized>(
        bank_len: usize,
        mode: SessionMode,
        now: DateTime<Utc>,
        rng: &mut R,
    ) -> Result<Self, SessionError> {
        if bank_len == 0 {
            return Err(SessionError::EmptyBank);
        }
        if mode == (SessionMode::Sprint { length: 0 }) {
            return Err(SessionError::EmptySprint);
        }

        let mut order = shuffled(bank_len, rng);
        if let SessionMode::Sprint { length } = mode {
            order.truncate(length);
        }

        Ok(Self {
            mode,
            order,
            position: 0,
            score: 0,
            current_streak: 0,
            max_streak: 0,
            answered_count: 0,
            passes: 0,
            submitted: false,
            finished: false,
            history: Vec::new(),
            started_at: now,
            updated_at: now,
        })
    }

    /// Bank index of the question on screen, or `None` once finished.
    pub fn current_question(&self) -> Option<usize> {
        if self.finished {
            return None;
        }
        self.order.get(self.position).copied()
    }

    /// 1-based position within the current pass or sprint.
    pub fn question_number(&self) -> usize {
        self.position + 1
    }

    /// Questions in the current pass or sprint.
    pub fn pass_length(&self) -> usize {
        self.order.len()
    }

    /// Ensure every index the session refers to exists in a bank of `bank_len`.
    ///
    /// Restored sessions may predate a change to the packs.
    pub fn check_bank(&self, bank_len: usize) -> Result<(), SessionError> {
        let out_of_range = self
            .order
            .iter()
            .copied()
            .chain(self.history.iter().map(|entry| entry.question))
            .find(|index| *index >= bank_len);

        match out_of_range {
            Some(index) => Err(SessionError::BankMismatch { index, bank_len }),
            None => Ok(()),
        }
    }

    /// Grade the current question, or move past it if already graded.
    pub fn advance<R: Rng + ?Sized>(
        self,
        bank: &[CanonicalQuestion],
        answer: Option<UserAnswer>,
        now: DateTime<Utc>,
        rng: &mut R,
    ) -> Result<(Self, Step), SessionError> {
        if self.finished {
            return Err(SessionError::Finished);
        }
        if self.submitted {
            Ok(self.next(bank.len(), now, rng))
        } else {
            self.submit(bank, answer, now)
        }
    }

    fn submit(
        mut self,
        bank: &[CanonicalQuestion],
        answer: Option<UserAnswer>,
        now: DateTime<Utc>,
    ) -> Result<(Self, Step), SessionError> {
        let index = self.order.get(self.position).copied().unwrap_or_default();
        let question = bank.get(index).ok_or(SessionError::BankMismatch {
            index,
            bank_len: bank.len(),
        })?;

        let result = grade(question, answer.as_ref());
        if result.is_correct {
            self.score += 1;
            self.current_streak += 1;
            self.max_streak = self.max_streak.max(self.current_streak);
        } else {
            self.current_streak = 0;
        }
        self.answered_count += 1;
        self.submitted = true;
        self.updated_at = now;
        self.history.push(HistoryEntry {
            question: index,
            answer,
            is_correct: result.is_correct,
            answered_at: now,
        });

        Ok((self, Step::Graded(result)))
    }

    fn next<R: Rng + ?Sized>(
        mut self,
        bank_len: usize,
        now: DateTime<Utc>,
        rng: &mut R,
    ) -> (Self, Step) {
        self.updated_at = now;
        self.submitted = false;

        if self.position + 1 < self.order.len() {
            self.position += 1;
        } else {
            match self.mode {
                SessionMode::Sprint { .. } => {
                    self.finished = true;
                    let summary = self.summary();
                    return (self, Step::Finished(summary));
                }
                SessionMode::Endless => {
                    self.order = shuffled(bank_len, rng);
                    self.position = 0;
                    self.passes += 1;
                }
            }
        }

        let question = self.order.get(self.position).copied().unwrap_or_default();
        (self, Step::Next { question })
    }

    /// Totals so far.
    pub fn summary(&self) -> SessionSummary {
        let accuracy = if self.answered_count == 0 {
            0.0
        } else {
            f64::from(self.score) / f64::from(self.answered_count)
        };

        SessionSummary {
            answered: self.answered_count,
            score: self.score,
            max_streak: self.max_streak,
            current_streak: self.current_streak,
            accuracy,
            passes: self.passes,
            started_at: self.started_at,
            updated_at: self.updated_at,
        }
    }

    /// Review listing of every graded submission, oldest first.
    pub fn review(&self, bank: &[CanonicalQuestion]) -> Result<Vec<ReviewItem>, SessionError> {
        self.history
            .iter()
            .enumerate()
            .map(|(position, entry)| {
                let question = bank.get(entry.question).ok_or(SessionError::BankMismatch {
                    index: entry.question,
                    bank_len: bank.len(),
                })?;
                Ok(ReviewItem {
                    number: position + 1,
                    kind: question.kind(),
                    prompt: question.prompt().to_string(),
                    your_answer: render_answer(question, entry.answer.as_ref()),
                    expected: render_expected(question),
                    is_correct: entry.is_correct,
                    answered_at: entry.answered_at,
                })
            })
            .collect()
    }
}

fn shuffled<R: Rng + ?Sized>(len: usize, rng: &mut R) -> Vec<usize> {
    let mut order: Vec<usize> = (0..len).collect();
    order.shuffle(rng);
    order
}
