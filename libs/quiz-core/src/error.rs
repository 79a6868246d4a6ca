//! Error types for quiz-core.
//!
//! Normalizing and grading never fail; only pack documents and session
//! bookkeeping have an error channel.

use thiserror::Error;

/// Result type alias using PackError.
pub type Result<T> = std::result::Result<T, PackError>;

/// Errors that can occur while reading a pack or manifest document.
#[derive(Debug, Error)]
pub enum PackError {
    #[error("invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("expected a list of questions or an object with a `questions` list, found {found}")]
    NotAQuestionList { found: &'static str },

    #[error("expected a list of pack paths or an object with a `packs` list, found {found}")]
    NotAManifest { found: &'static str },

    #[error("no questions found in any pack")]
    EmptyBank,
}

/// Errors raised by the session engine.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("cannot start a session over an empty question bank")]
    EmptyBank,

    #[error("sprint length must be at least 1")]
    EmptySprint,

    #[error("session has already finished")]
    Finished,

    #[error("session refers to question {index} but the bank holds {bank_len}")]
    BankMismatch { index: usize, bank_len: usize },
}
