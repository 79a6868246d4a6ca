//! API request and response types

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// Re-export shared types from quiz-core
pub use quiz_core::{
    CanonicalQuestion, Grade, QuestionKind, ReviewItem, Session, SessionMode, SessionSummary,
    UserAnswer,
};

use crate::services::loader::PackStats;

// === Bank ===

#[derive(Debug, Serialize)]
pub struct BankResponse {
    pub questions: usize,
    pub warnings: usize,
    pub kinds: BTreeMap<&'static str, usize>,
    pub packs: Vec<PackStats>,
}

// === Sessions ===

/// Session mode as named in requests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModeName {
    #[default]
    Endless,
    Sprint,
}

#[derive(Debug, Default, Deserialize)]
pub struct StartSessionRequest {
    #[serde(default)]
    pub mode: ModeName,
    /// Sprint length; the configured default applies when absent.
    pub length: Option<usize>,
}

impl StartSessionRequest {
    pub fn to_mode(&self, default_sprint_length: usize) -> SessionMode {
        match self.mode {
            ModeName::Endless => SessionMode::Endless,
            ModeName::Sprint => SessionMode::Sprint {
                length: self.length.unwrap_or(default_sprint_length),
            },
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct AdvanceRequest {
    #[serde(default)]
    pub answer: Option<UserAnswer>,
}

/// Question as shown to the user, without its answer key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum QuestionView {
    Mcq { prompt: String, options: Vec<String> },
    Multi { prompt: String, options: Vec<String> },
    Fill { prompt: String },
    Cloze { prompt: String },
    Transform { prompt: String },
    Match {
        prompt: String,
        pairs: Vec<String>,
        /// Right-hand items to pick from, sorted so their order reveals nothing.
        choices: Vec<String>,
    },
}

impl From<&CanonicalQuestion> for QuestionView {
    fn from(question: &CanonicalQuestion) -> Self {
        let prompt = question.prompt().to_string();
        match question {
            CanonicalQuestion::Mcq { options, .. } => Self::Mcq {
                prompt,
                options: options.clone(),
            },
            CanonicalQuestion::Multi { options, .. } => Self::Multi {
                prompt,
                options: options.clone(),
            },
            CanonicalQuestion::Fill { .. } => Self::Fill { prompt },
            CanonicalQuestion::Cloze { .. } => Self::Cloze { prompt },
            CanonicalQuestion::Transform { .. } => Self::Transform { prompt },
            CanonicalQuestion::Match {
                pairs, expected, ..
            } => {
                let mut choices = expected.clone();
                choices.sort();
                choices.dedup();
                Self::Match {
                    prompt,
                    pairs: pairs.clone(),
                    choices,
                }
            }
        }
    }
}

/// Counters shown alongside the current question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionStatus {
    pub mode: SessionMode,
    pub number: usize,
    pub pass_length: usize,
    pub answered: u32,
    pub score: u32,
    pub current_streak: u32,
    pub max_streak: u32,
    pub passes: u32,
    pub submitted: bool,
    pub finished: bool,
}

impl From<&Session> for SessionStatus {
    fn from(session: &Session) -> Self {
        Self {
            mode: session.mode,
            number: session.question_number(),
            pass_length: session.pass_length(),
            answered: session.answered_count,
            score: session.score,
            current_streak: session.current_streak,
            max_streak: session.max_streak,
            passes: session.passes,
            submitted: session.submitted,
            finished: session.finished,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub id: Uuid,
    pub status: SessionStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question: Option<QuestionView>,
    /// Grade of the current question once it has been submitted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feedback: Option<Grade>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepKind {
    Graded,
    Next,
    Finished,
}

#[derive(Debug, Serialize)]
pub struct AdvanceResponse {
    pub id: Uuid,
    pub step: StepKind,
    pub status: SessionStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feedback: Option<Grade>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question: Option<QuestionView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<SessionSummary>,
}

#[derive(Debug, Serialize)]
pub struct EndSessionResponse {
    pub id: Uuid,
    pub summary: SessionSummary,
}

#[derive(Debug, Serialize)]
pub struct ReviewResponse {
    pub id: Uuid,
    pub summary: SessionSummary,
    pub items: Vec<ReviewItem>,
}
