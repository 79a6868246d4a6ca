//! Core quiz engine shared by the practice backend.
//!
//! Provides:
//! - Normalizer turning loosely shaped pack records into canonical questions
//! - Grader for every question variant, with reveal text
//! - Pack and manifest document extraction
//! - Pack validation warnings
//! - Practice session engine (endless and sprint modes, review listing)

pub mod error;
pub mod grading;
pub mod normalize;
pub mod pack;
pub mod session;
pub mod types;
pub mod validation;

pub use error::{PackError, Result, SessionError};
pub use grading::{grade, is_correct, render_answer, render_expected, Grade};
pub use normalize::{normalize, IndexResolution};
pub use pack::{parse_manifest, parse_pack, Pack, PackManifest, QuestionBank};
pub use session::{HistoryEntry, ReviewItem, Session, SessionMode, SessionSummary, Step};
pub use types::{CanonicalQuestion, QuestionKind, RawQuestion, UserAnswer};
pub use validation::{validate, validate_pack, PackWarning, RecordWarning};
