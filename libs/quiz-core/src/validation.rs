//! Pack validation warnings.
//!
//! Validation never changes how a record normalizes. It reports records
//! whose canonical form relies on a fallback, so pack authors can fix them.

use crate::normalize::{
    accepted_answers, declared_kind, has_enough_options, resolve_correct_index,
    resolve_correct_indices, resolve_kind, resolve_options, resolve_pairs, value_to_string,
    IndexResolution, ANSWER_ALIASES, PROMPT_ALIASES, TYPE_ALIASES,
};
use crate::pack::Pack;
use crate::types::{QuestionKind, RawQuestion};
use serde::Serialize;
use std::fmt;

/// A fallback applied while normalizing one record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PackWarning {
    MissingPrompt,
    UnknownType { tag: String },
    DegradedToFill { declared: QuestionKind, usable_options: usize },
    DefaultedAnswer { answer: Option<String> },
    EmptyAnswer,
    MatchWithoutPairs,
}

impl fmt::Display for PackWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingPrompt => write!(f, "no question text"),
            Self::UnknownType { tag } => write!(f, "unknown question type {tag:?}"),
            Self::DegradedToFill {
                declared,
                usable_options,
            } => write!(
                f,
                "{} question has {usable_options} usable option(s); treated as fill-in",
                declared.as_str()
            ),
            Self::DefaultedAnswer { answer: Some(answer) } => {
                write!(f, "answer {answer:?} matches no option; defaulted to the first option")
            }
            Self::DefaultedAnswer { answer: None } => {
                write!(f, "no answer given; defaulted to the first option")
            }
            Self::EmptyAnswer => write!(f, "accepted answer is empty"),
            Self::MatchWithoutPairs => {
                write!(f, "matching question has no usable pairs; treated as fill-in")
            }
        }
    }
}

/// Warning tied to a record's position within its pack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordWarning {
    pub index: usize,
    pub warning: PackWarning,
}

/// Report every fallback `normalize` would apply to `raw`.
pub fn validate(raw: &RawQuestion) -> Vec<PackWarning> {
    let mut warnings = Vec::new();

    let has_prompt = PROMPT_ALIASES
        .iter()
        .filter_map(|alias| raw.get(alias))
        .any(|value| !value_to_string(value).trim().is_empty());
    if !has_prompt {
        warnings.push(PackWarning::MissingPrompt);
    }

    if declared_kind(raw).is_none() {
        if let Some(tag) = TYPE_ALIASES
            .iter()
            .filter_map(|alias| raw.get(alias))
            .find_map(|value| value.as_str())
        {
            warnings.push(PackWarning::UnknownType {
                tag: tag.to_string(),
            });
        }
    }

    let options = resolve_options(raw);
    let answer = raw.first_of(ANSWER_ALIASES);
    let kind = resolve_kind(raw, &options);

    let fill_like = match kind {
        QuestionKind::Mcq | QuestionKind::Multi if !has_enough_options(&options) => {
            warnings.push(PackWarning::DegradedToFill {
                declared: kind,
                usable_options: options.iter().filter(|o| !o.trim().is_empty()).count(),
            });
            true
        }
        QuestionKind::Mcq => {
            if let (_, IndexResolution::Default) = resolve_correct_index(answer, &options) {
                warnings.push(PackWarning::DefaultedAnswer {
                    answer: answer.map(value_to_string),
                });
            }
            false
        }
        QuestionKind::Multi => {
            if resolve_correct_indices(answer, &options).is_none() {
                warnings.push(PackWarning::DefaultedAnswer {
                    answer: answer.map(value_to_string),
                });
            }
            false
        }
        QuestionKind::Match if resolve_pairs(raw, answer).is_empty() => {
            warnings.push(PackWarning::MatchWithoutPairs);
            true
        }
        QuestionKind::Match => false,
        QuestionKind::Fill | QuestionKind::Cloze | QuestionKind::Transform => true,
    };

    if fill_like
        && accepted_answers(answer)
            .iter()
            .all(|accepted| accepted.trim().is_empty())
    {
        warnings.push(PackWarning::EmptyAnswer);
    }

    warnings
}

/// Validate every record of a pack.
pub fn validate_pack(pack: &Pack) -> Vec<RecordWarning> {
    pack.questions
        .iter()
        .enumerate()
        .flat_map(|(index, raw)| {
            validate(raw)
                .into_iter()
                .map(move |warning| RecordWarning { index, warning })
        })
        .collect()
}
