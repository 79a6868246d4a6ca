//! Answer grading and reveal text.

use crate::types::{CanonicalQuestion, UserAnswer};
use serde::{Deserialize, Serialize};

/// Separator between alternative accepted answers in reveal text.
pub const ALTERNATIVES_SEPARATOR: &str = " / ";

/// Separator between matched pairs in reveal text.
pub const PAIRS_SEPARATOR: &str = " | ";

/// Placeholder shown for a question left unanswered.
pub const NO_ANSWER: &str = "(no answer)";

/// Result of grading one submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grade {
    /// Whether the answer is considered correct.
    pub is_correct: bool,
    /// Expected answer, with the explanation on its own line when present.
    pub expected: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

/// Grade a submission. A missing answer grades as incorrect.
pub fn grade(question: &CanonicalQuestion, answer: Option<&UserAnswer>) -> Grade {
    Grade {
        is_correct: is_correct(question, answer),
        expected: render_expected(question),
        explanation: question.explanation().map(str::to_string),
    }
}

/// Decide whether `answer` is correct for `question`.
///
/// Answers of the wrong shape are simply incorrect.
pub fn is_correct(question: &CanonicalQuestion, answer: Option<&UserAnswer>) -> bool {
    let Some(answer) = answer else {
        return false;
    };

    match (question, answer) {
        (CanonicalQuestion::Mcq { correct_index, .. }, UserAnswer::Choice(index)) => {
            index == correct_index
        }
        (CanonicalQuestion::Multi { correct_indices, .. }, UserAnswer::Choices(indices)) => {
            let mut submitted = indices.clone();
            submitted.sort_unstable();
            submitted.dedup();
            &submitted == correct_indices
        }
        (CanonicalQuestion::Multi { correct_indices, .. }, UserAnswer::Choice(index)) => {
            correct_indices.as_slice() == [*index]
        }
        (
            CanonicalQuestion::Fill {
                accepted_answers, ..
            }
            | CanonicalQuestion::Cloze {
                accepted_answers, ..
            }
            | CanonicalQuestion::Transform {
                accepted_answers, ..
            },
            UserAnswer::Text(text),
        ) => {
            let typed = normalize_text(text);
            accepted_answers
                .iter()
                .any(|accepted| normalize_text(accepted) == typed)
        }
        (CanonicalQuestion::Match { expected, .. }, UserAnswer::Sequence(selected)) => {
            selected.len() == expected.len()
                && selected
                    .iter()
                    .zip(expected)
                    .all(|(chosen, wanted)| normalize_text(chosen) == normalize_text(wanted))
        }
        _ => false,
    }
}

/// Human-readable expected answer, followed by the explanation if any.
pub fn render_expected(question: &CanonicalQuestion) -> String {
    let answer = match question {
        CanonicalQuestion::Mcq {
            options,
            correct_index,
            ..
        } => options.get(*correct_index).cloned().unwrap_or_default(),
        CanonicalQuestion::Multi {
            options,
            correct_indices,
            ..
        } => correct_indices
            .iter()
            .filter_map(|index| options.get(*index))
            .cloned()
            .collect::<Vec<_>>()
            .join(ALTERNATIVES_SEPARATOR),
        CanonicalQuestion::Fill {
            accepted_answers, ..
        }
        | CanonicalQuestion::Cloze {
            accepted_answers, ..
        }
        | CanonicalQuestion::Transform {
            accepted_answers, ..
        } => accepted_answers.join(ALTERNATIVES_SEPARATOR),
        CanonicalQuestion::Match {
            pairs, expected, ..
        } => render_pairs(pairs, expected),
    };

    match question.explanation() {
        Some(explanation) => format!("{answer}\n{explanation}"),
        None => answer,
    }
}

/// Render what the user submitted, for review listings.
pub fn render_answer(question: &CanonicalQuestion, answer: Option<&UserAnswer>) -> String {
    let option_text = |options: &[String], index: usize| {
        options
            .get(index)
            .cloned()
            .unwrap_or_else(|| format!("option {}", index + 1))
    };

    match (question, answer) {
        (_, None) => NO_ANSWER.to_string(),
        (
            CanonicalQuestion::Mcq { options, .. } | CanonicalQuestion::Multi { options, .. },
            Some(UserAnswer::Choice(index)),
        ) => option_text(options, *index),
        (
            CanonicalQuestion::Mcq { options, .. } | CanonicalQuestion::Multi { options, .. },
            Some(UserAnswer::Choices(indices)),
        ) => indices
            .iter()
            .map(|index| option_text(options, *index))
            .collect::<Vec<_>>()
            .join(ALTERNATIVES_SEPARATOR),
        (CanonicalQuestion::Match { pairs, .. }, Some(UserAnswer::Sequence(selected))) => {
            render_pairs(pairs, selected)
        }
        (_, Some(UserAnswer::Text(text))) => text.trim().to_string(),
        (_, Some(UserAnswer::Sequence(items))) => items.join(ALTERNATIVES_SEPARATOR),
        (_, Some(UserAnswer::Choice(index))) => index.to_string(),
        (_, Some(UserAnswer::Choices(indices))) => indices
            .iter()
            .map(usize::to_string)
            .collect::<Vec<_>>()
            .join(ALTERNATIVES_SEPARATOR),
    }
}

fn render_pairs(lefts: &[String], rights: &[String]) -> String {
    lefts
        .iter()
        .zip(rights)
        .map(|(left, right)| format!("{left} → {right}"))
        .collect::<Vec<_>>()
        .join(PAIRS_SEPARATOR)
}

/// Trim and case-fold text for comparison. Inner whitespace is kept as is.
pub fn normalize_text(text: &str) -> String {
    text.trim().to_lowercase()
}
