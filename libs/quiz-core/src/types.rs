//! Core types for the quiz engine.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Prompt used when a record carries no usable question text.
pub const UNTITLED_PROMPT: &str = "Untitled question";

/// Untrusted question record as it appears in a pack.
///
/// Field names vary between packs, so the record is kept as a generic
/// key-value map and probed through ordered alias lists.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawQuestion(Map<String, Value>);

impl RawQuestion {
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Wrap a JSON value, if it is an object.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(map) => Some(Self(map)),
            _ => None,
        }
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// First alias holding a non-null value, in alias order.
    pub fn first_of(&self, aliases: &[&str]) -> Option<&Value> {
        aliases
            .iter()
            .filter_map(|alias| self.0.get(*alias))
            .find(|value| !value.is_null())
    }

    /// Builder-style field setter.
    pub fn with(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.0.insert(field.to_string(), value.into());
        self
    }
}

/// Question variant tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionKind {
    Mcq,
    Multi,
    Fill,
    Cloze,
    Transform,
    Match,
}

impl QuestionKind {
    /// Get the canonical tag as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mcq => "mcq",
            Self::Multi => "multi",
            Self::Fill => "fill",
            Self::Cloze => "cloze",
            Self::Transform => "transform",
            Self::Match => "match",
        }
    }

    /// Resolve a pack-supplied type tag against the known synonyms.
    ///
    /// Matching ignores case and surrounding whitespace, and treats `_`,
    /// `-` and inner spaces as the same separator.
    pub fn from_tag(tag: &str) -> Option<Self> {
        let folded: String = tag
            .trim()
            .to_lowercase()
            .split(|c: char| c == '_' || c == '-' || c.is_whitespace())
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join("-");

        match folded.as_str() {
            "mcq" | "mc" | "multiple-choice" | "multiplechoice" | "choice" | "single"
            | "single-choice" | "radio" => Some(Self::Mcq),
            "fill" | "fill-in" | "fillin" | "fill-in-the-blank" | "short" | "short-answer"
            | "text" | "input" => Some(Self::Fill),
            "cloze" | "gap" | "gap-fill" => Some(Self::Cloze),
            "transform" | "transformation" | "rewrite" => Some(Self::Transform),
            "match" | "matching" | "pairs" => Some(Self::Match),
            "multi" | "multi-select" | "multiselect" | "multiple-select" | "checkbox"
            | "select-all" => Some(Self::Multi),
            _ => None,
        }
    }
}

/// Normalized question used by rendering and grading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CanonicalQuestion {
    Mcq {
        prompt: String,
        options: Vec<String>,
        correct_index: usize,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        explanation: Option<String>,
    },
    Multi {
        prompt: String,
        options: Vec<String>,
        correct_indices: Vec<usize>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        explanation: Option<String>,
    },
    Fill {
        prompt: String,
        accepted_answers: Vec<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        explanation: Option<String>,
    },
    Cloze {
        prompt: String,
        accepted_answers: Vec<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        explanation: Option<String>,
    },
    Transform {
        prompt: String,
        accepted_answers: Vec<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        explanation: Option<String>,
    },
    Match {
        prompt: String,
        /// Left-hand items, in presentation order.
        pairs: Vec<String>,
        /// Right-hand item expected for each entry of `pairs`.
        expected: Vec<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        explanation: Option<String>,
    },
}

impl CanonicalQuestion {
    pub fn kind(&self) -> QuestionKind {
        match self {
            Self::Mcq { .. } => QuestionKind::Mcq,
            Self::Multi { .. } => QuestionKind::Multi,
            Self::Fill { .. } => QuestionKind::Fill,
            Self::Cloze { .. } => QuestionKind::Cloze,
            Self::Transform { .. } => QuestionKind::Transform,
            Self::Match { .. } => QuestionKind::Match,
        }
    }

    pub fn prompt(&self) -> &str {
        match self {
            Self::Mcq { prompt, .. }
            | Self::Multi { prompt, .. }
            | Self::Fill { prompt, .. }
            | Self::Cloze { prompt, .. }
            | Self::Transform { prompt, .. }
            | Self::Match { prompt, .. } => prompt,
        }
    }

    pub fn explanation(&self) -> Option<&str> {
        match self {
            Self::Mcq { explanation, .. }
            | Self::Multi { explanation, .. }
            | Self::Fill { explanation, .. }
            | Self::Cloze { explanation, .. }
            | Self::Transform { explanation, .. }
            | Self::Match { explanation, .. } => explanation.as_deref(),
        }
    }

    /// Express this question as a raw pack record.
    ///
    /// Normalizing the result yields `self` again.
    pub fn to_raw(&self) -> RawQuestion {
        let raw = RawQuestion::new()
            .with("type", self.kind().as_str())
            .with("question", self.prompt());

        let raw = match self {
            Self::Mcq {
                options,
                correct_index,
                ..
            } => raw
                .with("options", options.clone())
                .with("answer", *correct_index),
            Self::Multi {
                options,
                correct_indices,
                ..
            } => raw
                .with("options", options.clone())
                .with("answer", correct_indices.clone()),
            Self::Fill {
                accepted_answers, ..
            }
            | Self::Cloze {
                accepted_answers, ..
            }
            | Self::Transform {
                accepted_answers, ..
            } => raw.with("answer", accepted_answers.clone()),
            Self::Match {
                pairs, expected, ..
            } => {
                let pairs: Vec<Value> = pairs
                    .iter()
                    .zip(expected)
                    .map(|(left, right)| Value::from(vec![left.clone(), right.clone()]))
                    .collect();
                raw.with("pairs", pairs)
            }
        };

        match self.explanation() {
            Some(explanation) => raw.with("explanation", explanation),
            None => raw,
        }
    }
}

/// Answer submitted by the user.
///
/// Deserializes from plain JSON: a number picks one option, a list of
/// numbers picks several, a string is typed text and a list of strings is
/// one selection per match pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UserAnswer {
    Choice(usize),
    Choices(Vec<usize>),
    Text(String),
    Sequence(Vec<String>),
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn from_tag_folds_case_and_separators() {
        assert_eq!(QuestionKind::from_tag("MCQ"), Some(QuestionKind::Mcq));
        assert_eq!(
            QuestionKind::from_tag(" Multiple_Choice "),
            Some(QuestionKind::Mcq)
        );
        assert_eq!(
            QuestionKind::from_tag("multiple choice"),
            Some(QuestionKind::Mcq)
        );
        assert_eq!(QuestionKind::from_tag("Fill-In"), Some(QuestionKind::Fill));
        assert_eq!(QuestionKind::from_tag("matching"), Some(QuestionKind::Match));
        assert_eq!(QuestionKind::from_tag("essay"), None);
    }

    #[test]
    fn first_of_respects_alias_order_and_skips_null() {
        let raw = RawQuestion::new()
            .with("answer", Value::Null)
            .with("key", "b")
            .with("correct", "a");
        assert_eq!(
            raw.first_of(&["answer", "correct", "key"]),
            Some(&json!("a"))
        );
    }

    #[test]
    fn user_answer_deserializes_from_plain_json() {
        let choice: UserAnswer = serde_json::from_value(json!(2)).unwrap();
        assert_eq!(choice, UserAnswer::Choice(2));

        let choices: UserAnswer = serde_json::from_value(json!([0, 2])).unwrap();
        assert_eq!(choices, UserAnswer::Choices(vec![0, 2]));

        let text: UserAnswer = serde_json::from_value(json!("Paris")).unwrap();
        assert_eq!(text, UserAnswer::Text("Paris".to_string()));

        let sequence: UserAnswer = serde_json::from_value(json!(["x", "y"])).unwrap();
        assert_eq!(
            sequence,
            UserAnswer::Sequence(vec!["x".to_string(), "y".to_string()])
        );
    }

    #[test]
    fn canonical_question_serializes_with_type_tag() {
        let question = CanonicalQuestion::Fill {
            prompt: "Capital of France".to_string(),
            accepted_answers: vec!["Paris".to_string()],
            explanation: None,
        };
        let value = serde_json::to_value(&question).unwrap();
        assert_eq!(
            value,
            json!({
                "type": "fill",
                "prompt": "Capital of France",
                "accepted_answers": ["Paris"]
            })
        );
    }
}
