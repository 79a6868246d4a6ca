//! Pack and manifest documents.
//!
//! # Format
//! A pack is either a bare list of question records or an object with a
//! `questions` list:
//! ```json
//! { "meta": { "title": "Week 1" }, "questions": [ { "question": "...", "answer": "..." } ] }
//! ```
//! A manifest lists pack paths, either bare or under `packs`:
//! ```json
//! { "packs": ["data/eng_week1.json", "data/eng_week2.json"] }
//! ```

use crate::error::{PackError, Result};
use crate::normalize::normalize;
use crate::types::{CanonicalQuestion, RawQuestion};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Questions extracted from one pack document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Pack {
    pub title: Option<String>,
    pub questions: Vec<RawQuestion>,
    /// Entries of the question list that were not objects.
    pub skipped: usize,
}

/// List of pack locations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackManifest {
    pub packs: Vec<String>,
}

/// Parse a pack document.
pub fn parse_pack(content: &str) -> Result<Pack> {
    let document: Value = serde_json::from_str(content)?;
    extract_questions(document)
}

/// Extract the question list from an already parsed pack document.
pub fn extract_questions(document: Value) -> Result<Pack> {
    let (title, items) = match document {
        Value::Array(items) => (None, items),
        Value::Object(mut map) => {
            let title = map
                .get("meta")
                .and_then(|meta| meta.get("title"))
                .or_else(|| map.get("title"))
                .and_then(Value::as_str)
                .map(str::to_string);
            match map.remove("questions") {
                Some(Value::Array(items)) => (title, items),
                Some(other) => {
                    return Err(PackError::NotAQuestionList {
                        found: describe(&other),
                    })
                }
                None => {
                    return Err(PackError::NotAQuestionList {
                        found: "an object without `questions`",
                    })
                }
            }
        }
        other => {
            return Err(PackError::NotAQuestionList {
                found: describe(&other),
            })
        }
    };

    let total = items.len();
    let questions: Vec<RawQuestion> = items
        .into_iter()
        .filter_map(RawQuestion::from_value)
        .collect();

    Ok(Pack {
        title,
        skipped: total - questions.len(),
        questions,
    })
}

/// Parse a manifest document.
pub fn parse_manifest(content: &str) -> Result<PackManifest> {
    let document: Value = serde_json::from_str(content)?;
    let entries = match document {
        Value::Array(entries) => entries,
        Value::Object(mut map) => match map.remove("packs") {
            Some(Value::Array(entries)) => entries,
            Some(other) => {
                return Err(PackError::NotAManifest {
                    found: describe(&other),
                })
            }
            None => {
                return Err(PackError::NotAManifest {
                    found: "an object without `packs`",
                })
            }
        },
        other => {
            return Err(PackError::NotAManifest {
                found: describe(&other),
            })
        }
    };

    let packs = entries
        .iter()
        .filter_map(Value::as_str)
        .map(str::trim)
        .filter(|path| !path.is_empty())
        .map(str::to_string)
        .collect();

    Ok(PackManifest { packs })
}

fn describe(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}

/// Normalized union of every loaded pack.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuestionBank {
    pub questions: Vec<CanonicalQuestion>,
}

impl QuestionBank {
    /// Normalize and concatenate packs, in order.
    pub fn from_packs<'a>(packs: impl IntoIterator<Item = &'a Pack>) -> Result<Self> {
        let questions: Vec<CanonicalQuestion> = packs
            .into_iter()
            .flat_map(|pack| pack.questions.iter().map(normalize))
            .collect();

        if questions.is_empty() {
            return Err(PackError::EmptyBank);
        }
        Ok(Self { questions })
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&CanonicalQuestion> {
        self.questions.get(index)
    }

    pub fn as_slice(&self) -> &[CanonicalQuestion] {
        &self.questions
    }
}
