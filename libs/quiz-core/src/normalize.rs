//! Question normalization.
//!
//! Coerces heterogeneous pack records into [`CanonicalQuestion`] values.
//! Normalization is total: malformed records degrade to a well-defined
//! canonical form instead of failing, so one bad record never aborts a
//! session.
//!
//! Field names are resolved through ordered alias lists. The first alias
//! holding a non-null value wins, so the order of each list is part of the
//! contract.

use crate::types::{CanonicalQuestion, QuestionKind, RawQuestion, UNTITLED_PROMPT};
use serde_json::Value;

/// Fields that may carry the question type tag.
pub const TYPE_ALIASES: &[&str] = &["type", "kind", "format"];

/// Fields that may carry the option list.
pub const OPTION_ALIASES: &[&str] = &["options", "choices", "opts", "choice"];

/// Fields that may carry the answer key.
pub const ANSWER_ALIASES: &[&str] = &["answer", "answers", "correct", "key", "solution", "ans"];

/// Fields that may carry the question text.
pub const PROMPT_ALIASES: &[&str] = &["question", "prompt", "q", "text", "stem"];

pub const EXPLANATION_ALIASES: &[&str] = &["explanation", "explain"];

/// Fields that may carry matching pairs.
pub const PAIR_ALIASES: &[&str] = &["pairs", "matches"];

const PAIR_LEFT_KEYS: &[&str] = &["left", "term", "prompt"];
const PAIR_RIGHT_KEYS: &[&str] = &["right", "definition", "answer"];

/// Strategy that produced a multiple-choice answer index.
///
/// Strategies are tried in declaration order; `Default` is the fallback
/// when none applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexResolution {
    /// A JSON number, truncated and clamped into range.
    Numeric,
    /// A single letter `a`, `b`, `c`, ... within the option count.
    Letter,
    /// Case-insensitive, trimmed match against an option's text.
    Text,
    /// A string holding an in-range index such as `"2"`.
    IndexString,
    /// Nothing matched; index 0 was assumed.
    Default,
}

/// Normalize one raw record.
pub fn normalize(raw: &RawQuestion) -> CanonicalQuestion {
    let prompt = resolve_prompt(raw);
    let explanation = raw.first_of(EXPLANATION_ALIASES).map(value_to_string);
    let options = resolve_options(raw);
    let answer = raw.first_of(ANSWER_ALIASES);

    match resolve_kind(raw, &options) {
        QuestionKind::Mcq => {
            if !has_enough_options(&options) {
                return degrade_to_fill(prompt, answer, explanation);
            }
            let (correct_index, _) = resolve_correct_index(answer, &options);
            CanonicalQuestion::Mcq {
                prompt,
                options,
                correct_index,
                explanation,
            }
        }
        QuestionKind::Multi => {
            if !has_enough_options(&options) {
                return degrade_to_fill(prompt, answer, explanation);
            }
            let correct_indices =
                resolve_correct_indices(answer, &options).unwrap_or_else(|| vec![0]);
            CanonicalQuestion::Multi {
                prompt,
                options,
                correct_indices,
                explanation,
            }
        }
        QuestionKind::Fill => degrade_to_fill(prompt, answer, explanation),
        QuestionKind::Cloze => CanonicalQuestion::Cloze {
            prompt,
            accepted_answers: accepted_answers(answer),
            explanation,
        },
        QuestionKind::Transform => CanonicalQuestion::Transform {
            prompt,
            accepted_answers: accepted_answers(answer),
            explanation,
        },
        QuestionKind::Match => {
            let (pairs, expected): (Vec<_>, Vec<_>) =
                resolve_pairs(raw, answer).into_iter().unzip();
            if pairs.is_empty() {
                return degrade_to_fill(prompt, answer, explanation);
            }
            CanonicalQuestion::Match {
                prompt,
                pairs,
                expected,
                explanation,
            }
        }
    }
}

/// Type tag from the first alias naming a known kind, else inferred from
/// the presence of options.
pub fn resolve_kind(raw: &RawQuestion, options: &[String]) -> QuestionKind {
    declared_kind(raw).unwrap_or(if options.is_empty() {
        QuestionKind::Fill
    } else {
        QuestionKind::Mcq
    })
}

/// Kind named by the record's own type tag, if any alias holds a known one.
pub fn declared_kind(raw: &RawQuestion) -> Option<QuestionKind> {
    TYPE_ALIASES
        .iter()
        .filter_map(|alias| raw.get(alias))
        .filter_map(Value::as_str)
        .find_map(QuestionKind::from_tag)
}

/// Question text, trimmed; falls back to [`UNTITLED_PROMPT`].
pub fn resolve_prompt(raw: &RawQuestion) -> String {
    PROMPT_ALIASES
        .iter()
        .filter_map(|alias| raw.get(alias))
        .map(value_to_string)
        .map(|text| text.trim().to_string())
        .find(|text| !text.is_empty())
        .unwrap_or_else(|| UNTITLED_PROMPT.to_string())
}

/// Option list from the first option alias, each entry coerced to text.
pub fn resolve_options(raw: &RawQuestion) -> Vec<String> {
    match raw.first_of(OPTION_ALIASES) {
        Some(Value::Array(items)) => items.iter().map(value_to_string).collect(),
        _ => Vec::new(),
    }
}

/// A choice question needs at least two non-blank options.
pub fn has_enough_options(options: &[String]) -> bool {
    options.iter().filter(|option| !option.trim().is_empty()).count() >= 2
}

/// Decode a multiple-choice answer key into an option index.
pub fn resolve_correct_index(
    answer: Option<&Value>,
    options: &[String],
) -> (usize, IndexResolution) {
    answer
        .and_then(|value| match value {
            Value::Array(items) => items.first().and_then(|first| resolve_index(first, options)),
            other => resolve_index(other, options),
        })
        .unwrap_or((0, IndexResolution::Default))
}

/// Decode a multi-select answer key into sorted, distinct option indices.
///
/// `None` when no entry resolves; `normalize` then assumes option 0.
pub fn resolve_correct_indices(answer: Option<&Value>, options: &[String]) -> Option<Vec<usize>> {
    let items: Vec<&Value> = match answer {
        Some(Value::Array(items)) => items.iter().collect(),
        Some(other) => vec![other],
        None => Vec::new(),
    };

    let mut indices: Vec<usize> = items
        .into_iter()
        .filter_map(|item| resolve_index(item, options))
        .map(|(index, _)| index)
        .collect();
    indices.sort_unstable();
    indices.dedup();

    (!indices.is_empty()).then_some(indices)
}

fn resolve_index(value: &Value, options: &[String]) -> Option<(usize, IndexResolution)> {
    if options.is_empty() {
        return None;
    }
    let last = options.len() - 1;

    match value {
        Value::Null => None,
        Value::Number(number) => {
            let index = number
                .as_i64()
                .or_else(|| number.as_f64().map(|f| f.trunc() as i64))?;
            let clamped = index.clamp(0, last as i64) as usize;
            Some((clamped, IndexResolution::Numeric))
        }
        Value::String(text) => letter_index(text, options.len())
            .map(|index| (index, IndexResolution::Letter))
            .or_else(|| text_index(text, options).map(|index| (index, IndexResolution::Text)))
            .or_else(|| {
                text.trim()
                    .parse::<usize>()
                    .ok()
                    .filter(|index| *index <= last)
                    .map(|index| (index, IndexResolution::IndexString))
            }),
        other => text_index(&value_to_string(other), options)
            .map(|index| (index, IndexResolution::Text)),
    }
}

fn letter_index(text: &str, option_count: usize) -> Option<usize> {
    let mut chars = text.trim().chars();
    let letter = chars.next()?;
    if chars.next().is_some() || !letter.is_ascii_alphabetic() {
        return None;
    }
    let index = (letter.to_ascii_lowercase() as u8 - b'a') as usize;
    (index < option_count).then_some(index)
}

fn text_index(text: &str, options: &[String]) -> Option<usize> {
    let needle = fold(text);
    if needle.is_empty() {
        return None;
    }
    options.iter().position(|option| fold(option) == needle)
}

fn fold(text: &str) -> String {
    text.trim().to_lowercase()
}

fn degrade_to_fill(
    prompt: String,
    answer: Option<&Value>,
    explanation: Option<String>,
) -> CanonicalQuestion {
    CanonicalQuestion::Fill {
        prompt,
        accepted_answers: accepted_answers(answer),
        explanation,
    }
}

/// Answer coerced to a non-empty list of accepted strings.
///
/// Blank entries are dropped. A missing answer, or one with no non-blank
/// entry, becomes a single empty string.
pub fn accepted_answers(answer: Option<&Value>) -> Vec<String> {
    let answers: Vec<String> = answer_strings(answer)
        .into_iter()
        .filter(|entry| !entry.trim().is_empty())
        .collect();
    if answers.is_empty() {
        vec![String::new()]
    } else {
        answers
    }
}

fn answer_strings(answer: Option<&Value>) -> Vec<String> {
    match answer {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items.iter().map(value_to_string).collect(),
        Some(other) => vec![value_to_string(other)],
    }
}

/// Matching pairs as (left, right), dropping entries without both sides.
///
/// Bare left entries take their right side from the answer list by position.
pub fn resolve_pairs(raw: &RawQuestion, answer: Option<&Value>) -> Vec<(String, String)> {
    let entries: Vec<(String, Option<String>)> = match raw.first_of(PAIR_ALIASES) {
        Some(Value::Array(items)) => items.iter().map(pair_entry).collect(),
        Some(Value::Object(map)) => map
            .iter()
            .map(|(left, right)| (left.clone(), Some(value_to_string(right))))
            .collect(),
        _ => Vec::new(),
    };
    let positional = answer_strings(answer);

    entries
        .into_iter()
        .enumerate()
        .filter_map(|(position, (left, right))| {
            let right = right.or_else(|| positional.get(position).cloned())?;
            (!left.trim().is_empty()).then_some((left, right))
        })
        .collect()
}

fn pair_entry(item: &Value) -> (String, Option<String>) {
    match item {
        Value::Array(sides) => (
            sides.first().map(value_to_string).unwrap_or_default(),
            sides.get(1).map(value_to_string),
        ),
        Value::Object(map) => {
            let side = |keys: &[&str]| {
                keys.iter()
                    .filter_map(|key| map.get(*key))
                    .find(|value| !value.is_null())
                    .map(value_to_string)
            };
            (side(PAIR_LEFT_KEYS).unwrap_or_default(), side(PAIR_RIGHT_KEYS))
        }
        other => (value_to_string(other), None),
    }
}

/// String representation of a JSON value; null becomes the empty string.
pub fn value_to_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        Value::Bool(flag) => flag.to_string(),
        Value::Number(number) => number.to_string(),
        nested => nested.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn raw(value: Value) -> RawQuestion {
        RawQuestion::from_value(value).unwrap()
    }

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn choices_and_correct_text_resolve_to_mcq() {
        let question = normalize(&raw(json!({
            "question": "2+2=?",
            "choices": ["3", "4", "5"],
            "correct": "4"
        })));
        assert_eq!(
            question,
            CanonicalQuestion::Mcq {
                prompt: "2+2=?".to_string(),
                options: strings(&["3", "4", "5"]),
                correct_index: 1,
                explanation: None,
            }
        );
    }

    #[test]
    fn list_answer_without_options_is_fill() {
        let question = normalize(&raw(json!({
            "question": "Capital of France",
            "answer": ["paris", "Paris"]
        })));
        assert_eq!(
            question,
            CanonicalQuestion::Fill {
                prompt: "Capital of France".to_string(),
                accepted_answers: strings(&["paris", "Paris"]),
                explanation: None,
            }
        );
    }

    #[test]
    fn every_mcq_synonym_with_options_is_mcq() {
        let tags = [
            "mcq",
            "MCQ",
            "multiple-choice",
            "Multiple Choice",
            "multiple_choice",
            "radio",
        ];
        for tag in tags {
            let question = normalize(&raw(json!({
                "kind": tag,
                "prompt": "Pick",
                "options": ["a", "b", "c"],
                "answer": 7
            })));
            match question {
                CanonicalQuestion::Mcq {
                    correct_index,
                    options,
                    ..
                } => assert!(correct_index < options.len(), "tag {tag}"),
                other => panic!("tag {tag} normalized to {other:?}"),
            }
        }
    }

    #[test]
    fn mcq_with_one_option_degrades_to_fill() {
        let question = normalize(&raw(json!({
            "type": "mcq",
            "question": "Only one",
            "options": ["solo"],
            "answer": "solo"
        })));
        assert_eq!(
            question,
            CanonicalQuestion::Fill {
                prompt: "Only one".to_string(),
                accepted_answers: strings(&["solo"]),
                explanation: None,
            }
        );
    }

    #[test]
    fn mcq_with_blank_options_degrades_and_keeps_numeric_answer() {
        let question = normalize(&raw(json!({
            "type": "multiple choice",
            "question": "Blank",
            "options": ["", null, "x"],
            "answer": 2
        })));
        assert_eq!(
            question,
            CanonicalQuestion::Fill {
                prompt: "Blank".to_string(),
                accepted_answers: strings(&["2"]),
                explanation: None,
            }
        );
    }

    #[test]
    fn letter_answer_maps_to_index() {
        let question = normalize(&raw(json!({
            "type": "mcq",
            "question": "Letter",
            "options": ["w", "x", "y", "z"],
            "answer": "B"
        })));
        assert!(matches!(question, CanonicalQuestion::Mcq { correct_index: 1, .. }));
    }

    #[test]
    fn letter_beyond_option_count_falls_through_to_text() {
        let options = strings(&["e", "f"]);
        assert_eq!(
            resolve_correct_index(Some(&json!("f")), &options),
            (1, IndexResolution::Text)
        );
    }

    #[test]
    fn numeric_answer_is_clamped() {
        let options = strings(&["a", "b", "c"]);
        assert_eq!(
            resolve_correct_index(Some(&json!(9)), &options),
            (2, IndexResolution::Numeric)
        );
        assert_eq!(
            resolve_correct_index(Some(&json!(-3)), &options),
            (0, IndexResolution::Numeric)
        );
        assert_eq!(
            resolve_correct_index(Some(&json!(1.7)), &options),
            (1, IndexResolution::Numeric)
        );
    }

    #[test]
    fn text_answer_matches_case_insensitively() {
        let options = strings(&["Red", " Green ", "Blue"]);
        assert_eq!(
            resolve_correct_index(Some(&json!("green")), &options),
            (1, IndexResolution::Text)
        );
    }

    #[test]
    fn list_answer_uses_first_element() {
        let options = strings(&["Red", "Green", "Blue"]);
        assert_eq!(
            resolve_correct_index(Some(&json!(["Blue", "Red"])), &options),
            (2, IndexResolution::Text)
        );
    }

    #[test]
    fn index_string_is_tried_after_text() {
        let options = strings(&["10", "2", "30"]);
        // "2" is option text before it is an index
        assert_eq!(
            resolve_correct_index(Some(&json!("2")), &options),
            (1, IndexResolution::Text)
        );
        let options = strings(&["red", "green", "blue"]);
        assert_eq!(
            resolve_correct_index(Some(&json!("2")), &options),
            (2, IndexResolution::IndexString)
        );
    }

    #[test]
    fn unmatched_answer_defaults_to_first_option() {
        let options = strings(&["a", "b"]);
        assert_eq!(
            resolve_correct_index(Some(&json!("zebra")), &options),
            (0, IndexResolution::Default)
        );
        assert_eq!(resolve_correct_index(None, &options), (0, IndexResolution::Default));
    }

    #[test]
    fn type_inferred_from_options() {
        let question = normalize(&raw(json!({
            "q": "Which?",
            "opts": ["yes", "no"],
            "key": "no"
        })));
        assert_eq!(question.kind(), QuestionKind::Mcq);

        let question = normalize(&raw(json!({ "q": "Type it", "solution": "ok" })));
        assert_eq!(question.kind(), QuestionKind::Fill);
    }

    #[test]
    fn unknown_type_tag_falls_back_to_next_alias_then_inference() {
        let question = normalize(&raw(json!({
            "type": "essay",
            "format": "fill-in",
            "question": "Q",
            "options": ["a", "b"],
            "answer": "a"
        })));
        assert_eq!(question.kind(), QuestionKind::Fill);

        let question = normalize(&raw(json!({
            "type": "essay",
            "question": "Q",
            "options": ["a", "b"],
            "answer": "b"
        })));
        assert!(matches!(question, CanonicalQuestion::Mcq { correct_index: 1, .. }));
    }

    #[test]
    fn missing_fill_answer_is_single_empty_string() {
        let question = normalize(&raw(json!({ "type": "fill", "question": "Q" })));
        assert_eq!(
            question,
            CanonicalQuestion::Fill {
                prompt: "Q".to_string(),
                accepted_answers: strings(&[""]),
                explanation: None,
            }
        );

        let question = normalize(&raw(json!({ "type": "fill", "question": "Q", "answer": [] })));
        assert_eq!(question.to_raw().get("answer"), Some(&json!([""])));

        let question = normalize(&raw(json!({ "question": "Q", "answer": [null, "  "] })));
        assert_eq!(question.to_raw().get("answer"), Some(&json!([""])));
    }

    #[test]
    fn blank_entries_are_dropped_from_answer_list() {
        let question = normalize(&raw(json!({
            "question": "Capital of France",
            "answer": ["Paris", null, " "]
        })));
        assert_eq!(
            question,
            CanonicalQuestion::Fill {
                prompt: "Capital of France".to_string(),
                accepted_answers: strings(&["Paris"]),
                explanation: None,
            }
        );

        let question = normalize(&raw(json!({ "question": 5, "answer": [null, 3, true] })));
        assert_eq!(
            question,
            CanonicalQuestion::Fill {
                prompt: "5".to_string(),
                accepted_answers: strings(&["3", "true"]),
                explanation: None,
            }
        );
    }

    #[test]
    fn letter_is_tried_before_text() {
        let options = strings(&["b", "a"]);
        assert_eq!(
            resolve_correct_index(Some(&json!("a")), &options),
            (0, IndexResolution::Letter)
        );
    }

    #[test]
    fn missing_prompt_gets_placeholder() {
        let question = normalize(&raw(json!({ "question": "   ", "answer": "x" })));
        assert_eq!(question.prompt(), UNTITLED_PROMPT);
    }

    #[test]
    fn explanation_is_carried_through() {
        let question = normalize(&raw(json!({
            "question": "Q",
            "answer": "a",
            "explanation": "Because."
        })));
        assert_eq!(question.explanation(), Some("Because."));
    }

    #[test]
    fn numeric_and_null_options_coerce_to_strings() {
        let options = resolve_options(&raw(json!({ "options": [1, null, true, "x"] })));
        assert_eq!(options, strings(&["1", "", "true", "x"]));
    }

    #[test]
    fn multi_resolves_every_answer_entry() {
        let question = normalize(&raw(json!({
            "type": "checkbox",
            "question": "Primes",
            "options": ["2", "4", "5", "9"],
            "answer": ["5", "a", "2"]
        })));
        assert_eq!(
            question,
            CanonicalQuestion::Multi {
                prompt: "Primes".to_string(),
                options: strings(&["2", "4", "5", "9"]),
                correct_indices: vec![0, 2],
                explanation: None,
            }
        );
    }

    #[test]
    fn multi_without_resolvable_entry_defaults_to_first_option() {
        let options = strings(&["a", "b"]);
        assert_eq!(resolve_correct_indices(Some(&json!("zzz")), &options), None);
        assert_eq!(resolve_correct_indices(None, &options), None);

        let question = normalize(&raw(json!({
            "type": "multi",
            "question": "Pick",
            "options": ["a", "b"],
            "answer": "zzz"
        })));
        assert!(matches!(
            question,
            CanonicalQuestion::Multi { ref correct_indices, .. } if correct_indices == &vec![0]
        ));
    }

    #[test]
    fn cloze_and_transform_keep_their_tags() {
        let cloze = normalize(&raw(json!({
            "type": "cloze",
            "question": "She ___ to school.",
            "answer": "goes"
        })));
        assert_eq!(cloze.kind(), QuestionKind::Cloze);

        let transform = normalize(&raw(json!({
            "format": "rewrite",
            "question": "Make it past tense: I go.",
            "answers": ["I went.", "I went"]
        })));
        assert_eq!(
            transform,
            CanonicalQuestion::Transform {
                prompt: "Make it past tense: I go.".to_string(),
                accepted_answers: strings(&["I went.", "I went"]),
                explanation: None,
            }
        );
    }

    #[test]
    fn match_accepts_every_pair_shape() {
        let expected = CanonicalQuestion::Match {
            prompt: "Match".to_string(),
            pairs: strings(&["dog", "cat"]),
            expected: strings(&["perro", "gato"]),
            explanation: None,
        };

        let arrays = normalize(&raw(json!({
            "type": "match",
            "question": "Match",
            "pairs": [["dog", "perro"], ["cat", "gato"]]
        })));
        assert_eq!(arrays, expected);

        let objects = normalize(&raw(json!({
            "type": "match",
            "question": "Match",
            "pairs": [
                { "left": "dog", "right": "perro" },
                { "term": "cat", "definition": "gato" }
            ]
        })));
        assert_eq!(objects, expected);

        let map = normalize(&raw(json!({
            "type": "matching",
            "question": "Match",
            "pairs": { "dog": "perro", "cat": "gato" }
        })));
        assert_eq!(map, expected);

        let positional = normalize(&raw(json!({
            "type": "match",
            "question": "Match",
            "pairs": ["dog", "cat"],
            "answer": ["perro", "gato"]
        })));
        assert_eq!(positional, expected);
    }

    #[test]
    fn match_without_pairs_degrades_to_fill() {
        let question = normalize(&raw(json!({
            "type": "match",
            "question": "Nothing to match",
            "answer": "x"
        })));
        assert_eq!(question.kind(), QuestionKind::Fill);
    }

    #[test]
    fn normalizing_canonical_form_is_a_no_op() {
        let records = [
            json!({
                "question": "2+2=?",
                "choices": ["3", "4", "5"],
                "correct": "4",
                "explanation": "Sum."
            }),
            json!({ "question": "Capital of France", "answer": ["paris", "Paris"] }),
            json!({ "type": "mcq", "question": "Degraded", "options": ["only"], "answer": 0 }),
            json!({ "type": "fill" }),
            json!({
                "type": "multi",
                "question": "M",
                "options": ["a", "b", "c"],
                "answer": ["c", "a"]
            }),
            json!({ "type": "cloze", "question": "C ___", "answer": "x" }),
            json!({ "type": "transform", "question": "T", "answer": ["y"] }),
            json!({ "type": "match", "question": "P", "pairs": { "a": "1", "b": "2" } }),
        ];

        for record in records {
            let once = normalize(&raw(record.clone()));
            let twice = normalize(&once.to_raw());
            assert_eq!(twice, once, "record {record}");
        }
    }
}
