//! Test fixtures and factory functions for creating test data.

use serde_json::{json, Value};

/// Pack with a single multiple-choice question whose answer is option 1 ("4").
pub fn mcq_pack() -> String {
    json!({
        "meta": { "title": "Arithmetic" },
        "questions": [
            {
                "question": "2+2=?",
                "choices": ["3", "4", "5"],
                "correct": "4",
                "explanation": "Two plus two."
            }
        ]
    })
    .to_string()
}

/// Pack with a single fill-in question.
pub fn fill_pack() -> String {
    json!([
        { "question": "Capital of France", "answer": ["paris", "Paris"] }
    ])
    .to_string()
}

/// Pack exercising every question type, with one record that needs a fallback.
pub fn mixed_pack() -> String {
    json!([
        { "type": "mcq", "question": "Pick B", "options": ["a", "b", "c", "d"], "answer": "B" },
        { "type": "multi", "question": "Evens", "options": ["1", "2", "4"], "answer": [1, 2] },
        { "question": "Opposite of hot", "answer": "cold" },
        { "type": "cloze", "question": "She ___ home.", "answer": "went" },
        { "type": "transform", "question": "Past tense: I go.", "answer": ["I went"] },
        { "type": "match", "question": "Translate", "pairs": { "dog": "perro", "cat": "gato" } },
        { "type": "mcq", "question": "Broken", "options": ["x", "y"], "answer": "zebra" }
    ])
    .to_string()
}

/// Start-session request body.
pub fn start_request(mode: &str, length: Option<usize>) -> Value {
    match length {
        Some(length) => json!({ "mode": mode, "length": length }),
        None => json!({ "mode": mode }),
    }
}

/// Advance request body.
pub fn advance_request(answer: Option<Value>) -> Value {
    match answer {
        Some(answer) => json!({ "answer": answer }),
        None => json!({}),
    }
}
