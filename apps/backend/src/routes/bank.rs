//! Question bank endpoints

use std::collections::BTreeMap;

use axum::{extract::State, Json};

use crate::models::*;
use crate::AppState;

/// GET /api/bank
pub async fn summary(State(state): State<AppState>) -> Json<BankResponse> {
    let mut kinds = BTreeMap::new();
    for question in state.bank.bank.as_slice() {
        *kinds.entry(question.kind().as_str()).or_insert(0) += 1;
    }

    Json(BankResponse {
        questions: state.bank.bank.len(),
        warnings: state.bank.warning_count(),
        kinds,
        packs: state.bank.packs.clone(),
    })
}
