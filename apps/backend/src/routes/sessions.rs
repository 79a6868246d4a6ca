//! Practice session endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use chrono::Utc;
use quiz_core::{grade, Step};
use uuid::Uuid;

use crate::error::Result;
use crate::models::*;
use crate::services::storage::StoredSession;
use crate::AppState;

/// POST /api/sessions
pub async fn start(
    State(state): State<AppState>,
    Json(payload): Json<StartSessionRequest>,
) -> Result<Json<SessionResponse>> {
    let mode = payload.to_mode(state.config.sprint_length);
    let session = Session::start(state.bank.bank.len(), mode, Utc::now(), &mut rand::rng())?;
    let stored = StoredSession::new(session);
    state.sessions.save(&stored).await?;

    tracing::info!("Started {:?} session {}", mode, stored.id);
    Ok(Json(session_response(&state, &stored)))
}

/// GET /api/sessions/{id}
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionResponse>> {
    let stored = state.sessions.load(id).await?;
    stored.session.check_bank(state.bank.bank.len())?;
    Ok(Json(session_response(&state, &stored)))
}

/// POST /api/sessions/{id}/advance
///
/// Grades the current question on the first call and moves on with the
/// next, so a client only ever needs one "next" action. A request without
/// a body submits no answer.
pub async fn advance(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    payload: Option<Json<AdvanceRequest>>,
) -> Result<Json<AdvanceResponse>> {
    let answer = payload.and_then(|Json(request)| request.answer);
    let _guard = state.sessions.lock().await;

    let mut stored = state.sessions.load(id).await?;
    let bank = state.bank.bank.as_slice();
    stored.session.check_bank(bank.len())?;

    let (session, step) =
        stored
            .session
            .advance(bank, answer, Utc::now(), &mut rand::rng())?;
    stored.session = session;
    state.sessions.save(&stored).await?;

    let status = SessionStatus::from(&stored.session);
    let response = match step {
        Step::Graded(feedback) => {
            tracing::debug!(
                "Session {} graded question {}: {}",
                id,
                stored.session.answered_count,
                if feedback.is_correct { "correct" } else { "incorrect" }
            );
            AdvanceResponse {
                id,
                step: StepKind::Graded,
                status,
                feedback: Some(feedback),
                question: None,
                summary: None,
            }
        }
        Step::Next { question } => AdvanceResponse {
            id,
            step: StepKind::Next,
            status,
            feedback: None,
            question: bank.get(question).map(QuestionView::from),
            summary: None,
        },
        Step::Finished(summary) => {
            tracing::info!(
                "Session {} finished: {}/{} correct",
                id,
                summary.score,
                summary.answered
            );
            AdvanceResponse {
                id,
                step: StepKind::Finished,
                status,
                feedback: None,
                question: None,
                summary: Some(summary),
            }
        }
    };

    Ok(Json(response))
}

/// POST /api/sessions/{id}/end
pub async fn end(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<EndSessionResponse>> {
    let _guard = state.sessions.lock().await;

    let stored = state.sessions.load(id).await?;
    let summary = stored.session.summary();
    state.sessions.delete(id).await?;

    tracing::info!(
        "Session {} ended: {}/{} correct, best streak {}",
        id,
        summary.score,
        summary.answered,
        summary.max_streak
    );
    Ok(Json(EndSessionResponse { id, summary }))
}

/// GET /api/sessions/{id}/review
pub async fn review(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ReviewResponse>> {
    let stored = state.sessions.load(id).await?;
    let items = stored.session.review(state.bank.bank.as_slice())?;

    Ok(Json(ReviewResponse {
        id,
        summary: stored.session.summary(),
        items,
    }))
}

fn session_response(state: &AppState, stored: &StoredSession) -> SessionResponse {
    let session = &stored.session;
    let current = session
        .current_question()
        .and_then(|index| state.bank.bank.get(index));

    let feedback = if session.submitted {
        current.zip(session.history.last()).map(|(question, entry)| {
            grade(question, entry.answer.as_ref())
        })
    } else {
        None
    };

    SessionResponse {
        id: stored.id,
        status: SessionStatus::from(session),
        question: current.map(QuestionView::from),
        feedback,
    }
}
