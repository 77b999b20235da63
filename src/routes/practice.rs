use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::response::{success, AppError};
use crate::services::practice_session::{CardView, Feedback, SessionState};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SubmitRequest {
    #[serde(default)]
    sentence: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CheckRequest {
    #[serde(default)]
    sentence: String,
    phrase: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SessionView {
    session_id: Uuid,
    card: CardView,
    feedback: Option<Feedback>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct EndedView {
    session_id: Uuid,
    ended: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CheckView {
    phrase: String,
    correct: bool,
}

pub fn sessions_router() -> Router<AppState> {
    Router::new()
        .route("/", post(start_session))
        .route("/:session_id", get(get_session).delete(end_session))
        .route("/:session_id/submit", post(submit))
        .route("/:session_id/next", post(next_card))
}

pub fn usage_router() -> Router<AppState> {
    Router::new().route("/check", post(check_usage))
}

fn render_view(state: &AppState, session_id: Uuid, session: &SessionState) -> SessionView {
    let (card, feedback) = session.render(&state.config().dictionary_base_url);
    SessionView {
        session_id,
        card,
        feedback,
    }
}

fn parse_session_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::session_not_found())
}

async fn start_session(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let entries = state.catalog().entries().await?;
    let (session_id, session) = state.sessions().create(&entries)?;
    tracing::info!(
        %session_id,
        phrase = %session.current_entry().phrase,
        "practice session started"
    );
    Ok((
        StatusCode::CREATED,
        success(render_view(&state, session_id, &session)),
    ))
}

async fn get_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let session_id = parse_session_id(&session_id)?;
    let view = state
        .sessions()
        .with_session(&session_id, |session| render_view(&state, session_id, session))
        .ok_or_else(AppError::session_not_found)?;
    Ok(success(view))
}

async fn submit(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    Json(body): Json<SubmitRequest>,
) -> Result<impl IntoResponse, AppError> {
    let session_id = parse_session_id(&session_id)?;
    let sessions = state.sessions();
    let phrase = sessions
        .with_session(&session_id, |session| session.current_entry().phrase.clone())
        .ok_or_else(AppError::session_not_found)?;

    // Validation runs outside the store lock.
    let feedback = SessionState::evaluate(&phrase, &body.sentence, &state.validator());
    let kind = feedback.kind;

    let view = sessions
        .with_session(&session_id, |session| {
            if session.record_feedback(&phrase, feedback) {
                tracing::debug!(%session_id, ?kind, "sentence checked");
            } else {
                tracing::debug!(%session_id, "card changed during check, verdict dropped");
            }
            render_view(&state, session_id, session)
        })
        .ok_or_else(AppError::session_not_found)?;
    Ok(success(view))
}

async fn next_card(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let session_id = parse_session_id(&session_id)?;
    let entries = state.catalog().entries().await?;
    let view = state
        .sessions()
        .with_session(&session_id, |session| {
            session
                .next(&entries, &mut rand::rng())
                .map(|()| render_view(&state, session_id, session))
        })
        .ok_or_else(AppError::session_not_found)??;
    Ok(success(view))
}

async fn end_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let session_id = parse_session_id(&session_id)?;
    if !state.sessions().remove(&session_id) {
        return Err(AppError::session_not_found());
    }
    tracing::info!(%session_id, "practice session ended");
    Ok(success(EndedView {
        session_id,
        ended: true,
    }))
}

async fn check_usage(
    State(state): State<AppState>,
    Json(body): Json<CheckRequest>,
) -> Result<impl IntoResponse, AppError> {
    if body.phrase.trim().is_empty() {
        return Err(AppError::bad_request("phrase must not be empty"));
    }
    let correct = state.validator().validate(&body.sentence, &body.phrase);
    Ok(success(CheckView {
        phrase: body.phrase,
        correct,
    }))
}
