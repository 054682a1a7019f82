use super::state::AppState;
use crate::error::InterviewError;
use crate::session::{InterviewSession, ScheduleRequest, SessionSummary, TranscriptMessage};
use crate::webhook::AssistantReply;
use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use chrono::Utc;
use serde::Serialize;
use serde_json::Value;
use tracing::{error, info, warn};

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct ScheduleResponse {
    pub session_id: String,
    pub call_id: String,
    pub status: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

fn error_response(status: StatusCode, error: String) -> Response {
    (status, Json(ErrorResponse { error })).into_response()
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /webhook
/// Voice platform events. Always 200; body is `{content}` or `null`.
pub async fn webhook(
    State(state): State<AppState>,
    body: Bytes,
) -> Json<Option<AssistantReply>> {
    let body: Value = match serde_json::from_slice(&body) {
        Ok(body) => body,
        Err(e) => {
            warn!("Ignoring webhook body that is not JSON: {}", e);
            return Json(None);
        }
    };

    Json(state.router.handle_json(body).await)
}

/// POST /sessions
/// Schedule an interview call with an inline template
pub async fn schedule_session(
    State(state): State<AppState>,
    Json(req): Json<ScheduleRequest>,
) -> Response {
    let (session, template) = req.into_parts();
    let session_id = session.session_id.clone();
    let call_id = session.call_id.clone();

    info!("Scheduling interview for call: {}", call_id);

    match state.router.store().schedule(session, template).await {
        Ok(()) => (
            StatusCode::CREATED,
            Json(ScheduleResponse {
                session_id,
                call_id,
                status: "scheduled".to_string(),
            }),
        )
            .into_response(),
        Err(e @ InterviewError::AlreadyScheduled(_)) => {
            error_response(StatusCode::CONFLICT, e.to_string())
        }
        Err(e @ InterviewError::Validation(_)) => {
            error_response(StatusCode::BAD_REQUEST, e.to_string())
        }
        Err(e) => {
            error!("Failed to schedule session: {}", e);
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to schedule session: {}", e),
            )
        }
    }
}

async fn load_session(state: &AppState, call_id: &str) -> Result<InterviewSession, Response> {
    match state.router.store().get_by_call_id(call_id).await {
        Ok(Some(session)) => Ok(session),
        Ok(None) => Err(error_response(
            StatusCode::NOT_FOUND,
            format!("Session for call {} not found", call_id),
        )),
        Err(e) => {
            error!("Failed to load session: {}", e);
            Err(error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to load session: {}", e),
            ))
        }
    }
}

/// GET /sessions/:call_id
/// Session status summary
pub async fn get_session_status(
    State(state): State<AppState>,
    Path(call_id): Path<String>,
) -> Response {
    match load_session(&state, &call_id).await {
        Ok(session) => {
            let summary = SessionSummary::from_session(&session, Utc::now());
            (StatusCode::OK, Json(summary)).into_response()
        }
        Err(response) => response,
    }
}

/// GET /sessions/:call_id/transcript
/// Transcript accumulated so far
pub async fn get_session_transcript(
    State(state): State<AppState>,
    Path(call_id): Path<String>,
) -> Response {
    match load_session(&state, &call_id).await {
        Ok(session) => {
            let transcript: Vec<TranscriptMessage> = session.messages;
            (StatusCode::OK, Json(transcript)).into_response()
        }
        Err(response) => response,
    }
}

/// GET /sessions/:call_id/analysis
/// Stored analysis artifact
pub async fn get_session_analysis(
    State(state): State<AppState>,
    Path(call_id): Path<String>,
) -> Response {
    match load_session(&state, &call_id).await {
        Ok(InterviewSession {
            analysis: Some(analysis),
            ..
        }) => (StatusCode::OK, Json(analysis)).into_response(),
        Ok(_) => error_response(
            StatusCode::NOT_FOUND,
            format!("No analysis for call {} yet", call_id),
        ),
        Err(response) => response,
    }
}

/// GET /health
/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}
