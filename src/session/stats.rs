use super::model::{InterviewSession, SessionStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Read-only summary of an interview session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSummary {
    pub session_id: String,
    pub call_id: String,
    pub status: SessionStatus,
    pub candidate_name: String,
    pub position: String,

    /// Position in the question sequence
    pub current_question_index: usize,

    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,

    /// Elapsed call time in seconds (up to completion, or until now while live)
    pub duration_secs: Option<f64>,

    /// Number of transcript messages received
    pub message_count: usize,

    /// Number of generated follow-up questions asked
    pub dynamic_question_count: usize,

    pub concluded: bool,
    pub has_analysis: bool,
}

impl SessionSummary {
    pub fn from_session(session: &InterviewSession, now: DateTime<Utc>) -> Self {
        let duration_secs = session.started_at.map(|started| {
            let end = session.ended_at.or(session.completed_at).unwrap_or(now);
            end.signed_duration_since(started).num_milliseconds() as f64 / 1000.0
        });

        Self {
            session_id: session.session_id.clone(),
            call_id: session.call_id.clone(),
            status: session.status,
            candidate_name: session.candidate_name.clone(),
            position: session.position.clone(),
            current_question_index: session.current_question_index,
            started_at: session.started_at,
            completed_at: session.completed_at,
            duration_secs,
            message_count: session.messages.len(),
            dynamic_question_count: session.dynamic_questions.len(),
            concluded: session.concluded,
            has_analysis: session.analysis.is_some(),
        }
    }
}
