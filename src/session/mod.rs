//! Interview session state
//!
//! This module provides:
//! - The `InterviewSession` value object and its atomic `SessionUpdate` mutations
//! - Interview templates (ordered questions, duration, instructions)
//! - The `SessionStore` collaborator and an in-memory implementation
//! - Read-only session summaries for the HTTP API

mod model;
mod schedule;
mod stats;
mod store;
mod template;

pub use model::{
    AnalysisWrite, IgnoreReason, InterviewSession, Role, SessionStatus, SessionUpdate,
    TranscriptMessage, UpdateOutcome, MIN_ANSWER_CHARS,
};
pub use schedule::ScheduleRequest;
pub use stats::SessionSummary;
pub use store::{InMemorySessionStore, SessionStore};
pub use template::{QuestionSpec, Template};
