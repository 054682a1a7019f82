use thiserror::Error;

/// Failures the orchestration core can observe.
///
/// None of these ever reach the voice platform directly: the webhook router maps
/// each one to a fallback response (continuation utterance, closing remarks, or `null`).
#[derive(Error, Debug)]
pub enum InterviewError {
    #[error("Malformed event: {0}")]
    MalformedEvent(String),

    #[error("Session not found for call {0}")]
    SessionNotFound(String),

    #[error("Call {0} is already scheduled")]
    AlreadyScheduled(String),

    #[error("Generation failed: {0}")]
    Generation(String),

    #[error("Persistence failed: {0}")]
    Persistence(String),

    #[error("Validation failed: {0}")]
    Validation(String),
}

pub type InterviewResult<T> = std::result::Result<T, InterviewError>;
