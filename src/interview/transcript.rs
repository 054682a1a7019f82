use crate::error::InterviewResult;
use crate::session::{SessionStore, SessionUpdate, TranscriptMessage, UpdateOutcome};
use tracing::{debug, info};

/// Append an inbound message to the session log.
///
/// A substantive candidate answer moves the question index forward by one; this is
/// the only place the index advances. Redelivered messages are dropped by the store.
pub async fn record_message(
    store: &dyn SessionStore,
    call_id: &str,
    message: TranscriptMessage,
) -> InterviewResult<UpdateOutcome> {
    let role = message.role;
    let outcome = store
        .update(call_id, SessionUpdate::AppendMessage { message })
        .await?;

    match outcome {
        UpdateOutcome::Advanced { index } => {
            info!("Call {}: candidate answered, question index now {}", call_id, index)
        }
        UpdateOutcome::Applied => debug!("Call {}: appended {:?} message", call_id, role),
        UpdateOutcome::Ignored(reason) => {
            debug!("Call {}: transcript message ignored ({:?})", call_id, reason)
        }
    }

    Ok(outcome)
}
