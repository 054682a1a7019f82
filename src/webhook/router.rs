use super::event::WebhookEvent;
use crate::analysis::{AnalysisPipeline, IngestOutcome};
use crate::completion::CompletionClient;
use crate::config::Config;
use crate::error::InterviewError;
use crate::interview::sequencer::phase;
use crate::interview::{transcript, DynamicQuestionGenerator, NextTurn, QuestionSequencer};
use crate::notify::Notifier;
use crate::session::{SessionStore, SessionUpdate, TranscriptMessage, UpdateOutcome};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Utterance returned for an `assistant-request`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssistantReply {
    pub content: String,
}

/// Dispatches webhook events to the interview components.
///
/// Never fails towards the caller: every event gets an answer, `None` meaning
/// "nothing to say".
pub struct WebhookRouter {
    store: Arc<dyn SessionStore>,
    sequencer: QuestionSequencer,
    pipeline: AnalysisPipeline,
    continuation_prompt: String,
}

impl WebhookRouter {
    pub fn new(
        store: Arc<dyn SessionStore>,
        sequencer: QuestionSequencer,
        pipeline: AnalysisPipeline,
        continuation_prompt: impl Into<String>,
    ) -> Self {
        Self {
            store,
            sequencer,
            pipeline,
            continuation_prompt: continuation_prompt.into(),
        }
    }

    /// Wire the components from configuration and collaborators
    pub fn from_config(
        config: &Config,
        store: Arc<dyn SessionStore>,
        completion: Arc<dyn CompletionClient>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let generator = DynamicQuestionGenerator::new(
            completion,
            Duration::from_secs(config.completion.timeout_secs),
            config.interview.min_question_chars,
        );
        let sequencer = QuestionSequencer::new(
            generator,
            config.interview.closing_remarks.clone(),
            config.interview.context_window,
        );
        let pipeline = AnalysisPipeline::new(
            Arc::clone(&store),
            notifier,
            config.notifications.link_base.clone(),
        );

        Self::new(store, sequencer, pipeline, config.interview.continuation_prompt.clone())
    }

    pub fn store(&self) -> &Arc<dyn SessionStore> {
        &self.store
    }

    /// Parse and dispatch a raw webhook body
    pub async fn handle_json(&self, body: Value) -> Option<AssistantReply> {
        let now = Utc::now();
        match WebhookEvent::from_json(body, now) {
            Ok(event) => self.dispatch_at(event, now).await,
            Err(e) => {
                warn!("Ignoring webhook event: {}", e);
                None
            }
        }
    }

    pub async fn dispatch(&self, event: WebhookEvent) -> Option<AssistantReply> {
        self.dispatch_at(event, Utc::now()).await
    }

    /// Dispatch with an explicit clock reading
    pub async fn dispatch_at(
        &self,
        event: WebhookEvent,
        now: DateTime<Utc>,
    ) -> Option<AssistantReply> {
        match event {
            WebhookEvent::CallStart { call_id, started_at } => {
                self.on_call_start(&call_id, started_at.unwrap_or(now)).await;
                None
            }
            WebhookEvent::Transcript { call_id, message } => {
                self.on_transcript(&call_id, message).await;
                None
            }
            WebhookEvent::AssistantRequest { call_id } => {
                Some(self.on_assistant_request(&call_id, now).await)
            }
            WebhookEvent::CallEnd {
                call_id,
                ended_at,
                cost,
                report,
            }
            | WebhookEvent::EndOfCallReport {
                call_id,
                ended_at,
                cost,
                report,
            } => {
                self.on_call_end(&call_id, ended_at, cost, &report, now).await;
                None
            }
            WebhookEvent::Unknown { kind } => {
                info!("Ignoring unhandled webhook event kind: {}", kind);
                None
            }
        }
    }

    async fn on_call_start(&self, call_id: &str, started_at: DateTime<Utc>) {
        match self.store.update(call_id, SessionUpdate::Start { started_at }).await {
            Ok(UpdateOutcome::Ignored(reason)) => {
                debug!("Call {} start ignored ({:?})", call_id, reason)
            }
            Ok(_) => info!("Interview started for call {}", call_id),
            Err(InterviewError::SessionNotFound(_)) => {
                warn!("Call started for unknown call id {}", call_id)
            }
            Err(e) => error!("Failed to start session for call {}: {}", call_id, e),
        }
    }

    async fn on_transcript(&self, call_id: &str, message: TranscriptMessage) {
        if let Err(e) = transcript::record_message(self.store.as_ref(), call_id, message).await {
            match e {
                InterviewError::SessionNotFound(_) => {
                    warn!("Transcript for unknown call id {}", call_id)
                }
                e => error!("Failed to record transcript for call {}: {}", call_id, e),
            }
        }
    }

    async fn on_assistant_request(&self, call_id: &str, now: DateTime<Utc>) -> AssistantReply {
        let (session, template) = match self.store.get_with_template(call_id).await {
            Ok(Some(found)) => found,
            Ok(None) => {
                warn!("Assistant request for unknown call id {}", call_id);
                return AssistantReply {
                    content: self.continuation_prompt.clone(),
                };
            }
            Err(e) => {
                error!("Failed to load session for call {}: {}", call_id, e);
                return AssistantReply {
                    content: self.sequencer.closing_for("").into_content(),
                };
            }
        };

        debug!(
            "Assistant request for call {} in phase {:?}",
            call_id,
            phase(&session, &template, now)
        );

        let turn = self.sequencer.next_turn(&session, &template, now).await;

        let update = match &turn {
            NextTurn::TemplateQuestion { .. } => None,
            NextTurn::DynamicQuestion { text } => Some(SessionUpdate::RecordDynamicQuestion {
                question: text.clone(),
            }),
            NextTurn::Closing { .. } if !session.concluded && !session.status.is_terminal() => {
                Some(SessionUpdate::Conclude)
            }
            NextTurn::Closing { .. } => None,
        };

        if let Some(update) = update {
            let recorded = match self.store.update(call_id, update).await {
                Ok(UpdateOutcome::Ignored(reason)) => {
                    // Concluded or ended while the question was being generated
                    info!("Turn for call {} not recorded ({:?})", call_id, reason);
                    false
                }
                Ok(_) => true,
                Err(e) => {
                    error!("Failed to record turn for call {}: {}", call_id, e);
                    false
                }
            };

            if !recorded && !turn.is_closing() {
                return AssistantReply {
                    content: self.sequencer.closing(&session).into_content(),
                };
            }
        }

        AssistantReply {
            content: turn.into_content(),
        }
    }

    async fn on_call_end(
        &self,
        call_id: &str,
        ended_at: Option<DateTime<Utc>>,
        cost: Option<f64>,
        report: &Value,
        now: DateTime<Utc>,
    ) {
        match self.store.update(call_id, SessionUpdate::End { ended_at, cost, now }).await {
            Ok(UpdateOutcome::Ignored(reason)) => {
                debug!("Call {} end ignored ({:?})", call_id, reason)
            }
            Ok(_) => info!("Interview ended for call {}", call_id),
            Err(InterviewError::SessionNotFound(_)) => {
                warn!("Call ended for unknown call id {}", call_id);
                return;
            }
            Err(e) => error!("Failed to end session for call {}: {}", call_id, e),
        }

        match self.pipeline.ingest(call_id, report).await {
            IngestOutcome::Saved { notified } => {
                info!("Analysis stored for call {} (notified: {})", call_id, notified)
            }
            IngestOutcome::NoData => debug!("No analysis in end event for call {}", call_id),
            outcome => debug!("Analysis ingestion for call {}: {:?}", call_id, outcome),
        }
    }
}
