use super::extract::{default_extractors, extract_artifact, AnalysisExtractor};
use crate::notify::{Notification, NotificationKind, Notifier};
use crate::session::{AnalysisWrite, InterviewSession, SessionStore};
use serde_json::Value;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Result of ingesting one post-call report
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IngestOutcome {
    /// First artifact stored for the session
    Saved { notified: bool },
    /// An artifact was already stored; nothing written, nobody notified
    AlreadySaved,
    /// No usable analysis in the payload; nothing written
    NoData,
    SessionNotFound,
    /// The store rejected the write
    Failed(String),
}

impl IngestOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, IngestOutcome::Saved { .. } | IngestOutcome::AlreadySaved)
    }
}

/// Turns end-of-call reports into stored analysis artifacts
pub struct AnalysisPipeline {
    store: Arc<dyn SessionStore>,
    notifier: Arc<dyn Notifier>,
    extractors: Vec<Box<dyn AnalysisExtractor>>,
    link_base: String,
}

impl AnalysisPipeline {
    pub fn new(
        store: Arc<dyn SessionStore>,
        notifier: Arc<dyn Notifier>,
        link_base: impl Into<String>,
    ) -> Self {
        Self {
            store,
            notifier,
            extractors: default_extractors(),
            link_base: link_base.into(),
        }
    }

    /// Replace the extractor chain
    pub fn with_extractors(mut self, extractors: Vec<Box<dyn AnalysisExtractor>>) -> Self {
        self.extractors = extractors;
        self
    }

    pub async fn ingest(&self, call_id: &str, payload: &Value) -> IngestOutcome {
        let session = match self.store.get_by_call_id(call_id).await {
            Ok(Some(session)) => session,
            Ok(None) => {
                warn!("No session for call {}, dropping analysis", call_id);
                return IngestOutcome::SessionNotFound;
            }
            Err(e) => {
                error!("Failed to load session for call {}: {}", call_id, e);
                return IngestOutcome::Failed(e.to_string());
            }
        };

        let Some(artifact) = extract_artifact(payload, &self.extractors) else {
            warn!("No analysis found in report for call {}", call_id);
            return IngestOutcome::NoData;
        };

        let write = match self.store.upsert_analysis(&session.session_id, artifact).await {
            Ok(write) => write,
            Err(e) => {
                error!("Failed to save analysis for session {}: {}", session.session_id, e);
                return IngestOutcome::Failed(e.to_string());
            }
        };

        match write {
            AnalysisWrite::AlreadyStored => {
                info!("Analysis for session {} already stored", session.session_id);
                IngestOutcome::AlreadySaved
            }
            AnalysisWrite::Stored { was_completed } => {
                info!(
                    "Saved analysis for session {} (previously completed: {})",
                    session.session_id, was_completed
                );
                let notified = self.notify_results_ready(&session).await;
                IngestOutcome::Saved { notified }
            }
        }
    }

    async fn notify_results_ready(&self, session: &InterviewSession) -> bool {
        let notification = Notification {
            target_id: session
                .owner_id
                .clone()
                .unwrap_or_else(|| session.session_id.clone()),
            kind: NotificationKind::ResultsReady,
            message: format!(
                "Interview results for {} ({}) are ready",
                session.candidate_name, session.position
            ),
            link: format!("{}/{}", self.link_base.trim_end_matches('/'), session.session_id),
        };

        match self.notifier.create(notification).await {
            Ok(()) => true,
            Err(e) => {
                warn!("Failed to send results notification for {}: {}", session.session_id, e);
                false
            }
        }
    }
}
