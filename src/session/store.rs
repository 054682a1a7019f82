use super::model::{AnalysisWrite, InterviewSession, SessionUpdate, UpdateOutcome};
use super::template::Template;
use crate::analysis::AnalysisArtifact;
use crate::error::{InterviewError, InterviewResult};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info};

/// Session persistence collaborator
///
/// Every mutating call is one atomic read-modify-write against a single session.
/// Implementations must serialize concurrent writes to the same session; writes to
/// different sessions need no coordination.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Register a newly scheduled session together with its template
    async fn schedule(&self, session: InterviewSession, template: Template) -> InterviewResult<()>;

    async fn get_by_call_id(&self, call_id: &str) -> InterviewResult<Option<InterviewSession>>;

    async fn get_with_template(
        &self,
        call_id: &str,
    ) -> InterviewResult<Option<(InterviewSession, Template)>>;

    /// Apply one mutation to the session for `call_id`
    async fn update(&self, call_id: &str, update: SessionUpdate) -> InterviewResult<UpdateOutcome>;

    /// Idempotent write of the analysis artifact, keyed by session id.
    ///
    /// Seals the session (`completed`, `completed_at`) as part of the same write.
    async fn upsert_analysis(
        &self,
        session_id: &str,
        artifact: AnalysisArtifact,
    ) -> InterviewResult<AnalysisWrite>;
}

/// A session and the template it was scheduled with
struct SessionEntry {
    session: Mutex<InterviewSession>,

    /// Fixed at scheduling time; never shared with other sessions
    template: Template,
}

/// In-process session store with one lock per session
#[derive(Default)]
pub struct InMemorySessionStore {
    /// call_id → session
    sessions: RwLock<HashMap<String, Arc<SessionEntry>>>,

    /// session_id → call_id
    session_index: RwLock<HashMap<String, String>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    async fn session_handle(&self, call_id: &str) -> Option<Arc<SessionEntry>> {
        let sessions = self.sessions.read().await;
        sessions.get(call_id).cloned()
    }

    /// Number of sessions currently held
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn schedule(&self, session: InterviewSession, template: Template) -> InterviewResult<()> {
        let call_id = session.call_id.clone();
        let session_id = session.session_id.clone();

        if session.template_id != template.id
            || session.template_question_count != template.question_count()
        {
            return Err(InterviewError::Validation(format!(
                "session {} does not match template {}",
                session_id, template.id
            )));
        }

        {
            let mut sessions = self.sessions.write().await;
            if sessions.contains_key(&call_id) {
                return Err(InterviewError::AlreadyScheduled(call_id));
            }
            let entry = SessionEntry {
                session: Mutex::new(session),
                template,
            };
            sessions.insert(call_id.clone(), Arc::new(entry));
        }

        {
            let mut index = self.session_index.write().await;
            index.insert(session_id.clone(), call_id.clone());
        }

        info!("Scheduled session {} for call {}", session_id, call_id);
        Ok(())
    }

    async fn get_by_call_id(&self, call_id: &str) -> InterviewResult<Option<InterviewSession>> {
        match self.session_handle(call_id).await {
            Some(entry) => Ok(Some(entry.session.lock().await.clone())),
            None => Ok(None),
        }
    }

    async fn get_with_template(
        &self,
        call_id: &str,
    ) -> InterviewResult<Option<(InterviewSession, Template)>> {
        let Some(entry) = self.session_handle(call_id).await else {
            return Ok(None);
        };

        let session = entry.session.lock().await.clone();
        Ok(Some((session, entry.template.clone())))
    }

    async fn update(&self, call_id: &str, update: SessionUpdate) -> InterviewResult<UpdateOutcome> {
        let entry = self
            .session_handle(call_id)
            .await
            .ok_or_else(|| InterviewError::SessionNotFound(call_id.to_string()))?;

        let mut session = entry.session.lock().await;
        let outcome = session.apply(update);
        debug!("Update for call {}: {:?}", call_id, outcome);
        Ok(outcome)
    }

    async fn upsert_analysis(
        &self,
        session_id: &str,
        artifact: AnalysisArtifact,
    ) -> InterviewResult<AnalysisWrite> {
        let call_id = {
            let index = self.session_index.read().await;
            index.get(session_id).cloned()
        }
        .ok_or_else(|| InterviewError::Persistence(format!("unknown session {}", session_id)))?;

        let entry = self
            .session_handle(&call_id)
            .await
            .ok_or_else(|| InterviewError::SessionNotFound(call_id.clone()))?;

        let mut session = entry.session.lock().await;
        Ok(session.record_analysis(artifact, Utc::now()))
    }
}
