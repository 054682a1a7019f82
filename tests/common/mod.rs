// Shared fixtures for integration tests: templates, fake collaborators, router wiring.

#![allow(dead_code)]

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use interview_orchestrator::analysis::AnalysisPipeline;
use interview_orchestrator::interview::{DynamicQuestionGenerator, QuestionSequencer};
use interview_orchestrator::session::{
    InMemorySessionStore, InterviewSession, QuestionSpec, Role, SessionStore, Template,
    TranscriptMessage,
};
use interview_orchestrator::{CompletionClient, Notification, Notifier, WebhookEvent, WebhookRouter};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

pub const CLOSING: &str = "Thank you, {name}. That concludes our interview.";
pub const CONTINUATION: &str = "Could you tell me more about that?";

pub fn closing_for(name: &str) -> String {
    CLOSING.replace("{name}", name)
}

pub fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 1, 14, 0, 0).unwrap()
}

pub fn minutes(m: f64) -> DateTime<Utc> {
    t0() + Duration::milliseconds((m * 60_000.0) as i64)
}

pub fn template(question_count: usize, duration_minutes: f64) -> Template {
    Template {
        id: format!("tpl-{}-{}", question_count, duration_minutes),
        name: "Backend interview".to_string(),
        questions: (0..question_count)
            .map(|i| QuestionSpec {
                text: format!("Template question {}?", i + 1),
                category: "technical".to_string(),
                weight: 1.0,
            })
            .collect(),
        duration_minutes,
        instructions: "Be warm and concise".to_string(),
        category: Some("engineering".to_string()),
        difficulty: Some("mid".to_string()),
    }
}

pub async fn schedule(
    store: &InMemorySessionStore,
    call_id: &str,
    template: Template,
) -> InterviewSession {
    let mut session = InterviewSession::new(
        call_id,
        "Ada",
        "Backend Engineer",
        template.id.clone(),
        template.question_count(),
    );
    session.owner_id = Some("recruiter-7".to_string());
    store.schedule(session.clone(), template).await.unwrap();
    session
}

pub fn answer(content: &str, at: DateTime<Utc>) -> TranscriptMessage {
    TranscriptMessage {
        role: Role::Candidate,
        content: content.to_string(),
        time: at,
        seconds_from_start: None,
    }
}

pub fn start_event(call_id: &str, at: DateTime<Utc>) -> WebhookEvent {
    WebhookEvent::CallStart {
        call_id: call_id.to_string(),
        started_at: Some(at),
    }
}

pub fn answer_event(call_id: &str, content: &str, at: DateTime<Utc>) -> WebhookEvent {
    WebhookEvent::Transcript {
        call_id: call_id.to_string(),
        message: answer(content, at),
    }
}

pub fn request_event(call_id: &str) -> WebhookEvent {
    WebhookEvent::AssistantRequest {
        call_id: call_id.to_string(),
    }
}

/// Returns the same text for every prompt and counts calls
pub struct StaticCompletion {
    pub text: String,
    pub calls: AtomicUsize,
}

impl StaticCompletion {
    pub fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CompletionClient for StaticCompletion {
    async fn complete(&self, _prompt: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.text.clone())
    }

    fn name(&self) -> &str {
        "static"
    }
}

pub struct FailingCompletion;

#[async_trait]
impl CompletionClient for FailingCompletion {
    async fn complete(&self, _prompt: &str) -> Result<String> {
        anyhow::bail!("upstream returned 503")
    }

    fn name(&self) -> &str {
        "failing"
    }
}

/// Sleeps far longer than the generator timeout
pub struct HangingCompletion;

#[async_trait]
impl CompletionClient for HangingCompletion {
    async fn complete(&self, _prompt: &str) -> Result<String> {
        tokio::time::sleep(std::time::Duration::from_secs(30)).await;
        Ok("Would you have answered this eventually?".to_string())
    }

    fn name(&self) -> &str {
        "hanging"
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    pub sent: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn sent(&self) -> Vec<Notification> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn create(&self, notification: Notification) -> Result<()> {
        self.sent.lock().unwrap().push(notification);
        Ok(())
    }
}

pub struct Harness {
    pub store: Arc<InMemorySessionStore>,
    pub notifier: Arc<RecordingNotifier>,
    pub router: WebhookRouter,
}

pub fn harness(completion: Arc<dyn CompletionClient>) -> Harness {
    let store = Arc::new(InMemorySessionStore::new());
    let notifier = Arc::new(RecordingNotifier::default());

    let timeout = std::time::Duration::from_millis(200);
    let generator = DynamicQuestionGenerator::new(completion, timeout, 10);
    let sequencer = QuestionSequencer::new(generator, CLOSING.to_string(), 3);
    let pipeline = AnalysisPipeline::new(store.clone(), notifier.clone(), "/interviews");
    let router = WebhookRouter::new(store.clone(), sequencer, pipeline, CONTINUATION);

    Harness {
        store,
        notifier,
        router,
    }
}

impl Harness {
    pub async fn session(&self, call_id: &str) -> InterviewSession {
        self.store.get_by_call_id(call_id).await.unwrap().unwrap()
    }

    /// Content of the reply to an assistant-request at `now`
    pub async fn ask(&self, call_id: &str, now: DateTime<Utc>) -> String {
        self.router
            .dispatch_at(request_event(call_id), now)
            .await
            .expect("assistant-request always gets a reply")
            .content
    }
}
