pub mod analysis;
pub mod completion;
pub mod config;
pub mod error;
pub mod http;
pub mod interview;
pub mod notify;
pub mod session;
pub mod webhook;

pub use analysis::{AnalysisArtifact, AnalysisPipeline, HiringRecommendation, IngestOutcome};
pub use completion::{CompletionClient, DisabledCompletionClient, OpenAiCompletionClient};
pub use config::Config;
pub use error::{InterviewError, InterviewResult};
pub use http::{create_router, AppState};
pub use interview::{DynamicQuestionGenerator, NextTurn, QuestionSequencer, TimeBudget};
pub use notify::{LogNotifier, NatsNotifier, Notification, NotificationKind, Notifier};
pub use session::{
    InMemorySessionStore, InterviewSession, QuestionSpec, Role, SessionStatus, SessionStore,
    Template, TranscriptMessage,
};
pub use webhook::{AssistantReply, WebhookEvent, WebhookRouter};
