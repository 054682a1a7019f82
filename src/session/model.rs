use crate::analysis::AnalysisArtifact;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Minimum trimmed length (exclusive) for a candidate turn to count as an answer
pub const MIN_ANSWER_CHARS: usize = 10;

/// Lifecycle status of an interview session. Forward-only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Scheduled,
    InProgress,
    Completed,
}

impl SessionStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, SessionStatus::Completed)
    }
}

/// Speaker of a transcript message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Interviewer,
    Candidate,
    System,
}

impl Role {
    /// Map a platform role label, ignoring case; unrecognized labels are `System`
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "interviewer" | "assistant" | "bot" | "agent" => Role::Interviewer,
            "candidate" | "user" | "customer" | "human" => Role::Candidate,
            _ => Role::System,
        }
    }
}

impl<'de> Deserialize<'de> for Role {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = String::deserialize(deserializer)?;
        Ok(Role::from_label(&label))
    }
}

/// One conversational message, as delivered by the voice platform
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranscriptMessage {
    pub role: Role,
    pub content: String,

    /// Platform timestamp of the utterance (arrival order is what the log preserves)
    pub time: DateTime<Utc>,

    /// Offset from call start, if the platform reported one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seconds_from_start: Option<f64>,
}

impl TranscriptMessage {
    /// Whether this message is a substantive candidate answer
    pub fn is_candidate_answer(&self) -> bool {
        self.role == Role::Candidate && self.content.trim().chars().count() > MIN_ANSWER_CHARS
    }

    /// Redelivery of the same utterance carries the same role, content and time
    fn same_delivery(&self, other: &TranscriptMessage) -> bool {
        self.role == other.role && self.time == other.time && self.content == other.content
    }
}

/// One candidate's interview attempt, keyed by the external call id
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterviewSession {
    pub session_id: String,
    pub call_id: String,
    pub status: SessionStatus,
    pub candidate_name: String,
    pub position: String,

    /// Who scheduled the interview; receives the "results ready" notification
    pub owner_id: Option<String>,

    pub template_id: String,

    /// Number of template questions, fixed when the session is scheduled
    pub template_question_count: usize,

    pub current_question_index: usize,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,

    /// End time as reported by the voice platform
    pub ended_at: Option<DateTime<Utc>>,

    /// Call cost as reported by the voice platform
    pub cost: Option<f64>,

    /// Set once closing remarks have been delivered
    pub concluded: bool,

    /// Generated follow-up questions, in the order they were asked
    pub dynamic_questions: Vec<String>,

    pub messages: Vec<TranscriptMessage>,
    pub analysis: Option<AnalysisArtifact>,
}

/// A single atomic mutation of a session
#[derive(Debug, Clone)]
pub enum SessionUpdate {
    /// Call started on the voice platform
    Start { started_at: DateTime<Utc> },

    /// Inbound transcript message
    AppendMessage { message: TranscriptMessage },

    /// A generated question was handed to the interviewer
    RecordDynamicQuestion { question: String },

    /// Closing remarks were delivered
    Conclude,

    /// Call terminated
    End {
        ended_at: Option<DateTime<Utc>>,
        cost: Option<f64>,
        now: DateTime<Utc>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    Applied,
    /// Message appended and the question index moved to `index`
    Advanced { index: usize },
    Ignored(IgnoreReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    SessionCompleted,
    AlreadyStarted,
    DuplicateMessage,
    AlreadyConcluded,
}

/// Result of writing an analysis artifact into a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisWrite {
    /// First artifact for this session
    Stored { was_completed: bool },
    /// An artifact was already stored; nothing changed
    AlreadyStored,
}

impl InterviewSession {
    pub fn new(
        call_id: impl Into<String>,
        candidate_name: impl Into<String>,
        position: impl Into<String>,
        template_id: impl Into<String>,
        template_question_count: usize,
    ) -> Self {
        Self {
            session_id: uuid::Uuid::new_v4().to_string(),
            call_id: call_id.into(),
            status: SessionStatus::Scheduled,
            candidate_name: candidate_name.into(),
            position: position.into(),
            owner_id: None,
            template_id: template_id.into(),
            template_question_count,
            current_question_index: 0,
            started_at: None,
            completed_at: None,
            ended_at: None,
            cost: None,
            concluded: false,
            dynamic_questions: Vec::new(),
            messages: Vec::new(),
            analysis: None,
        }
    }

    /// Upper bound for `current_question_index`
    pub fn question_cap(&self) -> usize {
        self.template_question_count + self.dynamic_questions.len()
    }

    /// Candidate messages in arrival order
    pub fn candidate_utterances(&self) -> impl Iterator<Item = &str> {
        self.messages
            .iter()
            .filter(|m| m.role == Role::Candidate)
            .map(|m| m.content.as_str())
    }

    /// Apply one mutation. Terminal sessions ignore everything.
    pub fn apply(&mut self, update: SessionUpdate) -> UpdateOutcome {
        if self.status.is_terminal() {
            return UpdateOutcome::Ignored(IgnoreReason::SessionCompleted);
        }

        match update {
            SessionUpdate::Start { started_at } => {
                if self.status == SessionStatus::InProgress {
                    return UpdateOutcome::Ignored(IgnoreReason::AlreadyStarted);
                }
                self.status = SessionStatus::InProgress;
                self.started_at.get_or_insert(started_at);
                self.concluded = false;
                UpdateOutcome::Applied
            }

            SessionUpdate::AppendMessage { message } => {
                if self.messages.iter().any(|m| m.same_delivery(&message)) {
                    return UpdateOutcome::Ignored(IgnoreReason::DuplicateMessage);
                }
                let advances = message.is_candidate_answer()
                    && self.current_question_index < self.question_cap();
                self.messages.push(message);
                if advances {
                    self.current_question_index += 1;
                    UpdateOutcome::Advanced {
                        index: self.current_question_index,
                    }
                } else {
                    UpdateOutcome::Applied
                }
            }

            SessionUpdate::RecordDynamicQuestion { question } => {
                if self.concluded {
                    return UpdateOutcome::Ignored(IgnoreReason::AlreadyConcluded);
                }
                self.dynamic_questions.push(question);
                UpdateOutcome::Applied
            }

            SessionUpdate::Conclude => {
                if self.concluded {
                    return UpdateOutcome::Ignored(IgnoreReason::AlreadyConcluded);
                }
                self.concluded = true;
                UpdateOutcome::Applied
            }

            SessionUpdate::End { ended_at, cost, now } => {
                self.seal(now);
                if self.ended_at.is_none() {
                    self.ended_at = ended_at;
                }
                if self.cost.is_none() {
                    self.cost = cost;
                }
                UpdateOutcome::Applied
            }
        }
    }

    /// Store the analysis artifact at most once, sealing the session in the same write
    pub fn record_analysis(
        &mut self,
        artifact: AnalysisArtifact,
        now: DateTime<Utc>,
    ) -> AnalysisWrite {
        if self.analysis.is_some() {
            return AnalysisWrite::AlreadyStored;
        }
        let was_completed = self.status.is_terminal();
        self.analysis = Some(artifact);
        self.seal(now);
        AnalysisWrite::Stored { was_completed }
    }

    fn seal(&mut self, now: DateTime<Utc>) {
        self.status = SessionStatus::Completed;
        self.completed_at.get_or_insert(now);
    }
}
