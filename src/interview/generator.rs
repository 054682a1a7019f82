use crate::completion::CompletionClient;
use crate::session::{InterviewSession, Template};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Conversation context for one follow-up question
#[derive(Debug, Clone, Default)]
pub struct GenerationContext {
    pub role: String,
    pub category: Option<String>,
    pub difficulty: Option<String>,
    pub instructions: String,

    /// Every question asked so far, in order
    pub asked_questions: Vec<String>,

    /// Trailing candidate utterances, oldest first
    pub recent_answers: Vec<String>,
}

impl GenerationContext {
    pub fn from_session(session: &InterviewSession, template: &Template, window: usize) -> Self {
        let asked_questions = template
            .questions
            .iter()
            .map(|q| q.text.clone())
            .chain(session.dynamic_questions.iter().cloned())
            .collect();

        let answers: Vec<&str> = session.candidate_utterances().collect();
        let recent_answers = answers[answers.len().saturating_sub(window)..]
            .iter()
            .map(|s| s.to_string())
            .collect();

        Self {
            role: session.position.clone(),
            category: template.category.clone(),
            difficulty: template.difficulty.clone(),
            instructions: template.instructions.clone(),
            asked_questions,
            recent_answers,
        }
    }

    pub fn to_prompt(&self) -> String {
        let mut prompt = format!(
            "You are interviewing a candidate for the role of {}.\n",
            self.role
        );

        if let Some(category) = &self.category {
            prompt.push_str(&format!("Interview category: {}\n", category));
        }
        if let Some(difficulty) = &self.difficulty {
            prompt.push_str(&format!("Difficulty: {}\n", difficulty));
        }
        if !self.instructions.trim().is_empty() {
            prompt.push_str(&format!("Interviewer instructions: {}\n", self.instructions.trim()));
        }

        prompt.push_str("\nQuestions already asked:\n");
        for question in &self.asked_questions {
            prompt.push_str(&format!("- {}\n", question));
        }

        if !self.recent_answers.is_empty() {
            prompt.push_str("\nThe candidate's most recent answers:\n");
            for answer in &self.recent_answers {
                prompt.push_str(&format!("- {}\n", answer));
            }
        }

        prompt.push_str(
            "\nWrite ONE natural follow-up question that builds on the answers and does not \
             repeat an earlier question. Reply with the question only.",
        );
        prompt
    }
}

/// Synthesizes follow-up questions once the template is exhausted.
///
/// Never fails: errors, timeouts and unusable output all come back as `None`.
pub struct DynamicQuestionGenerator {
    client: Arc<dyn CompletionClient>,
    timeout: Duration,
    min_chars: usize,
}

impl DynamicQuestionGenerator {
    pub fn new(client: Arc<dyn CompletionClient>, timeout: Duration, min_chars: usize) -> Self {
        Self {
            client,
            timeout,
            min_chars,
        }
    }

    pub async fn generate(&self, context: &GenerationContext) -> Option<String> {
        let prompt = context.to_prompt();
        debug!(
            "Requesting follow-up question from {} ({} prompt chars)",
            self.client.name(),
            prompt.len()
        );

        let raw = match tokio::time::timeout(self.timeout, self.client.complete(&prompt)).await {
            Ok(Ok(text)) => text,
            Ok(Err(e)) => {
                warn!("Question generation failed: {}", e);
                return None;
            }
            Err(_) => {
                warn!("Question generation timed out after {:?}", self.timeout);
                return None;
            }
        };

        match clean_question(&raw) {
            Some(question) if question.chars().count() > self.min_chars => {
                info!("Generated follow-up question: {}", question);
                Some(question)
            }
            _ => {
                warn!("Discarding degenerate generated question: {:?}", raw);
                None
            }
        }
    }
}

/// First non-empty line, without list markers, labels or wrapping quotes
fn clean_question(raw: &str) -> Option<String> {
    let line = raw.lines().map(str::trim).find(|l| !l.is_empty())?;

    let line = line
        .trim_start_matches(|c: char| c.is_ascii_digit())
        .trim_start_matches(['.', ')', '-', '*'])
        .trim();
    let line = line
        .strip_prefix("Question:")
        .or_else(|| line.strip_prefix("question:"))
        .unwrap_or(line)
        .trim();
    let line = line.trim_matches(['"', '\'', '“', '”']).trim();

    if line.is_empty() {
        None
    } else {
        Some(line.to_string())
    }
}
