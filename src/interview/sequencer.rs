use super::generator::{DynamicQuestionGenerator, GenerationContext};
use super::time_budget::TimeBudget;
use crate::session::{InterviewSession, SessionStatus, Template};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info};

/// Where a session stands in the question sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SequencerPhase {
    AwaitingStart,
    DeliveringTemplate,
    DeliveringDynamic,
    Concluding,
    Concluded,
}

/// What the interviewer says next
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NextTurn {
    TemplateQuestion { index: usize, text: String },
    DynamicQuestion { text: String },
    Closing { text: String },
}

impl NextTurn {
    pub fn content(&self) -> &str {
        match self {
            NextTurn::TemplateQuestion { text, .. }
            | NextTurn::DynamicQuestion { text }
            | NextTurn::Closing { text } => text,
        }
    }

    pub fn into_content(self) -> String {
        match self {
            NextTurn::TemplateQuestion { text, .. }
            | NextTurn::DynamicQuestion { text }
            | NextTurn::Closing { text } => text,
        }
    }

    pub fn is_closing(&self) -> bool {
        matches!(self, NextTurn::Closing { .. })
    }
}

/// Time budget for a session; a session that has not started has used no time
pub fn budget_for(
    session: &InterviewSession,
    template: &Template,
    now: DateTime<Utc>,
) -> TimeBudget {
    match session.started_at {
        Some(started_at) => TimeBudget::evaluate(started_at, now, template.duration_minutes),
        None => TimeBudget::from_elapsed(0.0, template.duration_minutes),
    }
}

pub fn phase(
    session: &InterviewSession,
    template: &Template,
    now: DateTime<Utc>,
) -> SequencerPhase {
    if session.concluded || session.status == SessionStatus::Completed {
        SequencerPhase::Concluded
    } else if session.status == SessionStatus::Scheduled {
        SequencerPhase::AwaitingStart
    } else if budget_for(session, template, now).conclusion_due() {
        SequencerPhase::Concluding
    } else if session.current_question_index < template.question_count() {
        SequencerPhase::DeliveringTemplate
    } else {
        SequencerPhase::DeliveringDynamic
    }
}

/// Decides the interviewer's next utterance
pub struct QuestionSequencer {
    generator: DynamicQuestionGenerator,
    closing_remarks: String,
    context_window: usize,
}

impl QuestionSequencer {
    pub fn new(
        generator: DynamicQuestionGenerator,
        closing_remarks: String,
        context_window: usize,
    ) -> Self {
        Self {
            generator,
            closing_remarks,
            context_window,
        }
    }

    /// Choose the next turn. Template questions always win over generated ones.
    pub async fn next_turn(
        &self,
        session: &InterviewSession,
        template: &Template,
        now: DateTime<Utc>,
    ) -> NextTurn {
        let budget = budget_for(session, template, now);
        let index = session.current_question_index;

        debug!(
            "Sequencing call {}: index={}/{} elapsed={:.2}min remaining={:.2}min",
            session.call_id,
            index,
            template.question_count(),
            budget.elapsed_minutes,
            budget.remaining_minutes
        );

        if session.concluded || session.status.is_terminal() {
            return self.closing(session);
        }

        if budget.conclusion_due() {
            info!(
                "Time budget reached for call {} ({:.0}% elapsed), concluding",
                session.call_id,
                budget.elapsed_fraction * 100.0
            );
            return self.closing(session);
        }

        if let Some(question) = template.question_at(index) {
            return NextTurn::TemplateQuestion {
                index,
                text: question.text.clone(),
            };
        }

        if budget.allows_dynamic_question() {
            let context = GenerationContext::from_session(session, template, self.context_window);
            if let Some(text) = self.generator.generate(&context).await {
                return NextTurn::DynamicQuestion { text };
            }
            info!("No follow-up question for call {}, concluding", session.call_id);
        }

        self.closing(session)
    }

    pub fn closing(&self, session: &InterviewSession) -> NextTurn {
        self.closing_for(&session.candidate_name)
    }

    /// Closing remarks for a candidate name (may be empty)
    pub fn closing_for(&self, candidate_name: &str) -> NextTurn {
        NextTurn::Closing {
            text: personalize(&self.closing_remarks, candidate_name),
        }
    }
}

fn personalize(template: &str, name: &str) -> String {
    let name = name.trim();
    if name.is_empty() {
        template.replace(", {name}", "").replace("{name}", "")
    } else {
        template.replace("{name}", name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn personalize_with_and_without_name() {
        assert_eq!(personalize("Thanks, {name}. Bye", "Ada"), "Thanks, Ada. Bye");
        assert_eq!(personalize("Thanks, {name}. Bye", "  "), "Thanks. Bye");
    }
}
