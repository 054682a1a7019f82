use super::model::InterviewSession;
use super::template::Template;
use serde::Deserialize;

/// Parameters for scheduling an interview call
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleRequest {
    /// External call id assigned by the voice platform
    pub call_id: String,

    pub candidate_name: String,
    pub position: String,

    #[serde(default)]
    pub owner_id: Option<String>,

    pub template: Template,
}

impl ScheduleRequest {
    /// Split into the new session and the template it runs against
    pub fn into_parts(self) -> (InterviewSession, Template) {
        let mut session = InterviewSession::new(
            self.call_id,
            self.candidate_name,
            self.position,
            self.template.id.clone(),
            self.template.question_count(),
        );
        session.owner_id = self.owner_id;
        (session, self.template)
    }
}
