use serde::{Deserialize, Serialize};

/// A single predefined interview question
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionSpec {
    /// Question text as spoken by the interviewer
    pub text: String,

    /// Category label (e.g. "technical", "behavioral")
    #[serde(default)]
    pub category: String,

    /// Relative weight used when scoring answers
    #[serde(default = "default_weight")]
    pub weight: f32,
}

fn default_weight() -> f32 {
    1.0
}

/// Interview template: ordered questions plus time and tone metadata.
///
/// Read-only to the orchestrator for the whole lifetime of a session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    pub id: String,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub questions: Vec<QuestionSpec>,

    /// Target interview length in minutes
    pub duration_minutes: f64,

    /// Free-text guidance for the interviewer persona
    #[serde(default)]
    pub instructions: String,

    /// Overall interview category (e.g. "engineering")
    #[serde(default)]
    pub category: Option<String>,

    /// Target difficulty (e.g. "senior")
    #[serde(default)]
    pub difficulty: Option<String>,
}

impl Template {
    pub fn question_count(&self) -> usize {
        self.questions.len()
    }

    pub fn question_at(&self, index: usize) -> Option<&QuestionSpec> {
        self.questions.get(index)
    }
}
