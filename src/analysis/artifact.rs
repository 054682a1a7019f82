use serde::{Deserialize, Serialize};

/// Hiring recommendation produced by the post-call analysis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HiringRecommendation {
    StrongYes,
    Yes,
    Maybe,
    No,
}

impl HiringRecommendation {
    /// Lenient parse of the labels analysis prompts tend to produce
    pub fn parse(raw: &str) -> Option<Self> {
        let key: String = raw
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();

        match key.as_str() {
            "strongyes" | "stronghire" | "stronglyrecommend" | "definitelyhire" => {
                Some(HiringRecommendation::StrongYes)
            }
            "yes" | "hire" | "recommend" | "recommended" | "leanhire" => {
                Some(HiringRecommendation::Yes)
            }
            "maybe" | "neutral" | "unsure" | "undecided" | "borderline" => {
                Some(HiringRecommendation::Maybe)
            }
            "no" | "nohire" | "strongno" | "reject" | "notrecommended" | "donothire" => {
                Some(HiringRecommendation::No)
            }
            _ => None,
        }
    }
}

/// Per-category scores, each 0–100
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryScores {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub communication: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub technical: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub experience: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cultural_fit: Option<f64>,
}

impl CategoryScores {
    pub fn is_empty(&self) -> bool {
        self.communication.is_none()
            && self.technical.is_none()
            && self.experience.is_none()
            && self.cultural_fit.is_none()
    }
}

/// Assessment of the answer to one question
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionAnalysis {
    pub question: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feedback: Option<String>,
}

/// Conversation-level flow metrics, each 0–100
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterviewFlow {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub engagement: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clarity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completeness: Option<f64>,
}

impl InterviewFlow {
    pub fn is_empty(&self) -> bool {
        self.engagement.is_none() && self.clarity.is_none() && self.completeness.is_none()
    }
}

/// Normalized post-call analysis.
///
/// Every field may be absent; absent values are omitted, never defaulted to zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisArtifact {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overall_score: Option<f64>,

    #[serde(default, skip_serializing_if = "CategoryScores::is_empty")]
    pub category_scores: CategoryScores,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub strengths: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub areas_for_improvement: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub key_insights: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommendation: Option<HiringRecommendation>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub question_analysis: Vec<QuestionAnalysis>,

    #[serde(default, skip_serializing_if = "InterviewFlow::is_empty")]
    pub interview_flow: InterviewFlow,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,

    /// Raw success-evaluation text as reported by the platform
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success_evaluation: Option<String>,
}

impl AnalysisArtifact {
    pub fn is_empty(&self) -> bool {
        self.overall_score.is_none()
            && self.category_scores.is_empty()
            && self.strengths.is_empty()
            && self.areas_for_improvement.is_empty()
            && self.key_insights.is_empty()
            && self.recommendation.is_none()
            && self.question_analysis.is_empty()
            && self.interview_flow.is_empty()
            && self.summary.is_none()
            && self.success_evaluation.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recommendation_labels() {
        let strong = Some(HiringRecommendation::StrongYes);
        assert_eq!(HiringRecommendation::parse("Strong Yes"), strong);
        assert_eq!(HiringRecommendation::parse("strong_yes"), strong);
        assert_eq!(HiringRecommendation::parse("HIRE"), Some(HiringRecommendation::Yes));
        assert_eq!(HiringRecommendation::parse("maybe"), Some(HiringRecommendation::Maybe));
        assert_eq!(HiringRecommendation::parse("No Hire"), Some(HiringRecommendation::No));
        assert_eq!(HiringRecommendation::parse("perhaps later"), None);
    }

    #[test]
    fn absent_fields_are_omitted() {
        let artifact = AnalysisArtifact {
            overall_score: Some(72.0),
            ..Default::default()
        };
        let json = serde_json::to_value(&artifact).unwrap();
        assert_eq!(json, serde_json::json!({ "overallScore": 72.0 }));
    }
}
