//! Normalization of loosely-structured analysis objects
//!
//! Analysis prompts on the voice platform are authored by hand, so the same concept
//! shows up under camelCase, snake_case and synonym keys, and scores arrive as numbers,
//! numeric strings, percentages or "x/10" ratios. Everything here is lenient: a field
//! that cannot be understood is left out rather than guessed.

use super::artifact::{
    AnalysisArtifact, CategoryScores, HiringRecommendation, InterviewFlow, QuestionAnalysis,
};
use serde_json::{Map, Value};

const STRUCTURED_KEYS: &[&str] = &["structuredData", "structured_data", "data"];
const SUCCESS_KEYS: &[&str] = &["successEvaluation", "success_evaluation", "evaluation"];
const OVERALL_KEYS: &[&str] = &["overallScore", "overall_score", "overall", "totalScore", "score"];
const CATEGORY_KEYS: &[&str] = &["categoryScores", "category_scores", "scores", "skillScores"];
const COMMUNICATION_KEYS: &[&str] = &["communication", "communicationScore", "communication_score"];
const TECHNICAL_KEYS: &[&str] = &[
    "technical",
    "technicalSkills",
    "technical_skills",
    "technicalScore",
    "technical_score",
];
const EXPERIENCE_KEYS: &[&str] = &[
    "experience",
    "experienceScore",
    "experience_score",
    "relevantExperience",
];
const CULTURAL_FIT_KEYS: &[&str] = &[
    "culturalFit",
    "cultural_fit",
    "cultureFit",
    "culture_fit",
    "culturalFitScore",
];
const STRENGTH_KEYS: &[&str] = &["strengths", "keyStrengths", "key_strengths"];
const IMPROVEMENT_KEYS: &[&str] = &[
    "areasForImprovement",
    "areas_for_improvement",
    "improvementAreas",
    "improvements",
    "weaknesses",
];
const INSIGHT_KEYS: &[&str] = &["keyInsights", "key_insights", "insights"];
const RECOMMENDATION_KEYS: &[&str] = &[
    "recommendation",
    "hiringRecommendation",
    "hiring_recommendation",
    "decision",
];
const QUESTION_KEYS: &[&str] = &[
    "questionAnalysis",
    "question_analysis",
    "responseAnalysis",
    "response_analysis",
    "questions",
];
const FLOW_KEYS: &[&str] = &["interviewFlow", "interview_flow", "flowMetrics", "flow"];

/// Map an analysis object (`{summary, structuredData, successEvaluation}` or a
/// variant of it) to the canonical artifact.
///
/// Canonical keys are read from the structured data first and then from the
/// analysis object itself, so flat analysis objects map too.
///
/// Returns `None` when the value is not an object or nothing recognizable is inside.
pub fn map_analysis(analysis: &Value) -> Option<AnalysisArtifact> {
    let analysis = analysis.as_object()?;

    let structured = field(analysis, STRUCTURED_KEYS).and_then(as_object_lenient);
    let sources = Sources {
        structured: structured.as_ref(),
        analysis,
    };

    let success_raw = field(analysis, SUCCESS_KEYS);

    // Any explicit overall score wins over the success evaluation
    let overall_score = sources
        .get(OVERALL_KEYS)
        .and_then(score)
        .or_else(|| success_raw.and_then(score));

    let categories = sources.get(CATEGORY_KEYS).and_then(Value::as_object);
    let category = |keys: &[&str]| {
        categories
            .and_then(|c| field(c, keys))
            .or_else(|| sources.get(keys))
            .and_then(score)
    };

    let artifact = AnalysisArtifact {
        overall_score,
        category_scores: CategoryScores {
            communication: category(COMMUNICATION_KEYS),
            technical: category(TECHNICAL_KEYS),
            experience: category(EXPERIENCE_KEYS),
            cultural_fit: category(CULTURAL_FIT_KEYS),
        },
        strengths: sources.list(STRENGTH_KEYS),
        areas_for_improvement: sources.list(IMPROVEMENT_KEYS),
        key_insights: sources.list(INSIGHT_KEYS),
        recommendation: sources
            .get(RECOMMENDATION_KEYS)
            .and_then(Value::as_str)
            .and_then(HiringRecommendation::parse),
        question_analysis: sources
            .get(QUESTION_KEYS)
            .and_then(Value::as_array)
            .map(|items| items.iter().filter_map(question_analysis).collect())
            .unwrap_or_default(),
        interview_flow: sources
            .get(FLOW_KEYS)
            .and_then(Value::as_object)
            .map(interview_flow)
            .unwrap_or_default(),
        summary: field(analysis, &["summary"]).and_then(text),
        success_evaluation: success_raw.and_then(text),
    };

    if artifact.is_empty() {
        None
    } else {
        Some(artifact)
    }
}

/// Where canonical keys are looked up, in precedence order
struct Sources<'a> {
    structured: Option<&'a Map<String, Value>>,
    analysis: &'a Map<String, Value>,
}

impl<'a> Sources<'a> {
    fn get(&self, keys: &[&str]) -> Option<&'a Value> {
        self.structured
            .and_then(|data| field(data, keys))
            .or_else(|| field(self.analysis, keys))
    }

    fn list(&self, keys: &[&str]) -> Vec<String> {
        self.get(keys).map(string_list).unwrap_or_default()
    }
}

fn interview_flow(flow: &Map<String, Value>) -> InterviewFlow {
    InterviewFlow {
        engagement: field(flow, &["engagement", "engagementScore"]).and_then(score),
        clarity: field(flow, &["clarity", "clarityScore"]).and_then(score),
        completeness: field(flow, &["completeness", "completenessScore"]).and_then(score),
    }
}

/// First non-null value under any of `keys`
fn field<'a>(object: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|key| object.get(*key))
        .find(|value| !value.is_null())
}

/// Objects, or strings that contain a JSON object
fn as_object_lenient(value: &Value) -> Option<Map<String, Value>> {
    match value {
        Value::Object(map) => Some(map.clone()),
        Value::String(s) => match serde_json::from_str::<Value>(s) {
            Ok(Value::Object(map)) => Some(map),
            _ => None,
        },
        _ => None,
    }
}

fn text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Parse a 0–100 score from a number, "85", "85%", "8.5/10" or {"score": ..}
pub(crate) fn score(value: &Value) -> Option<f64> {
    let raw = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => parse_score_text(s)?,
        Value::Object(map) => return field(map, &["score", "value"]).and_then(score),
        _ => return None,
    };

    if raw.is_finite() {
        Some(raw.clamp(0.0, 100.0))
    } else {
        None
    }
}

fn parse_score_text(s: &str) -> Option<f64> {
    let s = s.trim().trim_end_matches('%').trim();

    if let Some((numerator, denominator)) = s.split_once('/') {
        let numerator: f64 = numerator.trim().parse().ok()?;
        let denominator: f64 = denominator.trim().parse().ok()?;
        if denominator <= 0.0 {
            return None;
        }
        return Some(numerator / denominator * 100.0);
    }

    s.parse().ok()
}

fn string_list(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items
            .iter()
            .filter_map(|item| match item {
                Value::Object(map) => field(map, &["text", "description", "point"]).and_then(text),
                other => text(other),
            })
            .collect(),
        Value::String(s) => s
            .lines()
            .map(|line| line.trim().trim_start_matches(['-', '*', '•']).trim())
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    }
}

fn question_analysis(item: &Value) -> Option<QuestionAnalysis> {
    let item = item.as_object()?;
    let question = field(item, &["question", "questionText", "question_text"]).and_then(text)?;

    Some(QuestionAnalysis {
        question,
        response: field(item, &["response", "answer", "candidateResponse", "candidate_response"])
            .and_then(text),
        score: field(item, &["score", "rating"]).and_then(score),
        feedback: field(item, &["feedback", "analysis", "notes", "assessment"]).and_then(text),
    })
}
