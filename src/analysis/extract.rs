use super::artifact::AnalysisArtifact;
use super::mapping::map_analysis;
use serde_json::{json, Map, Value};
use tracing::debug;

/// One place a post-call report may carry its analysis
pub trait AnalysisExtractor: Send + Sync {
    /// Name for logging
    fn name(&self) -> &'static str;

    /// Locate the analysis object in `payload`, in `{summary, structuredData,
    /// successEvaluation}` shape
    fn locate(&self, payload: &Value) -> Option<Value>;
}

/// `payload.analysis`, or `payload.message.analysis` for wrapped reports
pub struct AnalysisFieldExtractor;

impl AnalysisExtractor for AnalysisFieldExtractor {
    fn name(&self) -> &'static str {
        "analysis"
    }

    fn locate(&self, payload: &Value) -> Option<Value> {
        [
            payload.get("analysis"),
            payload.get("message").and_then(|m| m.get("analysis")),
        ]
        .into_iter()
        .flatten()
        .find(|v| v.is_object())
        .cloned()
    }
}

/// `payload.artifact` with `summary` / `evaluation` / `data` sub-fields
pub struct ArtifactFieldExtractor;

impl AnalysisExtractor for ArtifactFieldExtractor {
    fn name(&self) -> &'static str {
        "artifact"
    }

    fn locate(&self, payload: &Value) -> Option<Value> {
        let artifact = payload.get("artifact")?.as_object()?;

        let summary = non_null(artifact, "summary");
        let evaluation = non_null(artifact, "evaluation");
        let data = non_null(artifact, "data");

        if summary.is_none() && evaluation.is_none() && data.is_none() {
            return None;
        }

        Some(json!({
            "summary": summary,
            "successEvaluation": evaluation,
            "structuredData": data,
        }))
    }
}

fn non_null(object: &Map<String, Value>, key: &str) -> Option<Value> {
    object.get(key).filter(|v| !v.is_null()).cloned()
}

/// Extractors in the order they are tried
pub fn default_extractors() -> Vec<Box<dyn AnalysisExtractor>> {
    vec![Box::new(AnalysisFieldExtractor), Box::new(ArtifactFieldExtractor)]
}

/// Try each extractor in turn; the first that yields a non-empty artifact wins
pub fn extract_artifact(
    payload: &Value,
    extractors: &[Box<dyn AnalysisExtractor>],
) -> Option<AnalysisArtifact> {
    extractors.iter().find_map(|extractor| {
        let located = extractor.locate(payload)?;
        match map_analysis(&located) {
            Some(artifact) => {
                debug!("Analysis extracted via '{}'", extractor.name());
                Some(artifact)
            }
            None => {
                debug!("'{}' location held no usable analysis", extractor.name());
                None
            }
        }
    })
}
