//! Post-call analysis ingestion
//!
//! End-of-call reports carry their analysis in one of several places with
//! inconsistent field names. Extraction tries an ordered list of locations, mapping
//! normalizes the first hit into `AnalysisArtifact`, and the pipeline stores it once
//! and announces it once.

pub mod artifact;
pub mod extract;
pub mod mapping;
pub mod pipeline;

pub use artifact::{
    AnalysisArtifact, CategoryScores, HiringRecommendation, InterviewFlow, QuestionAnalysis,
};
pub use extract::{
    default_extractors, extract_artifact, AnalysisExtractor, AnalysisFieldExtractor,
    ArtifactFieldExtractor,
};
pub use mapping::map_analysis;
pub use pipeline::{AnalysisPipeline, IngestOutcome};
