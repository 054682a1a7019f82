//! Turn-by-turn interview decisions
//!
//! - `time_budget`: pure conclusion check over start time, now and duration
//! - `generator`: follow-up question synthesis via a completion collaborator
//! - `sequencer`: template question, generated question, or closing remarks
//! - `transcript`: message log aggregation and index advancement

pub mod generator;
pub mod sequencer;
pub mod time_budget;
pub mod transcript;

pub use generator::{DynamicQuestionGenerator, GenerationContext};
pub use sequencer::{NextTurn, QuestionSequencer, SequencerPhase};
pub use time_budget::TimeBudget;
