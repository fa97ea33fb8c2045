//! End-to-end card-generation runs.

pub mod runner;

pub use runner::{collect_single_words, CardsPipeline, DeckIds, PipelineError, RunSummary};
