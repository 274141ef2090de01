//! Fetch, print and clean up pending order documents.
//!
//! One cycle lists the remote directory, then handles each matching document
//! strictly in order: download it to the staging directory, print it on every
//! configured target, delete it from the source. Step failures are recorded in
//! the [`CycleReport`] and never stop later steps, items or cycles.

mod config;
mod latch;
mod runner;
mod types;

pub use config::PipelineConfig;
pub use latch::NoticeLatch;
pub use runner::PrintPipeline;
pub use types::{CycleReport, ItemReport, StepOutcome};
