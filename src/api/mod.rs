//! Public entry points for embedding the pipeline.

mod pipeline;

pub use pipeline::{harden_source, HardenOptions, HardenOutcome};
