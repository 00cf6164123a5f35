//! Core ETL (Extract, Transform, Load) abstractions
//!
//! This module provides the trait definitions the staging job is built from
//! and the pipeline that runs it end to end.

mod extract;
mod load;
mod pipeline;
mod transform;

pub use extract::Extractor;
pub use load::Loader;
pub use pipeline::{StagingPipeline, StagingReport};
pub use transform::Transformer;
