//! Core data model for the scprep preprocessing pipeline: annotated count
//! matrices, per-sample metadata records, QC configuration, and the shared
//! pipeline error type.

pub mod dataset;
pub mod error;

pub use dataset::{AnnotatedDataset, CountMatrix, GeneIndex, QcReport, QcThresholds, SampleInfo};
pub use error::PipelineError;
