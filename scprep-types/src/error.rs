use std::fmt::Display;
use std::path::PathBuf;

/// Errors raised while building or exporting a dataset. Every variant is
/// fatal to the pipeline run; the variants carry enough context (offending
/// name, expected vs actual dimensions, path) to diagnose the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineError {
    /// A sample name did not split into the number of fields the schema declares.
    MalformedSampleName {
        /// The offending sample name, verbatim.
        name: String,
        /// Field count declared by the schema.
        expected: usize,
        /// Field count the name actually split into.
        actual: usize,
    },
    /// Matrix and metadata shapes disagree.
    DimensionMismatch {
        /// Dimension required by the receiving structure.
        expected: usize,
        /// Dimension actually supplied.
        actual: usize,
    },
    /// The output destination could not be written.
    WriteError {
        /// Destination path.
        path: PathBuf,
        /// Underlying I/O failure, rendered.
        reason: String,
    },
    /// A gene identifier appears more than once in the input table.
    DuplicateGeneId {
        /// The repeated identifier.
        id: String,
    },
    /// A sample name appears more than once in the input table header.
    DuplicateSampleName {
        /// The repeated name.
        name: String,
    },
    /// A name schema references fields outside its declared field count.
    InvalidSchema {
        /// What is wrong with the schema.
        reason: String,
    },
    /// The input table is not a well-formed numeric matrix.
    MalformedTable {
        /// 1-based line number within the table.
        line: usize,
        /// What went wrong on that line.
        reason: String,
    },
}

impl Display for PipelineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PipelineError::MalformedSampleName {
                name,
                expected,
                actual,
            } => write!(
                f,
                "malformed sample name {name:?}: expected {expected} fields, found {actual}"
            ),
            PipelineError::DimensionMismatch { expected, actual } => {
                write!(f, "dimension mismatch: expected {expected}, found {actual}")
            }
            PipelineError::WriteError { path, reason } => {
                write!(f, "cannot write {}: {reason}", path.display())
            }
            PipelineError::DuplicateGeneId { id } => write!(f, "duplicate gene identifier {id:?}"),
            PipelineError::DuplicateSampleName { name } => write!(f, "duplicate sample name {name:?}"),
            PipelineError::InvalidSchema { reason } => write!(f, "invalid name schema: {reason}"),
            PipelineError::MalformedTable { line, reason } => {
                write!(f, "malformed table at line {line}: {reason}")
            }
        }
    }
}

impl std::error::Error for PipelineError {}

impl PipelineError {
    /// Wrap an I/O failure on `path` as a `WriteError`.
    pub fn write_error(path: impl Into<PathBuf>, reason: impl Display) -> PipelineError {
        PipelineError::WriteError {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}
