use crate::metadata::{parse_sample_names, NameSchema};
use scprep_types::{AnnotatedDataset, CountMatrix, PipelineError, SampleInfo};

/// Join a count matrix with an already-parsed metadata sequence. The
/// metadata must be in column order; mismatched lengths fail with
/// `DimensionMismatch`.
pub fn assemble(matrix: CountMatrix, samples: Vec<SampleInfo>) -> Result<AnnotatedDataset, PipelineError> {
    AnnotatedDataset::new(matrix, samples)
}

/// Parse the matrix's own column names against `schema` and attach the
/// resulting records. This is the usual entry point: the header of the
/// count table carries the encoded names.
pub fn annotate(matrix: CountMatrix, schema: &NameSchema) -> Result<AnnotatedDataset, PipelineError> {
    let samples = parse_sample_names(schema, &matrix.sample_names)?;
    AnnotatedDataset::new(matrix, samples)
}
