use crate::error::PipelineError;
use ndarray::{Array2, ArrayView1, Axis};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Ordered, unique gene identifiers shared by every sample in a dataset,
/// with a reverse map from identifier to row position. Built once at load
/// time and immutable afterwards.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct GeneIndex {
    ids: Vec<String>,
    positions: HashMap<String, usize>,
}

impl GeneIndex {
    /// Build an index from ordered gene identifiers. Duplicates are rejected
    /// rather than silently renamed.
    pub fn new(ids: Vec<String>) -> Result<GeneIndex, PipelineError> {
        let mut positions = HashMap::with_capacity(ids.len());
        for (row, id) in ids.iter().enumerate() {
            if positions.insert(id.clone(), row).is_some() {
                return Err(PipelineError::DuplicateGeneId { id: id.clone() });
            }
        }
        Ok(GeneIndex { ids, positions })
    }

    /// Number of genes in the index.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// True if the index holds no genes.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Row position of a gene identifier, or None if absent.
    pub fn position(&self, id: &str) -> Option<usize> {
        self.positions.get(id).copied()
    }

    /// Gene identifiers in row order.
    pub fn ids(&self) -> &[String] {
        &self.ids
    }
}

impl TryFrom<Vec<String>> for GeneIndex {
    type Error = PipelineError;

    fn try_from(ids: Vec<String>) -> Result<GeneIndex, PipelineError> {
        GeneIndex::new(ids)
    }
}

impl From<GeneIndex> for Vec<String> {
    fn from(index: GeneIndex) -> Vec<String> {
        index.ids
    }
}

impl PartialEq for GeneIndex {
    fn eq(&self, other: &GeneIndex) -> bool {
        self.ids == other.ids
    }
}

impl Eq for GeneIndex {}

/// Per-sample attributes derived from the encoded sample name.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SampleInfo {
    /// Raw sample name as it appears in the table header.
    pub name: String,
    /// Timepoint field extracted from the name.
    pub timepoint: String,
    /// Concatenation of the two designated label fields.
    pub label: String,
}

/// Dense gene × sample count table with its gene index and ordered sample
/// names attached.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CountMatrix {
    /// Shared gene index; rows of `counts` follow its order.
    pub genes: GeneIndex,
    /// Sample names in column order. Unique by construction.
    pub sample_names: Vec<String>,
    /// Raw counts, rows = genes, columns = samples.
    pub counts: Array2<u32>,
}

impl CountMatrix {
    /// Assemble a count matrix, checking that the matrix shape agrees with
    /// the identifier vectors and that sample names are unique.
    pub fn new(
        genes: GeneIndex,
        sample_names: Vec<String>,
        counts: Array2<u32>,
    ) -> Result<CountMatrix, PipelineError> {
        if counts.nrows() != genes.len() {
            return Err(PipelineError::DimensionMismatch {
                expected: genes.len(),
                actual: counts.nrows(),
            });
        }
        if counts.ncols() != sample_names.len() {
            return Err(PipelineError::DimensionMismatch {
                expected: sample_names.len(),
                actual: counts.ncols(),
            });
        }
        let mut seen = HashMap::with_capacity(sample_names.len());
        for (col, name) in sample_names.iter().enumerate() {
            if seen.insert(name.as_str(), col).is_some() {
                return Err(PipelineError::DuplicateSampleName { name: name.clone() });
            }
        }
        Ok(CountMatrix {
            genes,
            sample_names,
            counts,
        })
    }

    /// Number of genes (rows).
    pub fn n_genes(&self) -> usize {
        self.counts.nrows()
    }

    /// Number of samples (columns).
    pub fn n_samples(&self) -> usize {
        self.counts.ncols()
    }

    /// Count vector of the sample in column `col`.
    pub fn sample_counts(&self, col: usize) -> ArrayView1<'_, u32> {
        self.counts.column(col)
    }
}

/// A count matrix with one parsed metadata record per sample, in matching
/// column order. The unit handed to the downstream analysis toolkit.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AnnotatedDataset {
    /// The underlying count table.
    pub matrix: CountMatrix,
    /// One record per column of `matrix`.
    pub samples: Vec<SampleInfo>,
}

impl AnnotatedDataset {
    /// Attach metadata to a count matrix. The metadata sequence must be in
    /// column order and of matching length.
    pub fn new(matrix: CountMatrix, samples: Vec<SampleInfo>) -> Result<AnnotatedDataset, PipelineError> {
        if samples.len() != matrix.n_samples() {
            return Err(PipelineError::DimensionMismatch {
                expected: matrix.n_samples(),
                actual: samples.len(),
            });
        }
        Ok(AnnotatedDataset { matrix, samples })
    }

    /// Number of samples.
    pub fn n_samples(&self) -> usize {
        self.matrix.n_samples()
    }

    /// New dataset holding only the samples at `keep` (column indices), in
    /// the given order. The receiver is left untouched.
    pub fn select_samples(&self, keep: &[usize]) -> AnnotatedDataset {
        let counts = self.matrix.counts.select(Axis(1), keep);
        let sample_names = keep.iter().map(|&c| self.matrix.sample_names[c].clone()).collect();
        let samples = keep.iter().map(|&c| self.samples[c].clone()).collect();
        AnnotatedDataset {
            matrix: CountMatrix {
                genes: self.matrix.genes.clone(),
                sample_names,
                counts,
            },
            samples,
        }
    }
}

/// Per-sample quality thresholds. These are dataset-specific tuning values
/// and are always caller-supplied, never baked-in constants.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QcThresholds {
    /// A sample must detect strictly more than this many genes.
    pub min_features: usize,
    /// A sample's total count must strictly exceed this value.
    pub min_counts: u64,
}

/// Observable outcome of a QC filter pass, assertable by callers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct QcReport {
    /// Samples surviving the filter.
    pub retained: usize,
    /// Samples removed by the filter.
    pub discarded: usize,
}

#[cfg(test)]
mod test {
    use super::*;
    use ndarray::array;

    fn tiny_matrix() -> CountMatrix {
        let genes = GeneIndex::new(vec!["g1".to_string(), "g2".to_string()]).unwrap();
        let counts = array![[1u32, 0], [2, 3]];
        CountMatrix::new(genes, vec!["s1".to_string(), "s2".to_string()], counts).unwrap()
    }

    #[test]
    fn test_gene_index_rejects_duplicates() {
        let err = GeneIndex::new(vec!["g1".to_string(), "g1".to_string()]).unwrap_err();
        assert_eq!(
            err,
            PipelineError::DuplicateGeneId {
                id: "g1".to_string()
            }
        );
    }

    #[test]
    fn test_gene_index_positions() {
        let index = GeneIndex::new(vec!["g1".to_string(), "g2".to_string(), "g3".to_string()]).unwrap();
        assert_eq!(index.len(), 3);
        assert_eq!(index.position("g2"), Some(1));
        assert_eq!(index.position("g9"), None);
    }

    #[test]
    fn test_count_matrix_shape_checks() {
        let genes = GeneIndex::new(vec!["g1".to_string(), "g2".to_string()]).unwrap();
        let counts = array![[1u32, 0], [2, 3]];
        let err = CountMatrix::new(genes.clone(), vec!["s1".to_string()], counts.clone()).unwrap_err();
        assert_eq!(err, PipelineError::DimensionMismatch { expected: 1, actual: 2 });

        let err = CountMatrix::new(
            genes,
            vec!["s1".to_string(), "s1".to_string()],
            counts,
        )
        .unwrap_err();
        assert_eq!(
            err,
            PipelineError::DuplicateSampleName {
                name: "s1".to_string()
            }
        );
    }

    #[test]
    fn test_annotated_dataset_length_check() {
        let matrix = tiny_matrix();
        let one_record = vec![SampleInfo {
            name: "s1".to_string(),
            timepoint: "t0".to_string(),
            label: "wt".to_string(),
        }];
        let err = AnnotatedDataset::new(matrix, one_record).unwrap_err();
        assert_eq!(err, PipelineError::DimensionMismatch { expected: 2, actual: 1 });
    }

    #[test]
    fn test_select_samples_preserves_order() {
        let matrix = tiny_matrix();
        let samples = vec![
            SampleInfo {
                name: "s1".to_string(),
                timepoint: "t0".to_string(),
                label: "a".to_string(),
            },
            SampleInfo {
                name: "s2".to_string(),
                timepoint: "t1".to_string(),
                label: "b".to_string(),
            },
        ];
        let dataset = AnnotatedDataset::new(matrix, samples).unwrap();

        let subset = dataset.select_samples(&[1]);
        assert_eq!(subset.n_samples(), 1);
        assert_eq!(subset.matrix.sample_names, vec!["s2".to_string()]);
        assert_eq!(subset.samples[0].timepoint, "t1");
        assert_eq!(subset.matrix.counts, array![[0u32], [3]]);
        // the source dataset is untouched
        assert_eq!(dataset.n_samples(), 2);
    }

    #[test]
    fn test_gene_index_serde_revalidates() {
        let index = GeneIndex::new(vec!["g1".to_string(), "g2".to_string()]).unwrap();
        let json = serde_json::to_string(&index).unwrap();
        assert_eq!(json, r#"["g1","g2"]"#);
        let back: GeneIndex = serde_json::from_str(&json).unwrap();
        assert_eq!(back.position("g2"), Some(1));

        let dup: Result<GeneIndex, _> = serde_json::from_str(r#"["g1","g1"]"#);
        assert!(dup.is_err());
    }
}
