use ndarray::ArrayView1;
use scprep_types::{AnnotatedDataset, QcReport, QcThresholds};

/// Number of genes with a nonzero count in one sample.
pub fn detected_features(counts: ArrayView1<'_, u32>) -> usize {
    counts.iter().filter(|&&c| c > 0).count()
}

/// Total count across all genes in one sample.
pub fn total_counts(counts: ArrayView1<'_, u32>) -> u64 {
    counts.iter().map(|&c| u64::from(c)).sum()
}

/// Drop samples failing the per-sample thresholds.
///
/// A sample is retained iff its detected-feature count strictly exceeds
/// `min_features` AND its total count strictly exceeds `min_counts`. The
/// result is a new dataset with the survivors in their original relative
/// order; the input is left untouched. An empty result is a legitimate
/// outcome, not an error, and the pass is idempotent for fixed thresholds.
pub fn filter_samples(
    dataset: &AnnotatedDataset,
    thresholds: QcThresholds,
) -> (AnnotatedDataset, QcReport) {
    let keep: Vec<usize> = (0..dataset.n_samples())
        .filter(|&col| {
            let counts = dataset.matrix.sample_counts(col);
            detected_features(counts) > thresholds.min_features
                && total_counts(counts) > thresholds.min_counts
        })
        .collect();

    let report = QcReport {
        retained: keep.len(),
        discarded: dataset.n_samples() - keep.len(),
    };
    (dataset.select_samples(&keep), report)
}

#[cfg(test)]
mod test_qc {
    use super::*;
    use ndarray::Array2;
    use scprep_types::{CountMatrix, GeneIndex, SampleInfo};

    /// Dataset whose columns have the requested (detected features, total
    /// count) profiles: each sample spreads `features` nonzero entries whose
    /// values sum to `total`.
    fn dataset_with_profiles(profiles: &[(usize, u64)]) -> AnnotatedDataset {
        let n_genes = profiles.iter().map(|&(f, _)| f).max().unwrap_or(0).max(1);
        let mut counts = Array2::<u32>::zeros((n_genes, profiles.len()));
        for (col, &(features, total)) in profiles.iter().enumerate() {
            let base = (total / features as u64) as u32;
            let remainder = (total % features as u64) as u32;
            for row in 0..features {
                counts[[row, col]] = base;
            }
            counts[[0, col]] += remainder;
        }

        let genes = GeneIndex::new((0..n_genes).map(|g| format!("g{g}")).collect()).unwrap();
        let names: Vec<String> = (0..profiles.len()).map(|s| format!("s{s}")).collect();
        let samples = names
            .iter()
            .map(|name| SampleInfo {
                name: name.clone(),
                timepoint: "t0".to_string(),
                label: "wt".to_string(),
            })
            .collect();
        let matrix = CountMatrix::new(genes, names, counts).unwrap();
        AnnotatedDataset::new(matrix, samples).unwrap()
    }

    #[test]
    fn test_per_sample_stats() {
        let dataset = dataset_with_profiles(&[(3, 10)]);
        let counts = dataset.matrix.sample_counts(0);
        assert_eq!(detected_features(counts), 3);
        assert_eq!(total_counts(counts), 10);
    }

    #[test]
    fn test_filter_retains_only_passing_sample() {
        let dataset = dataset_with_profiles(&[(3000, 600_000), (2000, 600_000)]);
        let thresholds = QcThresholds {
            min_features: 2500,
            min_counts: 500_000,
        };
        let (filtered, report) = filter_samples(&dataset, thresholds);

        assert_eq!(report, QcReport { retained: 1, discarded: 1 });
        assert_eq!(filtered.n_samples(), 1);
        assert_eq!(filtered.matrix.sample_names, vec!["s0".to_string()]);
        // the input dataset is not mutated
        assert_eq!(dataset.n_samples(), 2);
    }

    #[test]
    fn test_thresholds_are_strict() {
        // exactly at a threshold fails; one past it passes
        let dataset = dataset_with_profiles(&[(10, 101), (10, 100), (11, 101)]);
        let thresholds = QcThresholds {
            min_features: 10,
            min_counts: 100,
        };
        let (filtered, report) = filter_samples(&dataset, thresholds);
        assert_eq!(report.discarded, 2);
        assert_eq!(filtered.matrix.sample_names, vec!["s2".to_string()]);
    }

    #[test]
    fn test_filter_empty_dataset() {
        let dataset = dataset_with_profiles(&[]);
        let thresholds = QcThresholds {
            min_features: 1,
            min_counts: 1,
        };
        let (filtered, report) = filter_samples(&dataset, thresholds);
        assert_eq!(filtered.n_samples(), 0);
        assert_eq!(report, QcReport { retained: 0, discarded: 0 });
    }

    #[test]
    fn test_filtering_out_everything_is_not_an_error() {
        let dataset = dataset_with_profiles(&[(5, 50), (6, 60)]);
        let thresholds = QcThresholds {
            min_features: 100,
            min_counts: 1_000,
        };
        let (filtered, report) = filter_samples(&dataset, thresholds);
        assert_eq!(filtered.n_samples(), 0);
        assert_eq!(report, QcReport { retained: 0, discarded: 2 });
    }

    #[test]
    fn test_filter_is_idempotent() {
        let dataset = dataset_with_profiles(&[(3000, 600_000), (2000, 600_000), (2600, 400_000)]);
        let thresholds = QcThresholds {
            min_features: 2500,
            min_counts: 500_000,
        };
        let (once, first) = filter_samples(&dataset, thresholds);
        let (twice, second) = filter_samples(&once, thresholds);

        assert_eq!(first, QcReport { retained: 1, discarded: 2 });
        assert_eq!(second, QcReport { retained: 1, discarded: 0 });
        assert_eq!(once.matrix.sample_names, twice.matrix.sample_names);
        assert_eq!(once.matrix.counts, twice.matrix.counts);
    }
}
