use crate::assemble;
use crate::metadata::NameSchema;
use crate::qc;
use crate::table;
use crate::toolkit::{Embedding, Toolkit};
use anyhow::{bail, Error};
use log::info;
use ndarray::{Array2, Axis};
use scprep_types::{AnnotatedDataset, CountMatrix, QcReport, QcThresholds};
use std::path::Path;

/// Tuning for the toolkit stages of a run.
#[derive(Clone, Copy, Debug)]
pub struct AnalysisParams {
    /// How many variable genes to select after normalization.
    pub n_variable_features: usize,
    /// How many principal components to compute.
    pub n_components: usize,
}

/// Everything a pipeline run produces. Each field is a fresh value; no
/// stage mutates its input.
#[derive(Clone, Debug)]
pub struct AnalysisOutput {
    /// The QC-filtered annotated dataset the toolkit operated on.
    pub dataset: AnnotatedDataset,
    /// Outcome of the QC filter.
    pub report: QcReport,
    /// Normalized expression, gene × retained sample.
    pub normalized: Array2<f64>,
    /// Identifiers of the selected variable genes, in gene-index order.
    pub variable_genes: Vec<String>,
    /// PCA, UMAP, and t-SNE projections of the retained samples.
    pub embeddings: Vec<Embedding>,
}

/// Run the full preprocessing pipeline over a raw count matrix:
/// parse sample names, attach metadata, apply the QC filter, then drive the
/// toolkit through normalize → select variable features → scale → PCA →
/// UMAP → t-SNE. Stages run strictly in sequence; any failure aborts the
/// run. UMAP and t-SNE are computed in two dimensions from the PCA
/// coordinates.
pub fn run<T: Toolkit>(
    matrix: CountMatrix,
    schema: &NameSchema,
    thresholds: QcThresholds,
    params: AnalysisParams,
    toolkit: &T,
) -> Result<AnalysisOutput, Error> {
    let dataset = assemble::annotate(matrix, schema)?;
    info!(
        "annotated {} samples across {} genes",
        dataset.n_samples(),
        dataset.matrix.n_genes()
    );

    let (dataset, report) = qc::filter_samples(&dataset, thresholds);
    info!(
        "qc filter discarded {} of {} samples",
        report.discarded,
        report.retained + report.discarded
    );

    let normalized = toolkit.normalize(dataset.matrix.counts.view())?;
    let variable = toolkit.select_variable_features(normalized.view(), params.n_variable_features)?;
    // the toolkit is an external implementation; don't trust its indices
    if let Some(&row) = variable.iter().find(|&&row| row >= dataset.matrix.n_genes()) {
        bail!(
            "toolkit selected gene row {row} out of range for {} genes",
            dataset.matrix.n_genes()
        );
    }
    let variable_genes = variable
        .iter()
        .map(|&row| dataset.matrix.genes.ids()[row].clone())
        .collect();

    let scaled = toolkit.scale(normalized.select(Axis(0), &variable).view())?;
    let pca = toolkit.run_pca(scaled.view(), params.n_components)?;
    let umap = toolkit.run_umap(pca.coords.view(), 2)?;
    let tsne = toolkit.run_tsne(pca.coords.view(), 2)?;
    info!("computed pca/umap/tsne embeddings for {} samples", dataset.n_samples());

    Ok(AnalysisOutput {
        dataset,
        report,
        normalized,
        variable_genes,
        embeddings: vec![pca, umap, tsne],
    })
}

/// Export the normalized matrix of a finished run as CSV, gene identifiers
/// down the first column and the retained sample names across the header.
pub fn export_processed(output: &AnalysisOutput, path: impl AsRef<Path>) -> Result<(), Error> {
    table::write_table(
        path,
        output.dataset.matrix.genes.ids(),
        &output.dataset.matrix.sample_names,
        &output.normalized,
    )
}
