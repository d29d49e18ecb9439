//! # scprep: single-cell count preprocessing in Rust
//!
//! A linear preprocessing pipeline for single-cell RNA-Seq count tables:
//! parse per-sample metadata out of encoded sample names, assemble an
//! annotated dataset, drop low-quality samples, hand the survivors to an
//! analysis toolkit behind the [`toolkit::Toolkit`] seam, and export the
//! processed matrix as CSV. The statistical machinery itself (normalization,
//! variable-feature selection, PCA/UMAP/t-SNE) lives behind the seam and is
//! never reimplemented here.

#![deny(missing_docs)]
#![deny(warnings)]

/// Dataset assembly from a count matrix and parsed metadata
pub mod assemble;

/// Sample-name metadata parsing
pub mod metadata;

/// Sequential pipeline driver
pub mod pipeline;

/// Per-sample quality-control filtering
pub mod qc;

/// Annotated-dataset snapshot persistence
pub mod snapshot;

/// CSV count-table loading and processed-matrix export
pub mod table;

/// Interface to the external analysis toolkit
pub mod toolkit;
