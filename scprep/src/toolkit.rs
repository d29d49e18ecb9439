//! The seam to the external analysis toolkit.
//!
//! Normalization, variable-feature selection, scaling, and dimensionality
//! reduction are consumed through [`Toolkit`] as black-box calls with
//! documented input/output shapes; their internals are deliberately outside
//! this crate. Expression matrices are gene × sample throughout, embeddings
//! are sample × dimension.

use anyhow::Error;
use ndarray::{Array2, ArrayView2};

/// Which reduction produced an embedding.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Reduction {
    /// Principal component analysis.
    Pca,
    /// Uniform manifold approximation and projection.
    Umap,
    /// t-distributed stochastic neighbor embedding.
    Tsne,
}

/// A low-dimensional projection of the dataset, sample × dimension.
#[derive(Clone, Debug)]
pub struct Embedding {
    /// The reduction that produced these coordinates.
    pub reduction: Reduction,
    /// Coordinates, one row per sample.
    pub coords: Array2<f64>,
}

/// Operations the pipeline consumes from the analysis toolkit.
///
/// Every method takes an immutable view and returns a new value; the
/// pipeline never mutates an analysis object in place.
pub trait Toolkit {
    /// Normalize raw counts (gene × sample) into expression values of the
    /// same shape.
    fn normalize(&self, counts: ArrayView2<'_, u32>) -> Result<Array2<f64>, Error>;

    /// Pick up to `n_features` informative genes from a normalized
    /// expression matrix, returned as row indices in ascending order.
    fn select_variable_features(
        &self,
        expression: ArrayView2<'_, f64>,
        n_features: usize,
    ) -> Result<Vec<usize>, Error>;

    /// Center/scale a normalized expression matrix, preserving its shape.
    fn scale(&self, expression: ArrayView2<'_, f64>) -> Result<Array2<f64>, Error>;

    /// Project a scaled expression matrix (gene × sample) onto
    /// `n_components` principal components, sample × component.
    fn run_pca(&self, scaled: ArrayView2<'_, f64>, n_components: usize) -> Result<Embedding, Error>;

    /// Embed PCA coordinates (sample × component) into `n_dims` dimensions.
    fn run_umap(&self, components: ArrayView2<'_, f64>, n_dims: usize) -> Result<Embedding, Error>;

    /// Embed PCA coordinates (sample × component) into `n_dims` dimensions.
    fn run_tsne(&self, components: ArrayView2<'_, f64>, n_dims: usize) -> Result<Embedding, Error>;
}


#[cfg(test)]
mod test_toolkit {
    use super::double::StubToolkit;
    use super::*;
    use ndarray::array;

    #[test]
    fn test_stub_shapes_line_up() {
        let toolkit = StubToolkit;
        let counts = array![[5u32, 0, 2], [1, 1, 1], [9, 9, 9]];

        let normalized = toolkit.normalize(counts.view()).unwrap();
        assert_eq!(normalized.dim(), (3, 3));

        let picked = toolkit.select_variable_features(normalized.view(), 2).unwrap();
        assert_eq!(picked, vec![0, 2]); // rows with the largest totals, ascending

        let scaled = toolkit.scale(normalized.view()).unwrap();
        assert_eq!(scaled.dim(), (3, 3));

        let pca = toolkit.run_pca(scaled.view(), 2).unwrap();
        assert_eq!(pca.reduction, Reduction::Pca);
        assert_eq!(pca.coords.dim(), (3, 2)); // sample × component

        let umap = toolkit.run_umap(pca.coords.view(), 2).unwrap();
        assert_eq!(umap.coords.dim(), (3, 2));
    }
}
