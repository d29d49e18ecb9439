use anyhow::{Context, Error};
use flate2::bufread::MultiGzDecoder;
use itertools::Itertools;
use ndarray::Array2;
use scprep_types::{CountMatrix, GeneIndex, PipelineError};
use std::fmt::Display;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use std::str::FromStr;

/// A parsed gene × sample table: row and column identifiers plus the dense
/// value block. Rows are genes, columns are samples.
#[derive(Clone, Debug, PartialEq)]
pub struct Table<T> {
    /// Gene identifiers from the first column, in row order.
    pub gene_ids: Vec<String>,
    /// Sample names from the header row, in column order.
    pub sample_names: Vec<String>,
    /// Values, rows = genes, columns = samples.
    pub values: Array2<T>,
}

fn open_table_reader(path: &Path) -> Result<Box<dyn Read>, Error> {
    let file = BufReader::new(File::open(path).with_context(|| path.display().to_string())?);
    if path.extension().is_some_and(|ext| ext == "gz") {
        Ok(Box::new(MultiGzDecoder::new(file)))
    } else {
        Ok(Box::new(file))
    }
}

/// Read a CSV table with gene identifiers in the first column and sample
/// names in the header row. Transparently decompresses `.gz` input. Ragged
/// rows, unparsable values, and duplicate sample names are errors.
pub fn read_table<T>(path: impl AsRef<Path>) -> Result<Table<T>, Error>
where
    T: FromStr,
    T::Err: Display,
{
    let path = path.as_ref();
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(open_table_reader(path)?);

    let header = reader
        .headers()
        .with_context(|| format!("reading header of {}", path.display()))?;
    // the corner field above the gene-id column carries no information
    let sample_names: Vec<String> = header.iter().skip(1).map(str::to_string).collect();
    if let Some(name) = sample_names.iter().duplicates().next() {
        return Err(PipelineError::DuplicateSampleName { name: name.clone() }.into());
    }
    let n_samples = sample_names.len();

    let mut gene_ids = Vec::new();
    let mut values = Vec::new();
    for (row, record) in reader.records().enumerate() {
        let line = row + 2; // 1-based, after the header line
        let record = record.with_context(|| format!("reading {}", path.display()))?;
        let mut fields = record.iter();
        let gene_id = fields.next().ok_or(PipelineError::MalformedTable {
            line,
            reason: "empty record".to_string(),
        })?;
        if record.len() != n_samples + 1 {
            return Err(PipelineError::MalformedTable {
                line,
                reason: format!("expected {} values, found {}", n_samples, record.len() - 1),
            }
            .into());
        }
        gene_ids.push(gene_id.to_string());
        for field in fields {
            values.push(field.parse::<T>().map_err(|e| PipelineError::MalformedTable {
                line,
                reason: format!("bad value {field:?}: {e}"),
            })?);
        }
    }

    let n_genes = gene_ids.len();
    let values = Array2::from_shape_vec((n_genes, n_samples), values)
        .with_context(|| format!("shaping {}", path.display()))?;
    Ok(Table {
        gene_ids,
        sample_names,
        values,
    })
}

/// Load a raw count table into a validated `CountMatrix`. Duplicate gene
/// identifiers are rejected here rather than silently renamed.
pub fn load_counts(path: impl AsRef<Path>) -> Result<CountMatrix, Error> {
    let path = path.as_ref();
    let table: Table<u32> = read_table(path).with_context(|| format!("loading counts from {}", path.display()))?;
    let genes = GeneIndex::new(table.gene_ids)?;
    Ok(CountMatrix::new(genes, table.sample_names, table.values)?)
}

/// Export a processed gene × sample matrix as CSV, gene identifiers first
/// column and sample names as the header row. Identifiers containing the
/// delimiter are quoted by the writer. An unwritable destination fails with
/// `WriteError`.
pub fn write_table<T: Display>(
    path: impl AsRef<Path>,
    gene_ids: &[String],
    sample_names: &[String],
    values: &Array2<T>,
) -> Result<(), Error> {
    let path = path.as_ref();
    if values.nrows() != gene_ids.len() {
        return Err(PipelineError::DimensionMismatch {
            expected: gene_ids.len(),
            actual: values.nrows(),
        }
        .into());
    }
    if values.ncols() != sample_names.len() {
        return Err(PipelineError::DimensionMismatch {
            expected: sample_names.len(),
            actual: values.ncols(),
        }
        .into());
    }

    let mut writer = csv::WriterBuilder::new()
        .from_path(path)
        .map_err(|e| PipelineError::write_error(path, e))?;

    let mut header = vec![String::new()];
    header.extend(sample_names.iter().cloned());
    writer
        .write_record(&header)
        .map_err(|e| PipelineError::write_error(path, e))?;

    for (gene_id, row) in gene_ids.iter().zip(values.rows()) {
        let mut record = vec![gene_id.clone()];
        record.extend(row.iter().map(T::to_string));
        writer
            .write_record(&record)
            .map_err(|e| PipelineError::write_error(path, e))?;
    }
    writer.flush().map_err(|e| PipelineError::write_error(path, e))?;
    Ok(())
}
