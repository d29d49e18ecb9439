use anyhow::{Context, Error};
use scprep_types::{AnnotatedDataset, PipelineError};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

/// Persist an annotated dataset to `path` for reuse across sessions. The
/// snapshot format is owned by this crate and should be treated as opaque by
/// callers; an unwritable destination fails with `WriteError`.
pub fn save_dataset(dataset: &AnnotatedDataset, path: impl AsRef<Path>) -> Result<(), Error> {
    let path = path.as_ref();
    let file = File::create(path).map_err(|e| PipelineError::write_error(path, e))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer(&mut writer, dataset).map_err(|e| PipelineError::write_error(path, e))?;
    writer.flush().map_err(|e| PipelineError::write_error(path, e))?;
    Ok(())
}

/// Read back a snapshot written by [`save_dataset`].
pub fn load_dataset(path: impl AsRef<Path>) -> Result<AnnotatedDataset, Error> {
    let path = path.as_ref();
    let file = File::open(path).with_context(|| format!("opening snapshot {}", path.display()))?;
    let dataset = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("reading snapshot {}", path.display()))?;
    Ok(dataset)
}
