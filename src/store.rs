// src/store.rs
//! The cleansed table on disk: a single Parquet file whose presence is the
//! only signal that cleansing already happened.

use anyhow::{Context, Result};
use arrow::{compute::concat_batches, record_batch::RecordBatch};
use parquet::{
    arrow::{arrow_reader::ParquetRecordBatchReaderBuilder, ArrowWriter},
    basic::{BrotliLevel, Compression},
    file::properties::WriterProperties,
};
use std::{
    fs::{self, File},
    path::Path,
};
use tracing::debug;

/// True when a cleansed table already sits at `path`.
pub fn cleansed_exists(path: &Path) -> bool {
    path.is_file()
}

/// Write `batch` to `path` through a temporary sibling, so a failed write
/// never leaves a file that would be mistaken for a finished table.
pub fn write_cleansed(batch: &RecordBatch, path: &Path) -> Result<u64> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating output directory {}", parent.display()))?;
    }
    let temp_path = path.with_extension("parquet.tmp");

    let written = write_parquet(batch, &temp_path).and_then(|()| {
        fs::rename(&temp_path, path).with_context(|| {
            format!(
                "renaming {} -> {}",
                temp_path.display(),
                path.display()
            )
        })
    });
    if let Err(e) = written {
        let _ = fs::remove_file(&temp_path);
        return Err(e);
    }

    let size = fs::metadata(path).context("getting file metadata")?.len();
    debug!(path = %path.display(), rows = batch.num_rows(), bytes = size, "wrote cleansed table");
    Ok(size)
}

fn write_parquet(batch: &RecordBatch, path: &Path) -> Result<()> {
    let file =
        File::create(path).with_context(|| format!("creating file {}", path.display()))?;
    let props = WriterProperties::builder()
        .set_compression(Compression::BROTLI(BrotliLevel::try_new(5)?))
        .set_dictionary_enabled(true)
        .build();
    let mut writer = ArrowWriter::try_new(file, batch.schema(), Some(props))
        .context("creating parquet writer")?;
    writer.write(batch).context("writing batch to parquet")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

/// Read a cleansed table back, exactly as it was written.
pub fn read_cleansed(path: &Path) -> Result<RecordBatch> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file).with_context(|| {
        format!(
            "failed to create RecordBatchReaderBuilder for `{}`",
            path.display()
        )
    })?;
    let schema = builder.schema().clone();
    let reader = builder
        .with_batch_size(8192)
        .build()
        .with_context(|| format!("failed to build RecordBatchReader for `{}`", path.display()))?;

    let batches = reader
        .collect::<std::result::Result<Vec<_>, _>>()
        .with_context(|| format!("reading batches from `{}`", path.display()))?;
    concat_batches(&schema, &batches).context("concatenating cleansed batches")
}
