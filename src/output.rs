//! Persistence for batch results.
//!
//! Every write replaces the target file, so re-running a batch leaves
//! exactly one copy of its output behind.

use flate2::Compression;
use flate2::write::GzEncoder;
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::{EtlError, Result};

/// Logs a value as pretty-printed JSON.
pub fn print_json(value: &impl Serialize) -> Result<()> {
    info!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Returns `dir/name.csv`, or `dir/name.csv.gz` when `gzip` is set.
pub fn csv_path(dir: &Path, name: &str, gzip: bool) -> PathBuf {
    if gzip {
        dir.join(format!("{name}.csv.gz"))
    } else {
        dir.join(format!("{name}.csv"))
    }
}

/// Serializes `rows` as CSV with a header line and hands back the writer.
pub fn write_rows<T: Serialize, W: Write>(writer: W, rows: &[T]) -> Result<W> {
    let mut wtr = csv::Writer::from_writer(writer);
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    wtr.into_inner().map_err(|e| EtlError::Io(e.into_error()))
}

/// Writes `rows` to `path` as CSV, gzip-compressed if `gzip` is set.
pub fn write_csv<T: Serialize>(path: &Path, rows: &[T], gzip: bool) -> Result<()> {
    debug!(path = %path.display(), rows = rows.len(), gzip, "Writing CSV");
    let file = File::create(path)?;

    if gzip {
        let encoder = write_rows(GzEncoder::new(file, Compression::default()), rows)?;
        encoder.finish()?;
    } else {
        write_rows(file, rows)?;
    }

    Ok(())
}

/// Writes `value` to `path` as pretty-printed JSON.
pub fn write_json(path: &Path, value: &impl Serialize) -> Result<()> {
    debug!(path = %path.display(), "Writing JSON");
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, value)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}
