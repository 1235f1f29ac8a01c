//! CSV loader for the three source datasets.
//!
//! Rows are kept in their raw textual form; the only check made here is
//! that each row has as many fields as its dataset's schema.

use csv::{ReaderBuilder, Trim};
use flate2::read::GzDecoder;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::fmt;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::audit::{AuditEntry, AuditHook};
use crate::error::{EtlError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dataset {
    Locations,
    StolenVehicles,
    MakeDetails,
}

impl Dataset {
    pub fn columns(&self) -> &'static [&'static str] {
        match self {
            Dataset::Locations => &["location_id", "region", "country", "population", "density"],
            Dataset::StolenVehicles => &[
                "vehicle_id",
                "vehicle_type",
                "make_id",
                "model_year",
                "color",
                "date_stolen",
                "location_id",
            ],
            Dataset::MakeDetails => &["make_id", "make_name", "make_type"],
        }
    }
}

impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Dataset::Locations => "locations",
            Dataset::StolenVehicles => "stolen_vehicles",
            Dataset::MakeDetails => "make_details",
        })
    }
}

/// A raw row together with its 1-based line in the source file.
#[derive(Debug, Clone)]
pub struct Row<T> {
    pub line: u64,
    pub fields: T,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawLocation {
    pub location_id: String,
    pub region: String,
    pub country: String,
    pub population: String,
    pub density: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawVehicle {
    pub vehicle_id: String,
    pub vehicle_type: String,
    pub make_id: String,
    pub model_year: String,
    pub color: String,
    pub date_stolen: String,
    pub location_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawMake {
    pub make_id: String,
    pub make_name: String,
    pub make_type: String,
}

/// Everything read from disk for one batch, before cleaning.
#[derive(Debug, Clone, Default)]
pub struct RawBatch {
    pub locations: Vec<Row<RawLocation>>,
    pub vehicles: Vec<Row<RawVehicle>>,
    pub makes: Vec<Row<RawMake>>,
}

/// Source file paths for one batch.
#[derive(Debug, Clone)]
pub struct InputPaths {
    pub locations: PathBuf,
    pub vehicles: PathBuf,
    pub makes: PathBuf,
}

/// Reads every data row of `dataset` from `reader`, skipping the header.
///
/// # Errors
///
/// Returns [`EtlError::MalformedInput`] for the first row (header
/// included) whose field count differs from the dataset schema.
pub fn read_rows<T: DeserializeOwned, R: Read>(dataset: Dataset, reader: R) -> Result<Vec<Row<T>>> {
    let expected = dataset.columns().len();
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);

    let header_len = rdr.headers()?.len();
    if header_len != expected {
        return Err(EtlError::MalformedInput {
            dataset,
            line: 1,
            expected,
            found: header_len,
        });
    }

    let mut rows = Vec::new();
    for result in rdr.records() {
        let record = result?;
        let line = record.position().map(|p| p.line()).unwrap_or_default();

        if record.len() != expected {
            return Err(EtlError::MalformedInput {
                dataset,
                line,
                expected,
                found: record.len(),
            });
        }

        let fields: T = record.deserialize(None)?;
        rows.push(Row { line, fields });
    }

    debug!(%dataset, rows = rows.len(), "Dataset read");
    Ok(rows)
}

/// Reads the stolen-vehicles dataset and reports each row to `hook` once
/// the whole dataset has been read.
pub fn read_vehicles<R: Read>(reader: R, hook: &mut dyn AuditHook) -> Result<Vec<Row<RawVehicle>>> {
    let rows: Vec<Row<RawVehicle>> = read_rows(Dataset::StolenVehicles, reader)?;
    for row in &rows {
        hook.record(AuditEntry::ingested(&row.fields.vehicle_id));
    }
    Ok(rows)
}

/// Opens an input file, gunzipping it when the name ends in `.gz`.
pub fn open_input(path: &Path) -> Result<Box<dyn Read>> {
    let file = BufReader::new(File::open(path)?);
    if path.extension().and_then(|e| e.to_str()) == Some("gz") {
        Ok(Box::new(GzDecoder::new(file)))
    } else {
        Ok(Box::new(file))
    }
}

/// Loads all three datasets of a batch.
#[tracing::instrument(skip(hook), fields(locations = %paths.locations.display(), vehicles = %paths.vehicles.display(), makes = %paths.makes.display()))]
pub fn load_batch(paths: &InputPaths, hook: &mut dyn AuditHook) -> Result<RawBatch> {
    let locations = read_rows(Dataset::Locations, open_input(&paths.locations)?)?;
    let makes = read_rows(Dataset::MakeDetails, open_input(&paths.makes)?)?;
    let vehicles = read_vehicles(open_input(&paths.vehicles)?, hook)?;

    Ok(RawBatch {
        locations,
        vehicles,
        makes,
    })
}
