//! Turns raw rows into typed records.
//!
//! Cleaning is all-or-nothing: the first row that cannot be reconciled
//! fails the whole batch and no cleaned record is returned.

use chrono::NaiveDate;
use std::str::FromStr;
use tracing::{debug, info};

use crate::config::PipelineConfig;
use crate::error::{EtlError, Result};
use crate::loader::{Dataset, RawBatch, RawLocation, RawMake, RawVehicle, Row};
use crate::model::{Batch, Location, StolenVehicle, VehicleMake};

const ISO_DATE: &str = "%Y-%m-%d";

/// Cleans every row of `raw`, returning a new [`Batch`] only if all rows
/// of all three datasets succeed.
#[tracing::instrument(skip_all, fields(locations = raw.locations.len(), vehicles = raw.vehicles.len(), makes = raw.makes.len()))]
pub fn clean_batch(raw: &RawBatch, config: &PipelineConfig) -> Result<Batch> {
    let locations = raw
        .locations
        .iter()
        .map(clean_location)
        .collect::<Result<Vec<_>>>()?;
    let makes = raw.makes.iter().map(clean_make).collect::<Result<Vec<_>>>()?;
    let vehicles = raw
        .vehicles
        .iter()
        .map(|row| clean_vehicle(row, config))
        .collect::<Result<Vec<_>>>()?;

    info!(
        locations = locations.len(),
        vehicles = vehicles.len(),
        makes = makes.len(),
        "Batch cleaned"
    );

    Ok(Batch {
        locations,
        vehicles,
        makes,
    })
}

/// Resolves a `date_stolen` value. A known malformed literal maps
/// straight to its ISO correction; any other value is tried against each
/// configured format in order.
pub fn repair_date(value: &str, config: &PipelineConfig) -> Option<NaiveDate> {
    let value = value.trim();
    if let Some(fixed) = config.repair(value) {
        debug!(from = value, to = fixed, "Repaired date literal");
        return NaiveDate::parse_from_str(fixed, ISO_DATE).ok();
    }

    config
        .date_formats()
        .find_map(|format| NaiveDate::parse_from_str(value, format).ok())
}

fn coerce<T: FromStr>(dataset: Dataset, line: u64, field: &'static str, value: &str) -> Result<T> {
    value.parse().map_err(|_| EtlError::TypeCoercion {
        dataset,
        line,
        field,
        value: value.to_string(),
    })
}

fn coerce_optional<T: FromStr>(
    dataset: Dataset,
    line: u64,
    field: &'static str,
    value: &str,
) -> Result<Option<T>> {
    if value.is_empty() {
        Ok(None)
    } else {
        coerce(dataset, line, field, value).map(Some)
    }
}

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

fn clean_location(row: &Row<RawLocation>) -> Result<Location> {
    let dataset = Dataset::Locations;
    let raw = &row.fields;

    let population: u64 = coerce(dataset, row.line, "population", &raw.population.replace(',', ""))
        .map_err(|_| EtlError::TypeCoercion {
            dataset,
            line: row.line,
            field: "population",
            value: raw.population.clone(),
        })?;

    let density: f64 = coerce(dataset, row.line, "density", &raw.density)?;
    if !density.is_finite() || density < 0.0 {
        return Err(EtlError::TypeCoercion {
            dataset,
            line: row.line,
            field: "density",
            value: raw.density.clone(),
        });
    }

    Ok(Location {
        location_id: coerce(dataset, row.line, "location_id", &raw.location_id)?,
        region: raw.region.clone(),
        country: raw.country.clone(),
        population,
        density,
    })
}

fn clean_make(row: &Row<RawMake>) -> Result<VehicleMake> {
    let raw = &row.fields;
    Ok(VehicleMake {
        make_id: coerce(Dataset::MakeDetails, row.line, "make_id", &raw.make_id)?,
        make_name: raw.make_name.clone(),
        make_type: raw.make_type.clone(),
    })
}

fn clean_vehicle(row: &Row<RawVehicle>, config: &PipelineConfig) -> Result<StolenVehicle> {
    let dataset = Dataset::StolenVehicles;
    let raw = &row.fields;

    let date_stolen =
        repair_date(&raw.date_stolen, config).ok_or_else(|| EtlError::UnparseableDate {
            vehicle_id: raw.vehicle_id.clone(),
            line: row.line,
            value: raw.date_stolen.clone(),
        })?;

    Ok(StolenVehicle {
        vehicle_id: coerce(dataset, row.line, "vehicle_id", &raw.vehicle_id)?,
        vehicle_type: non_empty(&raw.vehicle_type),
        make_id: coerce_optional(dataset, row.line, "make_id", &raw.make_id)?,
        model_year: coerce_optional(dataset, row.line, "model_year", &raw.model_year)?,
        color: non_empty(&raw.color),
        date_stolen,
        location_id: coerce_optional(dataset, row.line, "location_id", &raw.location_id)?,
    })
}
