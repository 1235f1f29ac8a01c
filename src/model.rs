//! Cleaned, typed records for one batch.

use chrono::NaiveDate;
use serde::Serialize;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Location {
    pub location_id: i64,
    pub region: String,
    pub country: String,
    pub population: u64,
    pub density: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VehicleMake {
    pub make_id: i64,
    pub make_name: String,
    /// Category such as "Standard" or "Luxury".
    pub make_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StolenVehicle {
    pub vehicle_id: i64,
    pub vehicle_type: Option<String>,
    pub make_id: Option<i64>,
    pub model_year: Option<i32>,
    pub color: Option<String>,
    pub date_stolen: NaiveDate,
    pub location_id: Option<i64>,
}

/// The cleaned record collections of a batch. Built once by the
/// cleaner and only read afterwards.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Batch {
    pub locations: Vec<Location>,
    pub vehicles: Vec<StolenVehicle>,
    pub makes: Vec<VehicleMake>,
}

/// A vehicle joined to its make and location.
#[derive(Debug, Clone, Copy)]
pub struct VehicleProfile<'a> {
    pub vehicle: &'a StolenVehicle,
    pub make: &'a VehicleMake,
    pub location: &'a Location,
}

pub(crate) fn makes_by_id(makes: &[VehicleMake]) -> HashMap<i64, &VehicleMake> {
    let mut index = HashMap::with_capacity(makes.len());
    for make in makes {
        index.entry(make.make_id).or_insert(make);
    }
    index
}

pub(crate) fn locations_by_id(locations: &[Location]) -> HashMap<i64, &Location> {
    let mut index = HashMap::with_capacity(locations.len());
    for location in locations {
        index.entry(location.location_id).or_insert(location);
    }
    index
}

/// Inner-joins vehicles to makes and locations. Vehicles whose make or
/// location is missing or unknown are left out.
pub fn vehicle_profiles<'a>(
    vehicles: &'a [StolenVehicle],
    makes: &'a [VehicleMake],
    locations: &'a [Location],
) -> Vec<VehicleProfile<'a>> {
    let makes = makes_by_id(makes);
    let locations = locations_by_id(locations);

    vehicles
        .iter()
        .filter_map(|vehicle| {
            let make = *makes.get(&vehicle.make_id?)?;
            let location = *locations.get(&vehicle.location_id?)?;
            Some(VehicleProfile {
                vehicle,
                make,
                location,
            })
        })
        .collect()
}

impl Batch {
    pub fn profiles(&self) -> Vec<VehicleProfile<'_>> {
        vehicle_profiles(&self.vehicles, &self.makes, &self.locations)
    }
}
