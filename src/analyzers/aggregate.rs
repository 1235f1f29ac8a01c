use chrono::{Datelike, NaiveDate, Weekday};
use std::collections::{HashMap, HashSet};

use crate::analyzers::segment::AgeSegment;
use crate::analyzers::types::{DateRange, DayType, GroupCount, RegionProfile, VehicleSegment};
use crate::analyzers::utility::{mean, ranked};
use crate::model::{Location, StolenVehicle, VehicleMake, makes_by_id, vehicle_profiles};

static DAY_NAMES: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

fn tally<'a>(keys: impl Iterator<Item = &'a str>) -> HashMap<String, usize> {
    let mut counts = HashMap::new();
    for key in keys {
        *counts.entry(key.to_string()).or_insert(0) += 1;
    }
    counts
}

/// Counts stolen vehicles per vehicle type. Vehicles without a type are
/// not counted.
pub fn vehicle_count_by_type(vehicles: &[StolenVehicle]) -> Vec<GroupCount> {
    ranked(tally(vehicles.iter().filter_map(|v| v.vehicle_type.as_deref())))
}

/// Counts stolen vehicles per colour. Vehicles without a colour are not
/// counted.
pub fn theft_count_by_color(vehicles: &[StolenVehicle]) -> Vec<GroupCount> {
    ranked(tally(vehicles.iter().filter_map(|v| v.color.as_deref())))
}

fn joined_makes<'a>(
    vehicles: &'a [StolenVehicle],
    makes: &'a [VehicleMake],
) -> impl Iterator<Item = &'a VehicleMake> {
    let index = makes_by_id(makes);
    vehicles
        .iter()
        .filter_map(move |v| index.get(&v.make_id?).copied())
}

/// Counts stolen vehicles per make category ("Standard", "Luxury", ...).
pub fn stolen_count_by_make_type(
    vehicles: &[StolenVehicle],
    makes: &[VehicleMake],
) -> Vec<GroupCount> {
    ranked(tally(joined_makes(vehicles, makes).map(|m| m.make_type.as_str())))
}

/// Counts stolen vehicles per make name.
pub fn theft_count_by_make(vehicles: &[StolenVehicle], makes: &[VehicleMake]) -> Vec<GroupCount> {
    ranked(tally(joined_makes(vehicles, makes).map(|m| m.make_name.as_str())))
}

pub fn day_type(date: NaiveDate) -> DayType {
    match date.weekday() {
        Weekday::Sat | Weekday::Sun => DayType::Weekend,
        _ => DayType::Weekday,
    }
}

/// Splits thefts into weekday and weekend buckets. Both buckets are
/// reported, even at zero, unless there are no vehicles at all.
pub fn weekday_vs_weekend(vehicles: &[StolenVehicle]) -> Vec<GroupCount> {
    if vehicles.is_empty() {
        return Vec::new();
    }

    let mut counts = HashMap::from([
        (DayType::Weekday.to_string(), 0),
        (DayType::Weekend.to_string(), 0),
    ]);
    for vehicle in vehicles {
        *counts
            .entry(day_type(vehicle.date_stolen).to_string())
            .or_insert(0) += 1;
    }
    ranked(counts)
}

/// Counts thefts per day of the week, Monday first.
pub fn theft_count_by_day_of_week(vehicles: &[StolenVehicle]) -> Vec<GroupCount> {
    let mut counts = [0usize; 7];
    for vehicle in vehicles {
        counts[vehicle.date_stolen.weekday().num_days_from_monday() as usize] += 1;
    }

    DAY_NAMES
        .iter()
        .zip(counts)
        .filter(|(_, count)| *count > 0)
        .map(|(day, count)| GroupCount {
            key: day.to_string(),
            count,
        })
        .collect()
}

/// Per-region theft count, distinct makes, distinct colours and average
/// population and density, busiest region first.
pub fn region_profile(
    vehicles: &[StolenVehicle],
    makes: &[VehicleMake],
    locations: &[Location],
) -> Vec<RegionProfile> {
    #[derive(Default)]
    struct Acc<'a> {
        stolen: usize,
        makes: HashSet<&'a str>,
        colors: HashSet<&'a str>,
        populations: Vec<f64>,
        densities: Vec<f64>,
    }

    let mut by_region: HashMap<&str, Acc> = HashMap::new();
    for profile in vehicle_profiles(vehicles, makes, locations) {
        let acc = by_region
            .entry(profile.location.region.as_str())
            .or_default();
        acc.stolen += 1;
        acc.makes.insert(profile.make.make_name.as_str());
        if let Some(color) = profile.vehicle.color.as_deref() {
            acc.colors.insert(color);
        }
        acc.populations.push(profile.location.population as f64);
        acc.densities.push(profile.location.density);
    }

    let mut rows: Vec<RegionProfile> = by_region
        .into_iter()
        .map(|(region, acc)| RegionProfile {
            region: region.to_string(),
            stolen_count: acc.stolen,
            unique_makes: acc.makes.len(),
            unique_colors: acc.colors.len(),
            avg_population: mean(&acc.populations),
            avg_density: mean(&acc.densities),
        })
        .collect();

    rows.sort_by(|a, b| {
        b.stolen_count
            .cmp(&a.stolen_count)
            .then_with(|| a.region.cmp(&b.region))
    });
    rows
}

/// Assigns each vehicle its age segment, in input order.
pub fn segment_by_age(vehicles: &[StolenVehicle]) -> Vec<VehicleSegment> {
    vehicles
        .iter()
        .map(|v| VehicleSegment {
            vehicle_id: v.vehicle_id,
            model_year: v.model_year,
            segment: AgeSegment::classify(v.model_year),
        })
        .collect()
}

pub fn theft_count_by_segment(vehicles: &[StolenVehicle]) -> Vec<GroupCount> {
    ranked(tally(
        vehicles
            .iter()
            .map(|v| AgeSegment::classify(v.model_year).as_str()),
    ))
}

/// Earliest and latest theft date, or `None` for no vehicles.
pub fn date_range(vehicles: &[StolenVehicle]) -> Option<DateRange> {
    let earliest = vehicles.iter().map(|v| v.date_stolen).min()?;
    let latest = vehicles.iter().map(|v| v.date_stolen).max()?;
    Some(DateRange { earliest, latest })
}
