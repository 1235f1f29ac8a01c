use std::collections::{BTreeMap, HashSet};

use crate::analyzers::types::SummaryRow;
use crate::model::{Location, StolenVehicle, VehicleMake, vehicle_profiles};

/// Builds the `(region, vehicle_type)` summary table consumed by the
/// reporting dashboard.
///
/// Vehicles without a type form their own `None` group. Rows are ordered
/// by region, then by theft count descending.
pub fn summary_table(
    vehicles: &[StolenVehicle],
    makes: &[VehicleMake],
    locations: &[Location],
) -> Vec<SummaryRow> {
    #[derive(Default)]
    struct Acc<'a> {
        thefts: usize,
        colors: HashSet<&'a str>,
        makes: HashSet<&'a str>,
    }

    let mut groups: BTreeMap<(&str, Option<&str>), Acc> = BTreeMap::new();
    for profile in vehicle_profiles(vehicles, makes, locations) {
        let acc = groups
            .entry((
                profile.location.region.as_str(),
                profile.vehicle.vehicle_type.as_deref(),
            ))
            .or_default();
        acc.thefts += 1;
        if let Some(color) = profile.vehicle.color.as_deref() {
            acc.colors.insert(color);
        }
        acc.makes.insert(profile.make.make_name.as_str());
    }

    let mut rows: Vec<SummaryRow> = groups
        .into_iter()
        .map(|((region, vehicle_type), acc)| SummaryRow {
            region: region.to_string(),
            vehicle_type: vehicle_type.map(str::to_string),
            total_thefts: acc.thefts,
            color_variety: acc.colors.len(),
            unique_makes: acc.makes.len(),
        })
        .collect();

    // stable: ties keep vehicle_type order from the BTreeMap
    rows.sort_by(|a, b| {
        a.region
            .cmp(&b.region)
            .then_with(|| b.total_thefts.cmp(&a.total_thefts))
    });
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn vehicle(vehicle_type: Option<&str>, make_id: i64, color: &str, location_id: i64) -> StolenVehicle {
        StolenVehicle {
            vehicle_id: 1,
            vehicle_type: vehicle_type.map(str::to_string),
            make_id: Some(make_id),
            model_year: Some(2012),
            color: Some(color.to_string()),
            date_stolen: NaiveDate::from_ymd_opt(2022, 1, 1).unwrap(),
            location_id: Some(location_id),
        }
    }

    fn inputs() -> (Vec<StolenVehicle>, Vec<VehicleMake>, Vec<Location>) {
        let vehicles = vec![
            vehicle(Some("Saloon"), 10, "Silver", 5),
            vehicle(Some("Saloon"), 11, "Black", 5),
            vehicle(Some("Saloon"), 10, "Silver", 5),
            vehicle(Some("Trailer"), 10, "Silver", 5),
            vehicle(Some("Trailer"), 10, "Red", 5),
            vehicle(Some("Trailer"), 10, "Red", 5),
            vehicle(None, 10, "Red", 6),
            vehicle(Some("Saloon"), 10, "Red", 99),
        ];
        let makes = vec![
            VehicleMake {
                make_id: 10,
                make_name: "Toyota".to_string(),
                make_type: "Standard".to_string(),
            },
            VehicleMake {
                make_id: 11,
                make_name: "BMW".to_string(),
                make_type: "Luxury".to_string(),
            },
        ];
        let locations = [(5, "North"), (6, "Auckland")]
            .into_iter()
            .map(|(location_id, region)| Location {
                location_id,
                region: region.to_string(),
                country: "X".to_string(),
                population: 1000,
                density: 1.0,
            })
            .collect();
        (vehicles, makes, locations)
    }

    #[test]
    fn test_summary_groups_by_region_and_type() {
        let (vehicles, makes, locations) = inputs();
        let rows = summary_table(&vehicles, &makes, &locations);

        assert_eq!(
            rows,
            vec![
                SummaryRow {
                    region: "Auckland".to_string(),
                    vehicle_type: None,
                    total_thefts: 1,
                    color_variety: 1,
                    unique_makes: 1,
                },
                SummaryRow {
                    region: "North".to_string(),
                    vehicle_type: Some("Saloon".to_string()),
                    total_thefts: 3,
                    color_variety: 2,
                    unique_makes: 2,
                },
                SummaryRow {
                    region: "North".to_string(),
                    vehicle_type: Some("Trailer".to_string()),
                    total_thefts: 3,
                    color_variety: 2,
                    unique_makes: 1,
                },
            ]
        );
    }

    #[test]
    fn test_summary_is_recomputable() {
        let (vehicles, makes, locations) = inputs();
        assert_eq!(
            summary_table(&vehicles, &makes, &locations),
            summary_table(&vehicles, &makes, &locations)
        );
    }

    #[test]
    fn test_summary_empty() {
        assert!(summary_table(&[], &[], &[]).is_empty());
    }
}
