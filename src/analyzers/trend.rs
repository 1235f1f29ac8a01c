//! Month-over-month theft trend per location.
//!
//! Months are calendar month numbers only: thefts from December 2021 and
//! December 2022 land in the same bucket, and December is compared with
//! whichever later month number is next observed, never with the January
//! that follows it.

use chrono::Datelike;
use std::collections::BTreeMap;
use tracing::debug;

use crate::analyzers::types::MonthlyTrendRecord;
use crate::model::{Location, StolenVehicle, locations_by_id};

/// Theft counts per `(location, month)`, ordered by location then month,
/// each carrying the count of the next observed month of that location.
pub fn monthly_theft_counts(
    vehicles: &[StolenVehicle],
    locations: &[Location],
) -> Vec<MonthlyTrendRecord> {
    let index = locations_by_id(locations);

    let mut counts: BTreeMap<(i64, u32), usize> = BTreeMap::new();
    for vehicle in vehicles {
        let Some(location_id) = vehicle.location_id else {
            continue;
        };
        if !index.contains_key(&location_id) {
            continue;
        }
        *counts
            .entry((location_id, vehicle.date_stolen.month()))
            .or_insert(0) += 1;
    }

    let mut rows = Vec::with_capacity(counts.len());
    let mut iter = counts.into_iter().peekable();
    while let Some(((location_id, month), theft_count)) = iter.next() {
        let next_month_count = iter
            .peek()
            .filter(|((next_location, _), _)| *next_location == location_id)
            .map(|(_, count)| *count);

        rows.push(MonthlyTrendRecord {
            location_id,
            region: index[&location_id].region.clone(),
            month,
            theft_count,
            next_month_count,
        });
    }

    rows
}

/// The `(location, month)` rows whose theft count rises into the next
/// observed month.
#[tracing::instrument(skip_all, fields(vehicles = vehicles.len()))]
pub fn rising_trends(vehicles: &[StolenVehicle], locations: &[Location]) -> Vec<MonthlyTrendRecord> {
    let rising: Vec<_> = monthly_theft_counts(vehicles, locations)
        .into_iter()
        .filter(|row| matches!(row.next_month_count, Some(next) if row.theft_count < next))
        .collect();

    debug!(rows = rising.len(), "Rising trends detected");
    rising
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn location(location_id: i64, region: &str) -> Location {
        Location {
            location_id,
            region: region.to_string(),
            country: "X".to_string(),
            population: 1000,
            density: 1.0,
        }
    }

    fn thefts(location_id: i64, year: i32, month: u32, n: usize) -> Vec<StolenVehicle> {
        (0..n)
            .map(|i| StolenVehicle {
                vehicle_id: i as i64,
                vehicle_type: None,
                make_id: None,
                model_year: None,
                color: None,
                date_stolen: NaiveDate::from_ymd_opt(year, month, 1 + (i % 28) as u32).unwrap(),
                location_id: Some(location_id),
            })
            .collect()
    }

    #[test]
    fn test_rising_month_is_flagged() {
        let mut vehicles = thefts(5, 2022, 1, 5);
        vehicles.extend(thefts(5, 2022, 2, 10));
        vehicles.extend(thefts(5, 2022, 3, 3));
        let locations = vec![location(5, "North")];

        let rising = rising_trends(&vehicles, &locations);
        assert_eq!(
            rising,
            vec![MonthlyTrendRecord {
                location_id: 5,
                region: "North".to_string(),
                month: 1,
                theft_count: 5,
                next_month_count: Some(10),
            }]
        );
    }

    #[test]
    fn test_last_month_has_no_successor() {
        let mut vehicles = thefts(5, 2022, 1, 5);
        vehicles.extend(thefts(5, 2022, 2, 10));
        vehicles.extend(thefts(5, 2022, 3, 3));
        let locations = vec![location(5, "North")];

        let rows = monthly_theft_counts(&vehicles, &locations);
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[1].next_month_count, Some(3));
        assert_eq!(rows[2].month, 3);
        assert_eq!(rows[2].next_month_count, None);
    }

    #[test]
    fn test_successor_skips_missing_months() {
        let mut vehicles = thefts(5, 2022, 2, 1);
        vehicles.extend(thefts(5, 2022, 7, 4));
        let locations = vec![location(5, "North")];

        let rising = rising_trends(&vehicles, &locations);
        assert_eq!(rising.len(), 1);
        assert_eq!(rising[0].month, 2);
        assert_eq!(rising[0].next_month_count, Some(4));
    }

    #[test]
    fn test_successor_does_not_cross_locations() {
        let mut vehicles = thefts(5, 2022, 12, 1);
        vehicles.extend(thefts(6, 2022, 1, 9));
        let locations = vec![location(5, "North"), location(6, "South")];

        let rows = monthly_theft_counts(&vehicles, &locations);
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|r| r.next_month_count.is_none()));
        assert!(rising_trends(&vehicles, &locations).is_empty());
    }

    #[test]
    fn test_months_merge_across_years() {
        let mut vehicles = thefts(5, 2021, 12, 2);
        vehicles.extend(thefts(5, 2022, 1, 1));
        vehicles.extend(thefts(5, 2022, 12, 2));
        let locations = vec![location(5, "North")];

        let rows = monthly_theft_counts(&vehicles, &locations);
        assert_eq!(rows.len(), 2);
        assert_eq!((rows[0].month, rows[0].theft_count), (1, 1));
        assert_eq!((rows[1].month, rows[1].theft_count), (12, 4));
        assert_eq!(rows[0].next_month_count, Some(4));
    }

    #[test]
    fn test_orphaned_locations_are_ignored() {
        let vehicles = thefts(99, 2022, 1, 3);
        assert!(monthly_theft_counts(&vehicles, &[location(5, "North")]).is_empty());
    }

    #[test]
    fn test_output_ordered_by_location_then_month() {
        let mut vehicles = thefts(6, 2022, 3, 1);
        vehicles.extend(thefts(6, 2022, 4, 2));
        vehicles.extend(thefts(5, 2022, 5, 1));
        vehicles.extend(thefts(5, 2022, 1, 1));
        vehicles.extend(thefts(5, 2022, 2, 2));
        let locations = vec![location(5, "North"), location(6, "South")];

        let keys: Vec<_> = rising_trends(&vehicles, &locations)
            .into_iter()
            .map(|r| (r.location_id, r.month))
            .collect();
        assert_eq!(keys, vec![(5, 1), (6, 3)]);
    }
}
