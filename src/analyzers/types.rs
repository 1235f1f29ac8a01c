//! Row types produced by the analyzers.

use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;

use crate::analyzers::segment::AgeSegment;

/// One group of a grouped count, e.g. a colour and how many were stolen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupCount {
    pub key: String,
    pub count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DayType {
    Weekday,
    Weekend,
}

impl fmt::Display for DayType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DayType::Weekday => "Weekday",
            DayType::Weekend => "Weekend",
        })
    }
}

/// Descriptive statistics for one region.
///
/// Averages are taken over joined vehicle rows, so a location contributes
/// once per vehicle stolen there.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionProfile {
    pub region: String,
    pub stolen_count: usize,
    pub unique_makes: usize,
    pub unique_colors: usize,
    pub avg_population: f64,
    pub avg_density: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VehicleSegment {
    pub vehicle_id: i64,
    pub model_year: Option<i32>,
    pub segment: AgeSegment,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub earliest: NaiveDate,
    pub latest: NaiveDate,
}

/// Theft count of one location in one calendar month (year ignored),
/// with the count of the next month observed for that location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyTrendRecord {
    pub location_id: i64,
    pub region: String,
    pub month: u32,
    pub theft_count: usize,
    pub next_month_count: Option<usize>,
}

/// Row of the denormalized table handed to the reporting tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryRow {
    pub region: String,
    pub vehicle_type: Option<String>,
    pub total_thefts: usize,
    pub color_variety: usize,
    pub unique_makes: usize,
}
