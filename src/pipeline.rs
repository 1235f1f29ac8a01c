//! One batch run: load, clean, aggregate, export.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use crate::analyzers::aggregate::{
    date_range, region_profile, stolen_count_by_make_type, theft_count_by_color,
    theft_count_by_day_of_week, theft_count_by_make, theft_count_by_segment,
    vehicle_count_by_type, weekday_vs_weekend,
};
use crate::analyzers::export::summary_table;
use crate::analyzers::trend::rising_trends;
use crate::analyzers::types::{DateRange, GroupCount, MonthlyTrendRecord, RegionProfile, SummaryRow};
use crate::audit::AuditHook;
use crate::cleaner::clean_batch;
use crate::config::PipelineConfig;
use crate::error::Result;
use crate::loader::{InputPaths, load_batch};
use crate::model::Batch;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordCounts {
    pub locations: usize,
    pub vehicles: usize,
    pub makes: usize,
}

/// Every aggregate of a batch, written out as `report.json`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchReport {
    pub generated_at: DateTime<Utc>,
    pub records: RecordCounts,
    pub date_range: Option<DateRange>,
    pub by_vehicle_type: Vec<GroupCount>,
    pub by_color: Vec<GroupCount>,
    pub by_make_type: Vec<GroupCount>,
    pub by_make: Vec<GroupCount>,
    pub by_day_type: Vec<GroupCount>,
    pub by_day_of_week: Vec<GroupCount>,
    pub by_age_segment: Vec<GroupCount>,
    pub regions: Vec<RegionProfile>,
    pub rising_trends: Vec<MonthlyTrendRecord>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BatchOutput {
    pub report: BatchReport,
    pub summary: Vec<SummaryRow>,
}

/// Computes all aggregates and the summary table of a cleaned batch.
pub fn analyze(batch: &Batch) -> BatchOutput {
    let Batch {
        locations,
        vehicles,
        makes,
    } = batch;

    let report = BatchReport {
        generated_at: Utc::now(),
        records: RecordCounts {
            locations: locations.len(),
            vehicles: vehicles.len(),
            makes: makes.len(),
        },
        date_range: date_range(vehicles),
        by_vehicle_type: vehicle_count_by_type(vehicles),
        by_color: theft_count_by_color(vehicles),
        by_make_type: stolen_count_by_make_type(vehicles, makes),
        by_make: theft_count_by_make(vehicles, makes),
        by_day_type: weekday_vs_weekend(vehicles),
        by_day_of_week: theft_count_by_day_of_week(vehicles),
        by_age_segment: theft_count_by_segment(vehicles),
        regions: region_profile(vehicles, makes, locations),
        rising_trends: rising_trends(vehicles, locations),
    };

    BatchOutput {
        report,
        summary: summary_table(vehicles, makes, locations),
    }
}

/// Loads and cleans the batch at `paths`. Nothing is returned unless
/// every row of every dataset cleans successfully.
pub fn load_and_clean(
    paths: &InputPaths,
    config: &PipelineConfig,
    hook: &mut dyn AuditHook,
) -> Result<Batch> {
    let raw = load_batch(paths, hook)?;
    clean_batch(&raw, config)
}

/// Runs a full batch over the files at `paths`.
#[tracing::instrument(skip_all)]
pub fn run(
    paths: &InputPaths,
    config: &PipelineConfig,
    hook: &mut dyn AuditHook,
) -> Result<BatchOutput> {
    let batch = load_and_clean(paths, config, hook)?;
    let output = analyze(&batch);

    info!(
        summary_rows = output.summary.len(),
        regions = output.report.regions.len(),
        rising_trends = output.report.rising_trends.len(),
        "Batch analyzed"
    );

    Ok(output)
}
