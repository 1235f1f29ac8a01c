use serde::Serialize;
use std::fmt;

/// Age bucket of a vehicle by model year.
///
/// | Model year  | Segment           |
/// |-------------|-------------------|
/// | 1940..=1960 | `vintage_model`   |
/// | 1961..=2000 | `oldest_model`    |
/// | 2001..=2017 | `mid_range_model` |
/// | otherwise   | `latest_model`    |
///
/// A missing model year falls into the catch-all bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AgeSegment {
    VintageModel,
    OldestModel,
    MidRangeModel,
    LatestModel,
}

impl AgeSegment {
    pub fn classify(model_year: Option<i32>) -> Self {
        match model_year {
            Some(1940..=1960) => AgeSegment::VintageModel,
            Some(1961..=2000) => AgeSegment::OldestModel,
            Some(2001..=2017) => AgeSegment::MidRangeModel,
            _ => AgeSegment::LatestModel,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AgeSegment::VintageModel => "vintage_model",
            AgeSegment::OldestModel => "oldest_model",
            AgeSegment::MidRangeModel => "mid_range_model",
            AgeSegment::LatestModel => "latest_model",
        }
    }
}

impl fmt::Display for AgeSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
