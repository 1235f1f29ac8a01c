use serde::Deserialize;
use std::collections::HashMap;

use crate::error::Result;

/// Malformed `date_stolen` literals seen in the source extracts.
static DEFAULT_DATE_REPAIRS: &[(&str, &str)] = &[
    ("2021/15/10", "2021-10-15"),
    ("13-02-2022", "2022-02-13"),
];

static DEFAULT_DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];

/// Cleaning rules for a batch run.
///
/// Stored as a JSON object on disk, every key optional:
/// ```json
/// {
///   "date_repairs": { "2021/31/12": "2021-12-31" },
///   "date_formats": ["%Y-%m-%d", "%d.%m.%Y"]
/// }
/// ```
/// `date_repairs` from the file are merged over the built-in table;
/// `date_formats` replaces the default list when present.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    date_repairs: HashMap<String, String>,
    date_formats: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    date_repairs: HashMap<String, String>,
    date_formats: Option<Vec<String>>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            date_repairs: DEFAULT_DATE_REPAIRS
                .iter()
                .map(|(bad, good)| (bad.to_string(), good.to_string()))
                .collect(),
            date_formats: DEFAULT_DATE_FORMATS.iter().map(|f| f.to_string()).collect(),
        }
    }
}

impl PipelineConfig {
    /// Loads the config from a JSON file at `path`.
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self> {
        let file: ConfigFile = serde_json::from_str(content)?;
        let mut config = Self::default();
        config.date_repairs.extend(file.date_repairs);
        if let Some(formats) = file.date_formats {
            config.date_formats = formats;
        }
        Ok(config)
    }

    /// Returns the corrected ISO date for a known malformed literal.
    pub fn repair(&self, literal: &str) -> Option<&str> {
        self.date_repairs.get(literal).map(String::as_str)
    }

    pub fn date_formats(&self) -> impl Iterator<Item = &str> {
        self.date_formats.iter().map(String::as_str)
    }
}
