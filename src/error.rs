//! Error types for the batch pipeline.
//!
//! Every variant is fatal to the batch: nothing downstream of a failed
//! stage is considered valid output.

use thiserror::Error;

use crate::loader::Dataset;

#[derive(Debug, Error)]
pub enum EtlError {
    #[error("{dataset} line {line}: expected {expected} fields, found {found}")]
    MalformedInput {
        dataset: Dataset,
        line: u64,
        expected: usize,
        found: usize,
    },

    #[error("stolen_vehicles line {line}: vehicle {vehicle_id} has unparseable date_stolen {value:?}")]
    UnparseableDate {
        vehicle_id: String,
        line: u64,
        value: String,
    },

    #[error("{dataset} line {line}: cannot coerce {field} value {value:?}")]
    TypeCoercion {
        dataset: Dataset,
        line: u64,
        field: &'static str,
        value: String,
    },

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T, E = EtlError> = std::result::Result<T, E>;
