//! Aggregate statistics over a cleaned batch.
//!
//! Every function here is a pure function of its inputs: running it twice
//! on the same records yields the same rows in the same order. Joins use
//! inner-join semantics, so vehicles with an unknown make or location are
//! silently left out of any statistic that needs that reference.

pub mod aggregate;
pub mod export;
pub mod segment;
pub mod trend;
pub mod types;
pub mod utility;
