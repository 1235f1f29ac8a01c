pub mod analyzers;
pub mod audit;
pub mod cleaner;
pub mod config;
pub mod error;
pub mod loader;
pub mod model;
pub mod output;
pub mod pipeline;

pub use error::{EtlError, Result};
