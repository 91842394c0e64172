// src/analysis/mod.rs
pub mod comparison;
pub mod query;
pub mod trends;

pub use query::{Filters, SearchOutcome};
pub use trends::{TrendKey, TrendLevel, TrendSelection, TrendView};
