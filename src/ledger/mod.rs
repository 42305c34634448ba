//! Read-side aggregation over posted journal lines

pub mod aggregator;
pub mod reports;

pub use aggregator::*;
pub use reports::*;
