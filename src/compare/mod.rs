mod export;
mod metrics;
mod scorer;

pub use export::write_csv;
pub use metrics::{Features, UnitMetrics};
pub use scorer::{compare, ComparisonResult, Metric, UnitComparison, MAX_UNITS, MIN_UNITS};
