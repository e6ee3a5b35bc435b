pub mod compare;
pub mod config;
pub mod error;
pub mod ledger;
pub mod schedule;
pub mod store;
pub mod telemetry;

pub use compare::{compare, ComparisonResult, Metric, UnitComparison, UnitMetrics};
pub use config::{ComparableUnit, Config};
pub use error::{CondoError, Result};
pub use ledger::{Holder, Installment, Schedule, Share};
pub use schedule::{generate, DayOverflow, InstallmentRecord, InstallmentStatus, ScheduleConfig};
pub use store::{Entity, EntityStore, TomlStore};
