mod generator;
mod summary;

pub use generator::{
    generate, period_date, DayOverflow, InstallmentRecord, InstallmentStatus, ScheduleConfig,
    MAX_INSTALLMENTS,
};
pub use summary::ScheduleSummary;
