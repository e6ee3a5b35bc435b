use chrono::{Datelike, Days, Months, NaiveDate};
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{CondoError, Result};

/// Longest schedule accepted: 100 years of monthly installments
pub const MAX_INSTALLMENTS: u32 = 1200;

/// How a day of month that does not exist in the target month is handled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DayOverflow {
    /// Surplus days spill into the following month (January 31 plus one
    /// month lands on March 3, or March 2 in leap years).
    #[default]
    Roll,
    /// The day is pinned to the last day of the target month.
    Clamp,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InstallmentStatus {
    #[default]
    Pending,
    Paid,
    Overdue,
}

impl std::fmt::Display for InstallmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InstallmentStatus::Pending => write!(f, "PENDING"),
            InstallmentStatus::Paid => write!(f, "PAID"),
            InstallmentStatus::Overdue => write!(f, "OVERDUE"),
        }
    }
}

/// Input for [`generate`]. Percentages are plain percents (2.5 means 2.5%).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleConfig {
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    pub installment_count: u32,
    pub due_day_of_month: u32,
    pub gross_amount: Decimal,
    #[serde(default)]
    pub reserve_fund_pct: Decimal,
    #[serde(default)]
    pub common_fund_pct: Decimal,
    #[serde(default)]
    pub admin_fee_pct: Decimal,
    #[serde(default)]
    pub day_overflow: DayOverflow,
}

impl ScheduleConfig {
    /// Check the required fields; nothing is generated when this fails.
    pub fn validate(&self) -> Result<NaiveDate> {
        let start = self.start_date.ok_or(CondoError::MissingField("start_date"))?;

        if self.installment_count == 0 {
            return Err(CondoError::MissingField("installment_count"));
        }
        if self.installment_count > MAX_INSTALLMENTS {
            return Err(CondoError::InvalidField {
                field: "installment_count",
                reason: format!(
                    "{} is more than the maximum of {MAX_INSTALLMENTS}",
                    self.installment_count
                ),
            });
        }
        if self.gross_amount.is_zero() {
            return Err(CondoError::MissingField("gross_amount"));
        }
        if self.gross_amount.is_sign_negative() {
            return Err(CondoError::InvalidField {
                field: "gross_amount",
                reason: "must not be negative".to_string(),
            });
        }
        if !(1..=31).contains(&self.due_day_of_month) {
            return Err(CondoError::InvalidField {
                field: "due_day_of_month",
                reason: format!("{} is not between 1 and 31", self.due_day_of_month),
            });
        }

        for (field, pct) in [
            ("reserve_fund_pct", self.reserve_fund_pct),
            ("common_fund_pct", self.common_fund_pct),
            ("admin_fee_pct", self.admin_fee_pct),
        ] {
            if pct.is_sign_negative() && !pct.is_zero() {
                return Err(CondoError::InvalidField {
                    field,
                    reason: "percentage must not be negative".to_string(),
                });
            }
        }

        Ok(start)
    }
}

/// One scheduled payment of a consortium share
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstallmentRecord {
    pub sequence_number: u32,
    pub due_date: NaiveDate,
    pub gross_amount: Decimal,
    pub reserve_fund_amount: Decimal,
    pub common_fund_amount: Decimal,
    pub admin_fee_amount: Decimal,
    pub status: InstallmentStatus,
}

impl InstallmentRecord {
    /// Sum of the three percentage charges
    pub fn charges(&self) -> Decimal {
        self.reserve_fund_amount + self.common_fund_amount + self.admin_fee_amount
    }
}

/// Build the installment sequence for a schedule.
///
/// Every record carries the same gross amount and the same three charges;
/// only the sequence number and due date change from one period to the next.
pub fn generate(config: &ScheduleConfig) -> Result<Vec<InstallmentRecord>> {
    let start = config.validate()?;

    let reserve_fund_amount = percent_of(config.gross_amount, config.reserve_fund_pct);
    let common_fund_amount = percent_of(config.gross_amount, config.common_fund_pct);
    let admin_fee_amount = percent_of(config.gross_amount, config.admin_fee_pct);

    let mut records = Vec::with_capacity(config.installment_count as usize);
    for offset in 0..config.installment_count {
        let due_date = period_date(start, offset, config.day_overflow)
            .and_then(|period| with_due_day(period, config.due_day_of_month, config.day_overflow))
            .ok_or_else(|| CondoError::InvalidField {
                field: "start_date",
                reason: format!("installment {} falls outside the calendar", offset + 1),
            })?;

        records.push(InstallmentRecord {
            sequence_number: offset + 1,
            due_date,
            gross_amount: config.gross_amount,
            reserve_fund_amount,
            common_fund_amount,
            admin_fee_amount,
            status: InstallmentStatus::Pending,
        });
    }

    debug!(
        count = records.len(),
        gross = %config.gross_amount,
        "generated installment schedule"
    );
    Ok(records)
}

/// `start` moved forward by `offset` calendar months, before the due day is applied.
pub fn period_date(start: NaiveDate, offset: u32, overflow: DayOverflow) -> Option<NaiveDate> {
    match overflow {
        DayOverflow::Clamp => start.checked_add_months(Months::new(offset)),
        DayOverflow::Roll => start
            .with_day(1)?
            .checked_add_months(Months::new(offset))?
            .checked_add_days(Days::new(u64::from(start.day() - 1))),
    }
}

fn with_due_day(period: NaiveDate, due_day: u32, overflow: DayOverflow) -> Option<NaiveDate> {
    let first = period.with_day(1)?;
    match overflow {
        DayOverflow::Roll => first.checked_add_days(Days::new(u64::from(due_day - 1))),
        DayOverflow::Clamp => first.with_day(due_day.min(days_in_month(first)?)),
    }
}

fn days_in_month(first: NaiveDate) -> Option<u32> {
    first
        .checked_add_months(Months::new(1))?
        .pred_opt()
        .map(|last| last.day())
}

// Truncated to the cent so the charges never add up to more than the base.
fn percent_of(amount: Decimal, pct: Decimal) -> Decimal {
    (amount * pct / dec!(100)).round_dp_with_strategy(2, RoundingStrategy::ToZero)
}
