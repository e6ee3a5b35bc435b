use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use super::InstallmentRecord;

/// Totals over a generated schedule, for the preview printed before saving
#[derive(Debug, Serialize, PartialEq)]
pub struct ScheduleSummary {
    pub installments: usize,
    pub gross_total: Decimal,
    pub reserve_fund_total: Decimal,
    pub common_fund_total: Decimal,
    pub admin_fee_total: Decimal,
    pub first_due: Option<NaiveDate>,
    pub last_due: Option<NaiveDate>,
}

impl ScheduleSummary {
    pub fn from_records(records: &[InstallmentRecord]) -> Self {
        Self {
            installments: records.len(),
            gross_total: records.iter().map(|r| r.gross_amount).sum(),
            reserve_fund_total: records.iter().map(|r| r.reserve_fund_amount).sum(),
            common_fund_total: records.iter().map(|r| r.common_fund_amount).sum(),
            admin_fee_total: records.iter().map(|r| r.admin_fee_amount).sum(),
            first_due: records.first().map(|r| r.due_date),
            last_due: records.last().map(|r| r.due_date),
        }
    }

    pub fn charges_total(&self) -> Decimal {
        self.reserve_fund_total + self.common_fund_total + self.admin_fee_total
    }
}
