use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::schedule::{InstallmentRecord, InstallmentStatus, ScheduleConfig};
use crate::store::Entity;

/// The parent record every stored installment points back to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    #[serde(default)]
    pub id: String,
    pub share_id: String,
    pub created_on: NaiveDate,
    pub config: ScheduleConfig,
}

impl Entity for Schedule {
    const COLLECTION: &'static str = "schedules";
    const ID_PREFIX: &'static str = "SCHED";

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }
}

/// A generated installment once it has been saved
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Installment {
    #[serde(default)]
    pub id: String,
    pub schedule_id: String,
    pub share_id: String,
    pub sequence_number: u32,
    pub due_date: NaiveDate,
    pub gross_amount: Decimal,
    pub reserve_fund_amount: Decimal,
    pub common_fund_amount: Decimal,
    pub admin_fee_amount: Decimal,
    pub status: InstallmentStatus,
    #[serde(default)]
    pub paid_on: Option<NaiveDate>,
}

impl Installment {
    pub fn from_record(record: InstallmentRecord, schedule_id: &str, share_id: &str) -> Self {
        Self {
            id: String::new(),
            schedule_id: schedule_id.to_string(),
            share_id: share_id.to_string(),
            sequence_number: record.sequence_number,
            due_date: record.due_date,
            gross_amount: record.gross_amount,
            reserve_fund_amount: record.reserve_fund_amount,
            common_fund_amount: record.common_fund_amount,
            admin_fee_amount: record.admin_fee_amount,
            status: record.status,
            paid_on: None,
        }
    }

    pub fn to_record(&self) -> InstallmentRecord {
        InstallmentRecord {
            sequence_number: self.sequence_number,
            due_date: self.due_date,
            gross_amount: self.gross_amount,
            reserve_fund_amount: self.reserve_fund_amount,
            common_fund_amount: self.common_fund_amount,
            admin_fee_amount: self.admin_fee_amount,
            status: self.status,
        }
    }

    /// Stored status, with pending installments past their due date shown as overdue
    pub fn effective_status(&self, today: NaiveDate) -> InstallmentStatus {
        match self.status {
            InstallmentStatus::Pending if self.due_date < today => InstallmentStatus::Overdue,
            status => status,
        }
    }
}

impl Entity for Installment {
    const COLLECTION: &'static str = "installments";
    const ID_PREFIX: &'static str = "INST";

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }
}
