use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::schedule::DayOverflow;

#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    pub company: Company,
    #[serde(default)]
    pub currency: CurrencySettings,
    #[serde(default)]
    pub schedule: ScheduleDefaults,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Company {
    pub name: String,
    #[serde(default)]
    pub tax_id: Option<String>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct CurrencySettings {
    pub symbol: String,
}

impl Default for CurrencySettings {
    fn default() -> Self {
        Self {
            symbol: "R$".to_string(),
        }
    }
}

/// Values used by `condo schedule` when a flag is not given.
#[derive(Debug, Deserialize, Serialize)]
pub struct ScheduleDefaults {
    pub due_day: u32,
    pub reserve_fund_pct: Decimal,
    pub common_fund_pct: Decimal,
    pub admin_fee_pct: Decimal,
    #[serde(default)]
    pub day_overflow: DayOverflow,
}

impl Default for ScheduleDefaults {
    fn default() -> Self {
        Self {
            due_day: 10,
            reserve_fund_pct: Decimal::ZERO,
            common_fund_pct: Decimal::ZERO,
            admin_fee_pct: Decimal::ZERO,
            day_overflow: DayOverflow::default(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct LoggingSettings {
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}
