use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::store::Entity;

/// A participant slot in a consortium group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Share {
    #[serde(default)]
    pub id: String,
    pub group: String,
    pub number: String,
    pub holder: Holder,
    #[serde(default)]
    pub credit_value: Option<Decimal>,
    pub created_on: NaiveDate,
}

/// Who holds a share: a client, or the company itself as an investment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Holder {
    Client { name: String },
    Company,
}

impl std::fmt::Display for Holder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Holder::Client { name } => write!(f, "{name}"),
            Holder::Company => write!(f, "company (investment)"),
        }
    }
}

impl Entity for Share {
    const COLLECTION: &'static str = "shares";
    const ID_PREFIX: &'static str = "SHARE";

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }
}
