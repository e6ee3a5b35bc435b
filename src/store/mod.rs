//! Record persistence behind a small CRUD contract.
//!
//! The calculation code never talks to a store; only the ledger workflows and
//! the CLI do.

mod toml_store;

pub use toml_store::TomlStore;

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::cmp::Ordering;

use crate::error::{CondoError, Result};

/// A record kept in a named collection
pub trait Entity: Serialize + DeserializeOwned + Clone {
    const COLLECTION: &'static str;
    /// Prefix of generated ids, e.g. `INST` gives `INST-0001`
    const ID_PREFIX: &'static str;

    fn id(&self) -> &str;
    fn set_id(&mut self, id: String);
}

pub trait EntityStore {
    fn list<E: Entity>(&self) -> Result<Vec<E>>;

    /// Store a new record under a freshly assigned id
    fn create<E: Entity>(&mut self, record: E) -> Result<E>;

    /// Create every record in one write. Ids are assigned in order.
    fn bulk_create<E: Entity>(&mut self, records: Vec<E>) -> Result<Vec<E>>;

    fn update<E: Entity>(&mut self, id: &str, record: E) -> Result<E>;

    fn delete<E: Entity>(&mut self, id: &str) -> Result<()>;

    fn get<E: Entity>(&self, id: &str) -> Result<E> {
        self.list::<E>()?
            .into_iter()
            .find(|record| record.id() == id)
            .ok_or_else(|| not_found::<E>(id))
    }

    fn filter<E, P>(
        &self,
        predicate: P,
        sort: Option<&dyn Fn(&E, &E) -> Ordering>,
        limit: Option<usize>,
    ) -> Result<Vec<E>>
    where
        E: Entity,
        P: Fn(&E) -> bool,
    {
        let mut records: Vec<E> = self.list::<E>()?.into_iter().filter(|r| predicate(r)).collect();
        if let Some(cmp) = sort {
            records.sort_by(|a, b| cmp(a, b));
        }
        if let Some(n) = limit {
            records.truncate(n);
        }
        Ok(records)
    }
}

pub(crate) fn not_found<E: Entity>(id: &str) -> CondoError {
    CondoError::RecordNotFound {
        collection: E::COLLECTION,
        id: id.to_string(),
    }
}
