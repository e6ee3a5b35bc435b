use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::{not_found, Entity, EntityStore};
use crate::error::{CondoError, Result};

/// Keeps each collection in `<dir>/<collection>.toml`
pub struct TomlStore {
    dir: PathBuf,
}

#[derive(Serialize, Deserialize)]
struct CollectionFile<E> {
    next_id: u32,
    #[serde(default = "Vec::new")]
    records: Vec<E>,
}

impl<E> Default for CollectionFile<E> {
    fn default() -> Self {
        Self {
            next_id: 1,
            records: Vec::new(),
        }
    }
}

impl<E: Entity> CollectionFile<E> {
    fn insert(&mut self, mut record: E) -> E {
        record.set_id(format!("{}-{:04}", E::ID_PREFIX, self.next_id));
        self.next_id += 1;
        self.records.push(record.clone());
        record
    }
}

impl TomlStore {
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for<E: Entity>(&self) -> PathBuf {
        self.dir.join(format!("{}.toml", E::COLLECTION))
    }

    fn load<E: Entity>(&self) -> Result<CollectionFile<E>> {
        let path = self.path_for::<E>();
        if !path.exists() {
            return Ok(CollectionFile::default());
        }
        let content = fs::read_to_string(&path)?;
        toml::from_str(&content).map_err(|e| CondoError::StoreParse { path, source: e })
    }

    fn save<E: Entity>(&self, file: &CollectionFile<E>) -> Result<()> {
        let path = self.path_for::<E>();
        let content = toml::to_string_pretty(file)
            .map_err(|e| CondoError::StoreWrite { path: path.clone(), source: e })?;
        fs::write(&path, content)?;
        debug!(collection = E::COLLECTION, records = file.records.len(), "saved collection");
        Ok(())
    }
}

impl EntityStore for TomlStore {
    fn list<E: Entity>(&self) -> Result<Vec<E>> {
        Ok(self.load::<E>()?.records)
    }

    fn create<E: Entity>(&mut self, record: E) -> Result<E> {
        let mut file = self.load::<E>()?;
        let created = file.insert(record);
        self.save(&file)?;
        info!(collection = E::COLLECTION, id = %created.id(), "created record");
        Ok(created)
    }

    fn bulk_create<E: Entity>(&mut self, records: Vec<E>) -> Result<Vec<E>> {
        let mut file = self.load::<E>()?;
        let created: Vec<E> = records.into_iter().map(|r| file.insert(r)).collect();

        self.save(&file)?;
        info!(collection = E::COLLECTION, count = created.len(), "created records");
        Ok(created)
    }

    fn update<E: Entity>(&mut self, id: &str, mut record: E) -> Result<E> {
        let mut file = self.load::<E>()?;
        let slot = file
            .records
            .iter_mut()
            .find(|r| r.id() == id)
            .ok_or_else(|| not_found::<E>(id))?;

        record.set_id(id.to_string());
        *slot = record.clone();
        self.save(&file)?;
        Ok(record)
    }

    fn delete<E: Entity>(&mut self, id: &str) -> Result<()> {
        let mut file = self.load::<E>()?;
        let before = file.records.len();
        file.records.retain(|r| r.id() != id);
        if file.records.len() == before {
            return Err(not_found::<E>(id));
        }
        self.save(&file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Note {
        #[serde(default)]
        id: String,
        text: String,
        rank: u32,
    }

    impl Entity for Note {
        const COLLECTION: &'static str = "notes";
        const ID_PREFIX: &'static str = "NOTE";

        fn id(&self) -> &str {
            &self.id
        }

        fn set_id(&mut self, id: String) {
            self.id = id;
        }
    }

    fn note(text: &str, rank: u32) -> Note {
        Note {
            id: String::new(),
            text: text.to_string(),
            rank,
        }
    }

    #[test]
    fn assigns_sequential_ids() {
        let dir = TempDir::new().unwrap();
        let mut store = TomlStore::open(dir.path()).unwrap();

        let created = store
            .bulk_create(vec![note("a", 1), note("b", 2)])
            .unwrap();
        assert_eq!(created[0].id, "NOTE-0001");
        assert_eq!(created[1].id, "NOTE-0002");

        let third = store.create(note("c", 3)).unwrap();
        assert_eq!(third.id, "NOTE-0003");
        assert_eq!(store.list::<Note>().unwrap().len(), 3);
        assert!(dir.path().join("notes.toml").exists());
    }

    #[test]
    fn ids_are_not_reused_after_delete() {
        let dir = TempDir::new().unwrap();
        let mut store = TomlStore::open(dir.path()).unwrap();

        let first = store.create(note("a", 1)).unwrap();
        store.delete::<Note>(&first.id).unwrap();
        let second = store.create(note("b", 1)).unwrap();
        assert_eq!(second.id, "NOTE-0002");
    }

    #[test]
    fn get_update_and_delete() {
        let dir = TempDir::new().unwrap();
        let mut store = TomlStore::open(dir.path()).unwrap();
        let created = store.create(note("draft", 1)).unwrap();

        let updated = store
            .update(&created.id, note("final", 9))
            .unwrap();
        assert_eq!(updated.id, created.id);

        let fetched: Note = store.get(&created.id).unwrap();
        assert_eq!(fetched.text, "final");
        assert_eq!(fetched.rank, 9);

        store.delete::<Note>(&created.id).unwrap();
        assert!(matches!(
            store.get::<Note>(&created.id),
            Err(CondoError::RecordNotFound { collection: "notes", .. })
        ));
        assert!(store.delete::<Note>(&created.id).is_err());
        assert!(store.update("NOTE-0999", note("x", 0)).is_err());
    }

    #[test]
    fn filter_sorts_and_limits() {
        let dir = TempDir::new().unwrap();
        let mut store = TomlStore::open(dir.path()).unwrap();
        store
            .bulk_create(vec![note("a", 3), note("b", 1), note("c", 2), note("d", 7)])
            .unwrap();

        let by_rank = |a: &Note, b: &Note| a.rank.cmp(&b.rank);
        let low = store
            .filter::<Note, _>(|n| n.rank < 5, Some(&by_rank), Some(2))
            .unwrap();
        let texts: Vec<_> = low.iter().map(|n| n.text.as_str()).collect();
        assert_eq!(texts, vec!["b", "c"]);
    }

    #[test]
    fn empty_collection_lists_nothing() {
        let dir = TempDir::new().unwrap();
        let store = TomlStore::open(dir.path()).unwrap();
        assert!(store.list::<Note>().unwrap().is_empty());
    }

    #[test]
    fn create_reports_store_errors_as_they_are() {
        let dir = TempDir::new().unwrap();
        let mut store = TomlStore::open(dir.path()).unwrap();
        fs::write(dir.path().join("notes.toml"), "next_id = [").unwrap();

        assert!(matches!(
            store.create(note("a", 1)),
            Err(CondoError::StoreParse { .. })
        ));
    }
}
