use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::{debug, info, warn};

use super::domain::{DayKey, DayRecord, JournalStore, SectionId, SectionResult};

/// Single named slot holding the serialized journal.
pub trait StorageBackend: Send + Sync {
    /// Returns the persisted blob, or `None` if nothing has been written yet.
    fn read(&self) -> Result<Option<String>, StoreError>;
    fn write(&self, blob: &str) -> Result<(), StoreError>;
}

/// Failures while persisting the journal.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("storage io failure at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("unable to serialize journal: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Stores the journal as `<key>.json` inside a data directory.
#[derive(Debug, Clone)]
pub struct FileBackend {
    path: PathBuf,
}

impl FileBackend {
    pub fn new(data_dir: impl AsRef<Path>, key: &str) -> Self {
        Self {
            path: data_dir.as_ref().join(format!("{key}.json")),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl StorageBackend for FileBackend {
    fn read(&self) -> Result<Option<String>, StoreError> {
        match fs::read_to_string(&self.path) {
            Ok(blob) => Ok(Some(blob)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(self.io_error(err)),
        }
    }

    fn write(&self, blob: &str) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|err| self.io_error(err))?;
        }

        let staging = self.path.with_extension("json.tmp");
        fs::write(&staging, blob).map_err(|err| self.io_error(err))?;
        fs::rename(&staging, &self.path).map_err(|err| self.io_error(err))
    }
}

/// Keeps the journal in memory; used for demos and tests.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    slot: Mutex<Option<String>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts with an existing blob, valid or not.
    pub fn with_blob(blob: impl Into<String>) -> Self {
        Self {
            slot: Mutex::new(Some(blob.into())),
        }
    }

    pub fn blob(&self) -> Option<String> {
        self.slot.lock().ok().and_then(|slot| slot.clone())
    }
}

impl StorageBackend for MemoryBackend {
    fn read(&self) -> Result<Option<String>, StoreError> {
        let slot = self
            .slot
            .lock()
            .map_err(|_| StoreError::Unavailable("memory slot poisoned".to_string()))?;
        Ok(slot.clone())
    }

    fn write(&self, blob: &str) -> Result<(), StoreError> {
        let mut slot = self
            .slot
            .lock()
            .map_err(|_| StoreError::Unavailable("memory slot poisoned".to_string()))?;
        *slot = Some(blob.to_string());
        Ok(())
    }
}

/// Day-keyed persistence with merge-on-write semantics.
///
/// Saves are read-modify-write over the whole journal. The write guard
/// serializes them within this process only.
#[derive(Debug)]
pub struct DayRecordStore<B> {
    backend: B,
    write_guard: Mutex<()>,
}

impl<B: StorageBackend> DayRecordStore<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            write_guard: Mutex::new(()),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Reads the whole journal; missing, unreadable, or malformed data yields an empty one.
    pub fn load(&self) -> JournalStore {
        match self.try_load() {
            Ok(store) => store,
            Err(err) => {
                warn!(error = %err, "journal unreadable; starting empty");
                JournalStore::default()
            }
        }
    }

    /// Like [`load`](Self::load), but a failing backend is an error.
    ///
    /// Malformed data still yields an empty journal.
    pub fn try_load(&self) -> Result<JournalStore, StoreError> {
        let Some(blob) = self.backend.read()? else {
            return Ok(JournalStore::default());
        };

        match serde_json::from_str(&blob) {
            Ok(store) => Ok(store),
            Err(err) => {
                warn!(error = %err, "persisted journal is malformed; starting empty");
                Ok(JournalStore::default())
            }
        }
    }

    /// Sets one section's result for `day`, leaving every other entry untouched.
    ///
    /// Fails without writing when the backend cannot be read.
    pub fn save(
        &self,
        day: DayKey,
        section: &SectionId,
        result: SectionResult,
    ) -> Result<(), StoreError> {
        let _guard = self
            .write_guard
            .lock()
            .map_err(|_| StoreError::Unavailable("write guard poisoned".to_string()))?;

        let mut store = self.try_load()?;
        let record = store.day_mut(day);
        if record.get(section) == Some(&result) {
            debug!(%day, %section, "section unchanged; skipping write");
            return Ok(());
        }
        record.insert(section.clone(), result);

        let blob = serde_json::to_string(&store)?;
        self.backend.write(&blob)?;

        info!(%day, %section, "section saved");
        Ok(())
    }

    pub fn get_day(&self, day: DayKey) -> DayRecord {
        self.load().day(day).cloned().unwrap_or_default()
    }

    /// Days with at least one saved section, oldest first.
    pub fn recorded_days(&self) -> Vec<DayKey> {
        self.load()
            .days()
            .filter(|(_, record)| !record.is_empty())
            .map(|(day, _)| *day)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::journal::domain::{OrderedMap, ScoreResult, SubgroupName};
    use std::sync::atomic::{AtomicBool, Ordering};

    /// Memory slot whose reads can be made to fail.
    #[derive(Default)]
    struct FlakyBackend {
        inner: MemoryBackend,
        fail_reads: AtomicBool,
    }

    impl StorageBackend for FlakyBackend {
        fn read(&self) -> Result<Option<String>, StoreError> {
            if self.fail_reads.load(Ordering::SeqCst) {
                return Err(StoreError::Unavailable("disk offline".to_string()));
            }
            self.inner.read()
        }

        fn write(&self, blob: &str) -> Result<(), StoreError> {
            self.inner.write(blob)
        }
    }

    fn day(raw: &str) -> DayKey {
        raw.parse().expect("valid day key")
    }

    fn scored(score: u32, max_score: u32) -> SectionResult {
        SectionResult::Scored(ScoreResult::new(score, max_score))
    }

    #[test]
    fn load_returns_empty_store_when_nothing_persisted() {
        let store = DayRecordStore::new(MemoryBackend::new());
        assert!(store.load().is_empty());
    }

    #[test]
    fn corrupted_blob_loads_as_empty_store() {
        let store = DayRecordStore::new(MemoryBackend::with_blob("{not json"));
        assert!(store.load().is_empty());
        assert!(store.get_day(day("2025-04-01")).is_empty());
    }

    #[test]
    fn saving_sections_merges_into_the_same_day() {
        let store = DayRecordStore::new(MemoryBackend::new());
        let today = day("2025-04-01");

        store
            .save(today, &SectionId::from("discipline"), scored(3, 4))
            .expect("discipline saved");
        store
            .save(today, &SectionId::from("reflection"), scored(1, 2))
            .expect("reflection saved");

        let record = store.get_day(today);
        assert_eq!(record.len(), 2);
        assert_eq!(record.get("discipline"), Some(&scored(3, 4)));
        assert_eq!(record.get("reflection"), Some(&scored(1, 2)));
    }

    #[test]
    fn saving_one_day_leaves_other_days_alone() {
        let store = DayRecordStore::new(MemoryBackend::new());
        let yesterday = day("2025-03-31");
        let today = day("2025-04-01");

        store
            .save(yesterday, &SectionId::from("wisdom"), scored(2, 2))
            .expect("saved");
        store
            .save(today, &SectionId::from("wisdom"), scored(0, 2))
            .expect("saved");

        assert_eq!(store.get_day(yesterday).get("wisdom"), Some(&scored(2, 2)));
        assert_eq!(store.recorded_days(), vec![yesterday, today]);
    }

    #[test]
    fn overwriting_a_section_replaces_only_that_section() {
        let store = DayRecordStore::new(MemoryBackend::new());
        let today = day("2025-04-01");
        store
            .save(today, &SectionId::from("wisdom"), scored(1, 2))
            .expect("saved");
        store
            .save(today, &SectionId::from("offday"), scored(0, 1))
            .expect("saved");
        store
            .save(today, &SectionId::from("wisdom"), scored(2, 2))
            .expect("saved");

        let record = store.get_day(today);
        assert_eq!(record.get("wisdom"), Some(&scored(2, 2)));
        assert_eq!(record.get("offday"), Some(&scored(0, 1)));
    }

    #[test]
    fn repeated_save_is_idempotent() {
        let store = DayRecordStore::new(MemoryBackend::new());
        let today = day("2025-04-01");
        let groups: OrderedMap<SubgroupName, ScoreResult> = [
            (SubgroupName::from("king"), ScoreResult::new(2, 2)),
            (SubgroupName::from("warrior"), ScoreResult::new(0, 2)),
        ]
        .into_iter()
        .collect();
        let result = SectionResult::Subgroups(groups);

        store
            .save(today, &SectionId::from("archetype"), result.clone())
            .expect("first save");
        let first = store.backend().blob();
        store
            .save(today, &SectionId::from("archetype"), result)
            .expect("second save");

        assert_eq!(store.backend().blob(), first);
    }

    #[test]
    fn persisted_blob_uses_day_then_section_keys() {
        let store = DayRecordStore::new(MemoryBackend::new());
        store
            .save(day("2025-04-01"), &SectionId::from("ratings"), scored(18, 25))
            .expect("saved");

        let blob = store.backend().blob().expect("blob written");
        let value: serde_json::Value = serde_json::from_str(&blob).expect("valid json");
        assert_eq!(value["2025-04-01"]["ratings"]["score"], 18);
        assert_eq!(value["2025-04-01"]["ratings"]["maxScore"], 25);
        assert_eq!(value["2025-04-01"]["ratings"]["percentage"], 72);
    }

    #[test]
    fn save_after_corruption_starts_a_fresh_journal() {
        let store = DayRecordStore::new(MemoryBackend::with_blob("]]"));
        let today = day("2025-04-01");
        store
            .save(today, &SectionId::from("offday"), scored(1, 1))
            .expect("saved");
        assert_eq!(store.get_day(today).len(), 1);
    }

    #[test]
    fn save_refuses_to_overwrite_when_the_journal_cannot_be_read() {
        let store = DayRecordStore::new(FlakyBackend::default());
        let first = day("2025-01-01");
        store
            .save(first, &SectionId::from("wisdom"), scored(2, 2))
            .expect("saved");
        let before = store.backend().inner.blob();

        store.backend().fail_reads.store(true, Ordering::SeqCst);
        let result = store.save(day("2025-01-02"), &SectionId::from("offday"), scored(1, 1));
        assert!(matches!(result, Err(StoreError::Unavailable(_))));
        assert!(store.load().is_empty());

        store.backend().fail_reads.store(false, Ordering::SeqCst);
        assert_eq!(store.backend().inner.blob(), before);
        assert_eq!(store.recorded_days(), vec![first]);
    }

    #[test]
    fn try_load_reports_backend_failures() {
        let backend = FlakyBackend::default();
        backend.fail_reads.store(true, Ordering::SeqCst);
        let store = DayRecordStore::new(backend);
        assert!(store.try_load().is_err());
    }
}
