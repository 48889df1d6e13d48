//! In-memory table repository for testing.
//!
//! This adapter provides a pure in-memory implementation of TableRepository,
//! enabling fast tests without any file system I/O.

use std::{
    collections::HashMap,
    path::Path,
    sync::{Arc, Mutex, MutexGuard},
};

use crate::{Result, error::Error, ports::TableRepository, sarsa::SavedTable};

/// In-memory repository for testing.
///
/// Stores the encoded bytes in a shared HashMap, so decoding runs exactly as
/// it would against a file.
///
/// # Examples
///
/// ```
/// use robosarsa::adapters::InMemoryRepository;
/// use robosarsa::ports::TableRepository;
/// use robosarsa::sarsa::{ActionValueTable, KnowledgeMetadata, SavedTable};
/// use std::path::Path;
///
/// let repo = InMemoryRepository::new();
/// let saved = SavedTable::from_table(&ActionValueTable::default(), KnowledgeMetadata::default());
///
/// repo.save(&saved, Path::new("q.msgpack"))?;
/// let loaded = repo.load(Path::new("q.msgpack"))?;
/// assert_eq!(loaded, saved);
/// # Ok::<(), robosarsa::Error>(())
/// ```
///
/// # Thread Safety
///
/// All clones share the same underlying storage.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRepository {
    storage: Arc<Mutex<HashMap<String, Vec<u8>>>>,
}

fn key(path: &Path) -> String {
    path.to_string_lossy().to_string()
}

impl InMemoryRepository {
    /// Create a new empty in-memory repository.
    pub fn new() -> Self {
        Self::default()
    }

    fn storage(&self) -> MutexGuard<'_, HashMap<String, Vec<u8>>> {
        // a panic while holding the lock cannot leave the map half-written
        self.storage
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Number of tables currently stored.
    pub fn count(&self) -> usize {
        self.storage().len()
    }

    /// Clear all stored tables.
    pub fn clear(&self) {
        self.storage().clear();
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.storage().contains_key(&key(path))
    }

    /// Store arbitrary bytes at `path`, e.g. to simulate a corrupt file.
    pub fn insert_raw(&self, path: &Path, bytes: Vec<u8>) {
        self.storage().insert(key(path), bytes);
    }
}

impl TableRepository for InMemoryRepository {
    fn save(&self, saved: &SavedTable, path: &Path) -> Result<()> {
        let bytes = saved.to_bytes()?;
        self.storage().insert(key(path), bytes);
        Ok(())
    }

    fn load(&self, path: &Path) -> Result<SavedTable> {
        let storage = self.storage();
        let bytes = storage.get(&key(path)).ok_or_else(|| Error::Io {
            operation: format!("load table from in-memory storage at {path:?}"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "key not found in memory"),
        })?;
        SavedTable::from_bytes(bytes)
    }

    fn exists(&self, path: &Path) -> bool {
        self.contains(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sarsa::{ActionValueTable, KnowledgeMetadata};

    fn saved(battles: u64) -> SavedTable {
        SavedTable::from_table(
            &ActionValueTable::default(),
            KnowledgeMetadata { battles, steps: 0 },
        )
    }

    #[test]
    fn test_in_memory_save_and_load() {
        let repo = InMemoryRepository::new();
        let path = Path::new("q.msgpack");

        assert_eq!(repo.count(), 0);
        assert!(!repo.exists(path));

        repo.save(&saved(1), path).unwrap();
        assert_eq!(repo.count(), 1);
        assert!(repo.exists(path));
        assert_eq!(repo.load(path).unwrap(), saved(1));
    }

    #[test]
    fn test_load_nonexistent_returns_error() {
        let repo = InMemoryRepository::new();
        assert!(repo.load(Path::new("nonexistent")).is_err());
    }

    #[test]
    fn test_corrupt_bytes_fail_to_load() {
        let repo = InMemoryRepository::new();
        repo.insert_raw(Path::new("q"), vec![0xc1]);
        assert!(repo.exists(Path::new("q")));
        assert!(repo.load(Path::new("q")).is_err());
    }

    #[test]
    fn test_clone_shares_storage() {
        let repo1 = InMemoryRepository::new();
        let repo2 = repo1.clone();
        let path = Path::new("shared");

        repo1.save(&saved(5), path).unwrap();
        assert_eq!(repo2.load(path).unwrap().metadata.battles, 5);

        repo2.clear();
        assert_eq!(repo1.count(), 0);
    }
}
