//! MessagePack implementation of the table repository.
//!
//! This adapter implements the TableRepository port using rmp_serde for
//! compact binary serialization. Writes go through a temporary file in the
//! target directory followed by a rename, so an interrupted save leaves the
//! previous knowledge file intact.

use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use crate::{Result, error::Error, ports::TableRepository, sarsa::SavedTable};

/// MessagePack-based table repository.
///
/// # Examples
///
/// ```no_run
/// use robosarsa::adapters::MsgPackRepository;
/// use robosarsa::ports::TableRepository;
/// use robosarsa::sarsa::{ActionValueTable, KnowledgeMetadata, SavedTable};
/// use std::path::Path;
///
/// let repo = MsgPackRepository;
/// let saved = SavedTable::from_table(&ActionValueTable::default(), KnowledgeMetadata::default());
///
/// repo.save(&saved, Path::new("data/q.msgpack"))?;
/// let loaded = repo.load(Path::new("data/q.msgpack"))?;
/// # Ok::<(), robosarsa::Error>(())
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct MsgPackRepository;

impl MsgPackRepository {
    /// Create a new MessagePack repository.
    pub fn new() -> Self {
        Self
    }
}

fn temp_path_for(path: &Path) -> PathBuf {
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!(".tmp_{}_{file_name}", std::process::id()))
}

fn write_atomically(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| Error::Io {
            operation: format!("create directory {parent:?}"),
            source,
        })?;
    }

    let temp_path = temp_path_for(path);
    let mut file = File::create(&temp_path).map_err(|source| Error::Io {
        operation: format!("create file {temp_path:?}"),
        source,
    })?;
    file.write_all(bytes).map_err(|source| Error::Io {
        operation: format!("write file {temp_path:?}"),
        source,
    })?;
    file.sync_all().map_err(|source| Error::Io {
        operation: format!("sync file {temp_path:?}"),
        source,
    })?;

    fs::rename(&temp_path, path).map_err(|source| {
        let _ = fs::remove_file(&temp_path);
        Error::Io {
            operation: format!("rename {temp_path:?} to {path:?}"),
            source,
        }
    })
}

impl TableRepository for MsgPackRepository {
    fn save(&self, saved: &SavedTable, path: &Path) -> Result<()> {
        let bytes = saved.to_bytes()?;
        write_atomically(path, &bytes)
    }

    fn load(&self, path: &Path) -> Result<SavedTable> {
        let bytes = fs::read(path).map_err(|source| Error::Io {
            operation: format!("read file {path:?}"),
            source,
        })?;
        SavedTable::from_bytes(&bytes)
    }

    fn exists(&self, path: &Path) -> bool {
        path.is_file()
    }
}
