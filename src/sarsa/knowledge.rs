//! Knowledge store: where the learned table lives between sessions
//!
//! Loading never fails: a missing or unreadable file means a cold start with
//! an empty table. Saving always reports failure, because silently losing the
//! learned table is worse than stopping.

use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use tracing::{debug, info, warn};

use crate::{
    Result,
    observation::Discretizer,
    ports::TableRepository,
    sarsa::{
        serialization::{KnowledgeMetadata, SavedTable},
        table::ActionValueTable,
    },
};

/// Table plus the counters saved with it.
#[derive(Debug, Clone)]
pub struct Knowledge {
    pub table: ActionValueTable,
    pub metadata: KnowledgeMetadata,
}

impl Knowledge {
    pub fn empty(discretizer: Discretizer) -> Self {
        Self {
            table: ActionValueTable::new(discretizer),
            metadata: KnowledgeMetadata::default(),
        }
    }
}

/// A repository bound to the robot's knowledge file.
#[derive(Clone)]
pub struct KnowledgeStore {
    repository: Arc<dyn TableRepository + Send + Sync>,
    path: PathBuf,
}

impl std::fmt::Debug for KnowledgeStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KnowledgeStore")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

impl KnowledgeStore {
    pub fn new(repository: Arc<dyn TableRepository + Send + Sync>, path: impl Into<PathBuf>) -> Self {
        Self {
            repository,
            path: path.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the saved table, indexing it with `discretizer`.
    ///
    /// Falls back to an empty table when nothing is stored or the stored
    /// bytes cannot be decoded.
    pub fn load_or_empty(&self, discretizer: Discretizer) -> Knowledge {
        if !self.repository.exists(&self.path) {
            debug!(path = %self.path.display(), "no knowledge file, starting with an empty table");
            return Knowledge::empty(discretizer);
        }

        let restored = self.repository.load(&self.path).and_then(|saved| {
            Ok(Knowledge {
                table: saved.to_table_with(discretizer)?,
                metadata: saved.metadata,
            })
        });

        match restored {
            Ok(knowledge) => {
                info!(
                    path = %self.path.display(),
                    observations = knowledge.table.len(),
                    battles = knowledge.metadata.battles,
                    "loaded knowledge"
                );
                knowledge
            }
            Err(error) => {
                warn!(
                    path = %self.path.display(),
                    %error,
                    "knowledge file unreadable, starting with an empty table"
                );
                Knowledge::empty(discretizer)
            }
        }
    }

    /// Persist the whole table.
    ///
    /// # Errors
    ///
    /// Any repository failure is returned unchanged; callers must not swallow it.
    pub fn save(&self, table: &ActionValueTable, metadata: &KnowledgeMetadata) -> Result<()> {
        let saved = SavedTable::from_table(table, metadata.clone());
        self.repository.save(&saved, &self.path)?;
        info!(
            path = %self.path.display(),
            observations = table.len(),
            state_actions = saved.entry_count(),
            "saved knowledge"
        );
        Ok(())
    }
}
