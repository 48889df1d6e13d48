//! Serialization support for the action-value table.

use serde::{Deserialize, Serialize};

use crate::{
    Error, Result,
    observation::{Discretizer, Observation},
    sarsa::table::{ActionValueTable, ActionValues},
};

/// Counters carried alongside the table between sessions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeMetadata {
    pub battles: u64,
    pub steps: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct SavedEntry {
    observation: Observation,
    actions: ActionValues,
}

/// On-disk form of an [`ActionValueTable`].
///
/// Entries are stored as a flat list; the bucket index is rebuilt when the
/// table is restored, so the file does not depend on how keys are hashed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedTable {
    pub version: u32,
    pub discretizer: Discretizer,
    pub metadata: KnowledgeMetadata,
    entries: Vec<SavedEntry>,
}

impl SavedTable {
    pub const VERSION: u32 = 1;

    pub fn from_table(table: &ActionValueTable, metadata: KnowledgeMetadata) -> Self {
        Self {
            version: Self::VERSION,
            discretizer: *table.discretizer(),
            metadata,
            entries: table
                .iter()
                .map(|(observation, actions)| SavedEntry {
                    observation: *observation,
                    actions: actions.clone(),
                })
                .collect(),
        }
    }

    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    /// Rebuild the table under the discretizer it was saved with.
    pub fn to_table(&self) -> Result<ActionValueTable> {
        self.to_table_with(self.discretizer)
    }

    /// Rebuild the table, indexing entries with `discretizer`.
    pub fn to_table_with(&self, discretizer: Discretizer) -> Result<ActionValueTable> {
        if self.version != Self::VERSION {
            return Err(Error::UnsupportedVersion {
                found: self.version,
                expected: Self::VERSION,
            });
        }

        let mut table = ActionValueTable::new(discretizer);
        for entry in &self.entries {
            table.insert_values(entry.observation, entry.actions.clone());
        }
        Ok(table)
    }

    /// Encode as MessagePack.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        rmp_serde::to_vec(self).map_err(|e| Error::SerializationContext {
            operation: "serialize action-value table to MessagePack".to_string(),
            message: e.to_string(),
        })
    }

    /// Decode from MessagePack.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        rmp_serde::from_slice(bytes).map_err(|e| Error::SerializationContext {
            operation: "deserialize action-value table from MessagePack".to_string(),
            message: e.to_string(),
        })
    }
}
