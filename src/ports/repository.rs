//! Repository port for knowledge persistence.
//!
//! This module defines the trait boundary between the learning core and the
//! storage used to keep the action-value table between sessions.

use std::path::Path;

use crate::{Result, sarsa::SavedTable};

/// Port for persisting and loading a saved action-value table.
///
/// Implementations only move bytes; deciding what to do when a load fails
/// (cold start with an empty table) is the caller's job, see
/// [`crate::sarsa::KnowledgeStore`].
///
/// # Examples
///
/// ```no_run
/// use robosarsa::ports::TableRepository;
/// use robosarsa::sarsa::SavedTable;
/// use std::path::Path;
///
/// fn checkpoint<R: TableRepository>(
///     repo: &R,
///     saved: &SavedTable,
///     path: &Path,
/// ) -> robosarsa::Result<()> {
///     repo.save(saved, path)
/// }
/// ```
pub trait TableRepository {
    /// Write a saved table to persistent storage.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The location cannot be created or written to
    /// - Serialization fails
    fn save(&self, saved: &SavedTable, path: &Path) -> Result<()>;

    /// Read a saved table back.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Nothing is stored at `path`
    /// - The stored bytes cannot be decoded
    fn load(&self, path: &Path) -> Result<SavedTable>;

    /// Whether anything is stored at `path`.
    fn exists(&self, path: &Path) -> bool;
}
