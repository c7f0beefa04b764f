//! # Storage Layer
//!
//! The repository owns the mapping between note identity and on-disk
//! location. The [`NoteStore`] trait abstracts the backend so the
//! controller can run against the filesystem in production and an
//! in-memory twin in tests.
//!
//! ## Files are Truth
//!
//! The note directory is the single source of truth. The search index is
//! a derived, rebuildable cache owned by the controller; nothing in this
//! layer depends on it. Any inconsistency is repaired by a fresh scan.
//!
//! ## Contract highlights
//!
//! - **Scan** is recursive (configurable), skips dot-prefixed entries,
//!   and collects per-file failures as [`ScanWarning`]s instead of
//!   aborting.
//! - **Save** is atomic from the caller's perspective: content is
//!   written to a temp file in the target directory and renamed into
//!   place, so a crash mid-write never leaves a truncated note.
//! - **Save** stamps `updated` on every call and `created` exactly once.
//! - **Rename** may mint a new identity (identity is path-derived); the
//!   old file is removed only after the new one is safely on disk.
//!
//! ## Implementations
//!
//! - [`fs::FileStore`]: production filesystem store.
//! - [`memory::InMemoryStore`]: for testing logic without I/O.

use std::path::PathBuf;

use crate::error::Result;
use crate::model::{Note, NoteId, NoteMeta};

pub mod fs;
pub mod memory;

/// A non-fatal problem encountered while scanning the note directory.
#[derive(Debug, Clone)]
pub struct ScanWarning {
    pub path: PathBuf,
    pub reason: String,
}

/// Abstract interface for note storage.
pub trait NoteStore {
    /// Enumerate every note under the root. Unreadable files are
    /// reported as warnings, not errors.
    fn scan(&self) -> Result<(Vec<Note>, Vec<ScanWarning>)>;

    /// Load a single note. `NotFound` if the identity no longer
    /// resolves.
    fn load(&self, id: &NoteId) -> Result<Note>;

    /// Create (`id == None`) or rewrite (`id == Some`) a note, stamping
    /// timestamps. Returns the persisted note, identity included.
    fn save(&mut self, id: Option<&NoteId>, meta: NoteMeta, body: &str) -> Result<Note>;

    /// Remove a note. `NotFound` if already absent; deleting twice is a
    /// no-op error, not a crash.
    fn delete(&mut self, id: &NoteId) -> Result<()>;

    /// Re-title a note, preserving body and timestamps. The returned
    /// note may carry a new identity.
    fn rename(&mut self, id: &NoteId, new_title: &str) -> Result<Note>;
}
