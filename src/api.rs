//! # Notebook Controller
//!
//! [`Notebook`] composes the repository and the search index behind one
//! coherent facade. This is the only surface the presentation layer
//! talks to: it opens a root, mutates notes, and queries the index.
//!
//! ## Lifecycle
//!
//! `open → Ready → … → close`. There is no "uninitialized" state to
//! misuse: [`Notebook::open`] is a fallible constructor, so a caller
//! either holds a ready notebook or nothing at all. After
//! [`Notebook::close`] every operation returns `NotReady`.
//!
//! ## Consistency ordering
//!
//! Every mutation applies to **storage first, index second**. A failed
//! file write therefore leaves the index untouched (it is never "ahead"
//! of disk), and the reverse inconsistency (disk ahead of the index,
//! e.g. after a crash between write and upsert) is repaired by
//! [`Notebook::reload`] or simply reopening, both of which rescan and
//! rebuild the index wholesale.
//!
//! Mutations are expected to be serialized by the caller (one
//! interactive user, one logical thread of control); reads against the
//! index are plain `&self` calls.

use std::fs;

use tracing::debug;
use uuid::Uuid;

use crate::config::NotebookConfig;
use crate::error::{NoteleafError, Result};
use crate::index::SearchIndex;
use crate::model::{Note, NoteId, NoteMeta, NoteSummary};
use crate::store::fs::FileStore;
use crate::store::{NoteStore, ScanWarning};

/// A notebook: one note directory plus its derived search index.
///
/// Generic over the storage backend: `Notebook<FileStore>` in
/// production, `Notebook<InMemoryStore>` in tests.
pub struct Notebook<S: NoteStore> {
    store: S,
    /// `Some` while Ready; dropped on `close`.
    index: Option<SearchIndex>,
    warnings: Vec<ScanWarning>,
}

impl Notebook<FileStore> {
    /// Opens the notebook rooted at `config.root`: validates the root,
    /// scans it, and builds the index.
    ///
    /// Fails with `InvalidRoot` if the path is missing, not a
    /// directory, or not writable; no state is created in that case.
    pub fn open(config: &NotebookConfig) -> Result<Self> {
        if !config.root.is_dir() || !root_is_writable(config) {
            return Err(NoteleafError::InvalidRoot(config.root.clone()));
        }
        debug!(root = %config.root.display(), "opening notebook");
        Self::with_store(FileStore::from_config(config))
    }
}

impl<S: NoteStore> Notebook<S> {
    /// Builds a ready notebook over an already-constructed store.
    pub fn with_store(store: S) -> Result<Self> {
        let (notes, warnings) = store.scan()?;
        let index = SearchIndex::build(&notes);
        Ok(Self {
            store,
            index: Some(index),
            warnings,
        })
    }

    fn index(&self) -> Result<&SearchIndex> {
        self.index.as_ref().ok_or(NoteleafError::NotReady)
    }

    fn index_mut(&mut self) -> Result<&mut SearchIndex> {
        self.index.as_mut().ok_or(NoteleafError::NotReady)
    }

    /// Non-fatal problems from the most recent scan.
    pub fn scan_warnings(&self) -> &[ScanWarning] {
        &self.warnings
    }

    /// Creates an empty note with the given title and returns its
    /// identity.
    pub fn create_note(&mut self, title: &str) -> Result<NoteId> {
        self.index()?;
        let note = self.store.save(None, NoteMeta::new(title), "")?;
        let id = note.id.clone();
        self.index_mut()?.upsert(&note);
        debug!(id = %id, "note created");
        Ok(id)
    }

    /// Rewrites a note's title, tags, and body. `created` and unknown
    /// header fields are carried over from the stored note.
    pub fn update_note(
        &mut self,
        id: &NoteId,
        title: &str,
        tags: Vec<String>,
        body: &str,
    ) -> Result<()> {
        self.index()?;
        let existing = self.store.load(id)?;
        let meta = NoteMeta {
            title: title.to_string(),
            tags,
            created: existing.meta.created,
            updated: existing.meta.updated,
            extra: existing.meta.extra,
        };
        let note = self.store.save(Some(id), meta, body)?;
        self.index_mut()?.upsert(&note);
        Ok(())
    }

    /// Re-titles a note. Identity is path-derived, so the returned
    /// identity may differ from the given one; the old identity is
    /// purged from the index either way.
    pub fn rename_note(&mut self, id: &NoteId, new_title: &str) -> Result<NoteId> {
        self.index()?;
        let note = self.store.rename(id, new_title)?;
        let index = self.index_mut()?;
        index.remove(id);
        index.upsert(&note);
        debug!(from = %id, to = %note.id, "note renamed");
        Ok(note.id)
    }

    /// Deletes the file, then purges the index entry.
    pub fn delete_note(&mut self, id: &NoteId) -> Result<()> {
        self.index()?;
        self.store.delete(id)?;
        self.index_mut()?.remove(id);
        debug!(id = %id, "note deleted");
        Ok(())
    }

    /// Full note for an editor view. Reads through to storage.
    pub fn get(&self, id: &NoteId) -> Result<Note> {
        self.index()?;
        self.store.load(id)
    }

    /// Queries the index only; summaries carry no body.
    ///
    /// Empty `text` matches all notes; `tag_filter` requires every
    /// listed tag (AND). Results are ordered by `updated` descending,
    /// ties broken by identity.
    pub fn search(&self, text: &str, tag_filter: &[String]) -> Result<Vec<NoteSummary>> {
        let index = self.index()?;
        Ok(index
            .query(text, tag_filter)
            .iter()
            .filter_map(|id| index.summary(id))
            .collect())
    }

    /// Every tag in use, sorted and de-duplicated.
    pub fn all_tags(&self) -> Result<Vec<String>> {
        Ok(self.index()?.all_tags())
    }

    /// Recovery path: rescans storage and swaps in a freshly built
    /// index. The live index is replaced only once the rebuild is
    /// complete.
    pub fn reload(&mut self) -> Result<()> {
        self.index()?;
        let (notes, warnings) = self.store.scan()?;
        let fresh = SearchIndex::build(&notes);
        self.index = Some(fresh);
        self.warnings = warnings;
        Ok(())
    }

    /// Releases the index. Every subsequent operation returns
    /// `NotReady`.
    pub fn close(&mut self) {
        debug!("closing notebook");
        self.index = None;
    }
}

/// Writability is probed with a real temp file: permission bits are
/// unreliable across filesystems and ACLs.
fn root_is_writable(config: &NotebookConfig) -> bool {
    let probe = config.root.join(format!(".noteleaf-probe-{}", Uuid::new_v4()));
    match fs::write(&probe, b"") {
        Ok(()) => {
            let _ = fs::remove_file(&probe);
            true
        }
        Err(_) => false,
    }
}
