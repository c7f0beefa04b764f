use std::collections::HashMap;
use std::path::Path;

use chrono::{SubsecRound, Utc};

use super::fs::slugify;
use super::{NoteStore, ScanWarning};
use crate::error::{NoteleafError, Result};
use crate::model::{derive_title, Note, NoteId, NoteMeta};

/// In-memory store for testing controller logic without filesystem I/O.
/// Mirrors [`super::fs::FileStore`] semantics, including slug-based
/// identity allocation.
#[derive(Default)]
pub struct InMemoryStore {
    notes: HashMap<NoteId, Note>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    fn allocate_id(&self, title: &str) -> NoteId {
        let mut slug = slugify(title);
        if slug.is_empty() {
            slug = format!("untitled-{}", Utc::now().format("%Y%m%d%H%M%S"));
        }

        let mut candidate = NoteId::from_rel_path(Path::new(&format!("{}.md", slug)));
        let mut counter = 2;
        while self.notes.contains_key(&candidate) {
            candidate = NoteId::from_rel_path(Path::new(&format!("{}-{}.md", slug, counter)));
            counter += 1;
        }
        candidate
    }
}

impl NoteStore for InMemoryStore {
    fn scan(&self) -> Result<(Vec<Note>, Vec<ScanWarning>)> {
        let mut notes: Vec<Note> = self.notes.values().cloned().collect();
        notes.sort_by(|a, b| a.id.cmp(&b.id));
        Ok((notes, Vec::new()))
    }

    fn load(&self, id: &NoteId) -> Result<Note> {
        self.notes
            .get(id)
            .cloned()
            .ok_or_else(|| NoteleafError::NotFound(id.clone()))
    }

    fn save(&mut self, id: Option<&NoteId>, mut meta: NoteMeta, body: &str) -> Result<Note> {
        let id = match id {
            Some(id) => {
                if !self.notes.contains_key(id) {
                    return Err(NoteleafError::NotFound(id.clone()));
                }
                id.clone()
            }
            None => self.allocate_id(&meta.title),
        };

        if meta.title.trim().is_empty() {
            meta.title = derive_title(body, id.stem());
        }
        let now = Utc::now().trunc_subsecs(0);
        meta.created.get_or_insert(now);
        meta.updated = Some(now);

        let note = Note {
            id: id.clone(),
            meta,
            body: body.to_string(),
        };
        self.notes.insert(id, note.clone());
        Ok(note)
    }

    fn delete(&mut self, id: &NoteId) -> Result<()> {
        self.notes
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| NoteleafError::NotFound(id.clone()))
    }

    fn rename(&mut self, id: &NoteId, new_title: &str) -> Result<Note> {
        let mut note = self.load(id)?;
        note.meta.title = new_title.to_string();

        // Same slug: identity unchanged, just retitle.
        if slugify(new_title) == slugify(id.stem()) {
            self.notes.insert(id.clone(), note.clone());
            return Ok(note);
        }

        let new_id = self.allocate_id(new_title);
        self.notes.remove(id);
        note.id = new_id.clone();
        self.notes.insert(new_id, note.clone());
        Ok(note)
    }
}
