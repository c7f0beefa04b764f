use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use chrono::{DateTime, SubsecRound, Utc};
use tracing::{debug, warn};
use uuid::Uuid;

use super::{NoteStore, ScanWarning};
use crate::config::NotebookConfig;
use crate::error::{NoteleafError, Result};
use crate::frontmatter;
use crate::model::{derive_title, Note, NoteId, NoteMeta};

/// Filesystem-backed note repository. Sole writer of note files; every
/// write goes through a temp-file-then-rename commit.
pub struct FileStore {
    root: PathBuf,
    file_ext: String,
    recursive: bool,
}

impl FileStore {
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            file_ext: ".md".to_string(),
            recursive: true,
        }
    }

    pub fn from_config(config: &NotebookConfig) -> Self {
        Self {
            root: config.root.clone(),
            file_ext: config.file_ext(),
            recursive: config.recursive,
        }
    }

    pub fn with_file_ext(mut self, ext: &str) -> Self {
        if ext.starts_with('.') {
            self.file_ext = ext.to_string();
        } else {
            self.file_ext = format!(".{}", ext);
        }
        self
    }

    pub fn with_recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Absolute path backing an identity.
    pub fn note_path(&self, id: &NoteId) -> PathBuf {
        id.to_path(&self.root)
    }

    fn ensure_dir(&self, path: &Path) -> Result<()> {
        if !path.exists() {
            fs::create_dir_all(path)?;
        }
        Ok(())
    }

    /// Collects note files under `dir`, skipping dot-prefixed entries
    /// and files without the configured extension.
    fn collect_note_files(&self, dir: &Path, out: &mut Vec<PathBuf>) -> Result<()> {
        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            let path = entry.path();
            let name = entry.file_name();
            if name.to_string_lossy().starts_with('.') {
                continue;
            }
            if path.is_dir() {
                if self.recursive {
                    self.collect_note_files(&path, out)?;
                }
                continue;
            }
            if path.to_string_lossy().ends_with(&self.file_ext) {
                out.push(path);
            }
        }
        Ok(())
    }

    /// Picks a fresh filename in `dir` for a note titled `title`,
    /// de-duplicating with a numeric suffix on collision.
    fn allocate_path(&self, dir: &Path, title: &str) -> PathBuf {
        let mut slug = slugify(title);
        if slug.is_empty() {
            slug = format!("untitled-{}", Utc::now().format("%Y%m%d%H%M%S"));
        }

        let mut candidate = dir.join(format!("{}{}", slug, self.file_ext));
        let mut counter = 2;
        while candidate.exists() {
            candidate = dir.join(format!("{}-{}{}", slug, counter, self.file_ext));
            counter += 1;
        }
        candidate
    }

    fn rel_id(&self, path: &Path) -> Result<NoteId> {
        let rel = path
            .strip_prefix(&self.root)
            .map_err(|e| NoteleafError::Store(format!("path outside root: {}", e)))?;
        Ok(NoteId::from_rel_path(rel))
    }

    /// Write-to-temp-then-rename so a crash mid-write never leaves a
    /// truncated note in place.
    fn atomic_write(&self, path: &Path, contents: &str) -> Result<()> {
        let dir = path.parent().unwrap_or(&self.root);
        let tmp = dir.join(format!(".note-{}.tmp", Uuid::new_v4()));
        fs::write(&tmp, contents)?;
        if let Err(e) = fs::rename(&tmp, path) {
            let _ = fs::remove_file(&tmp);
            return Err(e.into());
        }
        Ok(())
    }

    fn read_note(&self, path: &Path) -> Result<Note> {
        let raw = fs::read_to_string(path)?;
        let (mut meta, body) = frontmatter::parse(&raw);
        let id = self.rel_id(path)?;
        normalize_meta(&id, &mut meta, &body, file_mtime(path));
        Ok(Note { id, meta, body })
    }
}

impl NoteStore for FileStore {
    fn scan(&self) -> Result<(Vec<Note>, Vec<ScanWarning>)> {
        if !self.root.is_dir() {
            return Err(NoteleafError::InvalidRoot(self.root.clone()));
        }

        let mut files = Vec::new();
        self.collect_note_files(&self.root, &mut files)?;
        files.sort();

        let mut notes = Vec::with_capacity(files.len());
        let mut warnings = Vec::new();
        for path in files {
            match self.read_note(&path) {
                Ok(note) => notes.push(note),
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "skipping unreadable note");
                    warnings.push(ScanWarning {
                        path,
                        reason: e.to_string(),
                    });
                }
            }
        }
        debug!(count = notes.len(), warnings = warnings.len(), "scan complete");
        Ok((notes, warnings))
    }

    fn load(&self, id: &NoteId) -> Result<Note> {
        let path = self.note_path(id);
        if !path.is_file() {
            return Err(NoteleafError::NotFound(id.clone()));
        }
        self.read_note(&path)
    }

    fn save(&mut self, id: Option<&NoteId>, mut meta: NoteMeta, body: &str) -> Result<Note> {
        let (id, path) = match id {
            Some(id) => {
                let path = self.note_path(id);
                if !path.is_file() {
                    return Err(NoteleafError::NotFound(id.clone()));
                }
                (id.clone(), path)
            }
            None => {
                self.ensure_dir(&self.root)?;
                let path = self.allocate_path(&self.root, &meta.title);
                (self.rel_id(&path)?, path)
            }
        };

        if meta.title.trim().is_empty() {
            meta.title = derive_title(body, id.stem());
        }
        // Truncated to whole seconds so the in-memory record matches
        // what the header round-trips to.
        let now = Utc::now().trunc_subsecs(0);
        meta.created.get_or_insert(now);
        meta.updated = Some(now);

        self.atomic_write(&path, &frontmatter::serialize(&meta, body))?;
        Ok(Note {
            id,
            meta,
            body: body.to_string(),
        })
    }

    fn delete(&mut self, id: &NoteId) -> Result<()> {
        let path = self.note_path(id);
        if !path.is_file() {
            return Err(NoteleafError::NotFound(id.clone()));
        }
        fs::remove_file(path)?;
        Ok(())
    }

    fn rename(&mut self, id: &NoteId, new_title: &str) -> Result<Note> {
        let mut note = self.load(id)?;
        note.meta.title = new_title.to_string();

        let old_path = self.note_path(id);
        let dir = old_path.parent().unwrap_or(&self.root).to_path_buf();

        // Same slug: rewrite in place, identity unchanged.
        if slugify(new_title) == slugify(id.stem()) {
            self.atomic_write(&old_path, &frontmatter::serialize(&note.meta, &note.body))?;
            return Ok(note);
        }

        let new_path = self.allocate_path(&dir, new_title);
        // Write the new file before removing the old one: a crash in
        // between duplicates the note instead of losing it.
        self.atomic_write(&new_path, &frontmatter::serialize(&note.meta, &note.body))?;
        fs::remove_file(&old_path)?;

        note.id = self.rel_id(&new_path)?;
        Ok(note)
    }
}

/// Fills in synthesized metadata for legacy/headerless notes and
/// enforces `updated >= created`.
pub(crate) fn normalize_meta(
    id: &NoteId,
    meta: &mut NoteMeta,
    body: &str,
    fallback_time: DateTime<Utc>,
) {
    if meta.title.trim().is_empty() {
        meta.title = derive_title(body, id.stem());
    }
    let created = *meta.created.get_or_insert(fallback_time);
    match meta.updated {
        Some(updated) if updated >= created => {}
        _ => meta.updated = Some(created),
    }
}

/// Turns a title into a filesystem-friendly stem: lowercase
/// alphanumerics with single dashes.
pub(crate) fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut last_dash = true;
    for c in title.chars() {
        if c.is_alphanumeric() {
            slug.extend(c.to_lowercase());
            last_dash = false;
        } else if !last_dash {
            slug.push('-');
            last_dash = true;
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}

fn file_mtime(path: &Path) -> DateTime<Utc> {
    let modified = fs::metadata(path)
        .and_then(|m| m.modified())
        .unwrap_or_else(|_| SystemTime::now());
    DateTime::<Utc>::from(modified).trunc_subsecs(0)
}
