//! # Domain Model: Notes, Metadata, and Identity
//!
//! The central entity is [`Note`]: a body of text plus a [`NoteMeta`]
//! record that lives in the file's front-matter header.
//!
//! ## Identity
//!
//! A [`NoteId`] is an opaque handle backed by the note's path relative to
//! the notebook root, forward-slash normalized. It is the key for every
//! repository and index operation. Because identity is path-derived, a
//! title rename may mint a *new* identity; callers holding the old one
//! get a defined `NotFound` outcome rather than silently stale data.
//!
//! ## Title synthesis
//!
//! A file without a `title:` field is still a valid note. The displayed
//! title falls back to the first `# ` heading of the body, then to the
//! file stem (see [`derive_title`]).

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Stable handle referencing one note across its lifetime.
///
/// Backed by the root-relative file path, including extension. Ordering
/// is lexicographic, which gives deterministic tie-breaks in search
/// results.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NoteId(String);

impl NoteId {
    /// Builds an identity from a path relative to the notebook root.
    pub fn from_rel_path(path: &Path) -> Self {
        let rel = path.to_string_lossy().replace('\\', "/");
        Self(rel)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Resolves the identity against a notebook root.
    pub fn to_path(&self, root: &Path) -> PathBuf {
        root.join(&self.0)
    }

    /// File stem of the backing path, used as the last-resort title.
    pub fn stem(&self) -> &str {
        let name = self.0.rsplit('/').next().unwrap_or(&self.0);
        name.rsplit_once('.').map(|(stem, _)| stem).unwrap_or(name)
    }
}

impl fmt::Display for NoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Structured header fields associated with a note.
///
/// `created`/`updated` are `None` only between parsing and repository
/// normalization; every note handed out by a store carries both.
/// Unrecognized header keys are preserved opaquely in `extra` and
/// re-emitted unchanged on save.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NoteMeta {
    pub title: String,
    pub tags: Vec<String>,
    pub created: Option<DateTime<Utc>>,
    pub updated: Option<DateTime<Utc>>,
    pub extra: BTreeMap<String, serde_yaml::Value>,
}

impl NoteMeta {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    /// Case-insensitive tag membership.
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t.eq_ignore_ascii_case(tag))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Note {
    pub id: NoteId,
    pub meta: NoteMeta,
    pub body: String,
}

/// Lightweight listing record: everything a list view needs, no body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NoteSummary {
    pub id: NoteId,
    pub title: String,
    pub tags: Vec<String>,
    pub updated: DateTime<Utc>,
}

/// Synthesizes a display title for a note whose header omits one.
///
/// Prefers the first `# ` heading of the body; falls back to the given
/// file stem.
pub fn derive_title(body: &str, fallback: &str) -> String {
    for line in body.lines() {
        if let Some(rest) = line.strip_prefix("# ") {
            let heading = rest.trim();
            if !heading.is_empty() {
                return heading.to_string();
            }
        }
    }
    fallback.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_note_id_normalizes_separators() {
        let id = NoteId::from_rel_path(Path::new("sub\\dir\\note.md"));
        assert_eq!(id.as_str(), "sub/dir/note.md");
    }

    #[test]
    fn test_note_id_stem() {
        let id = NoteId::from_rel_path(Path::new("projects/alpha.md"));
        assert_eq!(id.stem(), "alpha");

        let bare = NoteId::from_rel_path(Path::new("no-extension"));
        assert_eq!(bare.stem(), "no-extension");
    }

    #[test]
    fn test_note_id_resolution() {
        let id = NoteId::from_rel_path(Path::new("sub/note.md"));
        assert_eq!(
            id.to_path(Path::new("/tmp/notes")),
            PathBuf::from("/tmp/notes/sub/note.md")
        );
    }

    #[test]
    fn test_derive_title_from_heading() {
        assert_eq!(derive_title("# Hello World\nbody", "stem"), "Hello World");
        assert_eq!(derive_title("intro\n\n# Later Heading\n", "stem"), "Later Heading");
    }

    #[test]
    fn test_derive_title_fallback_to_stem() {
        assert_eq!(derive_title("no headings here", "my-note"), "my-note");
        assert_eq!(derive_title("", "my-note"), "my-note");
        // An empty heading does not count
        assert_eq!(derive_title("#  \ntext", "my-note"), "my-note");
    }

    #[test]
    fn test_has_tag_case_insensitive() {
        let mut meta = NoteMeta::new("Tagged");
        meta.tags = vec!["Work".to_string(), "rust".to_string()];
        assert!(meta.has_tag("work"));
        assert!(meta.has_tag("RUST"));
        assert!(!meta.has_tag("play"));
    }
}
