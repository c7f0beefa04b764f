//! # Search Index
//!
//! In-memory searchable view over note titles, tags, and body text.
//!
//! The index is a **derived cache**: the note directory is the source of
//! truth, and the whole structure can be rebuilt from a scan at any
//! time. It must never contain an identity the repository no longer
//! tracks: the controller purges entries synchronously on delete and
//! only inserts after a write has committed.
//!
//! A full rebuild goes through [`SearchIndex::build`] and replaces the
//! live structure in one move, so an abandoned rebuild can simply be
//! dropped without leaving the index half-populated.
//!
//! Matching is deliberately simple: case-insensitive substring over
//! title, tags, and body, plus an AND-semantics tag filter. Results are
//! ordered by `updated` descending, ties broken by identity so repeated
//! queries are deterministic.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::model::{Note, NoteId, NoteSummary};

/// Cached searchable view of one note. Carries enough original-case
/// data to produce a [`NoteSummary`] without touching storage.
#[derive(Debug, Clone)]
struct IndexEntry {
    title: String,
    tags: Vec<String>,
    title_lc: String,
    tags_lc: Vec<String>,
    body_lc: String,
    updated: DateTime<Utc>,
}

#[derive(Debug, Default)]
pub struct SearchIndex {
    entries: HashMap<NoteId, IndexEntry>,
}

impl SearchIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a fresh index from scanned notes. The caller swaps the
    /// result in on completion (or drops it on cancellation).
    pub fn build<'a, I>(notes: I) -> Self
    where
        I: IntoIterator<Item = &'a Note>,
    {
        let mut index = Self::new();
        for note in notes {
            index.upsert(note);
        }
        index
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, id: &NoteId) -> bool {
        self.entries.contains_key(id)
    }

    /// Inserts or replaces the searchable record for a note.
    pub fn upsert(&mut self, note: &Note) {
        let updated = note
            .meta
            .updated
            .or(note.meta.created)
            .unwrap_or_else(Utc::now);
        self.entries.insert(
            note.id.clone(),
            IndexEntry {
                title: note.meta.title.clone(),
                tags: note.meta.tags.clone(),
                title_lc: note.meta.title.to_lowercase(),
                tags_lc: note.meta.tags.iter().map(|t| t.to_lowercase()).collect(),
                body_lc: note.body.to_lowercase(),
                updated,
            },
        );
    }

    /// Purges all entries for an identity; no-op if absent.
    pub fn remove(&mut self, id: &NoteId) {
        self.entries.remove(id);
    }

    /// Identities matching the text query and tag filter, ordered by
    /// `updated` descending (ties by identity).
    ///
    /// An empty text query matches every note; an empty tag filter
    /// imposes no constraint; combined, a note must satisfy both.
    pub fn query(&self, text: &str, tag_filter: &[String]) -> Vec<NoteId> {
        let needle = text.trim().to_lowercase();
        let filter_lc: Vec<String> = tag_filter.iter().map(|t| t.to_lowercase()).collect();

        let mut hits: Vec<(&NoteId, &IndexEntry)> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.matches_text(&needle) && entry.has_all_tags(&filter_lc))
            .collect();

        hits.sort_by(|(a_id, a), (b_id, b)| {
            b.updated.cmp(&a.updated).then_with(|| a_id.cmp(b_id))
        });
        hits.into_iter().map(|(id, _)| id.clone()).collect()
    }

    /// Listing record for an indexed note.
    pub fn summary(&self, id: &NoteId) -> Option<NoteSummary> {
        self.entries.get(id).map(|entry| NoteSummary {
            id: id.clone(),
            title: entry.title.clone(),
            tags: entry.tags.clone(),
            updated: entry.updated,
        })
    }

    /// Sorted, de-duplicated union of tags across indexed notes,
    /// original case preserved.
    pub fn all_tags(&self) -> Vec<String> {
        let mut tags: Vec<String> = self
            .entries
            .values()
            .flat_map(|entry| entry.tags.iter().cloned())
            .collect();
        tags.sort();
        tags.dedup();
        tags
    }
}

impl IndexEntry {
    fn matches_text(&self, needle: &str) -> bool {
        needle.is_empty()
            || self.title_lc.contains(needle)
            || self.body_lc.contains(needle)
            || self.tags_lc.iter().any(|t| t.contains(needle))
    }

    fn has_all_tags(&self, filter_lc: &[String]) -> bool {
        filter_lc
            .iter()
            .all(|wanted| self.tags_lc.iter().any(|t| t == wanted))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NoteMeta;
    use chrono::TimeZone;
    use std::path::Path;

    fn make_note(name: &str, title: &str, tags: &[&str], body: &str, day: u32) -> Note {
        let mut meta = NoteMeta::new(title);
        meta.tags = tags.iter().map(|t| t.to_string()).collect();
        meta.created = Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
        meta.updated = Some(Utc.with_ymd_and_hms(2024, 1, day, 0, 0, 0).unwrap());
        Note {
            id: NoteId::from_rel_path(Path::new(name)),
            meta,
            body: body.to_string(),
        }
    }

    fn sample_index() -> SearchIndex {
        SearchIndex::build(&[
            make_note("garden.md", "Gardening Tips", &["hobby", "plants"], "water them", 3),
            make_note("python.md", "Python Notes", &["coding", "Hobby"], "use venvs", 2),
            make_note("soup.md", "Tomato Soup", &["cooking"], "tomatoes and garlic", 1),
        ])
    }

    #[test]
    fn test_empty_query_matches_all_ordered_by_updated_desc() {
        let index = sample_index();
        let hits = index.query("", &[]);
        let ids: Vec<&str> = hits.iter().map(|id| id.as_str()).collect();
        assert_eq!(ids, vec!["garden.md", "python.md", "soup.md"]);
    }

    #[test]
    fn test_text_matches_title_tag_and_body() {
        let index = sample_index();
        assert_eq!(index.query("gardening", &[]).len(), 1); // title
        assert_eq!(index.query("venvs", &[]).len(), 1); // body
        assert_eq!(index.query("cooking", &[]).len(), 1); // tag
        assert!(index.query("nonexistent", &[]).is_empty());
    }

    #[test]
    fn test_text_match_is_case_insensitive_substring() {
        let index = sample_index();
        assert_eq!(index.query("TOMATO", &[]).len(), 1);
        assert_eq!(index.query("ardeni", &[]).len(), 1);
    }

    #[test]
    fn test_tag_filter_and_semantics() {
        let index = sample_index();
        // "hobby" matches both, case-insensitively.
        let hobby = index.query("", &["hobby".to_string()]);
        assert_eq!(hobby.len(), 2);

        let both = index.query("", &["hobby".to_string(), "plants".to_string()]);
        assert_eq!(both.len(), 1);
        assert_eq!(both[0].as_str(), "garden.md");

        // Tag filter is exact-match, not substring.
        assert!(index.query("", &["hob".to_string()]).is_empty());
    }

    #[test]
    fn test_combined_text_and_tag_constraints_intersect() {
        let index = sample_index();
        let hits = index.query("water", &["hobby".to_string()]);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].as_str(), "garden.md");

        assert!(index.query("venvs", &["plants".to_string()]).is_empty());
    }

    #[test]
    fn test_ordering_tie_broken_by_identity() {
        let index = SearchIndex::build(&[
            make_note("b.md", "B", &[], "", 1),
            make_note("a.md", "A", &[], "", 1),
        ]);
        let ids: Vec<_> = index.query("", &[]).iter().map(|i| i.as_str().to_string()).collect();
        assert_eq!(ids, vec!["a.md", "b.md"]);
    }

    #[test]
    fn test_upsert_replaces_and_remove_purges() {
        let mut index = sample_index();
        let mut note = make_note("garden.md", "Renamed", &[], "different", 9);
        note.meta.tags.clear();
        index.upsert(&note);
        assert_eq!(index.len(), 3);
        assert!(index.query("gardening", &[]).is_empty());
        assert_eq!(index.query("renamed", &[])[0].as_str(), "garden.md");

        let id = NoteId::from_rel_path(Path::new("garden.md"));
        index.remove(&id);
        assert_eq!(index.len(), 2);
        assert!(!index.contains(&id));
        // Removing again is a no-op.
        index.remove(&id);
        assert_eq!(index.len(), 2);
    }

    #[test]
    fn test_summary_has_no_body() {
        let index = sample_index();
        let id = NoteId::from_rel_path(Path::new("garden.md"));
        let summary = index.summary(&id).unwrap();
        assert_eq!(summary.title, "Gardening Tips");
        assert_eq!(summary.tags, vec!["hobby", "plants"]);
        assert!(index.summary(&NoteId::from_rel_path(Path::new("nope.md"))).is_none());
    }

    #[test]
    fn test_all_tags_sorted_unique() {
        let index = sample_index();
        assert_eq!(
            index.all_tags(),
            vec!["Hobby", "coding", "cooking", "hobby", "plants"]
                .into_iter()
                .map(String::from)
                .collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_build_replaces_wholesale() {
        let mut index = sample_index();
        let fresh = SearchIndex::build(&[make_note("only.md", "Only", &[], "", 1)]);
        index = fresh;
        assert_eq!(index.len(), 1);
        assert!(index.contains(&NoteId::from_rel_path(Path::new("only.md"))));
    }
}
