//! # Noteleaf Architecture
//!
//! Noteleaf is the **storage-and-search core of a note-taking app**: a
//! library, not an application. The editor, preview, settings store, and
//! export features are external collaborators that only ever call the
//! [`api::Notebook`] facade.
//!
//! ## The Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Presentation (external): windows, panels, editor, export   │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Controller (api.rs)                                        │
//! │  - open/close lifecycle, mutation orchestration             │
//! │  - storage first, index second — index never "ahead"        │
//! └─────────────────────────────────────────────────────────────┘
//!                │                              │
//!                ▼                              ▼
//! ┌──────────────────────────┐   ┌──────────────────────────────┐
//! │  Repository (store/)     │   │  Search Index (index.rs)     │
//! │  - NoteStore trait       │   │  - derived, rebuildable      │
//! │  - FileStore, InMemory   │   │  - substring + tag queries   │
//! └──────────────────────────┘   └──────────────────────────────┘
//!                │
//!                ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Front-matter codec (frontmatter.rs) — pure, no I/O         │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Key Principles
//!
//! - **Files are truth.** Notes are UTF-8 text files with a YAML
//!   front-matter header. The index is a cache that can always be
//!   rebuilt from a scan; inconsistency is repaired by reopening.
//! - **Parsing never fails.** A malformed header degrades to a default
//!   record; unknown header fields round-trip untouched.
//! - **Atomic writes.** Every save goes through a temp file and a
//!   rename, so a crash cannot truncate a note.
//! - **No singletons.** A [`api::Notebook`] is an owned value created at
//!   `open` and dropped at `close`; tests run several side by side.

pub mod api;
pub mod config;
pub mod error;
pub mod frontmatter;
pub mod index;
pub mod model;
pub mod store;

pub use api::Notebook;
pub use config::NotebookConfig;
pub use error::{NoteleafError, Result};
pub use model::{Note, NoteId, NoteMeta, NoteSummary};
pub use store::ScanWarning;
