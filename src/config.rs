//! # Notebook Configuration
//!
//! The core does not read settings itself: the surrounding application's
//! settings store hands a [`NotebookConfig`] to [`crate::api::Notebook::open`].
//! The [`confique`] derive keeps the shape loadable from a TOML file or
//! environment for callers that want layered configuration, with
//! compiled defaults for everything except the root path.

use std::path::PathBuf;

use confique::Config;
use serde::{Deserialize, Serialize};

/// Configuration handed to the notebook at `open` time.
#[derive(Config, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct NotebookConfig {
    /// Directory that holds the note files.
    pub root: PathBuf,

    /// Extension that marks a file as a note during scans (e.g. ".md").
    #[config(default = ".md")]
    pub file_ext: String,

    /// Whether scans descend into subdirectories. Identity is the
    /// root-relative path, so nested notes with colliding titles stay
    /// unique.
    #[config(default = true)]
    pub recursive: bool,
}

impl NotebookConfig {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            file_ext: ".md".to_string(),
            recursive: true,
        }
    }

    /// Get the note file extension, normalized to start with a dot.
    pub fn file_ext(&self) -> String {
        if self.file_ext.starts_with('.') {
            self.file_ext.clone()
        } else {
            format!(".{}", self.file_ext)
        }
    }
}
