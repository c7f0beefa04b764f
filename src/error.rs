use std::path::PathBuf;

use thiserror::Error;

use crate::model::NoteId;

#[derive(Error, Debug)]
pub enum NoteleafError {
    /// The notebook root does not exist, is not a directory, or is not
    /// writable. Fatal to `open`; retry with a different path.
    #[error("Invalid notebook root: {0}")]
    InvalidRoot(PathBuf),

    /// The referenced note no longer exists. Callers should refresh
    /// their view of the notebook.
    #[error("Note not found: {0}")]
    NotFound(NoteId),

    /// Operation attempted before `open` or after `close`.
    #[error("Notebook is not open")]
    NotReady,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Store error: {0}")]
    Store(String),
}

pub type Result<T> = std::result::Result<T, NoteleafError>;
