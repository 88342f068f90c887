use std::path::PathBuf;
use thiserror::Error;

/// Raised when an index asset is missing, truncated or breaks an invariant.
#[derive(Debug, Error)]
pub enum MalformedIndexError {
    #[error("failed to read index {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("index is not a valid entry list: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("legacy script, line {line}: {reason}")]
    Legacy { line: usize, reason: String },

    #[error("entry at position {position} has id {id}")]
    IdMismatch { position: usize, id: usize },

    #[error("entry {id} has an empty {field}")]
    EmptyField { id: usize, field: &'static str },

    #[error("label '{label}' used by entries {first} and {second}")]
    DuplicateLabel {
        label: String,
        first: usize,
        second: usize,
    },

    #[error("link '{link}' used by entries {first} and {second}")]
    DuplicateLink {
        link: String,
        first: usize,
        second: usize,
    },
}
