use super::error::MalformedIndexError;
use super::types::DocIndex;
use lazy_static::lazy_static;
use std::time::Instant;

// The asset is compiled in, so a doc build and its binary always agree
static INDEX_JSON: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/assets/lists.json"));

lazy_static! {
    /// Global docs index, initialized on first access
    static ref DOCS: Result<DocIndex, MalformedIndexError> = load();
}

/// Parse and validate the embedded asset
pub fn load() -> Result<DocIndex, MalformedIndexError> {
    let start = Instant::now();
    let index = DocIndex::from_json(INDEX_JSON)?;

    tracing::debug!(
        entries = index.len(),
        packages = index.packages().count(),
        classes = index.classes().count(),
        elapsed = ?start.elapsed(),
        "embedded docs index loaded"
    );

    Ok(index)
}

/// Get a reference to the global docs index
pub fn get_docs() -> Result<&'static DocIndex, &'static MalformedIndexError> {
    DOCS.as_ref()
}
