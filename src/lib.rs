//! docidx - API reference search index
//!
//! The package/class table behind a documentation site's search box, shipped
//! as a validated JSON asset with a thin loader.

pub mod docs;

// Re-export commonly used types
pub use docs::{DocEntry, DocIndex, EntryKind, MalformedIndexError, get_docs, load};
