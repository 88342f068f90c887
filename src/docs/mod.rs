//! Embedded API reference search index
//!
//! The index lists every documented package and class with the relative link
//! to its documentation page. It is a JSON asset compiled into the binary,
//! parsed and validated on first access, and read-only from then on.
//!
//! # Usage
//!
//! ```rust
//! use docidx::docs::get_docs;
//!
//! // Get the global docs index
//! let docs = get_docs().expect("embedded index is valid");
//!
//! // Look up an entry by its fully qualified name
//! if let Some(entry) = docs.get_by_label("org.nnsoft.guice.rocoto.Rocoto") {
//!     println!("{} -> {}", entry.label, entry.link);
//! }
//!
//! // List the classes of a package
//! for class in docs.classes_in_package("org.nnsoft.guice.rocoto.converters") {
//!     println!("{}", class.simple_name());
//! }
//! ```

mod embedded;
mod error;
pub mod legacy;
mod types;

pub use embedded::{get_docs, load};
pub use error::MalformedIndexError;
pub use types::{DocEntry, DocIndex, EntryKind};
