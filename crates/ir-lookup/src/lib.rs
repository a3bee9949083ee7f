//! # IR lookup
//!
//! Finds symbols in a precomputed IR JSON artifact by name.
//!
//! The artifact is a JSON array of entries, one per source file:
//!
//! ```text
//! [
//!   { "fileName": "a.ts",
//!     "messages": { "Foo": <type descriptor>, ... },
//!     "crf":      { "Foo": <metadata>, ... } }
//! ]
//! ```
//!
//! A lookup scans every entry's `messages` in document order, then key order,
//! and collects each symbol whose name contains the needle. An exact name match
//! is preferred; otherwise the first match is reported.
//!
//! ```
//! use ir_lookup::IrDocument;
//!
//! let doc = IrDocument::from_json_str(
//!     r#"[{"fileName":"a.ts","messages":{"Foo":"TypeA","FooBar":"TypeB"}}]"#,
//! )
//! .unwrap();
//! let selection = doc.lookup("Foo").unwrap();
//! assert_eq!(selection.chosen.name, "Foo");
//! assert_eq!(selection.match_count, 2);
//! ```

pub mod error;
pub mod lookup;
pub mod model;
pub mod render;

pub use error::{LookupError, Result};
pub use lookup::{select, Match, MatchMode, Selection};
pub use model::{IrDocument, IrEntry};
pub use render::{render_pretty, sort_keys};

/// Where the IR generator writes its artifact, relative to the working directory.
pub const DEFAULT_IR_PATH: &str = "bin/json/ir.json";
