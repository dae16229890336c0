//! # canon-yaml
//!
//! YAML load/dump with a canonical key order and mapping provenance.
//!
//! Loading builds a [`Value`] tree where every mapping is a
//! [`ContextMapping`] that knows the file, line and column it started at.
//! With an enforcing [`OrderPolicy`] the loader rejects any mapping whose
//! keys are not already sorted, naming the first key out of place. Dumping
//! writes every mapping in that same order, so files that go through the
//! dumper always load cleanly and diff deterministically.
//!
//! Two orders are available:
//!
//! - [`OrderPolicy::Natural`]: digit runs compare by value (`host2` before
//!   `host12`).
//! - [`OrderPolicy::DnsHierarchy`]: names compare label by label from the
//!   right, so records group under their parent domain.
//!
//! Documents can pull in other files with `!include path`, resolved
//! relative to the including file.
//!
//! ## Example
//!
//! ```rust
//! use canon_yaml::{DumpOptions, OrderPolicy, dump_to_string, load};
//!
//! let text = "
//! www2: {type: A}
//! www10: {type: A}
//! ";
//! let value = load(text, OrderPolicy::Natural).unwrap();
//! let out = dump_to_string(&value, OrderPolicy::Natural, &DumpOptions::default()).unwrap();
//! assert_eq!(out, "---\nwww2:\n  type: A\nwww10:\n  type: A\n");
//! ```

mod context;
mod dumper;
mod error;
mod loader;
mod mapping;
mod natural;
mod order;
pub mod parser;
mod value;

pub use context::Context;
pub use dumper::{DumpOptions, DumpOverrides, ScalarStyle, dump, dump_to_string};
pub use error::{Error, Result};
pub use loader::{ANONYMOUS_SOURCE, INCLUDE_TAG, Loader, load, load_named, load_path};
pub use mapping::ContextMapping;
pub use natural::{NaturalKey, natural_key};
pub use order::{OrderPolicy, SortKey};
pub use value::{Scalar, Value};
