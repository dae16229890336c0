//! Order-enforcing loader with `!include` support.

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use tracing::{debug, trace};

use crate::parser::{NodeHooks, build_tree};
use crate::{Context, ContextMapping, Error, OrderPolicy, Result, Scalar, Value};

/// Name given to sources that are not files.
pub const ANONYMOUS_SOURCE: &str = "<string>";

/// Tag that splices another file in place of the tagged scalar.
pub const INCLUDE_TAG: &str = "!include";

/// Loads documents, checking key order on every mapping and resolving
/// `!include` tags.
///
/// ```rust
/// use canon_yaml::{Loader, OrderPolicy};
///
/// let mut loader = Loader::new(OrderPolicy::Natural).with_source_name("inline.yaml");
/// let value = loader.load_str("a: 1\nb: 2\n").unwrap();
/// let mapping = value.as_mapping().unwrap();
/// assert_eq!(mapping.context().to_string(), "inline.yaml, line 1, column 1");
/// ```
#[derive(Debug, Clone)]
pub struct Loader {
    policy: OrderPolicy,
    source_name: String,
    /// Files currently being loaded, outermost first
    frames: Vec<Frame>,
    /// Every file spliced in by `!include`, in load order
    included: Vec<PathBuf>,
}

#[derive(Debug, Clone)]
struct Frame {
    /// Path as resolved from the including file, used for names and for
    /// resolving nested includes
    path: PathBuf,
    /// Canonical form, used to detect cycles
    canonical: PathBuf,
}

impl Frame {
    fn new(path: PathBuf) -> Self {
        let canonical = fs::canonicalize(&path).unwrap_or_else(|_| path.clone());
        Self { path, canonical }
    }
}

impl Loader {
    pub fn new(policy: OrderPolicy) -> Self {
        Self {
            policy,
            source_name: ANONYMOUS_SOURCE.to_string(),
            frames: Vec::new(),
            included: Vec::new(),
        }
    }

    /// Name used in provenance for content passed to [`Loader::load_str`]
    /// and [`Loader::load_reader`]. Includes resolve against its directory.
    #[must_use]
    pub fn with_source_name(mut self, name: impl Into<String>) -> Self {
        self.source_name = name.into();
        self
    }

    pub fn policy(&self) -> OrderPolicy {
        self.policy
    }

    /// Files spliced in by `!include` so far, nested includes included.
    pub fn included(&self) -> &[PathBuf] {
        &self.included
    }

    /// Load a document from a string.
    ///
    /// # Errors
    ///
    /// Syntax errors, order violations, and failures of included files.
    pub fn load_str(&mut self, content: &str) -> Result<Value> {
        let name = self.source_name.clone();
        self.load_source(content, &name)
    }

    /// Load a document from a reader, named after the loader's source name.
    ///
    /// # Errors
    ///
    /// As [`Loader::load_str`], plus [`Error::Resource`] when reading fails.
    pub fn load_reader<R: Read>(&mut self, mut reader: R) -> Result<Value> {
        let mut content = String::new();
        reader
            .read_to_string(&mut content)
            .map_err(|source| Error::Resource {
                path: PathBuf::from(&self.source_name),
                source,
            })?;
        self.load_str(&content)
    }

    /// Load a document from a file. The path becomes the source name.
    ///
    /// # Errors
    ///
    /// As [`Loader::load_str`], plus [`Error::Resource`] when the file
    /// cannot be read.
    pub fn load_path(&mut self, path: impl AsRef<Path>) -> Result<Value> {
        self.load_file(path.as_ref().to_path_buf())
    }

    fn load_source(&mut self, content: &str, name: &str) -> Result<Value> {
        let value = build_tree(content, name, self)?;
        debug!(source = name, policy = %self.policy, "loaded document");
        Ok(value)
    }

    fn load_file(&mut self, path: PathBuf) -> Result<Value> {
        let content = fs::read_to_string(&path).map_err(|source| Error::Resource {
            path: path.clone(),
            source,
        })?;

        let frame = Frame::new(path);
        if self.frames.iter().any(|f| f.canonical == frame.canonical) {
            let mut chain: Vec<PathBuf> = self.frames.iter().map(|f| f.path.clone()).collect();
            chain.push(frame.path);
            return Err(Error::IncludeCycle { chain });
        }

        let name = frame.path.display().to_string();
        self.frames.push(frame);
        let result = self.load_source(&content, &name);
        self.frames.pop();
        result
    }

    /// Directory that relative include paths are joined to: the directory
    /// of the file being loaded, or of the source name for inline content.
    fn base_dir(&self) -> PathBuf {
        let current = match self.frames.last() {
            Some(frame) => frame.path.as_path(),
            None => Path::new(&self.source_name),
        };
        current
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default()
    }

    fn include(&mut self, relative: &str) -> Result<Value> {
        let path = self.base_dir().join(relative);
        debug!(path = %path.display(), "resolving include");
        self.included.push(path.clone());
        self.load_file(path)
    }
}

impl NodeHooks for Loader {
    fn on_mapping(&mut self, pairs: Vec<(Scalar, Value)>, context: Context) -> Result<Value> {
        if self.policy.is_enforcing() {
            let keys: Vec<String> = pairs.iter().map(|(k, _)| k.sort_text()).collect();
            trace!(context = %context, keys = keys.len(), "checking key order");
            if let Some((expected, actual)) = self.policy.first_mismatch(&keys) {
                return Err(Error::OrderViolation {
                    expected,
                    actual,
                    context,
                });
            }
        }
        Ok(Value::Mapping(ContextMapping::from_pairs(pairs, context)))
    }

    fn on_tagged_scalar(
        &mut self,
        tag: &str,
        text: &str,
        _context: &Context,
    ) -> Result<Option<Value>> {
        if tag == INCLUDE_TAG {
            return self.include(text).map(Some);
        }
        Ok(None)
    }
}

/// Load an inline document with `policy`, named [`ANONYMOUS_SOURCE`].
///
/// ```rust
/// use canon_yaml::{Error, OrderPolicy, load};
///
/// assert!(load("a: 1\nb: 2\n", OrderPolicy::Natural).is_ok());
/// assert!(matches!(
///     load("b: 1\na: 2\n", OrderPolicy::Natural),
///     Err(Error::OrderViolation { .. })
/// ));
/// assert!(load("b: 1\na: 2\n", OrderPolicy::None).is_ok());
/// ```
///
/// # Errors
///
/// See [`Loader::load_str`].
pub fn load(content: &str, policy: OrderPolicy) -> Result<Value> {
    Loader::new(policy).load_str(content)
}

/// Load an inline document, naming it `source_name` in provenance.
///
/// # Errors
///
/// See [`Loader::load_str`].
pub fn load_named(content: &str, source_name: &str, policy: OrderPolicy) -> Result<Value> {
    Loader::new(policy)
        .with_source_name(source_name)
        .load_str(content)
}

/// Load a file.
///
/// # Errors
///
/// See [`Loader::load_path`].
pub fn load_path(path: impl AsRef<Path>, policy: OrderPolicy) -> Result<Value> {
    Loader::new(policy).load_path(path)
}
