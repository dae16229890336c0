//! Event-driven tree builder.
//!
//! [`build_tree`] drives the yaml-rust2 event parser and assembles a
//! [`Value`] tree. Mapping construction and tagged scalars are handed to a
//! [`NodeHooks`] implementation, which is where key-order checks and file
//! inclusion live (see [`crate::Loader`]). Everything else (scalar
//! resolution, core `!!` tags, anchors, aliases, merge keys) is handled here.

use std::collections::HashMap;

use yaml_rust2::Yaml;
use yaml_rust2::parser::{Event, MarkedEventReceiver, Parser, Tag};
use yaml_rust2::scanner::{Marker, TScalarStyle};

use crate::{Context, Error, Result, Scalar, Value};

/// Prefix the parser expands `!!` tags to.
const CORE_TAG_PREFIX: &str = "tag:yaml.org,2002:";

/// The merge key, `<<`, as a plain scalar in key position.
const MERGE_KEY: &str = "<<";

/// Callbacks for the nodes whose construction is customizable.
pub trait NodeHooks {
    /// Construct the value for a mapping node.
    ///
    /// `pairs` are in document order, merge keys already flattened.
    /// `context` is the position where the mapping starts.
    fn on_mapping(&mut self, pairs: Vec<(Scalar, Value)>, context: Context) -> Result<Value>;

    /// Construct the value for a scalar carrying a tag.
    ///
    /// `tag` is the full tag (`!include`, `tag:yaml.org,2002:str`). Return
    /// `Ok(None)` to fall back to the core tag handling.
    fn on_tagged_scalar(
        &mut self,
        tag: &str,
        text: &str,
        context: &Context,
    ) -> Result<Option<Value>>;
}

/// Parse `content` into a value tree, calling `hooks` for every mapping and
/// tagged scalar.
///
/// An empty stream yields null. More than one document is an error.
///
/// # Errors
///
/// Returns [`Error::Syntax`] for malformed YAML, and whatever the hooks
/// return for the nodes they construct.
pub fn build_tree<H: NodeHooks + ?Sized>(
    content: &str,
    source_name: &str,
    hooks: &mut H,
) -> Result<Value> {
    let mut parser = Parser::new_from_str(content);
    let mut builder = TreeBuilder::new(source_name, hooks);

    parser
        .load(&mut builder, true)
        .map_err(|err| Error::syntax(&err, source_name))?;

    builder.result()
}

/// Builder that implements MarkedEventReceiver to construct the tree.
struct TreeBuilder<'h, H: ?Sized> {
    source_name: String,

    hooks: &'h mut H,

    /// Stack of collections being constructed
    stack: Vec<BuildNode>,

    /// Completed anchored nodes, by anchor id
    anchors: HashMap<usize, Value>,

    documents: usize,

    /// The completed root node
    root: Option<Value>,

    /// First failure; later events are ignored once set
    error: Option<Error>,
}

/// A collection being constructed during parsing.
enum BuildNode {
    Sequence {
        anchor_id: usize,
        items: Vec<Value>,
    },

    Mapping {
        anchor_id: usize,
        /// Stream offset of the mapping start event
        start: usize,
        context: Context,
        entries: Vec<Entry>,
    },
}

/// A mapping entry whose value may not have arrived yet.
struct Entry {
    key: Value,
    is_merge: bool,
    value: Option<Value>,
}

impl<'h, H: NodeHooks + ?Sized> TreeBuilder<'h, H> {
    fn new(source_name: &str, hooks: &'h mut H) -> Self {
        Self {
            source_name: source_name.to_string(),
            hooks,
            stack: Vec::new(),
            anchors: HashMap::new(),
            documents: 0,
            root: None,
            error: None,
        }
    }

    fn result(self) -> Result<Value> {
        if let Some(err) = self.error {
            return Err(err);
        }
        Ok(self.root.unwrap_or_else(Value::null))
    }

    fn context(&self, marker: &Marker) -> Context {
        Context::from_marker(marker, &self.source_name)
    }

    /// Move a block mapping's context back to its first key.
    ///
    /// The parser marks a block mapping at the first key's `:`; the first
    /// key event carries where the mapping actually begins. Flow mappings
    /// are marked at `{`, which no key precedes.
    fn note_child_start(&mut self, marker: &Marker) {
        if let Some(BuildNode::Mapping {
            start,
            context,
            entries,
            ..
        }) = self.stack.last_mut()
        {
            if entries.is_empty() && marker.index() < *start {
                *context = Context::from_marker(marker, &self.source_name);
            }
        }
    }

    /// Attach a finished node to its parent, or make it the root.
    ///
    /// `is_merge` marks a plain `<<` scalar; it only matters in key position.
    fn push_complete(&mut self, node: Value, is_merge: bool) {
        match self.stack.last_mut() {
            None => self.root = Some(node),
            Some(BuildNode::Sequence { items, .. }) => items.push(node),
            Some(BuildNode::Mapping { entries, .. }) => {
                if let Some(Entry { value, .. }) = entries.last_mut() {
                    if value.is_none() {
                        *value = Some(node);
                        return;
                    }
                }
                // This is a new key
                entries.push(Entry {
                    key: node,
                    is_merge,
                    value: None,
                });
            }
        }
    }

    fn register_anchor(&mut self, anchor_id: usize, node: &Value) {
        if anchor_id > 0 {
            self.anchors.insert(anchor_id, node.clone());
        }
    }

    fn on_scalar(
        &mut self,
        text: String,
        style: TScalarStyle,
        anchor_id: usize,
        tag: Option<Tag>,
        marker: Marker,
    ) -> Result<()> {
        let is_merge = style == TScalarStyle::Plain && tag.is_none() && text == MERGE_KEY;
        let node = match tag {
            Some(tag) => {
                let context = self.context(&marker);
                let name = format!("{}{}", tag.handle, tag.suffix);
                match self.hooks.on_tagged_scalar(&name, &text, &context)? {
                    Some(node) => node,
                    None => core_tagged_scalar(&tag, text, context)?,
                }
            }
            None if style == TScalarStyle::Plain => resolve_plain(text),
            None => Value::Scalar(Scalar::String(text)),
        };
        self.register_anchor(anchor_id, &node);
        self.push_complete(node, is_merge);
        Ok(())
    }

    fn on_mapping_end(&mut self) -> Result<()> {
        let Some(BuildNode::Mapping {
            anchor_id,
            context,
            entries,
            ..
        }) = self.stack.pop()
        else {
            return Err(Error::invalid(
                "mapping end without a mapping start",
                Context::new(self.source_name.as_str(), 0, 0),
            ));
        };

        let pairs = flatten_entries(entries, &context)?;
        let node = self.hooks.on_mapping(pairs, context)?;
        self.register_anchor(anchor_id, &node);
        self.push_complete(node, false);
        Ok(())
    }

    fn on_sequence_end(&mut self) -> Result<()> {
        let Some(BuildNode::Sequence { anchor_id, items }) = self.stack.pop() else {
            return Err(Error::invalid(
                "sequence end without a sequence start",
                Context::new(self.source_name.as_str(), 0, 0),
            ));
        };
        let node = Value::Sequence(items);
        self.register_anchor(anchor_id, &node);
        self.push_complete(node, false);
        Ok(())
    }

    fn handle(&mut self, ev: Event, marker: Marker) -> Result<()> {
        if matches!(
            ev,
            Event::Scalar(..) | Event::SequenceStart(..) | Event::MappingStart(..) | Event::Alias(_)
        ) {
            self.note_child_start(&marker);
        }

        match ev {
            Event::Nothing | Event::StreamStart | Event::StreamEnd | Event::DocumentEnd => {}

            Event::DocumentStart => {
                self.documents += 1;
                if self.documents > 1 {
                    return Err(Error::invalid(
                        "expected a single document in the stream",
                        self.context(&marker),
                    ));
                }
            }

            Event::Scalar(text, style, anchor_id, tag) => {
                self.on_scalar(text, style, anchor_id, tag, marker)?;
            }

            Event::SequenceStart(anchor_id, tag) => {
                check_collection_tag(tag.as_ref(), "seq", || self.context(&marker))?;
                self.stack.push(BuildNode::Sequence {
                    anchor_id,
                    items: Vec::new(),
                });
            }

            Event::SequenceEnd => self.on_sequence_end()?,

            Event::MappingStart(anchor_id, tag) => {
                let context = self.context(&marker);
                check_collection_tag(tag.as_ref(), "map", || context.clone())?;
                self.stack.push(BuildNode::Mapping {
                    anchor_id,
                    start: marker.index(),
                    context,
                    entries: Vec::new(),
                });
            }

            Event::MappingEnd => self.on_mapping_end()?,

            Event::Alias(anchor_id) => {
                let Some(node) = self.anchors.get(&anchor_id).cloned() else {
                    return Err(Error::invalid(
                        "alias refers to a node that is not complete",
                        self.context(&marker),
                    ));
                };
                self.push_complete(node, false);
            }
        }
        Ok(())
    }
}

impl<H: NodeHooks + ?Sized> MarkedEventReceiver for TreeBuilder<'_, H> {
    fn on_event(&mut self, ev: Event, marker: Marker) {
        if self.error.is_some() {
            return;
        }
        if let Err(err) = self.handle(ev, marker) {
            self.error = Some(err);
        }
    }
}

/// Resolve an untagged plain scalar (ints, floats, bools, null, strings).
fn resolve_plain(text: String) -> Value {
    let scalar = Scalar::from_yaml(Yaml::from_str(&text)).unwrap_or(Scalar::String(text));
    Value::Scalar(scalar)
}

fn is_core(tag: &Tag) -> bool {
    tag.handle == CORE_TAG_PREFIX || tag.handle == "!!"
}

/// Construct a scalar carrying one of the core `!!` tags.
fn core_tagged_scalar(tag: &Tag, text: String, context: Context) -> Result<Value> {
    if !is_core(tag) {
        return Err(Error::invalid(
            format!(
                "could not determine a constructor for the tag {}{}",
                tag.handle, tag.suffix
            ),
            context,
        ));
    }

    let scalar = match tag.suffix.as_str() {
        "str" => Scalar::String(text),
        "int" => match text.parse::<i64>() {
            Ok(i) => Scalar::Integer(i),
            Err(_) => return Err(Error::invalid(format!("invalid !!int value '{text}'"), context)),
        },
        "float" => match Yaml::from_str(&text) {
            Yaml::Real(s) => Scalar::Real(s),
            Yaml::Integer(i) => Scalar::Real(i.to_string()),
            _ => return Err(Error::invalid(format!("invalid !!float value '{text}'"), context)),
        },
        "bool" => match text.as_str() {
            "true" | "True" | "TRUE" => Scalar::Bool(true),
            "false" | "False" | "FALSE" => Scalar::Bool(false),
            _ => return Err(Error::invalid(format!("invalid !!bool value '{text}'"), context)),
        },
        "null" => Scalar::Null,
        other => {
            return Err(Error::invalid(
                format!("unsupported scalar tag !!{other}"),
                context,
            ));
        }
    };
    Ok(Value::Scalar(scalar))
}

/// Collections accept only their own core tag (`!!map`, `!!seq`).
fn check_collection_tag(
    tag: Option<&Tag>,
    expected: &str,
    context: impl FnOnce() -> Context,
) -> Result<()> {
    match tag {
        None => Ok(()),
        Some(tag) if is_core(tag) && tag.suffix == expected => Ok(()),
        Some(tag) => Err(Error::invalid(
            format!(
                "could not determine a constructor for the tag {}{} on a collection",
                tag.handle, tag.suffix
            ),
            context(),
        )),
    }
}

/// Turn raw entries into key/value pairs, flattening merge keys.
///
/// Merged pairs come first, followed by the mapping's own pairs. For a
/// sequence of mappings, later mappings are merged first so earlier ones
/// win when the pairs are collected into a mapping.
fn flatten_entries(entries: Vec<Entry>, context: &Context) -> Result<Vec<(Scalar, Value)>> {
    let mut merged = Vec::new();
    let mut own = Vec::with_capacity(entries.len());

    for entry in entries {
        let value = entry.value.unwrap_or_else(Value::null);
        if entry.is_merge {
            match value {
                Value::Mapping(m) => merged.extend(m.into_pairs()),
                Value::Sequence(items) => {
                    for item in items.into_iter().rev() {
                        match item {
                            Value::Mapping(m) => merged.extend(m.into_pairs()),
                            _ => {
                                return Err(Error::invalid(
                                    "expected a mapping for merging",
                                    context.clone(),
                                ));
                            }
                        }
                    }
                }
                _ => {
                    return Err(Error::invalid(
                        "expected a mapping or list of mappings for merging",
                        context.clone(),
                    ));
                }
            }
            continue;
        }

        let key = match entry.key {
            Value::Scalar(key) => key,
            _ => {
                return Err(Error::invalid(
                    "found unhashable key (mapping keys must be scalars)",
                    context.clone(),
                ));
            }
        };
        own.push((key, value));
    }

    merged.extend(own);
    Ok(merged)
}
