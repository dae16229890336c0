//! Canonical YAML output.
//!
//! Every mapping is written with its keys sorted by the order policy, so the
//! same tree always produces the same text no matter how it was built.
//! Sequences keep their order.

use std::fmt::{self, Write};

use serde::{Deserialize, Serialize};
use yaml_rust2::{Yaml, YamlEmitter};

use crate::{ContextMapping, OrderPolicy, Result, Scalar, Value};

/// Quoting applied to string scalars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScalarStyle {
    /// Plain where possible; the emitter quotes strings that need it.
    #[default]
    Plain,
    SingleQuoted,
    DoubleQuoted,
}

/// Emission settings.
///
/// Defaults: block layout, indent 2, plain scalars, explicit `---` start,
/// no tags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DumpOptions {
    /// Fully tagged, double-quoted, flow form with one entry per line
    pub canonical: bool,

    /// Spaces per nesting level; values outside 2..=9 fall back to 2
    pub indent: usize,

    pub default_style: ScalarStyle,

    /// Single-line flow collections instead of block layout
    pub flow_style: bool,

    /// Start the output with `---`
    pub explicit_start: bool,
}

impl Default for DumpOptions {
    fn default() -> Self {
        Self {
            canonical: false,
            indent: 2,
            default_style: ScalarStyle::Plain,
            flow_style: false,
            explicit_start: true,
        }
    }
}

/// Caller overrides of [`DumpOptions`]. Unset fields keep the default.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "kebab-case")]
pub struct DumpOverrides {
    pub canonical: Option<bool>,
    pub indent: Option<usize>,
    pub default_style: Option<ScalarStyle>,
    pub flow_style: Option<bool>,
    pub explicit_start: Option<bool>,
}

impl DumpOptions {
    /// Apply `overrides` on top of these options; set fields win.
    #[must_use]
    pub fn with_overrides(mut self, overrides: &DumpOverrides) -> Self {
        if let Some(canonical) = overrides.canonical {
            self.canonical = canonical;
        }
        if let Some(indent) = overrides.indent {
            self.indent = indent;
        }
        if let Some(style) = overrides.default_style {
            self.default_style = style;
        }
        if let Some(flow) = overrides.flow_style {
            self.flow_style = flow;
        }
        if let Some(explicit_start) = overrides.explicit_start {
            self.explicit_start = explicit_start;
        }
        self
    }

    fn effective_indent(&self) -> usize {
        if (2..=9).contains(&self.indent) {
            self.indent
        } else {
            2
        }
    }
}

impl DumpOverrides {
    /// Layer `other` over `self`; fields set in `other` win.
    #[must_use]
    pub fn merge(self, other: &DumpOverrides) -> Self {
        Self {
            canonical: other.canonical.or(self.canonical),
            indent: other.indent.or(self.indent),
            default_style: other.default_style.or(self.default_style),
            flow_style: other.flow_style.or(self.flow_style),
            explicit_start: other.explicit_start.or(self.explicit_start),
        }
    }
}

/// Write `value` to `out` in canonical key order.
///
/// `OrderPolicy::None` is treated as natural order; dumped output is always
/// sorted.
///
/// # Errors
///
/// Returns [`crate::Error::Emit`] when the sink or the scalar emitter fails.
pub fn dump<W: fmt::Write + ?Sized>(
    value: &Value,
    out: &mut W,
    policy: OrderPolicy,
    options: &DumpOptions,
) -> Result<()> {
    let mut emitter = Emitter {
        out,
        policy: policy.for_dump(),
        options,
        indent: options.effective_indent(),
    };
    emitter.document(value)
}

/// Dump into a new string.
///
/// ```rust
/// use canon_yaml::{DumpOptions, OrderPolicy, dump_to_string, load};
///
/// let value = load("b: 1\na2: 2\na10: 3\n", OrderPolicy::None).unwrap();
/// let text = dump_to_string(&value, OrderPolicy::Natural, &DumpOptions::default()).unwrap();
/// assert_eq!(text, "---\na2: 2\na10: 3\nb: 1\n");
/// ```
///
/// # Errors
///
/// See [`dump`].
pub fn dump_to_string(value: &Value, policy: OrderPolicy, options: &DumpOptions) -> Result<String> {
    let mut out = String::new();
    dump(value, &mut out, policy, options)?;
    Ok(out)
}

struct Emitter<'a, W: ?Sized> {
    out: &'a mut W,
    policy: OrderPolicy,
    options: &'a DumpOptions,
    indent: usize,
}

/// Whether a value is written across lines in block layout.
fn is_block(value: &Value) -> bool {
    match value {
        Value::Mapping(m) => !m.is_empty(),
        Value::Sequence(items) => !items.is_empty(),
        Value::Scalar(_) => false,
    }
}

impl<W: fmt::Write + ?Sized> Emitter<'_, W> {
    fn document(&mut self, value: &Value) -> Result<()> {
        if self.options.canonical {
            self.out.write_str("---\n")?;
            self.canonical_node(value, 0)?;
            self.out.write_char('\n')?;
            return Ok(());
        }

        if !self.options.flow_style && is_block(value) {
            if self.options.explicit_start {
                self.out.write_str("---\n")?;
            }
            return self.block_node(value, 0);
        }

        if self.options.explicit_start {
            self.out.write_str("--- ")?;
        }
        let text = self.flow_node(value)?;
        self.out.write_str(&text)?;
        self.out.write_char('\n')?;
        Ok(())
    }

    fn write_indent(&mut self, col: usize) -> Result<()> {
        write!(self.out, "{:col$}", "")?;
        Ok(())
    }

    fn block_node(&mut self, value: &Value, col: usize) -> Result<()> {
        match value {
            Value::Mapping(m) => self.block_mapping(m, col, false),
            Value::Sequence(items) => self.block_sequence(items, col, false),
            Value::Scalar(s) => {
                let text = self.scalar(s)?;
                writeln!(self.out, "{text}")?;
                Ok(())
            }
        }
    }

    /// Write a mapping whose keys start at `col`. With `inline_first` the
    /// cursor already sits at `col` for the first key.
    fn block_mapping(&mut self, m: &ContextMapping, col: usize, inline_first: bool) -> Result<()> {
        for (i, (key, value)) in m.sorted_pairs(self.policy).into_iter().enumerate() {
            if i > 0 || !inline_first {
                self.write_indent(col)?;
            }
            let key = self.scalar(key)?;
            self.out.write_str(&key)?;
            self.out.write_char(':')?;

            match value {
                Value::Mapping(child) if !child.is_empty() => {
                    self.out.write_char('\n')?;
                    self.block_mapping(child, col + self.indent, false)?;
                }
                // Sequences under a key are not indented.
                Value::Sequence(items) if !items.is_empty() => {
                    self.out.write_char('\n')?;
                    self.block_sequence(items, col, false)?;
                }
                other => {
                    let text = self.flow_node(other)?;
                    writeln!(self.out, " {text}")?;
                }
            }
        }
        Ok(())
    }

    fn block_sequence(&mut self, items: &[Value], col: usize, inline_first: bool) -> Result<()> {
        let child_col = col + self.indent;
        for (i, item) in items.iter().enumerate() {
            if i > 0 || !inline_first {
                self.write_indent(col)?;
            }
            write!(self.out, "{:<width$}", "-", width = self.indent)?;

            match item {
                Value::Mapping(child) if !child.is_empty() => {
                    self.block_mapping(child, child_col, true)?;
                }
                Value::Sequence(child) if !child.is_empty() => {
                    self.block_sequence(child, child_col, true)?;
                }
                other => {
                    let text = self.flow_node(other)?;
                    writeln!(self.out, "{text}")?;
                }
            }
        }
        Ok(())
    }

    /// Single-line rendering of any node.
    fn flow_node(&self, value: &Value) -> Result<String> {
        match value {
            Value::Scalar(s) => self.scalar(s),
            Value::Sequence(items) => {
                let parts = items
                    .iter()
                    .map(|item| self.flow_node(item))
                    .collect::<Result<Vec<_>>>()?;
                Ok(format!("[{}]", parts.join(", ")))
            }
            Value::Mapping(m) => {
                let parts = m
                    .sorted_pairs(self.policy)
                    .into_iter()
                    .map(|(k, v)| Ok(format!("{}: {}", self.scalar(k)?, self.flow_node(v)?)))
                    .collect::<Result<Vec<_>>>()?;
                Ok(format!("{{{}}}", parts.join(", ")))
            }
        }
    }

    fn scalar(&self, scalar: &Scalar) -> Result<String> {
        match scalar {
            Scalar::String(text) => match self.options.default_style {
                ScalarStyle::Plain => emit_plain(text),
                ScalarStyle::SingleQuoted => Ok(single_quoted(text)),
                ScalarStyle::DoubleQuoted => Ok(double_quoted(text)),
            },
            Scalar::Null => Ok("null".to_string()),
            Scalar::Bool(b) => Ok(b.to_string()),
            Scalar::Integer(i) => Ok(i.to_string()),
            Scalar::Real(s) => Ok(s.clone()),
        }
    }

    fn canonical_node(&mut self, value: &Value, col: usize) -> Result<()> {
        let inner = col + self.indent;
        match value {
            Value::Scalar(s) => {
                let (tag, text) = canonical_scalar(s);
                write!(self.out, "!!{tag} {}", double_quoted(&text))?;
            }
            Value::Sequence(items) if items.is_empty() => self.out.write_str("!!seq []")?,
            Value::Sequence(items) => {
                self.out.write_str("!!seq [\n")?;
                for item in items {
                    self.write_indent(inner)?;
                    self.canonical_node(item, inner)?;
                    self.out.write_str(",\n")?;
                }
                self.write_indent(col)?;
                self.out.write_char(']')?;
            }
            Value::Mapping(m) if m.is_empty() => self.out.write_str("!!map {}")?,
            Value::Mapping(m) => {
                self.out.write_str("!!map {\n")?;
                for (key, value) in m.sorted_pairs(self.policy) {
                    self.write_indent(inner)?;
                    let (tag, text) = canonical_scalar(key);
                    writeln!(self.out, "? !!{tag} {}", double_quoted(&text))?;
                    self.write_indent(inner)?;
                    self.out.write_str(": ")?;
                    self.canonical_node(value, inner)?;
                    self.out.write_str(",\n")?;
                }
                self.write_indent(col)?;
                self.out.write_char('}')?;
            }
        }
        Ok(())
    }
}

fn canonical_scalar(scalar: &Scalar) -> (&'static str, String) {
    match scalar {
        Scalar::Null => ("null", String::new()),
        Scalar::Bool(b) => ("bool", b.to_string()),
        Scalar::Integer(i) => ("int", i.to_string()),
        Scalar::Real(s) => ("float", s.clone()),
        Scalar::String(s) => ("str", s.clone()),
    }
}

/// Render a string the way the yaml-rust2 emitter does: plain unless the
/// text would read back as something else.
///
/// The emitter misses some spellings the loader resolves (`0o17`), so a
/// plain result is double-quoted unless it still resolves to a string.
fn emit_plain(text: &str) -> Result<String> {
    let mut out = String::new();
    YamlEmitter::new(&mut out).dump(&Yaml::String(text.to_string()))?;
    let scalar = out.strip_prefix("---").unwrap_or(&out).trim_start();
    if !scalar.starts_with(['"', '\'']) && !matches!(Yaml::from_str(scalar), Yaml::String(_)) {
        return Ok(double_quoted(text));
    }
    Ok(scalar.to_string())
}

fn single_quoted(text: &str) -> String {
    if text.chars().any(char::is_control) {
        return double_quoted(text);
    }
    format!("'{}'", text.replace('\'', "''"))
}

fn double_quoted(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for c in text.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            c if c.is_control() => {
                let _ = write!(out, "\\u{:04X}", c as u32);
            }
            c => out.push(c),
        }
    }
    out.push('"');
    out
}
