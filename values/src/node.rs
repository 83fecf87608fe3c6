//! The annotated value tree returned by the ESC service.
//!
//! Every node of a resolved environment carries its payload together with
//! sensitivity flags and a provenance trace. Annotations exist at every level
//! of nesting: the children of a mapping or sequence are full [`ValueNode`]s.
//!
//! On the wire a node is a JSON object with a required `trace` field and
//! optional `value`, `secret` and `unknown` fields:
//!
//! ```json
//! {
//!   "value": "shh",
//!   "secret": true,
//!   "trace": {
//!     "def": {
//!       "environment": "app/prod",
//!       "begin": {"line": 4, "column": 5, "byte": 31},
//!       "end": {"line": 4, "column": 25, "byte": 51}
//!     }
//!   }
//! }
//! ```

use crate::error::{ValueError, ValueResult};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

/// Named value nodes, in the order the service returned them.
pub type Properties = IndexMap<String, ValueNode>;

/// Location used for the root of a standalone node in decode errors.
pub(crate) const ROOT: &str = "$";

/// One node of a resolved configuration/secret tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Value")]
pub struct ValueNode {
    /// The node's payload. `None` when the service sent no `value` at all,
    /// which happens for values that could not be resolved yet.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<ValuePayload>,
    /// The payload originated from a secret source
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub secret: bool,
    /// The value could not be resolved at this time
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub unknown: bool,
    /// Where the value was defined and what it overrode
    pub trace: Trace,
}

/// Payload of a [`ValueNode`].
///
/// Numbers are kept as [`serde_json::Number`] so that whatever the wire
/// carried (`3` or `3.0`) comes back out unchanged.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ValuePayload {
    /// Explicit JSON `null`
    Null,
    /// Boolean scalar
    Bool(bool),
    /// Numeric scalar
    Number(Number),
    /// String scalar
    String(String),
    /// Ordered sequence of annotated children
    Array(Vec<ValueNode>),
    /// Mapping of annotated children
    Object(Properties),
}

/// Provenance of a value.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Trace {
    /// Source range the value was defined at
    #[serde(skip_serializing_if = "Option::is_none")]
    pub def: Option<Range>,
    /// The value this one overrode or inherited from
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base: Option<Box<ValueNode>>,
}

/// A source range inside an environment definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Range {
    /// Name of the environment the range belongs to
    pub environment: String,
    /// Start position
    pub begin: Pos,
    /// End position
    pub end: Pos,
}

/// A position inside an environment definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Pos {
    /// 1-based line
    pub line: i64,
    /// 1-based column
    pub column: i64,
    /// 0-based byte offset
    pub byte: i64,
}

impl ValueNode {
    /// Create a node with the given payload and an empty trace.
    #[must_use]
    pub fn new(value: impl Into<ValuePayload>) -> Self {
        Self {
            value: Some(value.into()),
            secret: false,
            unknown: false,
            trace: Trace::default(),
        }
    }

    /// Create an unresolved node: no payload, `unknown` set.
    #[must_use]
    pub fn unresolved() -> Self {
        Self {
            value: None,
            secret: false,
            unknown: true,
            trace: Trace::default(),
        }
    }

    /// Mark the node as secret.
    #[must_use]
    pub const fn with_secret(mut self, secret: bool) -> Self {
        self.secret = secret;
        self
    }

    /// Set the node's trace.
    #[must_use]
    pub fn with_trace(mut self, trace: Trace) -> Self {
        self.trace = trace;
        self
    }

    /// Decode a node from a raw JSON response body.
    ///
    /// # Errors
    ///
    /// Returns [`ValueError::MalformedTree`] naming the offending location if
    /// the document is not an annotated value tree.
    pub fn from_json(value: &Value) -> ValueResult<Self> {
        decode_node(value, ROOT)
    }

    /// The node's payload, if the service sent one.
    #[must_use]
    pub const fn payload(&self) -> Option<&ValuePayload> {
        self.value.as_ref()
    }

    /// Children of a mapping node.
    #[must_use]
    pub const fn as_object(&self) -> Option<&Properties> {
        match &self.value {
            Some(ValuePayload::Object(children)) => Some(children),
            _ => None,
        }
    }

    /// Children of a sequence node.
    #[must_use]
    pub fn as_array(&self) -> Option<&[Self]> {
        match &self.value {
            Some(ValuePayload::Array(items)) => Some(items),
            _ => None,
        }
    }

    /// Whether this node or any node below it is secret.
    ///
    /// Check this before projecting: projection drops the flag.
    #[must_use]
    pub fn contains_secret(&self) -> bool {
        self.secret || self.children().any(Self::contains_secret)
    }

    /// Whether this node or any node below it is unresolved.
    #[must_use]
    pub fn contains_unknown(&self) -> bool {
        self.unknown || self.children().any(Self::contains_unknown)
    }

    /// The chain of values this one overrode, nearest first.
    pub fn provenance(&self) -> impl Iterator<Item = &Self> {
        std::iter::successors(self.trace.base.as_deref(), |node| {
            node.trace.base.as_deref()
        })
    }

    fn children(&self) -> Box<dyn Iterator<Item = &Self> + '_> {
        match &self.value {
            Some(ValuePayload::Array(items)) => Box::new(items.iter()),
            Some(ValuePayload::Object(children)) => Box::new(children.values()),
            _ => Box::new(std::iter::empty()),
        }
    }
}

impl TryFrom<Value> for ValueNode {
    type Error = ValueError;

    fn try_from(value: Value) -> ValueResult<Self> {
        Self::from_json(&value)
    }
}

impl ValuePayload {
    /// Build a mapping payload from `(key, node)` pairs.
    pub fn object<K: Into<String>>(entries: impl IntoIterator<Item = (K, ValueNode)>) -> Self {
        Self::Object(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Whether the payload is a scalar (including `null`).
    #[must_use]
    pub const fn is_scalar(&self) -> bool {
        !matches!(self, Self::Array(_) | Self::Object(_))
    }
}

impl From<&str> for ValuePayload {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for ValuePayload {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<bool> for ValuePayload {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for ValuePayload {
    fn from(n: i64) -> Self {
        Self::Number(n.into())
    }
}

impl From<Number> for ValuePayload {
    fn from(n: Number) -> Self {
        Self::Number(n)
    }
}

impl From<Vec<ValueNode>> for ValuePayload {
    fn from(items: Vec<ValueNode>) -> Self {
        Self::Array(items)
    }
}

impl From<Properties> for ValuePayload {
    fn from(children: Properties) -> Self {
        Self::Object(children)
    }
}

/// Decode a JSON object of named nodes, such as an environment's
/// `properties`. `path` is the location of the object, used in errors.
///
/// # Errors
///
/// Returns [`ValueError::MalformedTree`] if `value` is not an object or any
/// entry is not an annotated value.
pub fn decode_properties(value: &Value, path: &str) -> ValueResult<Properties> {
    let Value::Object(entries) = value else {
        return Err(ValueError::malformed(
            path,
            format!("expected an object of values, found {}", kind(value)),
        ));
    };

    entries
        .iter()
        .map(|(key, entry)| -> ValueResult<(String, ValueNode)> {
            Ok((key.clone(), decode_node(entry, &child_key(path, key))?))
        })
        .collect()
}

fn decode_node(value: &Value, path: &str) -> ValueResult<ValueNode> {
    let Value::Object(fields) = value else {
        return Err(ValueError::malformed(
            path,
            format!("expected an annotated value, found {}", kind(value)),
        ));
    };

    let Some(trace) = fields.get("trace") else {
        return Err(ValueError::malformed(
            path,
            "annotated value has no `trace` field",
        ));
    };

    let payload = fields
        .get("value")
        .map(|payload| decode_payload(payload, path))
        .transpose()?;

    Ok(ValueNode {
        value: payload,
        secret: flag(fields, "secret"),
        unknown: flag(fields, "unknown"),
        trace: decode_trace(trace, &format!("{path}.trace"))?,
    })
}

fn decode_payload(value: &Value, path: &str) -> ValueResult<ValuePayload> {
    Ok(match value {
        Value::Null => ValuePayload::Null,
        Value::Bool(b) => ValuePayload::Bool(*b),
        Value::Number(n) => ValuePayload::Number(n.clone()),
        Value::String(s) => ValuePayload::String(s.clone()),
        Value::Array(items) => ValuePayload::Array(
            items
                .iter()
                .enumerate()
                .map(|(i, item)| decode_node(item, &format!("{path}[{i}]")))
                .collect::<ValueResult<_>>()?,
        ),
        Value::Object(_) => ValuePayload::Object(decode_properties(value, path)?),
    })
}

fn decode_trace(value: &Value, path: &str) -> ValueResult<Trace> {
    let fields = match value {
        Value::Null => return Ok(Trace::default()),
        Value::Object(fields) => fields,
        other => {
            return Err(ValueError::malformed(
                path,
                format!("expected a trace object, found {}", kind(other)),
            ));
        }
    };

    let def = match fields.get("def") {
        None | Some(Value::Null) => None,
        Some(def) => decode_range(def, &format!("{path}.def"))?,
    };

    let base = match fields.get("base") {
        None | Some(Value::Null) => None,
        Some(base) => Some(Box::new(decode_node(base, &format!("{path}.base"))?)),
    };

    Ok(Trace { def, base })
}

// A range missing either endpoint is dropped rather than rejected.
fn decode_range(value: &Value, path: &str) -> ValueResult<Option<Range>> {
    let Value::Object(fields) = value else {
        return Err(ValueError::malformed(
            path,
            format!("expected a range object, found {}", kind(value)),
        ));
    };

    let begin = fields.get("begin").and_then(decode_pos);
    let end = fields.get("end").and_then(decode_pos);
    let (Some(begin), Some(end)) = (begin, end) else {
        return Ok(None);
    };

    let Some(environment) = fields.get("environment").and_then(Value::as_str) else {
        return Err(ValueError::malformed(path, "range has no `environment` name"));
    };

    Ok(Some(Range {
        environment: environment.to_string(),
        begin,
        end,
    }))
}

fn decode_pos(value: &Value) -> Option<Pos> {
    let fields = value.as_object()?;
    let coord = |key: &str| fields.get(key).and_then(as_integer);

    let (line, column, byte) = (coord("line"), coord("column"), coord("byte"));
    if line.is_none() && column.is_none() && byte.is_none() {
        return None;
    }

    Some(Pos {
        line: line.unwrap_or_default(),
        column: column.unwrap_or_default(),
        byte: byte.unwrap_or_default(),
    })
}

// Positions arrive as floating point numbers.
#[allow(clippy::cast_possible_truncation)]
fn as_integer(value: &Value) -> Option<i64> {
    value
        .as_i64()
        .or_else(|| value.as_f64().map(|f| f as i64))
}

fn flag(fields: &Map<String, Value>, key: &str) -> bool {
    fields.get(key).and_then(Value::as_bool).unwrap_or(false)
}

fn child_key(path: &str, key: &str) -> String {
    format!("{path}.{key}")
}

const fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
