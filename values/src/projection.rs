//! Projection of annotated value trees into plain JSON values.
//!
//! Projection is a pure fold over the tree: scalars are returned unchanged,
//! sequences and mappings are rebuilt from their projected children, and
//! `secret`, `unknown` and `trace` are dropped. Callers who care about
//! sensitivity must look at the [`ValueNode`] before projecting.

use crate::node::{Properties, ValueNode, ValuePayload};
use serde_json::{Map, Value};

/// A plain configuration value: scalar, sequence or mapping, no annotations.
pub type PlainValue = Value;

/// Strip annotations from a node and everything below it.
///
/// A node without a payload projects to `null`.
#[must_use]
pub fn project(node: &ValueNode) -> PlainValue {
    node.value.as_ref().map_or(Value::Null, project_payload)
}

/// Project every named node of a mapping, preserving keys and their order.
///
/// Unresolved entries keep their key and project to `null`.
#[must_use]
pub fn project_properties(properties: &Properties) -> Map<String, PlainValue> {
    properties
        .iter()
        .map(|(key, node)| (key.clone(), project(node)))
        .collect()
}

fn project_payload(payload: &ValuePayload) -> PlainValue {
    match payload {
        ValuePayload::Null => Value::Null,
        ValuePayload::Bool(b) => Value::Bool(*b),
        ValuePayload::Number(n) => Value::Number(n.clone()),
        ValuePayload::String(s) => Value::String(s.clone()),
        ValuePayload::Array(items) => Value::Array(items.iter().map(project).collect()),
        ValuePayload::Object(children) => Value::Object(project_properties(children)),
    }
}

impl ValueNode {
    /// Strip annotations from this node; see [`project`].
    #[must_use]
    pub fn to_plain(&self) -> PlainValue {
        project(self)
    }
}
