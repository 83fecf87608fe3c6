//! Change gate records as returned by get/list/create/update.
//!
//! Gate bodies are decoded in two passes: the fixed fields go through serde,
//! the `rule` goes through [`GateApprovalRule::from_json`] so each approver is
//! dispatched on its own tag.

use crate::error::{GateError, GateResult};
use crate::rule::GateApprovalRule;
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// What a gate protects.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GateTarget {
    /// Kind of entity, `environment` for environment gates
    #[serde(skip_serializing_if = "String::is_empty")]
    pub entity_type: String,
    /// `<project>/<environment>`
    #[serde(skip_serializing_if = "String::is_empty")]
    pub qualified_name: String,
    /// Actions the gate applies to
    pub action_types: Vec<String>,
}

/// A change gate with its approval rule fully typed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChangeGate {
    /// Gate id
    pub id: String,
    /// Display name
    pub name: String,
    /// Whether the gate is enforced
    pub enabled: bool,
    /// Protected entity
    pub target: GateTarget,
    /// Approval rule
    pub rule: GateApprovalRule,
}

#[derive(Deserialize)]
struct RawGate {
    id: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    enabled: bool,
    #[serde(default)]
    target: GateTarget,
    rule: Value,
}

/// Decode one gate record.
///
/// # Errors
///
/// - [`GateError::InvalidGate`] if the record is not an object or lacks
///   `id`/`rule`.
/// - Any error from [`GateApprovalRule::from_json`].
pub fn decode_gate(value: &Value) -> GateResult<ChangeGate> {
    if !value.is_object() {
        return Err(GateError::invalid_gate("expected a gate object"));
    }
    let raw = RawGate::deserialize(value).map_err(|e| GateError::invalid_gate(e.to_string()))?;

    Ok(ChangeGate {
        id: raw.id,
        name: raw.name,
        enabled: raw.enabled,
        target: raw.target,
        rule: GateApprovalRule::from_json(&raw.rule)?,
    })
}

impl<'de> Deserialize<'de> for ChangeGate {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        decode_gate(&value).map_err(de::Error::custom)
    }
}

/// Body of "list change gates".
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ListChangeGatesResponse {
    /// Gates, in service order
    pub gates: Vec<ChangeGate>,
}

/// Decode a gate list.
///
/// Accepts `{"gates": [...]}` or a bare array. A missing or `null` `gates`
/// field is an empty list.
///
/// # Errors
///
/// The first failing gate, wrapped in [`GateError::Gate`] with its index.
pub fn decode_gate_list(value: &Value) -> GateResult<ListChangeGatesResponse> {
    let items: &[Value] = match value {
        Value::Array(items) => items.as_slice(),
        Value::Object(fields) => match fields.get("gates") {
            None | Some(Value::Null) => &[],
            Some(Value::Array(items)) => items.as_slice(),
            Some(_) => return Err(GateError::invalid_gate("`gates` is not an array")),
        },
        _ => return Err(GateError::invalid_gate("expected a gate list")),
    };

    let gates = items
        .iter()
        .enumerate()
        .map(|(index, item)| decode_gate(item).map_err(|e| e.at_gate(index)))
        .collect::<GateResult<Vec<_>>>()?;

    Ok(ListChangeGatesResponse { gates })
}
