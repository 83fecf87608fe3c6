//! Response models for opened environments.

use crate::error::{ValueError, ValueResult};
use crate::node::{Properties, ValueNode, decode_properties};
use crate::path::resolve;
use crate::projection::{PlainValue, project_properties};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Response of the "open environment" operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpenEnvironment {
    /// Open session id, used to read the resolved environment
    pub id: String,
    /// Diagnostics produced while opening, passed through untouched
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diagnostics: Option<Value>,
}

/// A resolved environment as returned by "read open environment".
///
/// Only `properties` is interpreted; `exprs` and `schema` are carried as
/// opaque JSON.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "Value")]
pub struct Environment {
    /// Top-level properties of the environment
    pub properties: Properties,
    /// Expression tree, as sent by the service
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exprs: Option<Value>,
    /// Schema of the properties, as sent by the service
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<Value>,
}

impl Environment {
    /// Decode an environment from a raw JSON response body.
    ///
    /// A missing or `null` `properties` field decodes to an empty environment.
    ///
    /// # Errors
    ///
    /// Returns [`ValueError::MalformedTree`] if the body or any property is
    /// not shaped like an annotated value tree.
    pub fn from_json(value: &Value) -> ValueResult<Self> {
        let Value::Object(fields) = value else {
            return Err(ValueError::malformed(
                "$",
                "expected an environment object",
            ));
        };

        let properties = match fields.get("properties") {
            None | Some(Value::Null) => Properties::new(),
            Some(properties) => decode_properties(properties, "properties")?,
        };

        Ok(Self {
            properties,
            exprs: fields.get("exprs").filter(|v| !v.is_null()).cloned(),
            schema: fields.get("schema").filter(|v| !v.is_null()).cloned(),
        })
    }

    /// Plain values of every property, with annotations stripped.
    #[must_use]
    pub fn values(&self) -> Map<String, PlainValue> {
        project_properties(&self.properties)
    }

    /// Resolve a dot-separated property path.
    ///
    /// # Errors
    ///
    /// See [`resolve`].
    pub fn property(&self, path: &str) -> ValueResult<&ValueNode> {
        resolve(&self.properties, path)
    }

    /// Names of the top-level properties whose subtree contains a secret.
    pub fn secret_properties(&self) -> impl Iterator<Item = &str> {
        self.properties
            .iter()
            .filter(|(_, node)| node.contains_secret())
            .map(|(key, _)| key.as_str())
    }
}

impl TryFrom<Value> for Environment {
    type Error = ValueError;

    fn try_from(value: Value) -> ValueResult<Self> {
        Self::from_json(&value)
    }
}
