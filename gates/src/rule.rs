//! The approval rule carried by a change gate.

use crate::eligibility::{EligibilityRule, decode_rules};
use crate::error::{GateError, GateResult};
use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Rule type discriminator of approval rules, the only kind supported.
pub const RULE_TYPE_APPROVAL_REQUIRED: &str = "approval_required";

/// Approval settings plus the ordered list of eligible approvers.
///
/// Serializes with `ruleType: "approval_required"` always set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GateApprovalRule {
    /// Number of approvals needed before a change applies
    pub num_approvals_required: u32,
    /// Whether the author of a change may approve it
    pub allow_self_approval: bool,
    /// Whether existing approvals are dropped when the change is edited
    pub require_reapproval_on_change: bool,
    /// Who may approve, in service order
    pub eligible_approvers: Vec<EligibilityRule>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RuleWire<'a> {
    rule_type: &'static str,
    num_approvals_required: u32,
    allow_self_approval: bool,
    require_reapproval_on_change: bool,
    eligible_approvers: &'a [EligibilityRule],
}

// Approvers stay untyped until each one has been dispatched on its tag.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawRule {
    num_approvals_required: u32,
    #[serde(default)]
    allow_self_approval: bool,
    #[serde(default)]
    require_reapproval_on_change: bool,
    #[serde(default)]
    eligible_approvers: Vec<Value>,
}

impl GateApprovalRule {
    /// Create a rule with the default flags: no self approval, reapproval
    /// required on change.
    #[must_use]
    pub const fn new(num_approvals_required: u32, eligible_approvers: Vec<EligibilityRule>) -> Self {
        Self {
            num_approvals_required,
            allow_self_approval: false,
            require_reapproval_on_change: true,
            eligible_approvers,
        }
    }

    /// Set whether self approval is allowed.
    #[must_use]
    pub const fn with_self_approval(mut self, allow: bool) -> Self {
        self.allow_self_approval = allow;
        self
    }

    /// Set whether edits require reapproval.
    #[must_use]
    pub const fn with_reapproval_on_change(mut self, require: bool) -> Self {
        self.require_reapproval_on_change = require;
        self
    }

    /// Check the rule can be sent to the service.
    ///
    /// # Errors
    ///
    /// Returns [`GateError::InvalidConfig`] if fewer than one approval is
    /// required.
    pub fn validate(&self) -> GateResult<()> {
        if self.num_approvals_required < 1 {
            return Err(GateError::invalid_config(
                "numApprovalsRequired must be at least 1",
            ));
        }
        Ok(())
    }

    /// Decode a `rule` object from a gate response.
    ///
    /// # Errors
    ///
    /// - [`GateError::UnsupportedRuleType`] if `ruleType` is present and is
    ///   not `approval_required`.
    /// - [`GateError::InvalidGate`] if the approval fields are missing or
    ///   mistyped, or no approval is required.
    /// - [`GateError::Approver`] if an eligible approver fails to decode.
    pub fn from_json(value: &Value) -> GateResult<Self> {
        match value.get("ruleType") {
            None | Some(Value::Null) => {}
            Some(Value::String(t)) if t == RULE_TYPE_APPROVAL_REQUIRED => {}
            Some(Value::String(t)) => return Err(GateError::UnsupportedRuleType(t.clone())),
            Some(other) => return Err(GateError::UnsupportedRuleType(other.to_string())),
        }

        let raw = RawRule::deserialize(value)
            .map_err(|e| GateError::invalid_gate(format!("rule: {e}")))?;

        let rule = Self {
            num_approvals_required: raw.num_approvals_required,
            allow_self_approval: raw.allow_self_approval,
            require_reapproval_on_change: raw.require_reapproval_on_change,
            eligible_approvers: decode_rules(&raw.eligible_approvers)?,
        };
        rule.validate()
            .map_err(|_| GateError::invalid_gate("rule: numApprovalsRequired is 0"))?;
        Ok(rule)
    }
}

impl Serialize for GateApprovalRule {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        RuleWire {
            rule_type: RULE_TYPE_APPROVAL_REQUIRED,
            num_approvals_required: self.num_approvals_required,
            allow_self_approval: self.allow_self_approval,
            require_reapproval_on_change: self.require_reapproval_on_change,
            eligible_approvers: &self.eligible_approvers,
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for GateApprovalRule {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Self::from_json(&value).map_err(de::Error::custom)
    }
}
