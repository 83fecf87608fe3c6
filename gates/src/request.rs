//! Gate configurations and the create/update request bodies built from them.

use crate::eligibility::EligibilityRule;
use crate::error::GateResult;
use crate::gate::{ChangeGate, GateTarget};
use crate::rule::GateApprovalRule;
use serde::Serialize;

/// Entity type of environment gates.
pub const ENTITY_TYPE_ENVIRONMENT: &str = "environment";

/// The action environment gates protect.
pub const ACTION_TYPE_UPDATE: &str = "update";

/// Qualified environment name, `<project>/<env>`.
#[must_use]
pub fn qualified_env_name(project: &str, env: &str) -> String {
    format!("{project}/{env}")
}

/// Settings for a new environment change gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeGateConfig {
    /// Display name
    pub name: String,
    /// Whether the gate is enforced
    pub enabled: bool,
    /// Approval rule
    pub rule: GateApprovalRule,
}

impl ChangeGateConfig {
    /// Create a config. Self approval is off and reapproval on change is on.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        enabled: bool,
        num_approvals_required: u32,
        eligible_approvers: Vec<EligibilityRule>,
    ) -> Self {
        Self {
            name: name.into(),
            enabled,
            rule: GateApprovalRule::new(num_approvals_required, eligible_approvers),
        }
    }

    /// Set whether self approval is allowed.
    #[must_use]
    pub fn with_self_approval(mut self, allow: bool) -> Self {
        self.rule.allow_self_approval = allow;
        self
    }

    /// Set whether edits require reapproval.
    #[must_use]
    pub fn with_reapproval_on_change(mut self, require: bool) -> Self {
        self.rule.require_reapproval_on_change = require;
        self
    }

    /// Build the create body for a gate on `<project>/<env>`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::GateError::InvalidConfig`] if the rule is invalid.
    pub fn to_create_request(&self, project: &str, env: &str) -> GateResult<CreateChangeGateRequest> {
        self.rule.validate()?;
        Ok(CreateChangeGateRequest {
            name: self.name.clone(),
            enabled: self.enabled,
            rule: self.rule.clone(),
            target: GateTarget {
                entity_type: ENTITY_TYPE_ENVIRONMENT.to_string(),
                qualified_name: qualified_env_name(project, env),
                action_types: vec![ACTION_TYPE_UPDATE.to_string()],
            },
        })
    }
}

/// Settings for updating an existing gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeGateUpdateConfig {
    /// Display name
    pub name: String,
    /// Whether the gate is enforced
    pub enabled: bool,
    /// Approval rule
    pub rule: GateApprovalRule,
}

impl ChangeGateUpdateConfig {
    /// Create an update config from scratch, with the same defaults as
    /// [`ChangeGateConfig::new`].
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        enabled: bool,
        num_approvals_required: u32,
        eligible_approvers: Vec<EligibilityRule>,
    ) -> Self {
        Self {
            name: name.into(),
            enabled,
            rule: GateApprovalRule::new(num_approvals_required, eligible_approvers),
        }
    }

    /// Seed every field, approvers included, from an existing gate.
    #[must_use]
    pub fn from_gate(gate: &ChangeGate) -> Self {
        Self {
            name: gate.name.clone(),
            enabled: gate.enabled,
            rule: gate.rule.clone(),
        }
    }

    /// Rename the gate.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Enable or disable the gate.
    #[must_use]
    pub const fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Replace the approval count and approvers, keeping the flags.
    #[must_use]
    pub fn with_approval_rule(
        mut self,
        num_approvals_required: u32,
        eligible_approvers: Vec<EligibilityRule>,
    ) -> Self {
        self.rule.num_approvals_required = num_approvals_required;
        self.rule.eligible_approvers = eligible_approvers;
        self
    }

    /// Set whether self approval is allowed.
    #[must_use]
    pub fn with_self_approval(mut self, allow: bool) -> Self {
        self.rule.allow_self_approval = allow;
        self
    }

    /// Set whether edits require reapproval.
    #[must_use]
    pub fn with_reapproval_on_change(mut self, require: bool) -> Self {
        self.rule.require_reapproval_on_change = require;
        self
    }

    /// Build the update body. The target only names the action type; the
    /// gate's entity is fixed at creation.
    ///
    /// # Errors
    ///
    /// Returns [`crate::GateError::InvalidConfig`] if the rule is invalid.
    pub fn to_update_request(&self) -> GateResult<UpdateChangeGateRequest> {
        self.rule.validate()?;
        Ok(UpdateChangeGateRequest {
            name: self.name.clone(),
            enabled: self.enabled,
            rule: self.rule.clone(),
            target: GateTarget {
                action_types: vec![ACTION_TYPE_UPDATE.to_string()],
                ..GateTarget::default()
            },
        })
    }
}

/// Body of `POST /change-gates/{org}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateChangeGateRequest {
    /// Display name
    pub name: String,
    /// Whether the gate is enforced
    pub enabled: bool,
    /// Approval rule
    pub rule: GateApprovalRule,
    /// Gated environment
    pub target: GateTarget,
}

/// Body of `PUT /change-gates/{org}/{gate_id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpdateChangeGateRequest {
    /// Display name
    pub name: String,
    /// Whether the gate is enforced
    pub enabled: bool,
    /// Approval rule
    pub rule: GateApprovalRule,
    /// Action types only
    pub target: GateTarget,
}
