//! ESC change gates and their approval rules.
//!
//! A change gate requires a number of approvals, from a set of eligible
//! approvers, before a change to an environment applies. Eligibility rules are
//! a tagged union on the wire (`eligibilityType`), and the service's gate
//! responses carry them as untyped objects. This crate provides:
//! - [`EligibilityRule`] with a tag-dispatching codec and builder
//! - [`GateApprovalRule`] and the [`ChangeGate`] record
//! - Create/update configs and their request bodies
//! - Gate and gate list decoding with per-element error locations

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod eligibility;
pub mod error;
pub mod gate;
pub mod request;
pub mod rule;

pub use eligibility::{
    EligibilityBuilder, EligibilityRule, EligibilityType, PermissionEligibility, TeamEligibility,
    UserEligibility, decode_rule, decode_rules, encode_rule, encode_rules,
};
pub use error::{GateError, GateResult};
pub use gate::{ChangeGate, GateTarget, ListChangeGatesResponse, decode_gate, decode_gate_list};
pub use request::{
    ChangeGateConfig, ChangeGateUpdateConfig, CreateChangeGateRequest, UpdateChangeGateRequest,
    qualified_env_name,
};
pub use rule::GateApprovalRule;
