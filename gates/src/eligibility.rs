//! Eligibility rules: who may approve a change.
//!
//! On the wire each rule is an object tagged by `eligibilityType`:
//!
//! ```json
//! {"eligibilityType": "has_permission_on_target", "permission": "environment:write"}
//! {"eligibilityType": "has_user_login", "userLogin": "alice"}
//! {"eligibilityType": "has_team_membership", "teamName": "platform"}
//! ```
//!
//! Decoding always looks at the tag first and then extracts the matching
//! variant's fields, so it works on a generic [`Value`] taken out of an
//! otherwise untyped response body. Unknown tags are an error.

use crate::error::{GateError, GateResult};
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Discriminator field name.
pub const ELIGIBILITY_TYPE_FIELD: &str = "eligibilityType";

/// Permission granted to environment admins.
pub const PERMISSION_ENVIRONMENT_ADMIN: &str = "environment:admin";

/// Permission granted to environment writers.
pub const PERMISSION_ENVIRONMENT_WRITE: &str = "environment:write";

/// The three eligibility tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EligibilityType {
    /// `has_permission_on_target`
    Permission,
    /// `has_user_login`
    User,
    /// `has_team_membership`
    Team,
}

impl EligibilityType {
    /// Every supported tag.
    pub const ALL: [Self; 3] = [Self::Permission, Self::User, Self::Team];

    /// Wire value of the tag.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Permission => "has_permission_on_target",
            Self::User => "has_user_login",
            Self::Team => "has_team_membership",
        }
    }
}

impl fmt::Display for EligibilityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EligibilityType {
    type Err = GateError;

    fn from_str(s: &str) -> GateResult<Self> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| GateError::unknown_eligibility_type(Value::from(s).to_string()))
    }
}

/// Approver must hold a permission on the gated environment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionEligibility {
    /// Permission name, e.g. `environment:write`
    pub permission: String,
}

/// Approver must be a specific user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserEligibility {
    /// User login
    pub user_login: String,
}

/// Approver must be a member of a team.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamEligibility {
    /// Team name
    pub team_name: String,
}

/// One clause describing who may approve a change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "eligibilityType")]
pub enum EligibilityRule {
    /// Permission-based eligibility
    #[serde(rename = "has_permission_on_target")]
    Permission(PermissionEligibility),
    /// User-based eligibility
    #[serde(rename = "has_user_login")]
    User(UserEligibility),
    /// Team-based eligibility
    #[serde(rename = "has_team_membership")]
    Team(TeamEligibility),
}

impl EligibilityRule {
    /// Permission-based rule.
    #[must_use]
    pub fn permission(permission: impl Into<String>) -> Self {
        Self::Permission(PermissionEligibility {
            permission: permission.into(),
        })
    }

    /// User-based rule.
    #[must_use]
    pub fn user(login: impl Into<String>) -> Self {
        Self::User(UserEligibility {
            user_login: login.into(),
        })
    }

    /// Team-based rule.
    #[must_use]
    pub fn team(name: impl Into<String>) -> Self {
        Self::Team(TeamEligibility {
            team_name: name.into(),
        })
    }

    /// Tag of this rule.
    #[must_use]
    pub const fn eligibility_type(&self) -> EligibilityType {
        match self {
            Self::Permission(_) => EligibilityType::Permission,
            Self::User(_) => EligibilityType::User,
            Self::Team(_) => EligibilityType::Team,
        }
    }
}

impl<'de> Deserialize<'de> for EligibilityRule {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        decode_rule(&value).map_err(de::Error::custom)
    }
}

/// Encode one rule as a tagged JSON object.
///
/// # Errors
///
/// Returns [`GateError::Serialization`] if serialization fails.
pub fn encode_rule(rule: &EligibilityRule) -> GateResult<Value> {
    Ok(serde_json::to_value(rule)?)
}

/// Encode rules in order.
///
/// # Errors
///
/// Returns the first encoding failure, tagged with its index.
pub fn encode_rules(rules: &[EligibilityRule]) -> GateResult<Vec<Value>> {
    rules
        .iter()
        .enumerate()
        .map(|(index, rule)| encode_rule(rule).map_err(|e| e.at_approver(index)))
        .collect()
}

/// Decode one tagged rule.
///
/// Fields that belong to no variant are ignored; the tag itself is matched
/// strictly.
///
/// # Errors
///
/// - [`GateError::MissingDiscriminator`] if the document is not an object or
///   has no (or a `null`) `eligibilityType`.
/// - [`GateError::UnknownEligibilityType`] for any other tag.
/// - [`GateError::InvalidEligibility`] if the variant's field is missing or
///   not a string.
pub fn decode_rule(value: &Value) -> GateResult<EligibilityRule> {
    let tag = match value.get(ELIGIBILITY_TYPE_FIELD) {
        None | Some(Value::Null) => return Err(GateError::MissingDiscriminator),
        Some(Value::String(tag)) => tag.parse::<EligibilityType>()?,
        Some(other) => return Err(GateError::unknown_eligibility_type(other.to_string())),
    };

    let invalid = |source| GateError::InvalidEligibility {
        tag: tag.to_string(),
        source,
    };

    match tag {
        EligibilityType::Permission => PermissionEligibility::deserialize(value)
            .map(EligibilityRule::Permission)
            .map_err(invalid),
        EligibilityType::User => UserEligibility::deserialize(value)
            .map(EligibilityRule::User)
            .map_err(invalid),
        EligibilityType::Team => TeamEligibility::deserialize(value)
            .map(EligibilityRule::Team)
            .map_err(invalid),
    }
}

/// Decode an `eligibleApprovers` array element by element.
///
/// # Errors
///
/// The first failing element, wrapped in [`GateError::Approver`] with its
/// index.
pub fn decode_rules(values: &[Value]) -> GateResult<Vec<EligibilityRule>> {
    values
        .iter()
        .enumerate()
        .map(|(index, value)| decode_rule(value).map_err(|e| e.at_approver(index)))
        .collect()
}

/// Builder for an ordered list of eligibility rules.
///
/// ```
/// use esc_gates::{EligibilityBuilder, EligibilityRule};
///
/// let approvers = EligibilityBuilder::new()
///     .environment_admins()
///     .user("alice")
///     .team("platform")
///     .build();
///
/// assert_eq!(approvers[1], EligibilityRule::user("alice"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct EligibilityBuilder {
    rules: Vec<EligibilityRule>,
}

impl EligibilityBuilder {
    /// Create an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Allow anyone with `environment:admin`.
    #[must_use]
    pub fn environment_admins(self) -> Self {
        self.permission(PERMISSION_ENVIRONMENT_ADMIN)
    }

    /// Allow anyone with `environment:write`.
    #[must_use]
    pub fn environment_writers(self) -> Self {
        self.permission(PERMISSION_ENVIRONMENT_WRITE)
    }

    /// Allow anyone holding `permission`.
    #[must_use]
    pub fn permission(mut self, permission: impl Into<String>) -> Self {
        self.rules.push(EligibilityRule::permission(permission));
        self
    }

    /// Allow a specific user.
    #[must_use]
    pub fn user(mut self, login: impl Into<String>) -> Self {
        self.rules.push(EligibilityRule::user(login));
        self
    }

    /// Allow members of a team.
    #[must_use]
    pub fn team(mut self, name: impl Into<String>) -> Self {
        self.rules.push(EligibilityRule::team(name));
        self
    }

    /// Finish, returning rules in insertion order.
    #[must_use]
    pub fn build(self) -> Vec<EligibilityRule> {
        self.rules
    }
}
