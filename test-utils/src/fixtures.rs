//! Test fixtures with sample service responses.

use serde_json::{Value, json};

/// Project used by the fixtures.
pub const PROJECT: &str = "app";

/// Environment used by the fixtures.
pub const ENV: &str = "prod";

/// Organization used by the fixtures.
pub const ORG: &str = "acme";

/// Open session id returned by [`open_environment_body`].
pub const OPEN_ID: &str = "open-1234";

fn range(environment: &str, line: i64, from: i64, to: i64) -> Value {
    json!({
        "environment": environment,
        "begin": {"line": line, "column": from, "byte": line * 40 + from},
        "end": {"line": line, "column": to, "byte": line * 40 + to}
    })
}

fn node(value: Value, line: i64) -> Value {
    json!({"value": value, "trace": {"def": range("app/prod", line, 3, 20)}})
}

/// Body of "open environment".
#[must_use]
pub fn open_environment_body() -> Value {
    json!({"id": OPEN_ID, "diagnostics": []})
}

/// Body of "read open environment": an import override, a secret, an array,
/// nested mappings, and one unresolved value.
#[must_use]
pub fn environment_body() -> Value {
    json!({
        "exprs": {"base": {"literal": "app/base"}},
        "properties": {
            "base": {
                "value": "app/base",
                "trace": {
                    "def": range("app/base", 2, 3, 11),
                    "base": {"value": "app/base", "trace": {"def": range("app/base", 2, 3, 11)}}
                }
            },
            "my_secret": {
                "value": "shh! don't tell anyone",
                "secret": true,
                "trace": {"def": range("app/prod", 4, 5, 31)}
            },
            "my_array": node(json!([node(json!(1), 5), node(json!(2), 5), node(json!(3), 5)]), 5),
            "pulumiConfig": node(json!({"foo": node(json!("bar"), 7)}), 6),
            "environmentVariables": node(json!({"FOO": node(json!("bar"), 9)}), 8),
            "pending": {"unknown": true, "trace": {"def": range("app/prod", 10, 3, 30)}}
        },
        "schema": {"type": "object"}
    })
}

/// Projected values of [`environment_body`].
#[must_use]
pub fn environment_values() -> Value {
    json!({
        "base": "app/base",
        "my_secret": "shh! don't tell anyone",
        "my_array": [1, 2, 3],
        "pulumiConfig": {"foo": "bar"},
        "environmentVariables": {"FOO": "bar"},
        "pending": null
    })
}

/// A gate record with mixed approvers.
#[must_use]
pub fn gate_body(id: &str) -> Value {
    json!({
        "id": id,
        "name": "prod-approval",
        "enabled": true,
        "target": {
            "entityType": "environment",
            "qualifiedName": "app/prod",
            "actionTypes": ["update"]
        },
        "rule": {
            "ruleType": "approval_required",
            "numApprovalsRequired": 2,
            "allowSelfApproval": false,
            "requireReapprovalOnChange": true,
            "eligibleApprovers": [
                {"eligibilityType": "has_permission_on_target", "permission": "environment:admin"},
                {"eligibilityType": "has_user_login", "userLogin": "alice"},
                {"eligibilityType": "has_team_membership", "teamName": "platform"}
            ]
        }
    })
}

/// Body of "list change gates" with two gates.
#[must_use]
pub fn gate_list_body() -> Value {
    json!({"gates": [gate_body("gate-1"), gate_body("gate-2")]})
}

/// A gate whose third approver carries an unsupported tag.
#[must_use]
pub fn gate_with_unknown_approver_body(id: &str) -> Value {
    let mut gate = gate_body(id);
    gate["rule"]["eligibleApprovers"][2] =
        json!({"eligibilityType": "has_group_membership", "groupName": "ops"});
    gate
}
