//! Shared proptest generators for the ESC SDK crates.

use esc_gates::EligibilityRule;
use esc_values::{Pos, Range, Trace, ValueNode, ValuePayload};
use proptest::prelude::*;
use serde_json::Number;

/// Generate property keys. Keys never contain `.`, so every generated key is
/// addressable by a dotted path.
pub fn key_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z_][a-zA-Z0-9_-]{0,11}"
}

/// Generate scalar numbers: integers and finite floats.
pub fn number_strategy() -> impl Strategy<Value = Number> {
    prop_oneof![
        any::<i64>().prop_map(Number::from),
        any::<u64>().prop_map(Number::from),
        (-1.0e12_f64..1.0e12).prop_filter_map("finite float", Number::from_f64),
    ]
}

/// Generate scalar payloads.
pub fn scalar_payload_strategy() -> impl Strategy<Value = ValuePayload> {
    prop_oneof![
        Just(ValuePayload::Null),
        any::<bool>().prop_map(ValuePayload::Bool),
        number_strategy().prop_map(ValuePayload::Number),
        "[ -~]{0,24}".prop_map(ValuePayload::String),
    ]
}

/// Generate source positions.
pub fn pos_strategy() -> impl Strategy<Value = Pos> {
    (1..500_i64, 1..120_i64, 0..20_000_i64).prop_map(|(line, column, byte)| Pos {
        line,
        column,
        byte,
    })
}

/// Generate definition traces, sometimes empty.
pub fn trace_strategy() -> impl Strategy<Value = Trace> {
    prop::option::of(("[a-z]{1,8}/[a-z]{1,8}", pos_strategy(), pos_strategy())).prop_map(
        |def| Trace {
            def: def.map(|(environment, begin, end)| Range {
                environment,
                begin,
                end,
            }),
            base: None,
        },
    )
}

/// Generate leaf nodes with random flags and traces.
pub fn leaf_node_strategy() -> impl Strategy<Value = ValueNode> {
    (scalar_payload_strategy(), any::<bool>(), trace_strategy())
        .prop_map(|(payload, secret, trace)| ValueNode::new(payload).with_secret(secret).with_trace(trace))
}

/// Generate unresolved nodes: no payload, `unknown` set.
pub fn unresolved_node_strategy() -> impl Strategy<Value = ValueNode> {
    trace_strategy().prop_map(|trace| ValueNode::unresolved().with_trace(trace))
}

/// Generate value trees up to four levels deep.
pub fn value_node_strategy() -> impl Strategy<Value = ValueNode> {
    let leaf = prop_oneof![4 => leaf_node_strategy(), 1 => unresolved_node_strategy()];
    leaf.prop_recursive(4, 64, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..6).prop_map(ValueNode::new),
            prop::collection::vec((key_strategy(), inner), 0..6)
                .prop_map(|entries| ValueNode::new(ValuePayload::object(entries))),
        ]
    })
}

/// Generate mapping nodes, the shape every environment root has.
pub fn object_node_strategy() -> impl Strategy<Value = ValueNode> {
    prop::collection::vec((key_strategy(), value_node_strategy()), 0..6)
        .prop_map(|entries| ValueNode::new(ValuePayload::object(entries)))
}

/// Generate eligibility rules of every variant.
pub fn eligibility_rule_strategy() -> impl Strategy<Value = EligibilityRule> {
    prop_oneof![
        "[a-z]{3,12}:[a-z]{3,12}".prop_map(EligibilityRule::permission),
        "[a-z][a-z0-9-]{2,20}".prop_map(EligibilityRule::user),
        "[a-z][a-z0-9 -]{2,20}".prop_map(EligibilityRule::team),
    ]
}

/// Generate ordered approver lists.
pub fn eligibility_rules_strategy() -> impl Strategy<Value = Vec<EligibilityRule>> {
    prop::collection::vec(eligibility_rule_strategy(), 0..8)
}

/// Generate unsupported `eligibilityType` tags.
pub fn unknown_tag_strategy() -> impl Strategy<Value = String> {
    "[a-z_]{1,24}".prop_filter("known tag", |tag| {
        !matches!(
            tag.as_str(),
            "has_permission_on_target" | "has_user_login" | "has_team_membership"
        )
    })
}
