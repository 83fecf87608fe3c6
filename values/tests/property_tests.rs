//! Property-based tests for value trees.
//!
//! Uses proptest with 100 iterations per property.

use esc_values::*;
use proptest::prelude::*;
use serde_json::Value;
use test_utils::{key_strategy, leaf_node_strategy, object_node_strategy, value_node_strategy};

fn same_shape(node: &ValueNode, plain: &Value) -> bool {
    match (node.payload(), plain) {
        (None | Some(ValuePayload::Null), Value::Null)
        | (Some(ValuePayload::Bool(_)), Value::Bool(_))
        | (Some(ValuePayload::Number(_)), Value::Number(_))
        | (Some(ValuePayload::String(_)), Value::String(_)) => true,
        (Some(ValuePayload::Array(items)), Value::Array(values)) => {
            items.len() == values.len()
                && items.iter().zip(values).all(|(n, v)| same_shape(n, v))
        }
        (Some(ValuePayload::Object(children)), Value::Object(values)) => {
            children.len() == values.len()
                && children
                    .iter()
                    .zip(values)
                    .all(|((k, n), (vk, v))| k == vk && same_shape(n, v))
        }
        _ => false,
    }
}

fn clear_annotations(node: &ValueNode) -> ValueNode {
    let payload = node.payload().map(|payload| match payload {
        ValuePayload::Array(items) => ValuePayload::Array(items.iter().map(clear_annotations).collect()),
        ValuePayload::Object(children) => ValuePayload::Object(
            children
                .iter()
                .map(|(k, n)| (k.clone(), clear_annotations(n)))
                .collect(),
        ),
        scalar => scalar.clone(),
    });
    ValueNode {
        value: payload,
        secret: false,
        unknown: false,
        trace: Trace::default(),
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Projection keeps the tree's shape, key order and sequence lengths.
    #[test]
    fn prop_projection_preserves_shape(node in value_node_strategy()) {
        let plain = project(&node);
        prop_assert!(same_shape(&node, &plain), "shape mismatch: {:?} vs {}", node, plain);
    }

    /// A leaf projects to exactly its payload.
    #[test]
    fn prop_leaf_projects_to_payload(node in leaf_node_strategy()) {
        let expected = serde_json::to_value(node.payload()).unwrap();
        prop_assert_eq!(project(&node), expected);
    }

    /// Secret flags and traces never change the projected value.
    #[test]
    fn prop_annotations_do_not_affect_projection(node in value_node_strategy()) {
        prop_assert_eq!(project(&node), project(&clear_annotations(&node)));
    }

    /// Every top-level key resolves to its own node, annotations intact.
    #[test]
    fn prop_top_level_paths_resolve(root in object_node_strategy()) {
        let properties = root.as_object().unwrap();
        for (key, child) in properties {
            let found = resolve(properties, key).unwrap();
            prop_assert_eq!(found, child);
        }
    }

    /// Two-segment paths reach grandchildren of mapping children.
    #[test]
    fn prop_nested_paths_resolve(root in object_node_strategy()) {
        let properties = root.as_object().unwrap();
        for (key, child) in properties {
            if let Some(grandchildren) = child.as_object() {
                for (inner, grandchild) in grandchildren {
                    let path = format!("{key}.{inner}");
                    prop_assert_eq!(resolve(properties, &path).unwrap(), grandchild);
                }
            }
        }
    }

    /// Missing keys report the missing segment.
    #[test]
    fn prop_missing_key_is_not_found(root in object_node_strategy(), key in key_strategy()) {
        let properties = root.as_object().unwrap();
        prop_assume!(!properties.contains_key(&key));
        let err = resolve(properties, &key).unwrap_err();
        let is_not_found = matches!(err, ValueError::PathNotFound { ref segment, .. } if *segment == key);
        prop_assert!(is_not_found, "unexpected error {:?}", err);
    }

    /// Serializing a tree and decoding it again yields the same tree.
    #[test]
    fn prop_wire_roundtrip(node in value_node_strategy()) {
        let wire = serde_json::to_value(&node).unwrap();
        let back = ValueNode::from_json(&wire).unwrap();
        prop_assert_eq!(back, node);
    }

    /// `contains_secret` agrees with a walk over the projected-away flags.
    #[test]
    fn prop_contains_secret_matches_flags(node in value_node_strategy()) {
        fn any_secret(node: &ValueNode) -> bool {
            node.secret
                || match node.payload() {
                    Some(ValuePayload::Array(items)) => items.iter().any(any_secret),
                    Some(ValuePayload::Object(children)) => children.values().any(any_secret),
                    _ => false,
                }
        }
        prop_assert_eq!(node.contains_secret(), any_secret(&node));
    }
}
