//! Property-based tests for the eligibility codec and gate payloads.
//!
//! Uses proptest with 100 iterations per property.

use esc_gates::*;
use proptest::prelude::*;
use serde_json::{Value, json};
use test_utils::{eligibility_rule_strategy, eligibility_rules_strategy, unknown_tag_strategy};

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Every variant survives encode then decode.
    #[test]
    fn prop_rule_roundtrip(rule in eligibility_rule_strategy()) {
        let encoded = encode_rule(&rule).unwrap();
        prop_assert_eq!(decode_rule(&encoded).unwrap(), rule);
    }

    /// An encoded rule carries its tag and exactly its own field.
    #[test]
    fn prop_encoded_rule_has_only_own_fields(rule in eligibility_rule_strategy()) {
        let encoded = encode_rule(&rule).unwrap();
        let object = encoded.as_object().unwrap();
        prop_assert_eq!(object.len(), 2);
        prop_assert_eq!(
            object.get("eligibilityType").and_then(Value::as_str),
            Some(rule.eligibility_type().as_str())
        );
        let field = match rule {
            EligibilityRule::Permission(_) => "permission",
            EligibilityRule::User(_) => "userLogin",
            EligibilityRule::Team(_) => "teamName",
        };
        prop_assert!(object.contains_key(field), "missing {} in {}", field, encoded);
    }

    /// Sequences keep their order and variants.
    #[test]
    fn prop_rules_order_preserved(rules in eligibility_rules_strategy()) {
        let encoded = encode_rules(&rules).unwrap();
        prop_assert_eq!(encoded.len(), rules.len());
        prop_assert_eq!(decode_rules(&encoded).unwrap(), rules);
    }

    /// Unsupported tags are rejected and reported, never defaulted.
    #[test]
    fn prop_unknown_tag_rejected(tag in unknown_tag_strategy(), name in "[a-z]{1,10}") {
        let err = decode_rule(&json!({"eligibilityType": tag, "permission": name})).unwrap_err();
        let expected = Value::from(tag.as_str()).to_string();
        let is_unknown = matches!(err, GateError::UnknownEligibilityType { .. });
        prop_assert!(is_unknown, "unexpected error {:?}", err);
        prop_assert_eq!(err.seen_tag(), Some(expected.as_str()));
    }

    /// A broken element is reported at its own index.
    #[test]
    fn prop_bad_element_index_reported(
        rules in prop::collection::vec(eligibility_rule_strategy(), 1..8),
        position in any::<prop::sample::Index>(),
    ) {
        let mut encoded = encode_rules(&rules).unwrap();
        let index = position.index(encoded.len());
        encoded[index].as_object_mut().unwrap().remove("eligibilityType");

        let err = decode_rules(&encoded).unwrap_err();
        prop_assert_eq!(err.approver_index(), Some(index));
    }

    /// Create payloads carry the fixed structural fields.
    #[test]
    fn prop_create_request_fixed_fields(
        rules in eligibility_rules_strategy(),
        num in 1..10_u32,
        project in "[a-z]{1,10}",
        env in "[a-z]{1,10}",
    ) {
        let config = ChangeGateConfig::new("gate", true, num, rules.clone());
        let body = serde_json::to_value(config.to_create_request(&project, &env).unwrap()).unwrap();

        prop_assert_eq!(&body["rule"]["ruleType"], &json!("approval_required"));
        prop_assert_eq!(&body["rule"]["numApprovalsRequired"], &json!(num));
        prop_assert_eq!(&body["target"]["entityType"], &json!("environment"));
        prop_assert_eq!(&body["target"]["qualifiedName"], &json!(format!("{project}/{env}")));
        prop_assert_eq!(&body["target"]["actionTypes"], &json!(["update"]));

        let rule = GateApprovalRule::from_json(&body["rule"]).unwrap();
        prop_assert_eq!(rule.eligible_approvers, rules);
    }
}
