//! Client tests over the in-memory transport.

use esc_client::{EscClient, EscConfig, EscError};
use esc_gates::{ChangeGateConfig, ChangeGateUpdateConfig, EligibilityBuilder, EligibilityRule, GateError};
use esc_values::ValueError;
use rust_common::PlatformError;
use serde_json::{Value, json};
use test_utils::fixtures::{self, ENV, OPEN_ID, ORG, PROJECT};
use test_utils::{MockTransport, RequestMethod};

const SERVER: &str = "https://api.moolumi.com/api/esc";

fn client() -> EscClient<MockTransport> {
    EscClient::new(
        EscConfig::new("https://api.moolumi.com").with_access_token("pul-test"),
        MockTransport::new(),
    )
    .unwrap()
}

#[tokio::test]
async fn test_open_environment() {
    let client = client();
    client.transport().respond_with(fixtures::open_environment_body()).await;

    let opened = client.open_environment(ORG, PROJECT, ENV).await.unwrap();
    assert_eq!(opened.id, OPEN_ID);

    let request = client.transport().last_request().await.unwrap();
    assert_eq!(request.method, RequestMethod::Post);
    assert_eq!(
        request.url.as_str(),
        format!("{SERVER}/environments/acme/app/prod/open")
    );
    assert_eq!(request.body, None);
}

#[tokio::test]
async fn test_open_environment_at_version() {
    let client = client();
    client.transport().respond_with(fixtures::open_environment_body()).await;

    client
        .open_environment_at_version(ORG, PROJECT, ENV, "stable")
        .await
        .unwrap();

    let request = client.transport().last_request().await.unwrap();
    assert_eq!(
        request.url.as_str(),
        format!("{SERVER}/environments/acme/app/prod/versions/stable/open")
    );
}

#[tokio::test]
async fn test_read_open_environment() {
    let client = client();
    client.transport().respond_with(fixtures::environment_body()).await;

    let (env, values) = client
        .read_open_environment(ORG, PROJECT, ENV, OPEN_ID)
        .await
        .unwrap();

    assert_eq!(Value::Object(values), fixtures::environment_values());
    assert!(env.properties["my_secret"].secret);
    assert!(env.properties["pending"].contains_unknown());
    assert_eq!(env.properties["base"].provenance().count(), 1);

    let request = client.transport().last_request().await.unwrap();
    assert_eq!(request.method, RequestMethod::Get);
    assert_eq!(
        request.url.as_str(),
        format!("{SERVER}/environments/acme/app/prod/open/{OPEN_ID}")
    );
}

#[tokio::test]
async fn test_read_environment_property() {
    let client = client();
    client.transport().respond_with(fixtures::environment_body()).await;

    let (node, value) = client
        .read_environment_property(ORG, PROJECT, ENV, OPEN_ID, "pulumiConfig.foo")
        .await
        .unwrap();
    assert_eq!(value, json!("bar"));
    assert_eq!(node.trace.def.unwrap().begin.line, 7);
}

#[tokio::test]
async fn test_read_environment_property_missing() {
    let client = client();
    client.transport().respond_with(fixtures::environment_body()).await;

    let err = client
        .read_environment_property(ORG, PROJECT, ENV, OPEN_ID, "pulumiConfig.nope")
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        EscError::Value(ValueError::PathNotFound { ref segment, .. }) if segment == "nope"
    ));
}

#[tokio::test]
async fn test_malformed_environment() {
    let client = client();
    client
        .transport()
        .respond_with(json!({"properties": {"foo": "bar"}}))
        .await;

    let err = client
        .read_open_environment(ORG, PROJECT, ENV, OPEN_ID)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        EscError::Value(ValueError::MalformedTree { ref path, .. }) if path == "properties.foo"
    ));
}

#[tokio::test]
async fn test_empty_open_response() {
    let client = client();
    client.transport().respond_with(Value::Null).await;

    let err = client.open_environment(ORG, PROJECT, ENV).await.unwrap_err();
    assert!(matches!(err, EscError::EmptyResponse(_)));
}

#[tokio::test]
async fn test_list_change_gates() {
    let client = client();
    client.transport().respond_with(fixtures::gate_list_body()).await;

    let gates = client
        .list_environment_change_gates(ORG, PROJECT, ENV)
        .await
        .unwrap();
    assert_eq!(gates.len(), 2);
    assert_eq!(gates[1].id, "gate-2");
    assert_eq!(
        gates[0].rule.eligible_approvers,
        EligibilityBuilder::new()
            .environment_admins()
            .user("alice")
            .team("platform")
            .build()
    );

    let request = client.transport().last_request().await.unwrap();
    assert_eq!(
        request.url.as_str(),
        format!("{SERVER}/change-gates/acme?entityType=environment&qualifiedName=app%2Fprod")
    );
}

#[tokio::test]
async fn test_list_change_gates_reports_bad_approver() {
    let client = client();
    client
        .transport()
        .respond_with(json!({"gates": [
            fixtures::gate_body("gate-1"),
            fixtures::gate_with_unknown_approver_body("gate-2")
        ]}))
        .await;

    let err = client
        .list_environment_change_gates(ORG, PROJECT, ENV)
        .await
        .unwrap_err();
    let EscError::Gate(gate_err) = err else {
        panic!("expected a gate error, got {err:?}");
    };
    assert_eq!(gate_err.gate_index(), Some(1));
    assert_eq!(gate_err.approver_index(), Some(2));
    assert_eq!(gate_err.seen_tag(), Some("\"has_group_membership\""));
}

#[tokio::test]
async fn test_get_change_gate() {
    let client = client();
    client.transport().respond_with(fixtures::gate_body("gate-1")).await;

    let gate = client.get_change_gate(ORG, "gate-1").await.unwrap();
    assert_eq!(gate.name, "prod-approval");
    assert_eq!(gate.rule.num_approvals_required, 2);

    let request = client.transport().last_request().await.unwrap();
    assert_eq!(request.url.as_str(), format!("{SERVER}/change-gates/acme/gate-1"));
}

#[tokio::test]
async fn test_create_change_gate_body() {
    let client = client();
    client.transport().respond_with(fixtures::gate_body("gate-9")).await;

    let config = ChangeGateConfig::new(
        "prod-approval",
        true,
        1,
        EligibilityBuilder::new().environment_writers().team("ops").build(),
    );
    let gate = client
        .create_environment_change_gate(ORG, PROJECT, ENV, &config)
        .await
        .unwrap();
    assert_eq!(gate.id, "gate-9");

    let request = client.transport().last_request().await.unwrap();
    assert_eq!(request.method, RequestMethod::Post);
    assert_eq!(request.url.as_str(), format!("{SERVER}/change-gates/acme"));
    assert_eq!(
        request.body.unwrap(),
        json!({
            "name": "prod-approval",
            "enabled": true,
            "rule": {
                "ruleType": "approval_required",
                "numApprovalsRequired": 1,
                "allowSelfApproval": false,
                "requireReapprovalOnChange": true,
                "eligibleApprovers": [
                    {"eligibilityType": "has_permission_on_target", "permission": "environment:write"},
                    {"eligibilityType": "has_team_membership", "teamName": "ops"}
                ]
            },
            "target": {
                "entityType": "environment",
                "qualifiedName": "app/prod",
                "actionTypes": ["update"]
            }
        })
    );
}

#[tokio::test]
async fn test_create_rejects_zero_approvals_without_request() {
    let client = client();
    let config = ChangeGateConfig::new("g", true, 0, vec![EligibilityRule::user("bob")]);

    let err = client
        .create_environment_change_gate(ORG, PROJECT, ENV, &config)
        .await
        .unwrap_err();
    assert!(matches!(err, EscError::Gate(GateError::InvalidConfig(_))));
    assert_eq!(client.transport().request_count().await, 0);
}

#[tokio::test]
async fn test_update_change_gate() {
    let client = client();
    client.transport().respond_with(fixtures::gate_body("gate-1")).await;

    let config = ChangeGateUpdateConfig::new("renamed", false, 3, EligibilityBuilder::new().user("bob").build());
    client.update_change_gate(ORG, "gate-1", &config).await.unwrap();

    let request = client.transport().last_request().await.unwrap();
    assert_eq!(request.method, RequestMethod::Put);
    assert_eq!(request.url.as_str(), format!("{SERVER}/change-gates/acme/gate-1"));
    let body = request.body.unwrap();
    assert_eq!(body["target"], json!({"actionTypes": ["update"]}));
    assert_eq!(body["rule"]["numApprovalsRequired"], 3);
    assert_eq!(body["name"], "renamed");
}

#[tokio::test]
async fn test_delete_change_gate() {
    let client = client();
    client.transport().respond_with(Value::Null).await;

    client.delete_change_gate(ORG, "gate-1").await.unwrap();

    let request = client.transport().last_request().await.unwrap();
    assert_eq!(request.method, RequestMethod::Delete);
    assert_eq!(request.url.as_str(), format!("{SERVER}/change-gates/acme/gate-1"));
}

#[tokio::test]
async fn test_transport_failure_is_classified() {
    let client = client();
    client
        .transport()
        .fail_with(PlatformError::from_status(503, "get change gate", "maintenance"))
        .await;

    let err = client.get_change_gate(ORG, "gate-1").await.unwrap_err();
    assert!(err.is_retryable());
    assert!(matches!(err, EscError::Transport(PlatformError::Unavailable(_))));
}
