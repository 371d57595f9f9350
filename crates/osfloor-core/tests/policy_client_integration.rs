//! Integration tests for the compliance policy client against a mock
//! management API.

use mockito::{Matcher, Server};
use osfloor_core::{CoreError, Platform, PolicyClient, StaticToken, UpdatePayload};
use serde_json::json;

const COLLECTION: &str = "/deviceManagement/deviceCompliancePolicies";

fn client(server: &Server) -> PolicyClient {
    PolicyClient::new(&server.url(), Box::new(StaticToken::new("test-token"))).unwrap()
}

fn ios_policy(id: &str, version: &str) -> serde_json::Value {
    json!({
        "@odata.type": "#microsoft.graph.iosCompliancePolicy",
        "id": id,
        "displayName": format!("iOS {id}"),
        "description": "",
        "osMinimumVersion": version,
    })
}

#[tokio::test]
async fn lists_policies_with_bearer_token() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", COLLECTION)
        .match_header("authorization", "Bearer test-token")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({ "value": [ios_policy("a", "26.0.0"), ios_policy("b", "18.6.2")] }).to_string())
        .create_async()
        .await;

    let policies = client(&server).list_policies(None).await.unwrap();

    mock.assert_async().await;
    assert_eq!(policies.len(), 2);
    assert_eq!(policies[0].id, "a");
    assert_eq!(policies[1].current_version(), "18.6.2");
}

#[tokio::test]
async fn follows_next_link_paging() {
    let mut server = Server::new_async().await;
    let next = format!("{}/nextpage?$skiptoken=abc", server.url());

    let first = server
        .mock("GET", COLLECTION)
        .with_status(200)
        .with_body(json!({ "value": [ios_policy("a", "26.0.0")], "@odata.nextLink": next }).to_string())
        .create_async()
        .await;
    let second = server
        .mock("GET", "/nextpage")
        .match_query(Matcher::UrlEncoded("$skiptoken".into(), "abc".into()))
        .match_header("authorization", "Bearer test-token")
        .with_status(200)
        .with_body(json!({ "value": [ios_policy("b", "26.0.1")] }).to_string())
        .create_async()
        .await;

    let policies = client(&server).list_policies(None).await.unwrap();

    first.assert_async().await;
    second.assert_async().await;
    let ids: Vec<_> = policies.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, ["a", "b"]);
}

#[tokio::test]
async fn self_referencing_next_link_stops_after_one_page() {
    let mut server = Server::new_async().await;
    let own = format!("{}{COLLECTION}", server.url());

    let page = server
        .mock("GET", COLLECTION)
        .with_status(200)
        .with_body(json!({ "value": [ios_policy("a", "26.0.0")], "@odata.nextLink": own }).to_string())
        .expect(1)
        .create_async()
        .await;

    let policies = client(&server).list_policies(None).await.unwrap();

    page.assert_async().await;
    assert_eq!(policies.len(), 1);
    assert_eq!(policies[0].id, "a");
}

#[tokio::test]
async fn platform_filter_keeps_matching_records() {
    let mut server = Server::new_async().await;
    let mac = json!({
        "@odata.type": "#microsoft.graph.macOSCompliancePolicy",
        "id": "m",
        "displayName": "Mac baseline",
        "osMinimumVersion": "26.0",
    });
    let _mock = server
        .mock("GET", COLLECTION)
        .with_status(200)
        .with_body(json!({ "value": [ios_policy("a", "26.0.0"), mac] }).to_string())
        .create_async()
        .await;

    let c = client(&server);
    let macs = c.list_policies(Some(Platform::MacOs)).await.unwrap();
    assert_eq!(macs.len(), 1);
    assert_eq!(macs[0].id, "m");

    let androids = c.list_policies(Some(Platform::Android)).await.unwrap();
    assert!(androids.is_empty());
}

#[tokio::test]
async fn surfaces_graph_error_detail() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", COLLECTION)
        .with_status(403)
        .with_body(r#"{"error":{"code":"Forbidden","message":"Application is not authorized"}}"#)
        .create_async()
        .await;

    let err = client(&server).list_policies(None).await.unwrap_err();
    match err {
        CoreError::Api(api) => {
            assert_eq!(api.status, 403);
            assert_eq!(api.code, "Forbidden");
            assert_eq!(api.message, "Application is not authorized");
        }
        other => panic!("expected API error, got {other:?}"),
    }
}

#[tokio::test]
async fn patch_sends_json_body() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("PATCH", "/deviceManagement/deviceCompliancePolicies/abc-123")
        .match_header("authorization", "Bearer test-token")
        .match_header("content-type", "application/json")
        .match_body(Matcher::Json(json!({
            "@odata.type": "#microsoft.graph.iosCompliancePolicy",
            "description": "synced",
            "osMinimumVersion": "26.0.1",
        })))
        .with_status(204)
        .expect(1)
        .create_async()
        .await;

    let payload = UpdatePayload {
        odata_type: "#microsoft.graph.iosCompliancePolicy".into(),
        description: "synced".into(),
        os_minimum_version: "26.0.1".into(),
    };
    client(&server).update_policy_with("abc-123", &payload).await.unwrap();

    mock.assert_async().await;
}

#[tokio::test]
async fn invalid_json_never_reaches_the_network() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("PATCH", Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let err = client(&server)
        .update_policy("abc-123", "{\"osMinimumVersion\": ")
        .await
        .unwrap_err();

    assert!(matches!(err, CoreError::Validation(_)));
    mock.assert_async().await;
}

#[tokio::test]
async fn patch_failure_is_returned() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("PATCH", "/deviceManagement/deviceCompliancePolicies/abc-123")
        .with_status(400)
        .with_body(r#"{"error":{"code":"BadRequest","message":"Invalid osMinimumVersion"}}"#)
        .create_async()
        .await;

    let err = client(&server)
        .update_policy("abc-123", r#"{"osMinimumVersion":"x"}"#)
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::Api(ref api) if api.code == "BadRequest"));
}

#[tokio::test]
async fn missing_token_fails_before_request() {
    let mut server = Server::new_async().await;
    let mock = server.mock("GET", Matcher::Any).expect(0).create_async().await;

    let c = PolicyClient::new(&server.url(), Box::new(StaticToken::new(""))).unwrap();
    let err = c.list_policies(None).await.unwrap_err();

    assert!(matches!(err, CoreError::Auth(_)));
    mock.assert_async().await;
}
