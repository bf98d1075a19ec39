//! 工具 → reqwest 客户端 → HTTP 的完整链路测试
//!
//! 使用 wiremock 充当远端记忆服务，验证出站请求体、鉴权头与错误归一化。

mod common;

use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use supermemory_tools::tools::{SearchArgs, UNKNOWN_ERROR};
use supermemory_tools::{build_add_memory_tool, build_search_tool, build_tool_bundle, Tool, ToolsConfig};

#[tokio::test]
async fn search_sends_authenticated_request_with_defaults() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v3/search"))
        .and(header("authorization", "Bearer sm_test_key"))
        .and(body_partial_json(json!({
            "q": "favourite coffee",
            "containerTags": ["sm_project_default"],
            "limit": 10,
            "chunkThreshold": 0.6,
            "includeFullDocs": true,
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(common::search_body(vec![
            json!({"documentId": "d1", "score": 0.91}),
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let tool = build_search_tool(common::TEST_KEY, Some(&common::config_for(&server.uri()))).unwrap();
    let out = tool.execute(json!({"informationToGet": "favourite coffee"})).await;

    assert_eq!(out["success"], true);
    assert_eq!(out["count"], 1);
    assert_eq!(out["results"][0]["documentId"], "d1");
}

#[tokio::test]
async fn search_without_results_field_reports_zero() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v3/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"timing": 3})))
        .mount(&server)
        .await;

    let tool = build_search_tool(common::TEST_KEY, Some(&common::config_for(&server.uri()))).unwrap();
    let out = tool.search(SearchArgs::new("anything")).await.into_result().unwrap();
    assert!(out.results.is_empty());
    assert_eq!(out.count, 0);
}

#[tokio::test]
async fn temporal_fields_never_leave_when_disabled() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v3/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(common::search_body(vec![])))
        .mount(&server)
        .await;

    let tool = build_search_tool(common::TEST_KEY, Some(&common::config_for(&server.uri()))).unwrap();
    let out = tool
        .execute(json!({
            "informationToGet": "beta feature check",
            "asOf": "2024-01-01T00:00:00Z",
            "timeWindow": {"from": "2024-01-01T00:00:00Z", "to": "2024-01-05T00:00:00Z"}
        }))
        .await;
    assert_eq!(out["success"], true);

    let bodies = common::received_bodies(&server).await;
    assert_eq!(bodies.len(), 1);
    let sent = bodies[0].as_object().unwrap();
    assert!(!sent.contains_key("asOf"));
    assert!(!sent.contains_key("validFromGte"));
    assert!(!sent.contains_key("validUntilLte"));
}

#[tokio::test]
async fn temporal_lower_bound_only_when_enabled() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v3/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(common::search_body(vec![])))
        .mount(&server)
        .await;

    let config = common::config_for(&server.uri()).with_temporal_queries(true);
    let tool = build_search_tool(common::TEST_KEY, Some(&config)).unwrap();
    tool.execute(json!({
        "informationToGet": "partial window",
        "timeWindow": {"from": "2024-04-01T00:00:00Z"}
    }))
    .await;

    let bodies = common::received_bodies(&server).await;
    let sent = bodies[0].as_object().unwrap();
    assert_eq!(sent["validFromGte"], "2024-04-01T00:00:00Z");
    assert!(!sent.contains_key("validUntilLte"));
    assert!(!sent.contains_key("asOf"));
}

#[tokio::test]
async fn api_error_is_normalized() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v3/search"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"error": "Invalid API key"})))
        .mount(&server)
        .await;

    let tool = build_search_tool(common::TEST_KEY, Some(&common::config_for(&server.uri()))).unwrap();
    let out = tool.execute(json!({"informationToGet": "x"})).await;

    let obj = out.as_object().unwrap();
    assert_eq!(obj.len(), 2, "失败结构只应包含 success 与 error: {}", out);
    assert_eq!(obj["success"], false);
    let error = obj["error"].as_str().unwrap();
    assert!(error.contains("401"));
    assert!(error.contains("Invalid API key"));
}

#[tokio::test]
async fn malformed_success_body_is_normalized() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v3/search"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let tool = build_search_tool(common::TEST_KEY, Some(&common::config_for(&server.uri()))).unwrap();
    let out = tool.execute(json!({"informationToGet": "x"})).await;
    assert_eq!(out["success"], false);
    assert!(out["error"].as_str().unwrap().starts_with("failed to decode response"));
}

#[tokio::test]
async fn unreachable_service_is_normalized() {
    // port 1: 立即 connection refused
    let config = ToolsConfig::default().with_base_url("http://127.0.0.1:1");
    let tool = build_add_memory_tool(common::TEST_KEY, Some(&config)).unwrap();
    let out = tool.execute(json!({"memory": "buy milk"})).await;

    assert_eq!(out["success"], false);
    let error = out["error"].as_str().unwrap();
    assert_ne!(error, UNKNOWN_ERROR);
    assert!(error.contains("127.0.0.1:1/v3/memories"));
}

#[tokio::test]
async fn add_memory_echo_round_trip() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v3/memories"))
        .and(header("authorization", "Bearer sm_test_key"))
        .respond_with(common::EchoResponder)
        .expect(1)
        .mount(&server)
        .await;

    let config = common::config_for(&server.uri()).with_container_tags(["user_42"]);
    let tool = build_add_memory_tool(common::TEST_KEY, Some(&config)).unwrap();
    let out = tool.execute(json!({"memory": "buy milk"})).await;

    assert_eq!(out["success"], true);
    assert_eq!(out["memory"]["content"], "buy milk");
    assert_eq!(out["memory"]["containerTags"], json!(["user_42"]));
    assert_eq!(out["memory"]["id"], "mem_1");

    let bodies = common::received_bodies(&server).await;
    assert!(bodies[0].get("metadata").is_none());
}

#[tokio::test]
async fn bundle_tools_are_independent() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v3/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(common::search_body(vec![json!({"id": "m"})])))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v3/memories"))
        .respond_with(common::EchoResponder)
        .mount(&server)
        .await;

    let config = common::config_for(&server.uri()).with_project_id("crm");
    let bundle = build_tool_bundle(common::TEST_KEY, Some(&config)).unwrap();
    assert_eq!(bundle.names(), vec!["searchMemories", "addMemory"]);

    let (searched, added) = tokio::join!(
        bundle.execute("searchMemories", json!({"informationToGet": "deal size"})),
        bundle.execute("addMemory", json!({"memory": "deal closed at 40k"})),
    );

    assert_eq!(searched["count"], 1);
    assert_eq!(added["memory"]["containerTags"], json!(["sm_project_crm"]));

    let bodies = common::received_bodies(&server).await;
    assert_eq!(bodies.len(), 2);
    assert!(bodies.iter().all(|b| b["containerTags"] == json!(["sm_project_crm"])));
}
