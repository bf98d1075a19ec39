//! 集成测试公共辅助函数
//!
//! 每个测试启动独立的 wiremock 服务器，工具的 base_url 指向它。

// 每个集成测试文件只使用 common 的一部分，未用到的辅助函数属于预期 dead_code
#![allow(dead_code)]

use serde_json::Value;
use wiremock::{Request, Respond, ResponseTemplate};

use supermemory_tools::ToolsConfig;

pub const TEST_KEY: &str = "sm_test_key";

/// 指向 mock server 的配置
pub fn config_for(uri: &str) -> ToolsConfig {
    ToolsConfig::default().with_base_url(uri)
}

/// 构造 Search 响应体
pub fn search_body(results: Vec<Value>) -> Value {
    let total = results.len();
    serde_json::json!({
        "results": results,
        "timing": 12,
        "total": total,
    })
}

/// 把请求体原样回显，外加服务端分配的 id
pub struct EchoResponder;

impl Respond for EchoResponder {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let mut body: Value = serde_json::from_slice(&request.body).unwrap_or(Value::Null);
        if let Some(obj) = body.as_object_mut() {
            obj.insert("id".to_string(), Value::String("mem_1".to_string()));
            obj.insert("status".to_string(), Value::String("queued".to_string()));
        }
        ResponseTemplate::new(200).set_body_json(body)
    }
}

/// 取出 mock server 收到的全部 JSON 请求体
pub async fn received_bodies(server: &wiremock::MockServer) -> Vec<Value> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .map(|r| serde_json::from_slice(&r.body).expect("请求体不是 JSON"))
        .collect()
}
