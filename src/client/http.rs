use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::config::ToolsConfig;
use crate::error::{Error, Result};

use super::traits::{AddParams, MemoryClient, SearchParams, SearchResponse};

const SEARCH_PATH: &str = "/v3/search";
const MEMORIES_PATH: &str = "/v3/memories";

/// Supermemory HTTP 客户端
pub struct SupermemoryClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl SupermemoryClient {
    /// 绑定 API key 与（可选的）自定义 base_url
    pub fn new(api_key: &str, config: &ToolsConfig) -> Result<Self> {
        if api_key.trim().is_empty() {
            return Err(Error::MissingApiKey);
        }

        let raw = config.effective_base_url();
        let parsed = url::Url::parse(raw).map_err(|e| Error::InvalidBaseUrl {
            url: raw.to_string(),
            reason: e.to_string(),
        })?;
        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return Err(Error::InvalidBaseUrl {
                url: raw.to_string(),
                reason: format!("unsupported scheme '{}'", parsed.scheme()),
            });
        }

        Ok(Self {
            client: reqwest::Client::new(),
            base_url: raw.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + Sync + ?Sized,
        T: DeserializeOwned,
    {
        let endpoint = self.endpoint(path);
        debug!(%endpoint, "calling memory service");

        let resp = self
            .client
            .post(&endpoint)
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|source| Error::Request {
                endpoint: endpoint.clone(),
                source,
            })?;

        let status = resp.status();
        let text = resp
            .text()
            .await
            .map_err(|source| Error::Request { endpoint, source })?;

        if !status.is_success() {
            return Err(Error::Api {
                status,
                message: api_error_message(&text),
            });
        }

        // 空响应体按 null 处理
        let body = if text.trim().is_empty() { "null" } else { text.as_str() };
        Ok(serde_json::from_str(body)?)
    }
}

#[async_trait]
impl MemoryClient for SupermemoryClient {
    async fn search(&self, params: &SearchParams) -> Result<SearchResponse> {
        self.post_json(SEARCH_PATH, params).await
    }

    async fn add(&self, params: &AddParams) -> Result<serde_json::Value> {
        self.post_json(MEMORIES_PATH, params).await
    }
}

/// 从错误响应体中提取可读信息：优先 message / error 字段，否则原文
fn api_error_message(body: &str) -> String {
    let from_json = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            ["message", "error", "details"]
                .iter()
                .find_map(|key| v.get(*key).and_then(|m| m.as_str()).map(String::from))
        });

    match from_json {
        Some(msg) => msg,
        None if body.trim().is_empty() => "(empty response body)".to_string(),
        None => body.trim().to_string(),
    }
}
