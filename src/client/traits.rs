use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// 发往 `/v3/search` 的请求体
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchParams {
    pub q: String,
    pub container_tags: Vec<String>,
    pub limit: u32,
    pub chunk_threshold: f64,
    pub include_full_docs: bool,
    #[serde(flatten)]
    pub temporal: TemporalFilters,
}

/// 时间过滤参数，只序列化实际存在的字段
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemporalFilters {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub as_of: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub valid_from_gte: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub valid_until_lte: Option<String>,
}

impl TemporalFilters {
    pub fn is_empty(&self) -> bool {
        self.as_of.is_none() && self.valid_from_gte.is_none() && self.valid_until_lte.is_none()
    }
}

/// `/v3/search` 响应，只关心 results
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub results: Option<Vec<serde_json::Value>>,
}

/// metadata 值只允许标量
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetadataValue {
    Text(String),
    Number(f64),
    Flag(bool),
}

/// 发往 `/v3/memories` 的请求体
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddParams {
    pub content: String,
    pub container_tags: Vec<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, MetadataValue>,
}

impl AddParams {
    pub fn new(content: impl Into<String>, container_tags: Vec<String>) -> Self {
        Self {
            content: content.into(),
            container_tags,
            metadata: BTreeMap::new(),
        }
    }
}

/// 远端记忆服务抽象
#[async_trait]
pub trait MemoryClient: Send + Sync {
    async fn search(&self, params: &SearchParams) -> Result<SearchResponse>;

    /// 返回服务端创建的记录（原样透传）
    async fn add(&self, params: &AddParams) -> Result<serde_json::Value>;
}
