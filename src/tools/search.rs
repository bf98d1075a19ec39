use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, warn};

use super::shared::{
    CHUNK_THRESHOLD, DEFAULT_INCLUDE_FULL_DOCS, DEFAULT_LIMIT, INCLUDE_FULL_DOCS_DESCRIPTION,
    INFORMATION_TO_GET_DESCRIPTION, LIMIT_DESCRIPTION, SEARCH_MEMORIES,
    SEARCH_MEMORIES_DESCRIPTION,
};
use super::traits::{contain, Tool, ToolOutcome};
use crate::client::{MemoryClient, SearchParams, TemporalFilters};
use crate::config::ToolsConfig;

/// searchMemories 的调用参数
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchArgs {
    pub information_to_get: String,
    #[serde(default = "default_include_full_docs")]
    pub include_full_docs: bool,
    #[serde(default = "default_limit", deserialize_with = "deserialize_limit")]
    pub limit: u32,
    /// [Beta] 时间点过滤（ISO 8601）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub as_of: Option<String>,
    /// [Beta] 有效期窗口过滤
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_window: Option<TimeWindow>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
}

fn default_include_full_docs() -> bool {
    DEFAULT_INCLUDE_FULL_DOCS
}

fn default_limit() -> u32 {
    DEFAULT_LIMIT
}

/// JSON Schema 的 integer 允许 `5.0` 这类小数部分为零的数字
fn deserialize_limit<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = f64::deserialize(deserializer)?;
    if value.fract() != 0.0 || value < 0.0 || value > f64::from(u32::MAX) {
        return Err(serde::de::Error::custom(format!(
            "limit must be a non-negative integer, got {}",
            value
        )));
    }
    Ok(value as u32)
}

impl SearchArgs {
    pub fn new(information_to_get: impl Into<String>) -> Self {
        Self {
            information_to_get: information_to_get.into(),
            include_full_docs: DEFAULT_INCLUDE_FULL_DOCS,
            limit: DEFAULT_LIMIT,
            as_of: None,
            time_window: None,
        }
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_include_full_docs(mut self, include: bool) -> Self {
        self.include_full_docs = include;
        self
    }

    pub fn with_as_of(mut self, as_of: impl Into<String>) -> Self {
        self.as_of = Some(as_of.into());
        self
    }

    pub fn with_time_window(mut self, from: Option<String>, to: Option<String>) -> Self {
        self.time_window = Some(TimeWindow { from, to });
        self
    }

    /// 时间字段必须是 ISO 8601 date-time
    pub fn validate(&self) -> Result<(), String> {
        check_datetime("asOf", self.as_of.as_deref())?;
        if let Some(window) = &self.time_window {
            check_datetime("timeWindow.from", window.from.as_deref())?;
            check_datetime("timeWindow.to", window.to.as_deref())?;
        }
        Ok(())
    }
}

/// 只接受 UTC 形式（大写 `T` 分隔、`Z` 结尾），不接受 `+02:00` 之类的偏移
fn check_datetime(field: &str, value: Option<&str>) -> Result<(), String> {
    let Some(v) = value else {
        return Ok(());
    };
    if !v.ends_with('Z') || !v.contains('T') {
        return Err(format!(
            "{} must be an ISO 8601 UTC date-time like 2024-01-01T00:00:00Z, got '{}'",
            field, v
        ));
    }
    chrono::DateTime::parse_from_rfc3339(v)
        .map(|_| ())
        .map_err(|e| format!("{} must be an ISO 8601 date-time, got '{}': {}", field, v, e))
}

/// searchMemories 成功时的载荷
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchOutput {
    pub results: Vec<serde_json::Value>,
    pub count: usize,
}

/// 记忆检索工具
pub struct SearchMemoriesTool {
    client: Arc<dyn MemoryClient>,
    container_tags: Vec<String>,
    temporal_enabled: bool,
}

impl SearchMemoriesTool {
    pub fn new(client: Arc<dyn MemoryClient>, config: &ToolsConfig) -> Self {
        Self {
            client,
            container_tags: config.container_tags(),
            temporal_enabled: config.enable_temporal_queries,
        }
    }

    pub fn container_tags(&self) -> &[String] {
        &self.container_tags
    }

    /// 组装出站请求；未开启时间查询时丢弃 asOf / timeWindow
    pub(crate) fn build_params(&self, args: SearchArgs) -> SearchParams {
        let temporal = if self.temporal_enabled {
            let window = args.time_window.unwrap_or_default();
            TemporalFilters {
                as_of: args.as_of,
                valid_from_gte: window.from,
                valid_until_lte: window.to,
            }
        } else {
            TemporalFilters::default()
        };

        SearchParams {
            q: args.information_to_get,
            container_tags: self.container_tags.clone(),
            limit: args.limit,
            chunk_threshold: CHUNK_THRESHOLD,
            include_full_docs: args.include_full_docs,
            temporal,
        }
    }

    /// 类型化调用入口
    pub async fn search(&self, args: SearchArgs) -> ToolOutcome<SearchOutput> {
        if let Err(e) = args.validate() {
            return ToolOutcome::Failure(e);
        }

        let params = self.build_params(args);
        debug!(
            limit = params.limit,
            temporal = !params.temporal.is_empty(),
            "searchMemories"
        );

        let outcome = contain(self.client.search(&params)).await.map(|resp| {
            let results = resp.results.unwrap_or_default();
            SearchOutput {
                count: results.len(),
                results,
            }
        });

        if let Some(e) = outcome.error() {
            warn!("searchMemories 失败: {}", e);
        }
        outcome
    }
}

#[async_trait]
impl Tool for SearchMemoriesTool {
    fn name(&self) -> &str {
        SEARCH_MEMORIES
    }

    fn description(&self) -> &str {
        SEARCH_MEMORIES_DESCRIPTION
    }

    fn parameters_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "informationToGet": {
                    "type": "string",
                    "description": INFORMATION_TO_GET_DESCRIPTION
                },
                "includeFullDocs": {
                    "type": "boolean",
                    "description": INCLUDE_FULL_DOCS_DESCRIPTION,
                    "default": DEFAULT_INCLUDE_FULL_DOCS
                },
                "limit": {
                    "type": "integer",
                    "minimum": 0,
                    "description": LIMIT_DESCRIPTION,
                    "default": DEFAULT_LIMIT
                },
                "asOf": {
                    "type": "string",
                    "format": "date-time",
                    "description": "[Beta] Point-in-time filter (ISO 8601). Only forwarded when temporal queries are enabled."
                },
                "timeWindow": {
                    "type": "object",
                    "description": "[Beta] Validity window filter. Only forwarded when temporal queries are enabled.",
                    "properties": {
                        "from": {
                            "type": "string",
                            "format": "date-time",
                            "description": "[Beta] Lower bound of the validity window (ISO 8601)."
                        },
                        "to": {
                            "type": "string",
                            "format": "date-time",
                            "description": "[Beta] Upper bound of the validity window (ISO 8601)."
                        }
                    }
                }
            },
            "required": ["informationToGet"]
        })
    }

    async fn execute(&self, args: serde_json::Value) -> serde_json::Value {
        let outcome = match serde_json::from_value::<SearchArgs>(args) {
            Ok(args) => self.search(args).await,
            Err(e) => ToolOutcome::Failure(format!("invalid arguments: {}", e)),
        };
        outcome.into_json()
    }
}
