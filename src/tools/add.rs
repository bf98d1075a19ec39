use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, warn};

use super::shared::{ADD_MEMORY, ADD_MEMORY_DESCRIPTION, MEMORY_DESCRIPTION};
use super::traits::{contain, Tool, ToolOutcome};
use crate::client::{AddParams, MemoryClient};
use crate::config::ToolsConfig;

/// addMemory 的调用参数
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddArgs {
    pub memory: String,
}

impl AddArgs {
    pub fn new(memory: impl Into<String>) -> Self {
        Self {
            memory: memory.into(),
        }
    }
}

/// addMemory 成功时的载荷：服务端创建的记录
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AddOutput {
    pub memory: serde_json::Value,
}

/// 记忆写入工具
pub struct AddMemoryTool {
    client: Arc<dyn MemoryClient>,
    container_tags: Vec<String>,
}

impl AddMemoryTool {
    pub fn new(client: Arc<dyn MemoryClient>, config: &ToolsConfig) -> Self {
        Self {
            client,
            container_tags: config.container_tags(),
        }
    }

    pub fn container_tags(&self) -> &[String] {
        &self.container_tags
    }

    /// 类型化调用入口
    pub async fn add(&self, args: AddArgs) -> ToolOutcome<AddOutput> {
        // 参数里没有 metadata 来源，始终为空，序列化时省略
        let params = AddParams::new(args.memory, self.container_tags.clone());
        debug!(chars = params.content.chars().count(), "addMemory");

        let outcome = contain(self.client.add(&params))
            .await
            .map(|memory| AddOutput { memory });

        if let Some(e) = outcome.error() {
            warn!("addMemory 失败: {}", e);
        }
        outcome
    }
}

#[async_trait]
impl Tool for AddMemoryTool {
    fn name(&self) -> &str {
        ADD_MEMORY
    }

    fn description(&self) -> &str {
        ADD_MEMORY_DESCRIPTION
    }

    fn parameters_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "memory": {
                    "type": "string",
                    "description": MEMORY_DESCRIPTION
                }
            },
            "required": ["memory"]
        })
    }

    async fn execute(&self, args: serde_json::Value) -> serde_json::Value {
        let outcome = match serde_json::from_value::<AddArgs>(args) {
            Ok(args) => self.add(args).await,
            Err(e) => ToolOutcome::Failure(format!("invalid arguments: {}", e)),
        };
        outcome.into_json()
    }
}
