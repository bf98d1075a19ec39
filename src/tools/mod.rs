pub mod add;
pub mod search;
pub mod shared;
pub mod traits;

pub use add::{AddArgs, AddMemoryTool, AddOutput};
pub use search::{SearchArgs, SearchMemoriesTool, SearchOutput, TimeWindow};
pub use traits::{Tool, ToolOutcome, ToolSpec, UNKNOWN_ERROR};

use std::sync::Arc;

use crate::client::SupermemoryClient;
use crate::config::ToolsConfig;
use crate::error::Result;

/// 每次构建都新建一个客户端，不与其他工具共享
fn new_client(api_key: &str, config: &ToolsConfig) -> Result<Arc<SupermemoryClient>> {
    Ok(Arc::new(SupermemoryClient::new(api_key, config)?))
}

/// 创建 searchMemories 工具
pub fn build_search_tool(api_key: &str, config: Option<&ToolsConfig>) -> Result<SearchMemoriesTool> {
    let config = config.cloned().unwrap_or_default();
    Ok(SearchMemoriesTool::new(new_client(api_key, &config)?, &config))
}

/// 创建 addMemory 工具
pub fn build_add_memory_tool(api_key: &str, config: Option<&ToolsConfig>) -> Result<AddMemoryTool> {
    let config = config.cloned().unwrap_or_default();
    Ok(AddMemoryTool::new(new_client(api_key, &config)?, &config))
}

/// 创建全部记忆工具
pub fn build_tool_bundle(api_key: &str, config: Option<&ToolsConfig>) -> Result<ToolBundle> {
    Ok(ToolBundle {
        search_memories: build_search_tool(api_key, config)?,
        add_memory: build_add_memory_tool(api_key, config)?,
    })
}

/// searchMemories + addMemory
pub struct ToolBundle {
    pub search_memories: SearchMemoriesTool,
    pub add_memory: AddMemoryTool,
}

impl ToolBundle {
    pub fn iter(&self) -> impl Iterator<Item = &dyn Tool> {
        [
            &self.search_memories as &dyn Tool,
            &self.add_memory as &dyn Tool,
        ]
        .into_iter()
    }

    /// 按工具名查找
    pub fn get(&self, name: &str) -> Option<&dyn Tool> {
        self.iter().find(|t| t.name() == name)
    }

    pub fn names(&self) -> Vec<&str> {
        self.iter().map(|t| t.name()).collect()
    }

    pub fn specs(&self) -> Vec<ToolSpec> {
        self.iter().map(|t| t.spec()).collect()
    }

    /// 按名字分发一次调用；未知工具同样返回失败结构
    pub async fn execute(&self, name: &str, args: serde_json::Value) -> serde_json::Value {
        match self.get(name) {
            Some(tool) => tool.execute(args).await,
            None => ToolOutcome::<()>::Failure(format!("unknown tool: {}", name)).into_json(),
        }
    }

    /// 拆成 trait object 列表，交给 Agent 注册
    pub fn into_tools(self) -> Vec<Box<dyn Tool>> {
        vec![Box::new(self.search_memories), Box::new(self.add_memory)]
    }
}
