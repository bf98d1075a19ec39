pub mod client;
pub mod config;
pub mod error;
pub mod tools;

pub use client::{MemoryClient, SupermemoryClient};
pub use config::{AppConfig, ToolsConfig};
pub use error::{Error, Result};
pub use tools::{
    build_add_memory_tool, build_search_tool, build_tool_bundle, Tool, ToolBundle, ToolOutcome,
    ToolSpec,
};
