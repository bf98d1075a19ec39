pub mod schema;

pub use schema::{AppConfig, ToolsConfig, DEFAULT_BASE_URL, DEFAULT_CONTAINER_TAG};
