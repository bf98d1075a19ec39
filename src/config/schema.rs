use std::path::{Path, PathBuf};

use color_eyre::eyre::{Context, Result};
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

/// Supermemory 官方 API 地址
pub const DEFAULT_BASE_URL: &str = "https://api.supermemory.ai";

/// 未配置任何命名空间时使用的 container tag
pub const DEFAULT_CONTAINER_TAG: &str = "sm_project_default";

/// 工具工厂配置，构造后只读
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolsConfig {
    /// 覆盖默认 API 地址
    #[serde(default)]
    pub base_url: Option<String>,
    /// 记忆所属的 container tags
    #[serde(default)]
    pub container_tags: Option<Vec<String>>,
    /// 设置后优先于 container_tags，展开为 `sm_project_{id}`
    #[serde(default)]
    pub project_id: Option<String>,
    /// [Beta] 是否转发 asOf / timeWindow 时间过滤参数，默认 false
    #[serde(default)]
    pub enable_temporal_queries: bool,
}

impl ToolsConfig {
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn with_container_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.container_tags = Some(tags.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_project_id(mut self, project_id: impl Into<String>) -> Self {
        self.project_id = Some(project_id.into());
        self
    }

    pub fn with_temporal_queries(mut self, enabled: bool) -> Self {
        self.enable_temporal_queries = enabled;
        self
    }

    /// 实际生效的 API 地址
    pub fn effective_base_url(&self) -> &str {
        self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
    }

    /// 推导本次调用使用的 container tags
    ///
    /// project_id > container_tags > 默认 tag
    pub fn container_tags(&self) -> Vec<String> {
        if let Some(project_id) = &self.project_id {
            return vec![format!("sm_project_{}", project_id)];
        }
        match &self.container_tags {
            Some(tags) => tags.clone(),
            None => vec![DEFAULT_CONTAINER_TAG.to_string()],
        }
    }
}

/// smtools 命令行的完整配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub tools: ToolsConfig,
}

/// 默认配置 TOML 模板
pub(crate) const DEFAULT_CONFIG_TOML: &str = r#"# Supermemory API Key（也可通过 SUPERMEMORY_API_KEY 环境变量提供）
# api_key = "sm_..."

[tools]
# base_url = "https://api.supermemory.ai"
# container_tags = ["user_123"]
# project_id = "my-project"
enable_temporal_queries = false
"#;

impl AppConfig {
    /// 返回配置文件路径: `~/.supermemory-tools/config.toml`
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::home_dir()?.join("config.toml"))
    }

    /// 日志目录: `~/.supermemory-tools/logs`
    pub fn log_dir() -> Result<PathBuf> {
        Ok(Self::home_dir()?.join("logs"))
    }

    fn home_dir() -> Result<PathBuf> {
        let base_dirs = directories::BaseDirs::new()
            .ok_or_else(|| color_eyre::eyre::eyre!("无法获取 home 目录"))?;
        Ok(base_dirs.home_dir().join(".supermemory-tools"))
    }

    /// 加载配置，如果配置文件不存在则写入默认模板
    pub fn load_or_init() -> Result<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            if let Some(parent) = config_path.parent() {
                std::fs::create_dir_all(parent).wrap_err("创建配置目录失败")?;
            }
            std::fs::write(&config_path, DEFAULT_CONFIG_TOML).wrap_err("写入默认配置失败")?;
        }

        Self::load_from_path(&config_path)
    }

    /// 从指定路径加载配置（figment 多层合并：默认值 < TOML < 环境变量）
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let config: AppConfig = Figment::new()
            .merge(Serialized::defaults(AppConfig::default()))
            .merge(Toml::file(path))
            .merge(Env::prefixed("SUPERMEMORY_").split("__"))
            .extract()
            .wrap_err("解析配置文件失败")?;

        Ok(config)
    }

    /// 取出 API key，缺失时报错
    pub fn require_api_key(&self) -> Result<&str> {
        match self.api_key.as_deref() {
            Some(key) if !key.trim().is_empty() => Ok(key),
            _ => Err(color_eyre::eyre::eyre!(
                "未配置 API key。请设置 SUPERMEMORY_API_KEY 或在 config.toml 中填写 api_key。"
            )),
        }
    }

    /// 用于展示的副本，API key 打码；不超过 8 个字符的 key 整体隐藏
    pub fn redacted(&self) -> Self {
        let api_key = self.api_key.as_deref().map(|key| {
            if key.chars().count() <= 8 {
                return "****".to_string();
            }
            let visible: String = key.chars().take(4).collect();
            format!("{}****", visible)
        });
        Self {
            api_key,
            tools: self.tools.clone(),
        }
    }
}
