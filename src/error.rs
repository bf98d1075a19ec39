use thiserror::Error;

/// 库内统一错误类型
#[derive(Debug, Error)]
pub enum Error {
    #[error("API key must not be empty")]
    MissingApiKey,

    #[error("invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("request to {endpoint} failed: {source}")]
    Request {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    /// 远端返回非 2xx
    #[error("{status} {message}")]
    Api {
        status: reqwest::StatusCode,
        message: String,
    },

    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    /// 自定义 `MemoryClient` 实现（非 HTTP 后端、代理层等）上报的错误，原样作为工具的 error 信息
    #[error("{0}")]
    Remote(String),
}

pub type Result<T> = std::result::Result<T, Error>;
