use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;

use async_trait::async_trait;
use futures_util::FutureExt;
use serde::{Deserialize, Serialize, Serializer};

/// 远端错误没有可读信息时的兜底文案
pub const UNKNOWN_ERROR: &str = "Unknown error";

/// 工具规格描述（传递给 LLM）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolSpec {
    pub name: String,
    pub description: String,
    pub parameters: serde_json::Value,
}

/// 工具执行结果：成功载荷或错误信息，二选一
///
/// 序列化为 `{"success": true, ...payload}` 或 `{"success": false, "error": "..."}`
#[derive(Debug, Clone, PartialEq)]
pub enum ToolOutcome<T> {
    Success(T),
    Failure(String),
}

impl<T> ToolOutcome<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ToolOutcome<U> {
        match self {
            Self::Success(v) => ToolOutcome::Success(f(v)),
            Self::Failure(e) => ToolOutcome::Failure(e),
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Success(_) => None,
            Self::Failure(e) => Some(e),
        }
    }

    pub fn into_result(self) -> Result<T, String> {
        match self {
            Self::Success(v) => Ok(v),
            Self::Failure(e) => Err(e),
        }
    }
}

impl<T: Serialize> ToolOutcome<T> {
    /// 转为交给 Agent 运行时的 JSON
    pub fn into_json(self) -> serde_json::Value {
        serde_json::to_value(&self).unwrap_or_else(|e| {
            serde_json::json!({
                "success": false,
                "error": normalize_message(&e.to_string()),
            })
        })
    }
}

impl<T: Serialize> Serialize for ToolOutcome<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        struct Success<'a, T> {
            success: bool,
            #[serde(flatten)]
            payload: &'a T,
        }

        #[derive(Serialize)]
        struct Failure<'a> {
            success: bool,
            error: &'a str,
        }

        match self {
            Self::Success(payload) => Success {
                success: true,
                payload,
            }
            .serialize(serializer),
            Self::Failure(error) => Failure {
                success: false,
                error,
            }
            .serialize(serializer),
        }
    }
}

/// 工具抽象
///
/// `execute` 永不返回错误：远端失败、参数非法、甚至 panic 都折叠成 `{"success": false, "error"}`
#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &str;
    fn description(&self) -> &str;
    fn parameters_schema(&self) -> serde_json::Value;
    async fn execute(&self, args: serde_json::Value) -> serde_json::Value;

    /// 生成 ToolSpec 供 Provider 使用
    fn spec(&self) -> ToolSpec {
        ToolSpec {
            name: self.name().to_string(),
            description: self.description().to_string(),
            parameters: self.parameters_schema(),
        }
    }
}

/// 空白信息替换为 UNKNOWN_ERROR
pub(crate) fn normalize_message(message: &str) -> String {
    if message.trim().is_empty() {
        UNKNOWN_ERROR.to_string()
    } else {
        message.to_string()
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        normalize_message(s)
    } else if let Some(s) = payload.downcast_ref::<String>() {
        normalize_message(s)
    } else {
        UNKNOWN_ERROR.to_string()
    }
}

/// 等待一次远端调用，把错误和 panic 都收拢成 ToolOutcome
pub(crate) async fn contain<F, T>(call: F) -> ToolOutcome<T>
where
    F: Future<Output = crate::error::Result<T>>,
{
    match AssertUnwindSafe(call).catch_unwind().await {
        Ok(Ok(value)) => ToolOutcome::Success(value),
        Ok(Err(e)) => ToolOutcome::Failure(normalize_message(&e.to_string())),
        Err(payload) => ToolOutcome::Failure(panic_message(payload)),
    }
}
