use thiserror::Error;

/// 生成失败时的通用提示（底层错误没有携带消息时使用）
pub const GENERIC_FAILURE_MESSAGE: &str = "An error occurred.";

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 输入校验错误（没有可用的题目、空样式名等）
    #[error("校验错误: {0}")]
    Validation(String),
    /// 答案生成错误
    #[error("生成错误: {0}")]
    Generation(#[from] GenerationError),
    /// 本地存储错误
    #[error("存储错误: {0}")]
    Storage(#[from] StorageError),
    /// 导出错误
    #[error("导出错误: {0}")]
    Export(#[from] ExportError),
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
    /// 已有一个批次正在生成
    #[error("已有生成任务正在进行，请等待完成")]
    Busy,
    /// 批次在两次调用之间被取消
    #[error("生成任务已取消")]
    Cancelled,
    /// 其他错误
    #[error("错误: {0}")]
    Other(String),
}

impl AppError {
    /// 转换为展示给用户的单条错误消息
    ///
    /// 生成错误优先使用底层消息，没有消息时退回通用提示。
    pub fn user_message(&self) -> String {
        match self {
            AppError::Validation(msg) => msg.clone(),
            AppError::Generation(e) => e
                .message()
                .unwrap_or(GENERIC_FAILURE_MESSAGE)
                .to_string(),
            other => other.to_string(),
        }
    }

    /// 创建校验错误
    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::Validation(msg.into())
    }

    /// 创建文件读取错误
    pub fn file_read_failed(path: impl Into<String>, source: std::io::Error) -> Self {
        AppError::Storage(StorageError::ReadFailed {
            path: path.into(),
            source,
        })
    }

    /// 创建文件写入错误
    pub fn file_write_failed(path: impl Into<String>, source: std::io::Error) -> Self {
        AppError::Storage(StorageError::WriteFailed {
            path: path.into(),
            source,
        })
    }
}

/// 答案生成客户端的错误
///
/// 可以携带一条人类可读的消息，也可以不携带任何信息。
#[derive(Debug, Clone, Error)]
pub enum GenerationError {
    /// 服务或网络失败，附带消息
    #[error("{message}")]
    Service { message: String },
    /// 没有额外信息的失败
    #[error("答案生成失败")]
    Opaque,
}

impl GenerationError {
    pub fn service(message: impl Into<String>) -> Self {
        GenerationError::Service {
            message: message.into(),
        }
    }

    pub fn opaque() -> Self {
        GenerationError::Opaque
    }

    /// 底层消息（如果有）
    pub fn message(&self) -> Option<&str> {
        match self {
            GenerationError::Service { message } if !message.trim().is_empty() => {
                Some(message.as_str())
            }
            _ => None,
        }
    }
}

/// 存储相关错误
#[derive(Debug, Error)]
pub enum StorageError {
    /// 读取文件失败
    #[error("读取文件失败 ({path}): {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// 写入文件失败
    #[error("写入文件失败 ({path}): {source}")]
    WriteFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// JSON 解析失败
    #[error("JSON解析失败 ({path}): {source}")]
    JsonParseFailed {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    /// TOML 解析失败
    #[error("TOML解析失败 ({path}): {source}")]
    TomlParseFailed {
        path: String,
        #[source]
        source: toml::de::Error,
    },
    /// TOML 序列化失败
    #[error("TOML序列化失败: {0}")]
    TomlSerializeFailed(#[from] toml::ser::Error),
}

/// 导出相关错误
#[derive(Debug, Error)]
pub enum ExportError {
    /// 当前没有选中的答案
    #[error("当前没有可导出的答案")]
    NoAnswerSelected,
    /// 历史记录中找不到该答案
    #[error("历史记录中找不到答案: {id}")]
    AnswerNotFound { id: String },
    /// PDF 渲染失败
    #[error("PDF生成失败: {0}")]
    Pdf(String),
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 环境变量解析失败
    #[error("环境变量 {var_name} 解析失败: 值 '{value}' 无法转换为 {expected_type}")]
    EnvVarParseFailed {
        var_name: String,
        value: String,
        expected_type: String,
    },
    /// 配置文件读取失败
    #[error("无法读取配置文件 {path}: {source}")]
    FileReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// 配置文件解析失败
    #[error("无法解析配置文件 {path}: {source}")]
    FileParseFailed {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

// ========== 从常见错误类型转换 ==========

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Storage(StorageError::JsonParseFailed {
            path: String::new(),
            source: err,
        })
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Storage(StorageError::ReadFailed {
            path: String::new(),
            source: err,
        })
    }
}

impl From<toml::ser::Error> for AppError {
    fn from(err: toml::ser::Error) -> Self {
        AppError::Storage(StorageError::TomlSerializeFailed(err))
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_prefers_underlying_message() {
        let err = AppError::from(GenerationError::service("Failed to generate answer."));
        assert_eq!(err.user_message(), "Failed to generate answer.");
    }

    #[test]
    fn test_user_message_falls_back_when_opaque() {
        assert_eq!(
            AppError::from(GenerationError::opaque()).user_message(),
            GENERIC_FAILURE_MESSAGE
        );
        assert_eq!(
            AppError::from(GenerationError::service("  ")).user_message(),
            GENERIC_FAILURE_MESSAGE
        );
    }

    #[test]
    fn test_validation_message_is_shown_verbatim() {
        let err = AppError::validation("Please enter a valid question.");
        assert_eq!(err.user_message(), "Please enter a valid question.");
    }
}
