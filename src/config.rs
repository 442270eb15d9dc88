use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{AppResult, ConfigError};

/// 程序配置
///
/// 优先级：默认值 < TOML 配置文件 < 环境变量
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    // --- LLM 配置 ---
    pub llm_api_key: String,
    pub llm_api_base_url: String,
    pub llm_model_name: String,
    /// 单次 LLM 请求的超时时间（秒），0 表示不设超时
    pub llm_timeout_secs: u64,
    /// 历史记录和自定义样式的存放目录
    pub state_dir: PathBuf,
    /// 导出文件的默认目录
    pub export_dir: PathBuf,
    /// 是否显示详细日志
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            llm_api_key: String::new(),
            llm_api_base_url: "https://generativelanguage.googleapis.com/v1beta/openai".to_string(),
            llm_model_name: "gemini-3-flash-preview".to_string(),
            llm_timeout_secs: 120,
            state_dir: PathBuf::from(".exam_answer_gen"),
            export_dir: PathBuf::from("."),
            verbose_logging: false,
        }
    }
}

impl Config {
    /// 加载配置：可选的 TOML 文件，再叠加环境变量
    pub fn load(path: Option<&Path>) -> AppResult<Self> {
        let base = match path {
            Some(path) => Self::from_toml_file(path)?,
            None => Self::default(),
        };
        base.with_env_overrides()
    }

    /// 从 TOML 文件读取配置，缺省字段使用默认值
    pub fn from_toml_file(path: &Path) -> AppResult<Self> {
        let content =
            std::fs::read_to_string(path).map_err(|source| ConfigError::FileReadFailed {
                path: path.display().to_string(),
                source,
            })?;
        let config = toml::from_str(&content).map_err(|source| ConfigError::FileParseFailed {
            path: path.display().to_string(),
            source,
        })?;
        Ok(config)
    }

    fn with_env_overrides(mut self) -> AppResult<Self> {
        if let Some(key) = env_var("LLM_API_KEY").or_else(|| env_var("API_KEY")) {
            self.llm_api_key = key;
        }
        if let Some(url) = env_var("LLM_API_BASE_URL") {
            self.llm_api_base_url = url;
        }
        if let Some(model) = env_var("LLM_MODEL_NAME") {
            self.llm_model_name = model;
        }
        if let Some(secs) = env_var("LLM_TIMEOUT_SECS") {
            self.llm_timeout_secs = parse_env("LLM_TIMEOUT_SECS", &secs, "u64")?;
        }
        if let Some(dir) = env_var("STATE_DIR") {
            self.state_dir = PathBuf::from(dir);
        }
        if let Some(dir) = env_var("EXPORT_DIR") {
            self.export_dir = PathBuf::from(dir);
        }
        if let Some(verbose) = env_var("VERBOSE_LOGGING") {
            self.verbose_logging = parse_env("VERBOSE_LOGGING", &verbose, "bool")?;
        }
        Ok(self)
    }
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn parse_env<T: std::str::FromStr>(var_name: &str, value: &str, expected_type: &str) -> AppResult<T> {
    value.trim().parse().map_err(|_| {
        ConfigError::EnvVarParseFailed {
            var_name: var_name.to_string(),
            value: value.to_string(),
            expected_type: expected_type.to_string(),
        }
        .into()
    })
}
