use std::path::Path;
use tokio::fs;

use crate::error::{AppError, AppResult, StorageError};
use crate::models::loaders::json_loader::write_atomic;
use crate::models::settings::Settings;

/// 从 TOML 文件加载会话设置
///
/// 文件不存在时返回 `None`
pub async fn load_settings(path: &Path) -> AppResult<Option<Settings>> {
    let content = match fs::read_to_string(path).await {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(AppError::file_read_failed(path.display().to_string(), e)),
    };

    let settings = toml::from_str(&content).map_err(|source| StorageError::TomlParseFailed {
        path: path.display().to_string(),
        source,
    })?;

    Ok(Some(settings))
}

/// 将会话设置写入 TOML 文件
pub async fn save_settings(path: &Path, settings: &Settings) -> AppResult<()> {
    let content = toml::to_string(settings)?;
    write_atomic(path, content.as_bytes()).await
}
