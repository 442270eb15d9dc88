use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;
use tokio::fs;

use crate::error::{AppError, AppResult, StorageError};

/// 从 JSON 文件加载列表
///
/// 文件不存在时返回空列表（首次运行）
pub async fn load_json_list<T: DeserializeOwned>(path: &Path) -> AppResult<Vec<T>> {
    let content = match fs::read_to_string(path).await {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(AppError::file_read_failed(path.display().to_string(), e)),
    };

    if content.trim().is_empty() {
        return Ok(Vec::new());
    }

    serde_json::from_str(&content).map_err(|source| {
        StorageError::JsonParseFailed {
            path: path.display().to_string(),
            source,
        }
        .into()
    })
}

/// 将列表写入 JSON 文件
///
/// 先写临时文件再重命名，避免中途失败留下半个文件
pub async fn save_json_list<T: Serialize>(path: &Path, items: &[T]) -> AppResult<()> {
    let content = serde_json::to_string_pretty(items)?;
    write_atomic(path, content.as_bytes()).await
}

pub(crate) async fn write_atomic(path: &Path, bytes: &[u8]) -> AppResult<()> {
    let tmp_path = path.with_extension("tmp");
    fs::write(&tmp_path, bytes)
        .await
        .map_err(|e| AppError::file_write_failed(tmp_path.display().to_string(), e))?;
    fs::rename(&tmp_path, path)
        .await
        .map_err(|e| AppError::file_write_failed(path.display().to_string(), e))?;
    Ok(())
}
