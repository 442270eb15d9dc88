//! 本地状态存储 - 基础设施层
//!
//! 唯一持有状态目录的组件，只暴露读写能力：
//! - `history.json` 历史记录
//! - `custom_styles.json` 自定义样式
//! - `settings.toml` 当前选择（分值 / 样式 / 批量模式）
//!
//! 启动时加载一次，每次修改后立即写回。

use std::path::PathBuf;
use tracing::{debug, warn};

use crate::error::{AppError, AppResult};
use crate::models::{
    load_json_list, load_settings, save_json_list, save_settings, CustomStyle, GeneratedAnswer,
    Settings,
};

const HISTORY_FILE: &str = "history.json";
const STYLES_FILE: &str = "custom_styles.json";
const SETTINGS_FILE: &str = "settings.toml";

/// 持久化状态存储
#[derive(Debug, Clone)]
pub struct StateStore {
    dir: PathBuf,
}

impl StateStore {
    /// 打开（必要时创建）状态目录
    pub async fn open(dir: impl Into<PathBuf>) -> AppResult<Self> {
        let dir = dir.into();
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| AppError::file_write_failed(dir.display().to_string(), e))?;
        debug!("状态目录: {}", dir.display());
        Ok(Self { dir })
    }

    /// 加载历史记录，文件损坏时记录警告并返回空列表
    pub async fn load_history(&self) -> Vec<GeneratedAnswer> {
        let path = self.dir.join(HISTORY_FILE);
        load_json_list(&path).await.unwrap_or_else(|e| {
            warn!("⚠️ 历史记录无法读取，将从空记录开始: {}", e);
            Vec::new()
        })
    }

    pub async fn save_history(&self, items: &[GeneratedAnswer]) -> AppResult<()> {
        save_json_list(&self.dir.join(HISTORY_FILE), items).await
    }

    /// 加载自定义样式，文件损坏时记录警告并返回空列表
    pub async fn load_styles(&self) -> Vec<CustomStyle> {
        let path = self.dir.join(STYLES_FILE);
        load_json_list(&path).await.unwrap_or_else(|e| {
            warn!("⚠️ 自定义样式无法读取，将从空列表开始: {}", e);
            Vec::new()
        })
    }

    pub async fn save_styles(&self, styles: &[CustomStyle]) -> AppResult<()> {
        save_json_list(&self.dir.join(STYLES_FILE), styles).await
    }

    /// 加载会话设置，缺失或损坏时使用默认值
    pub async fn load_settings(&self) -> Settings {
        match load_settings(&self.dir.join(SETTINGS_FILE)).await {
            Ok(Some(settings)) => settings,
            Ok(None) => Settings::default(),
            Err(e) => {
                warn!("⚠️ 设置无法读取，使用默认设置: {}", e);
                Settings::default()
            }
        }
    }

    pub async fn save_settings(&self, settings: &Settings) -> AppResult<()> {
        save_settings(&self.dir.join(SETTINGS_FILE), settings).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MarksWeightage;

    #[tokio::test]
    async fn test_first_run_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = StateStore::open(dir.path().join("state")).await.unwrap();

        assert!(store.load_history().await.is_empty());
        assert!(store.load_styles().await.is_empty());
        assert_eq!(store.load_settings().await, Settings::default());
    }

    #[tokio::test]
    async fn test_corrupt_history_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = StateStore::open(dir.path()).await.unwrap();
        tokio::fs::write(dir.path().join(HISTORY_FILE), "[{]").await.unwrap();

        assert!(store.load_history().await.is_empty());
    }

    #[tokio::test]
    async fn test_state_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let answer = GeneratedAnswer::new("Define OS", MarksWeightage::Two, "Brief", "a) OS** manages");
        let style = CustomStyle::new("Crisp", "Answer in 3 lines");
        {
            let store = StateStore::open(dir.path()).await.unwrap();
            store.save_history(&[answer.clone()]).await.unwrap();
            store.save_styles(&[style.clone()]).await.unwrap();
        }

        let reopened = StateStore::open(dir.path()).await.unwrap();
        assert_eq!(reopened.load_history().await, vec![answer]);
        assert_eq!(reopened.load_styles().await, vec![style]);
    }
}
