//! 自定义样式服务 - 业务能力层
//!
//! 只负责自定义样式的增删改查和持久化。
//! "当前选中哪个样式"由编排层维护。
//!
//! 每次修改先写盘，写盘成功后才替换内存中的列表；写盘失败时内存保持原样。

use std::sync::Arc;
use tracing::info;

use crate::error::{AppError, AppResult};
use crate::infrastructure::StateStore;
use crate::models::{CustomStyle, DefaultAnswerStyle};

/// 自定义样式注册表
pub struct StyleRegistry {
    styles: Vec<CustomStyle>,
    store: Arc<StateStore>,
}

impl StyleRegistry {
    /// 从状态存储加载
    pub async fn load(store: Arc<StateStore>) -> Self {
        let styles = store.load_styles().await;
        Self { styles, store }
    }

    pub fn styles(&self) -> &[CustomStyle] {
        &self.styles
    }

    pub fn find_by_name(&self, name: &str) -> Option<&CustomStyle> {
        self.styles.iter().find(|s| s.name == name)
    }

    /// 样式名对应的自定义指令（内置样式没有）
    pub fn instruction_for(&self, style_name: &str) -> Option<String> {
        self.find_by_name(style_name).map(|s| s.instruction.clone())
    }

    /// 可选样式名：内置样式在前，自定义样式在后
    pub fn all_style_names(&self) -> Vec<String> {
        DefaultAnswerStyle::ALL
            .iter()
            .map(|s| s.name().to_string())
            .chain(self.styles.iter().map(|s| s.name.clone()))
            .collect()
    }

    /// 样式名是否可选
    pub fn contains_name(&self, name: &str) -> bool {
        DefaultAnswerStyle::from_name(name).is_some() || self.find_by_name(name).is_some()
    }

    /// 新增自定义样式
    pub async fn add(&mut self, name: &str, instruction: &str) -> AppResult<CustomStyle> {
        let (name, instruction) = validate(name, instruction)?;
        self.ensure_unique(&name, None)?;

        let style = CustomStyle::new(name, instruction);
        let mut next = self.styles.clone();
        next.push(style.clone());
        self.commit(next).await?;

        info!("✓ 新增自定义样式: {}", style.name);
        Ok(style)
    }

    /// 修改自定义样式
    ///
    /// # 返回
    /// `(修改前, 修改后)`
    pub async fn update(
        &mut self,
        id: &str,
        name: &str,
        instruction: &str,
    ) -> AppResult<(CustomStyle, CustomStyle)> {
        let (name, instruction) = validate(name, instruction)?;
        self.ensure_unique(&name, Some(id))?;

        let mut next = self.styles.clone();
        let style = next
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| AppError::validation(format!("找不到自定义样式: {}", id)))?;

        let before = style.clone();
        style.name = name;
        style.instruction = instruction;
        let after = style.clone();

        self.commit(next).await?;

        info!("✓ 已修改自定义样式: {} → {}", before.name, after.name);
        Ok((before, after))
    }

    /// 删除自定义样式，返回被删除的样式
    pub async fn delete(&mut self, id: &str) -> AppResult<Option<CustomStyle>> {
        let Some(pos) = self.styles.iter().position(|s| s.id == id) else {
            return Ok(None);
        };

        let mut next = self.styles.clone();
        let removed = next.remove(pos);
        self.commit(next).await?;

        info!("🗑️ 已删除自定义样式: {}", removed.name);
        Ok(Some(removed))
    }

    /// 写盘成功后替换内存中的列表
    async fn commit(&mut self, next: Vec<CustomStyle>) -> AppResult<()> {
        self.store.save_styles(&next).await?;
        self.styles = next;
        Ok(())
    }

    /// 名称不能与内置样式或其他自定义样式重复
    fn ensure_unique(&self, name: &str, editing_id: Option<&str>) -> AppResult<()> {
        if DefaultAnswerStyle::from_name(name).is_some() {
            return Err(AppError::validation(format!("\"{}\" 是内置样式名", name)));
        }
        let taken = self
            .styles
            .iter()
            .any(|s| s.name == name && Some(s.id.as_str()) != editing_id);
        if taken {
            return Err(AppError::validation(format!("样式名 \"{}\" 已存在", name)));
        }
        Ok(())
    }
}

fn validate(name: &str, instruction: &str) -> AppResult<(String, String)> {
    let name = name.trim();
    let instruction = instruction.trim();
    if name.is_empty() || instruction.is_empty() {
        return Err(AppError::validation("样式名和指令都不能为空"));
    }
    Ok((name.to_string(), instruction.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn registry() -> (tempfile::TempDir, StyleRegistry) {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(StateStore::open(dir.path()).await.unwrap());
        let registry = StyleRegistry::load(store).await;
        (dir, registry)
    }

    #[tokio::test]
    async fn test_add_trims_and_persists() {
        let (dir, mut registry) = registry().await;
        let style = registry.add("  Crisp ", " Three lines only ").await.unwrap();

        assert_eq!(style.name, "Crisp");
        assert_eq!(style.instruction, "Three lines only");
        assert_eq!(registry.instruction_for("Crisp").as_deref(), Some("Three lines only"));
        assert!(registry.instruction_for("Brief").is_none());

        let store = Arc::new(StateStore::open(dir.path()).await.unwrap());
        assert_eq!(StyleRegistry::load(store).await.styles(), &[style]);
    }

    #[tokio::test]
    async fn test_blank_fields_rejected() {
        let (_dir, mut registry) = registry().await;
        assert!(matches!(registry.add("  ", "x").await, Err(AppError::Validation(_))));
        assert!(matches!(registry.add("Name", "").await, Err(AppError::Validation(_))));
        assert!(registry.styles().is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_names_rejected() {
        let (_dir, mut registry) = registry().await;
        let crisp = registry.add("Crisp", "short").await.unwrap();
        let other = registry.add("Long", "long").await.unwrap();

        assert!(registry.add("Crisp", "again").await.is_err());
        assert!(registry.add("Brief", "clash with default").await.is_err());
        assert!(registry.update(&other.id, "Crisp", "x").await.is_err());
        // 保持原名修改指令是允许的
        assert!(registry.update(&crisp.id, "Crisp", "shorter").await.is_ok());
    }

    #[tokio::test]
    async fn test_update_keeps_id() {
        let (_dir, mut registry) = registry().await;
        let style = registry.add("Crisp", "short").await.unwrap();

        let (before, after) = registry.update(&style.id, "Crisper", "shorter").await.unwrap();
        assert_eq!(before.name, "Crisp");
        assert_eq!(after.id, style.id);
        assert_eq!(after.name, "Crisper");
        assert!(registry.find_by_name("Crisp").is_none());
    }

    #[tokio::test]
    async fn test_all_style_names_order() {
        let (_dir, mut registry) = registry().await;
        registry.add("Crisp", "short").await.unwrap();

        assert_eq!(
            registry.all_style_names(),
            vec!["SPPU Model Answer", "Brief", "Detailed", "Crisp"]
        );
        assert!(registry.contains_name("Detailed"));
        assert!(!registry.contains_name("Unknown"));
    }

    #[tokio::test]
    async fn test_failed_write_leaves_styles_unchanged() {
        let (dir, mut registry) = registry().await;
        let style = registry.add("Crisp", "short").await.unwrap();

        // 样式文件的位置被目录占用，写盘必然失败
        tokio::fs::remove_file(dir.path().join("custom_styles.json")).await.unwrap();
        tokio::fs::create_dir(dir.path().join("custom_styles.json")).await.unwrap();

        assert!(registry.delete(&style.id).await.is_err());
        assert!(registry.update(&style.id, "Crisper", "x").await.is_err());
        assert!(registry.add("Long", "long").await.is_err());
        assert_eq!(registry.styles(), &[style]);
    }

    #[tokio::test]
    async fn test_delete_missing_is_noop() {
        let (_dir, mut registry) = registry().await;
        assert!(registry.delete("nope").await.unwrap().is_none());
    }
}
