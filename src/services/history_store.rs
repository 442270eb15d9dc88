//! 历史记录服务 - 业务能力层
//!
//! 只负责"保存和读取生成过的答案"，每次修改后立即写回磁盘
//!
//! 修改先作用在副本上，写盘成功后才替换内存中的历史。

use std::sync::Arc;
use tracing::{debug, info};

use crate::error::AppResult;
use crate::infrastructure::StateStore;
use crate::models::{GeneratedAnswer, History};

/// 历史记录服务
pub struct HistoryStore {
    history: History,
    store: Arc<StateStore>,
}

impl HistoryStore {
    /// 从状态存储加载历史记录
    pub async fn load(store: Arc<StateStore>) -> Self {
        let items = store.load_history().await;
        debug!("已加载 {} 条历史记录", items.len());
        Self {
            history: History::from_items(items),
            store,
        }
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn get(&self, id: &str) -> Option<&GeneratedAnswer> {
        self.history.get(id)
    }

    /// 提交一个成功完成的批次
    ///
    /// `answers` 为完成顺序，写入后最后完成的排在最前。
    pub async fn commit_batch(&mut self, answers: Vec<GeneratedAnswer>) -> AppResult<()> {
        let count = answers.len();
        let mut next = self.history.clone();
        next.prepend_batch(answers);
        self.store.save_history(next.items()).await?;
        self.history = next;
        info!("💾 已保存 {} 条新答案，历史共 {} 条", count, self.history.len());
        Ok(())
    }

    /// 删除一条历史记录，返回被删除的条目
    pub async fn delete(&mut self, id: &str) -> AppResult<Option<GeneratedAnswer>> {
        let mut next = self.history.clone();
        let Some(removed) = next.remove(id) else {
            return Ok(None);
        };
        self.store.save_history(next.items()).await?;
        self.history = next;
        info!("🗑️ 已删除历史记录 {}", id);
        Ok(Some(removed))
    }

    /// 把全部历史整理成一段文本（按时间从早到晚）
    pub fn export_all_text(&self) -> String {
        format_all_solutions(self.history.items())
    }
}

/// "复制全部答案"的文本格式
pub fn format_all_solutions(items: &[GeneratedAnswer]) -> String {
    let mut sorted: Vec<&GeneratedAnswer> = items.iter().collect();
    sorted.sort_by_key(|item| item.timestamp);

    sorted
        .iter()
        .enumerate()
        .map(|(index, item)| {
            format!(
                "{}. QUESTION: {}\n(Marks: {}, Style: {})\n\nANSWER:\n{}\n\n{}\n",
                index + 1,
                item.question,
                item.marks,
                item.style,
                item.answer,
                "-".repeat(40)
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MarksWeightage;

    fn answer_at(question: &str, timestamp: i64) -> GeneratedAnswer {
        GeneratedAnswer {
            timestamp,
            ..GeneratedAnswer::new(question, MarksWeightage::Five, "Brief", "1) A** b")
        }
    }

    #[test]
    fn test_format_all_sorted_oldest_first() {
        let items = vec![answer_at("newer", 200), answer_at("older", 100)];
        let text = format_all_solutions(&items);

        let older = text.find("1. QUESTION: older").unwrap();
        let newer = text.find("2. QUESTION: newer").unwrap();
        assert!(older < newer);
        assert!(text.contains("(Marks: 5, Style: Brief)\n\nANSWER:\n1) A** b\n\n"));
        assert!(text.ends_with(&format!("{}\n", "-".repeat(40))));
    }

    #[test]
    fn test_format_all_empty() {
        assert_eq!(format_all_solutions(&[]), "");
    }

    #[tokio::test]
    async fn test_commit_and_delete_persist() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(StateStore::open(dir.path()).await.unwrap());

        let mut history = HistoryStore::load(store.clone()).await;
        let first = answer_at("first", 1);
        let second = answer_at("second", 2);
        let first_id = first.id.clone();
        history.commit_batch(vec![first, second]).await.unwrap();

        let reloaded = HistoryStore::load(store.clone()).await;
        let questions: Vec<_> = reloaded.history().iter().map(|a| a.question.clone()).collect();
        assert_eq!(questions, vec!["second", "first"]);

        assert!(history.delete(&first_id).await.unwrap().is_some());
        assert!(history.delete("missing").await.unwrap().is_none());
        assert_eq!(HistoryStore::load(store).await.history().len(), 1);
    }

    #[tokio::test]
    async fn test_failed_write_leaves_history_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(StateStore::open(dir.path()).await.unwrap());
        let mut history = HistoryStore::load(store).await;
        let kept = answer_at("kept", 1);
        let kept_id = kept.id.clone();
        history.commit_batch(vec![kept]).await.unwrap();

        tokio::fs::remove_file(dir.path().join("history.json")).await.unwrap();
        tokio::fs::create_dir(dir.path().join("history.json")).await.unwrap();

        assert!(history.commit_batch(vec![answer_at("lost", 2)]).await.is_err());
        assert!(history.delete(&kept_id).await.is_err());
        let questions: Vec<_> = history.history().iter().map(|a| a.question.clone()).collect();
        assert_eq!(questions, vec!["kept"]);
    }
}
