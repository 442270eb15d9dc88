use serde::{Deserialize, Serialize};

use crate::models::marks::MarksWeightage;

/// 历史记录容量
pub const HISTORY_CAPACITY: usize = 20;

/// 一条生成的答案（历史记录条目）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedAnswer {
    pub id: String,
    pub question: String,
    pub marks: MarksWeightage,
    /// 生成时生效的样式名
    pub style: String,
    /// 模型返回的文本，按行分点
    pub answer: String,
    /// 创建时间（epoch 毫秒）
    pub timestamp: i64,
}

impl GeneratedAnswer {
    /// 创建新答案，生成新的 ID 并记录当前时间
    pub fn new(
        question: impl Into<String>,
        marks: MarksWeightage,
        style: impl Into<String>,
        answer: impl Into<String>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().simple().to_string(),
            question: question.into(),
            marks,
            style: style.into(),
            answer: answer.into(),
            timestamp: chrono::Utc::now().timestamp_millis(),
        }
    }
}

/// 有界历史记录，最新的在前
#[derive(Debug, Clone)]
pub struct History {
    items: Vec<GeneratedAnswer>,
    capacity: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::with_capacity(HISTORY_CAPACITY)
    }
}

impl History {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            items: Vec::new(),
            capacity,
        }
    }

    /// 从已保存的列表恢复，超出容量的旧条目被丢弃
    pub fn from_items(mut items: Vec<GeneratedAnswer>) -> Self {
        items.truncate(HISTORY_CAPACITY);
        Self {
            items,
            capacity: HISTORY_CAPACITY,
        }
    }

    /// 将一个批次的结果插入最前面
    ///
    /// `batch` 为完成顺序；最后完成的排在最前，超出容量的最旧条目被淘汰。
    pub fn prepend_batch(&mut self, batch: Vec<GeneratedAnswer>) {
        let mut merged: Vec<GeneratedAnswer> = batch.into_iter().rev().collect();
        merged.append(&mut self.items);
        merged.truncate(self.capacity);
        self.items = merged;
    }

    /// 删除指定条目，返回被删除的条目
    pub fn remove(&mut self, id: &str) -> Option<GeneratedAnswer> {
        let pos = self.items.iter().position(|item| item.id == id)?;
        Some(self.items.remove(pos))
    }

    pub fn get(&self, id: &str) -> Option<&GeneratedAnswer> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn items(&self) -> &[GeneratedAnswer] {
        &self.items
    }

    pub fn iter(&self) -> impl Iterator<Item = &GeneratedAnswer> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
