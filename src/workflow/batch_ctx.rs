//! 批次上下文
//!
//! 封装"这一批题目用什么分值、什么样式生成"这一信息

use std::fmt::Display;

use crate::models::MarksWeightage;

/// 批次上下文
///
/// 在批次开始时确定，整个批次内不变
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchCtx {
    pub marks: MarksWeightage,

    /// 样式名（内置或自定义）
    pub style: String,

    /// 样式名匹配到自定义样式时的指令
    pub custom_instruction: Option<String>,
}

impl BatchCtx {
    /// 创建新的批次上下文
    pub fn new(
        marks: MarksWeightage,
        style: impl Into<String>,
        custom_instruction: Option<String>,
    ) -> Self {
        Self {
            marks,
            style: style.into(),
            custom_instruction,
        }
    }
}

impl Display for BatchCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{} 分 | 样式 {}", self.marks, self.style)?;
        if self.custom_instruction.is_some() {
            write!(f, " (自定义)")?;
        }
        write!(f, "]")
    }
}
