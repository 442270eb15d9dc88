use serde::{Deserialize, Serialize};

use crate::models::marks::MarksWeightage;
use crate::models::style::DEFAULT_STYLE;

/// 跨会话保存的选择状态
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub marks: MarksWeightage,
    /// 当前选中的样式名（内置或自定义）
    pub style: String,
    pub batch_mode: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            marks: MarksWeightage::default(),
            style: DEFAULT_STYLE.name().to_string(),
            batch_mode: false,
        }
    }
}
