use serde::{Deserialize, Serialize};

/// 内置答案样式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DefaultAnswerStyle {
    /// 标准模范答案
    ModelAnswer,
    /// 简要
    Brief,
    /// 详细
    Detailed,
}

/// 默认选中的样式
pub const DEFAULT_STYLE: DefaultAnswerStyle = DefaultAnswerStyle::ModelAnswer;

impl DefaultAnswerStyle {
    pub const ALL: [DefaultAnswerStyle; 3] = [
        DefaultAnswerStyle::ModelAnswer,
        DefaultAnswerStyle::Brief,
        DefaultAnswerStyle::Detailed,
    ];

    /// 样式名（同时也是样式值本身）
    pub fn name(self) -> &'static str {
        match self {
            DefaultAnswerStyle::ModelAnswer => "SPPU Model Answer",
            DefaultAnswerStyle::Brief => "Brief",
            DefaultAnswerStyle::Detailed => "Detailed",
        }
    }

    /// 按名称精确查找内置样式
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.name() == name)
    }
}

impl std::fmt::Display for DefaultAnswerStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// 用户自定义样式
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomStyle {
    /// 与名称无关的稳定 ID
    pub id: String,
    pub name: String,
    /// 追加到生成请求中的指令
    pub instruction: String,
}

impl CustomStyle {
    pub fn new(name: impl Into<String>, instruction: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.into(),
            instruction: instruction.into(),
        }
    }
}
