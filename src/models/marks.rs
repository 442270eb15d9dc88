use serde::{Deserialize, Serialize};

/// 题目分值
///
/// 序列化为字符串 "2" / "5" / "8" / "10"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum MarksWeightage {
    #[serde(rename = "2")]
    Two,
    #[default]
    #[serde(rename = "5")]
    Five,
    #[serde(rename = "8")]
    Eight,
    #[serde(rename = "10")]
    Ten,
}

impl MarksWeightage {
    pub fn as_str(self) -> &'static str {
        match self {
            MarksWeightage::Two => "2",
            MarksWeightage::Five => "5",
            MarksWeightage::Eight => "8",
            MarksWeightage::Ten => "10",
        }
    }
}

impl std::fmt::Display for MarksWeightage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

impl std::str::FromStr for MarksWeightage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "2" => Ok(MarksWeightage::Two),
            "5" => Ok(MarksWeightage::Five),
            "8" => Ok(MarksWeightage::Eight),
            "10" => Ok(MarksWeightage::Ten),
            other => Err(format!("不支持的分值: {}（可选 2, 5, 8, 10）", other)),
        }
    }
}
