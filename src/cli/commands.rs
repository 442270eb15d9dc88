//! 命令行子命令和参数定义

use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};

use crate::models::MarksWeightage;
use crate::services::ExportFormat;

/// 顶层子命令
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// 为输入的题目生成模范答案
    Generate(GenerateArgs),

    /// 按主题推荐 10 道高频考题
    Suggest(SuggestArgs),

    /// 统计输入中能识别出的题目数
    Count(CountArgs),

    /// 查看和管理历史记录
    #[command(subcommand)]
    History(HistoryCommand),

    /// 管理答案样式
    #[command(subcommand)]
    Style(StyleCommand),

    /// 把答案导出为 PDF 或 Word
    Export(ExportArgs),
}

#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// 题目文本；省略或为 `-` 时从标准输入读取
    pub text: Option<String>,

    /// 从文件读取题目
    #[arg(long, conflicts_with = "text")]
    pub file: Option<PathBuf>,

    /// 按批量模式切分题目（会被记住）
    #[arg(long, conflicts_with = "single")]
    pub batch: bool,

    /// 按单题模式处理（会被记住）
    #[arg(long)]
    pub single: bool,

    /// 分值: 2, 5, 8, 10（会被记住）
    #[arg(long)]
    pub marks: Option<MarksWeightage>,

    /// 样式名（会被记住）
    #[arg(long)]
    pub style: Option<String>,
}

#[derive(Args, Debug)]
pub struct SuggestArgs {
    /// 科目或章节名称
    pub topic: String,

    /// 推荐完成后直接为这些题目生成答案
    #[arg(long)]
    pub generate: bool,
}

#[derive(Args, Debug)]
pub struct CountArgs {
    /// 题目文本；省略或为 `-` 时从标准输入读取
    pub text: Option<String>,

    /// 按批量模式统计
    #[arg(long)]
    pub batch: bool,
}

#[derive(Subcommand, Debug)]
pub enum HistoryCommand {
    /// 列出历史记录（最新的在前）
    List,
    /// 显示一条答案
    Show { id: String },
    /// 删除一条答案
    Delete { id: String },
    /// 输出全部答案（按时间从早到晚）
    CopyAll,
}

#[derive(Subcommand, Debug)]
pub enum StyleCommand {
    /// 列出所有样式
    List,
    /// 新增自定义样式并选中
    Add { name: String, instruction: String },
    /// 修改自定义样式
    Edit {
        id: String,
        name: String,
        instruction: String,
    },
    /// 删除自定义样式
    Delete { id: String },
    /// 选中一个样式
    Select { name: String },
}

#[derive(Args, Debug)]
pub struct ExportArgs {
    /// 历史记录 ID；省略时导出最新一条
    pub id: Option<String>,

    /// 导出格式
    #[arg(long, value_enum, default_value_t = FormatArg::Pdf)]
    pub format: FormatArg,

    /// 输出目录（默认使用配置中的 export_dir）
    #[arg(long)]
    pub out: Option<PathBuf>,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormatArg {
    Pdf,
    Word,
}

impl From<FormatArg> for ExportFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Pdf => ExportFormat::Pdf,
            FormatArg::Word => ExportFormat::Word,
        }
    }
}
