//! # Exam Answer Gen
//!
//! 为大学考试题目生成"模范答案"的 Rust 应用程序
//!
//! ## 架构设计
//!
//! 本系统采用四层架构：
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 持有状态目录，只暴露读写能力
//! - `StateStore` - 历史、自定义样式、设置的持久化
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"
//! - `batch_parser` - 把一段文本切成若干道题
//! - `LlmService` - 生成答案、推荐题目
//! - `HistoryStore` / `StyleRegistry` - 历史记录和自定义样式
//! - `export` - PDF / Word 导出
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一批题"的生成流程
//! - `BatchCtx` - 上下文封装（分值 + 样式 + 自定义指令）
//! - `GenerationFlow` - 顺序生成，任意一题失败整批作废
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/app` - 会话状态、重入控制、选择一致性
//!
//! 命令行入口在 `cli/`。

pub mod cli;
pub mod config;
pub mod error;
pub mod infrastructure;

pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use config::Config;
pub use error::{AppError, AppResult, GenerationError};
pub use infrastructure::StateStore;
pub use models::{CustomStyle, GeneratedAnswer, History, MarksWeightage, Settings};
pub use orchestrator::App;
pub use services::{AnswerGenerator, ExportFormat, LlmService, QuestionSuggester};
pub use workflow::{BatchCtx, GenerationFlow};
