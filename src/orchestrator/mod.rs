//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层负责会话状态和流程调度，是整个系统的"指挥中心"。
//!
//! ## 层次关系
//!
//! ```text
//! orchestrator::App (会话：输入 / 选择 / 历史 / 错误)
//!     ↓
//! workflow::GenerationFlow (处理一批题目)
//!     ↓
//! services (能力层：parse / llm / history / styles / export)
//!     ↓
//! infrastructure (基础设施：StateStore)
//! ```
//!
//! ## 设计原则
//!
//! 1. **单一入口**：所有状态修改都经过 `App`
//! 2. **资源隔离**：只有编排层持有 `StateStore`
//! 3. **向下依赖**：编排层 → workflow → services → infrastructure

pub mod app;

pub use app::{App, NO_VALID_QUESTION_MESSAGE, SUGGEST_FAILED_MESSAGE};
