//! 批次生成流程 - 流程层
//!
//! 核心职责：定义"一批题目"的生成流程
//!
//! 流程顺序：
//! 1. 题目放入队列
//! 2. 每次取出一道，检查取消标记，调用生成服务并等待完成
//! 3. 任意一道失败或被取消：整批作废，已生成的结果全部丢弃
//! 4. 全部成功：按完成顺序返回，由编排层写入历史
//!
//! 同一时间只有一个请求在进行中。

use std::collections::VecDeque;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::error::{AppError, AppResult};
use crate::models::GeneratedAnswer;
use crate::services::AnswerGenerator;
use crate::utils::logging::{log_batch_complete, log_batch_start, log_question_start};
use crate::workflow::batch_ctx::BatchCtx;

/// 批次生成流程
///
/// - 编排一批题目的顺序生成
/// - 不持有任何状态（历史 / 样式）
/// - 只依赖答案生成能力
pub struct GenerationFlow<G> {
    generator: Arc<G>,
}

impl<G: AnswerGenerator> GenerationFlow<G> {
    /// 创建新的生成流程
    pub fn new(generator: Arc<G>) -> Self {
        Self { generator }
    }

    /// 顺序生成一批题目
    ///
    /// # 返回
    /// 全部成功时返回按完成顺序排列的答案；否则返回第一个错误
    pub async fn run(
        &self,
        questions: Vec<String>,
        ctx: &BatchCtx,
        cancel: &CancellationToken,
    ) -> AppResult<Vec<GeneratedAnswer>> {
        let total = questions.len();
        let mut queue: VecDeque<String> = questions.into();
        let mut produced: Vec<GeneratedAnswer> = Vec::with_capacity(total);

        log_batch_start(total, ctx.marks.as_str(), &ctx.style);

        while let Some(question) = queue.pop_front() {
            if cancel.is_cancelled() {
                warn!(
                    "⚠️ {} 批次已取消，丢弃已生成的 {} 条结果",
                    ctx,
                    produced.len()
                );
                return Err(AppError::Cancelled);
            }

            let index = produced.len() + 1;
            log_question_start(index, total, &question);

            let answer = match self
                .generator
                .generate(
                    &question,
                    ctx.marks,
                    &ctx.style,
                    ctx.custom_instruction.as_deref(),
                )
                .await
            {
                Ok(answer) => answer,
                Err(e) => {
                    error!(
                        "❌ {} 第 {}/{} 题生成失败: {}，丢弃本批已生成的 {} 条结果",
                        ctx,
                        index,
                        total,
                        e,
                        produced.len()
                    );
                    return Err(e.into());
                }
            };

            info!("✓ [{}/{}] 生成完成 ({} 字符)", index, total, answer.chars().count());
            produced.push(GeneratedAnswer::new(
                question,
                ctx.marks,
                ctx.style.clone(),
                answer,
            ));
        }

        log_batch_complete(produced.len(), total);
        Ok(produced)
    }
}
