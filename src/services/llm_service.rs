//! LLM 服务 - 业务能力层
//!
//! 只负责"调用模型生成文本"的能力，不关心流程
//!
//! ## 技术栈
//! - 使用 `async-openai` crate 进行 API 调用
//! - 支持自定义 API 端点和模型
//! - 兼容 OpenAI API 的服务（如 Gemini 的 OpenAI 兼容端点）

use std::future::Future;
use std::time::Duration;

use anyhow::{Context, Result};
use async_openai::{
    config::OpenAIConfig,
    types::chat::{
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
        ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
    },
    Client,
};
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::GenerationError;
use crate::models::MarksWeightage;

/// 考官角色的系统指令
pub const SYSTEM_INSTRUCTION: &str = r#"You are an SPPU University examiner, senior evaluator, and model answer designer.

Core Objective: Generate exam-ready model answers that look correct, complete, and easy to evaluate.

Mandatory Answer Structure (unless overridden by specific style):
1. Introduction / Definition: 1–2 lines only. Crisp, formal tone.
2. Body (Point-Wise Explanation):
   - Strictly in points using "X) Title** Explanation" format.
   - Points must be 2-4 lines max.
   - Maintain logical flow: Concept → working → advantages/examples → applications.
3. Conclusion (Optional): 1 short line only if suitable.

Marks-Based Content Control:
- 2 Marks → 2–3 concise points
- 5 Marks → 5–6 well-explained points
- 8 Marks → 8–9 structured points
- 10 Marks → 10–12 complete points

Style Rules:
- Use simple, direct, technically correct language.
- Use standard keywords: definition, working principle, logic, block diagram, truth table, advantage, application, limitation.
- NO long paragraphs, NO conversational tone, NO over-justification.

Output Requirement:
- Answers must appear correct at first glance.
- Compact, scan-ready, and matching SPPU evaluation patterns."#;

const SUGGEST_SYSTEM_INSTRUCTION: &str =
    "You are an SPPU University question paper setter. Provide only the questions in a numbered list.";

/// 模型返回空文本时使用的答案
pub const FALLBACK_ANSWER: &str = "Sorry, I couldn't generate an answer at this time.";

/// 调用失败时展示给用户的消息
pub const GENERATION_FAILED_MESSAGE: &str = "Failed to generate answer. Please check your connection.";

/// 答案生成能力
///
/// 输入题目、分值、样式名和可选的自定义指令，返回答案文本。
pub trait AnswerGenerator: Send + Sync {
    fn generate(
        &self,
        question: &str,
        marks: MarksWeightage,
        style: &str,
        custom_instruction: Option<&str>,
    ) -> impl Future<Output = Result<String, GenerationError>> + Send;
}

/// 题目推荐能力
///
/// 失败时返回空字符串而不是报错。
pub trait QuestionSuggester: Send + Sync {
    fn suggest(&self, topic: &str) -> impl Future<Output = String> + Send;
}

/// 一次对话补全请求的采样参数
#[derive(Debug, Clone, Copy)]
struct Sampling {
    temperature: f32,
    /// 不设置时使用服务端默认值
    top_p: Option<f32>,
}

const ANSWER_SAMPLING: Sampling = Sampling { temperature: 0.7, top_p: Some(0.95) };
const SUGGEST_SAMPLING: Sampling = Sampling { temperature: 0.8, top_p: None };

/// 基于 OpenAI 兼容接口的模型客户端
///
/// 同时提供答案生成和题目推荐，一次只处理一个提示词。
pub struct LlmService {
    client: Client<OpenAIConfig>,
    model_name: String,
    timeout: Option<Duration>,
}

impl LlmService {
    pub fn new(config: &Config) -> Self {
        let endpoint = OpenAIConfig::new()
            .with_api_base(&config.llm_api_base_url)
            .with_api_key(&config.llm_api_key);

        Self {
            client: Client::with_config(endpoint),
            model_name: config.llm_model_name.clone(),
            timeout: (config.llm_timeout_secs > 0)
                .then(|| Duration::from_secs(config.llm_timeout_secs)),
        }
    }

    /// 发送"系统指令 + 用户提示词"，返回第一条候选的文本（已去掉首尾空白，可能为空）
    async fn complete(&self, system: &str, prompt: &str, sampling: Sampling) -> Result<String> {
        debug!(
            "➡️ 请求模型 {} (提示词 {} 字符, temperature {})",
            self.model_name,
            prompt.chars().count(),
            sampling.temperature
        );

        let messages: Vec<ChatCompletionRequestMessage> = vec![
            ChatCompletionRequestSystemMessageArgs::default()
                .content(system)
                .build()?
                .into(),
            ChatCompletionRequestUserMessageArgs::default()
                .content(prompt)
                .build()?
                .into(),
        ];

        let mut args = CreateChatCompletionRequestArgs::default();
        args.model(&self.model_name)
            .messages(messages)
            .temperature(sampling.temperature);
        if let Some(top_p) = sampling.top_p {
            args.top_p(top_p);
        }
        let request = args.build()?;

        let chat = self.client.chat();
        let pending = chat.create(request);
        let reply = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, pending)
                .await
                .with_context(|| format!("模型 {} 在 {} 秒内没有响应", self.model_name, limit.as_secs()))?,
            None => pending.await,
        }
        .with_context(|| format!("模型 {} 请求失败", self.model_name))?;

        let text = reply
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .unwrap_or_default();

        debug!("⬅️ 模型返回 {} 字符", text.chars().count());
        Ok(text.trim().to_string())
    }
}

impl AnswerGenerator for LlmService {
    async fn generate(
        &self,
        question: &str,
        marks: MarksWeightage,
        style: &str,
        custom_instruction: Option<&str>,
    ) -> Result<String, GenerationError> {
        let prompt = build_answer_prompt(question, marks, style, custom_instruction);

        match self.complete(SYSTEM_INSTRUCTION, &prompt, ANSWER_SAMPLING).await {
            Ok(text) if text.is_empty() => {
                warn!("⚠️ 模型没有返回内容，使用默认答案");
                Ok(FALLBACK_ANSWER.to_string())
            }
            Ok(text) => Ok(text),
            Err(e) => {
                warn!("❌ 答案生成失败: {:#}", e);
                Err(GenerationError::service(GENERATION_FAILED_MESSAGE))
            }
        }
    }
}

impl QuestionSuggester for LlmService {
    async fn suggest(&self, topic: &str) -> String {
        let prompt = build_suggest_prompt(topic);

        match self.complete(SUGGEST_SYSTEM_INSTRUCTION, &prompt, SUGGEST_SAMPLING).await {
            Ok(text) => text,
            Err(e) => {
                warn!("⚠️ 题目推荐失败: {:#}", e);
                String::new()
            }
        }
    }
}

/// 构建生成答案的提示词
pub fn build_answer_prompt(
    question: &str,
    marks: MarksWeightage,
    style: &str,
    custom_instruction: Option<&str>,
) -> String {
    let style_context = match custom_instruction {
        Some(instruction) => format!("Apply this custom style instruction: \"{}\"", instruction),
        None => format!("Follow the standard \"{}\" format.", style),
    };

    format!(
        "Question: {}\nMarks Weightage: {} Marks\nAnswer Style: {}\n{}\n\nPlease provide the model answer strictly following the provided evaluator rules and style context.",
        question, marks, style, style_context
    )
}

/// 构建推荐题目的提示词
pub fn build_suggest_prompt(topic: &str) -> String {
    format!(
        "Generate exactly 10 high-probability exam questions for the Savitribai Phule Pune University (SPPU) for the subject/topic: \"{}\". \n\
         Format each question starting with a number (e.g., 1., 2., ...). \n\
         Ensure questions are typical of 5-10 marks weightage. \n\
         Only return the list of questions, no other text.",
        topic
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn live_service() -> LlmService {
        let config = Config {
            llm_api_key: std::env::var("LLM_API_KEY").unwrap_or_default(),
            ..Config::default()
        };
        LlmService::new(&config)
    }

    #[test]
    fn test_answer_prompt_with_standard_style() {
        let prompt = build_answer_prompt("Define OS", MarksWeightage::Five, "Brief", None);

        assert!(prompt.starts_with("Question: Define OS\n"));
        assert!(prompt.contains("Marks Weightage: 5 Marks\n"));
        assert!(prompt.contains("Answer Style: Brief\n"));
        assert!(prompt.contains("Follow the standard \"Brief\" format."));
    }

    #[test]
    fn test_answer_prompt_with_custom_instruction() {
        let prompt = build_answer_prompt(
            "Explain paging",
            MarksWeightage::Ten,
            "Crisp",
            Some("Use exactly 4 bullet points"),
        );

        assert!(prompt.contains("Marks Weightage: 10 Marks"));
        assert!(prompt.contains("Apply this custom style instruction: \"Use exactly 4 bullet points\""));
        assert!(!prompt.contains("Follow the standard"));
    }

    #[test]
    fn test_suggest_prompt_mentions_topic() {
        let prompt = build_suggest_prompt("Operating Systems");
        assert!(prompt.contains("\"Operating Systems\""));
        assert!(prompt.contains("exactly 10"));
    }

    #[test]
    fn test_only_answers_set_top_p() {
        assert_eq!(ANSWER_SAMPLING.top_p, Some(0.95));
        assert_eq!(SUGGEST_SAMPLING.top_p, None);
        assert_eq!(SUGGEST_SAMPLING.temperature, 0.8);
    }

    #[test]
    fn test_timeout_disabled_when_zero() {
        let config = Config {
            llm_timeout_secs: 0,
            ..Config::default()
        };
        assert!(LlmService::new(&config).timeout.is_none());
        assert_eq!(live_service().timeout, Some(Duration::from_secs(120)));
    }

    // LLM_API_KEY=... cargo test live -- --ignored --nocapture
    #[tokio::test]
    #[ignore]
    async fn test_generate_live() {
        let _ = tracing_subscriber::fmt::try_init();

        let answer = live_service()
            .generate("What is an operating system?", MarksWeightage::Two, "Brief", None)
            .await
            .unwrap();
        println!("{}", answer);
        assert_ne!(answer, FALLBACK_ANSWER);
    }

    #[tokio::test]
    #[ignore]
    async fn test_suggest_live() {
        let _ = tracing_subscriber::fmt::try_init();

        let questions = live_service().suggest("Operating Systems").await;
        println!("{}", questions);
        assert!(crate::services::batch_parser::count_questions(&questions, true) > 1);
    }
}
