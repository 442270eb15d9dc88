//! 会话编排 - 编排层
//!
//! ## 职责
//!
//! `App` 是整个会话的"指挥中心"：
//!
//! 1. **状态持有**：输入缓冲、当前答案、当前选择、单条错误消息
//! 2. **重入控制**：生成中（`in_progress`）时拒绝开始新批次
//! 3. **向下委托**：切题交给 `batch_parser`，生成交给 `GenerationFlow`
//! 4. **提交结果**：整批成功才写入历史，每次修改立即持久化
//! 5. **选择一致性**：自定义样式改名或删除时同步当前选择
//!
//! 任何失败（包括写盘失败）都会写入唯一的错误消息槽。
//! 写盘失败时内存状态保持不变，只有"当前选择"例外：它始终指向一个存在的样式。
//!
//! 生成客户端如果一直不返回，批次会一直挂起，`in_progress` 也不会被清除；
//! 超时由客户端自己负责（见 `Config::llm_timeout_secs`）。

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::config::Config;
use crate::error::{AppError, AppResult, ExportError};
use crate::infrastructure::StateStore;
use crate::models::{CustomStyle, GeneratedAnswer, History, MarksWeightage, Settings, DEFAULT_STYLE};
use crate::services::export::{self, ExportFormat};
use crate::services::{
    count_questions, parse_questions, AnswerGenerator, HistoryStore, QuestionSuggester,
    StyleRegistry,
};
use crate::workflow::{BatchCtx, GenerationFlow};

/// 没有可用题目时的提示
pub const NO_VALID_QUESTION_MESSAGE: &str = "Please enter a valid question.";

/// 推荐题目失败时的提示
pub const SUGGEST_FAILED_MESSAGE: &str = "Failed to suggest questions.";

/// 应用主结构
pub struct App<C> {
    store: Arc<StateStore>,
    client: Arc<C>,
    flow: GenerationFlow<C>,
    history: HistoryStore,
    styles: StyleRegistry,
    settings: Settings,
    input: String,
    current: Option<GeneratedAnswer>,
    error: Option<String>,
    in_progress: bool,
    suggesting: bool,
}

impl<C> App<C>
where
    C: AnswerGenerator + QuestionSuggester,
{
    /// 初始化应用：打开状态目录并加载历史、样式和设置
    pub async fn initialize(config: &Config, client: C) -> AppResult<Self> {
        let store = Arc::new(StateStore::open(&config.state_dir).await?);
        Ok(Self::with_store(store, client).await)
    }

    /// 使用已打开的状态存储创建应用
    pub async fn with_store(store: Arc<StateStore>, client: C) -> Self {
        let client = Arc::new(client);
        let history = HistoryStore::load(store.clone()).await;
        let styles = StyleRegistry::load(store.clone()).await;
        let mut settings = store.load_settings().await;

        if !styles.contains_name(&settings.style) {
            warn!("⚠️ 已保存的样式 \"{}\" 不存在，恢复默认样式", settings.style);
            settings.style = DEFAULT_STYLE.name().to_string();
        }

        info!(
            "🚀 已加载 {} 条历史记录，{} 个自定义样式",
            history.history().len(),
            styles.styles().len()
        );

        Self {
            store,
            flow: GenerationFlow::new(client.clone()),
            client,
            history,
            styles,
            settings,
            input: String::new(),
            current: None,
            error: None,
            in_progress: false,
            suggesting: false,
        }
    }

    // ========== 输入与选择 ==========

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    /// 按当前模式检测到的题目数
    pub fn detected_count(&self) -> usize {
        count_questions(&self.input, self.settings.batch_mode)
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn selected_style(&self) -> &str {
        &self.settings.style
    }

    pub async fn set_marks(&mut self, marks: MarksWeightage) -> AppResult<()> {
        let next = Settings {
            marks,
            ..self.settings.clone()
        };
        self.replace_settings(next).await
    }

    pub async fn set_batch_mode(&mut self, batch_mode: bool) -> AppResult<()> {
        let next = Settings {
            batch_mode,
            ..self.settings.clone()
        };
        self.replace_settings(next).await
    }

    /// 选择样式，样式名必须是内置或已注册的自定义样式
    pub async fn select_style(&mut self, name: &str) -> AppResult<()> {
        if !self.styles.contains_name(name) {
            let err = AppError::validation(format!("未知样式: {}", name));
            return self.track(Err(err));
        }
        let next = Settings {
            style: name.to_string(),
            ..self.settings.clone()
        };
        self.replace_settings(next).await
    }

    // ========== 状态查询 ==========

    pub fn is_generating(&self) -> bool {
        self.in_progress
    }

    pub fn is_suggesting(&self) -> bool {
        self.suggesting
    }

    /// 最近一次失败的提示（只保留一条）
    pub fn last_error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn current_answer(&self) -> Option<&GeneratedAnswer> {
        self.current.as_ref()
    }

    pub fn history(&self) -> &History {
        self.history.history()
    }

    pub fn custom_styles(&self) -> &[CustomStyle] {
        self.styles.styles()
    }

    pub fn style_names(&self) -> Vec<String> {
        self.styles.all_style_names()
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    // ========== 生成 ==========

    /// 对当前输入生成答案
    ///
    /// # 返回
    /// 成功时返回最后一道题的答案（也就是新的当前答案）
    pub async fn generate(&mut self, cancel: &CancellationToken) -> AppResult<GeneratedAnswer> {
        if self.in_progress {
            return Err(AppError::Busy);
        }

        let batch_mode = self.settings.batch_mode;
        let questions = parse_questions(&self.input, batch_mode);
        if questions.is_empty() {
            let err = AppError::validation(NO_VALID_QUESTION_MESSAGE);
            self.error = Some(err.user_message());
            return Err(err);
        }

        self.error = None;
        self.in_progress = true;

        let style = self.settings.style.clone();
        let custom_instruction = self.styles.instruction_for(&style);
        let ctx = BatchCtx::new(self.settings.marks, style, custom_instruction);

        let outcome = self.flow.run(questions, &ctx, cancel).await;
        self.in_progress = false;

        let answers = match outcome {
            Ok(answers) => answers,
            Err(e) => {
                self.error = Some(e.user_message());
                return Err(e);
            }
        };

        let Some(last) = answers.last().cloned() else {
            return self.track(Err(AppError::Other("批次没有产生任何答案".to_string())));
        };

        let committed = self.history.commit_batch(answers).await;
        self.track(committed)?;

        if batch_mode {
            self.input.clear();
        }
        self.current = Some(last.clone());

        Ok(last)
    }

    /// 按主题推荐题目
    ///
    /// 成功时切换到批量模式并把题目放入输入缓冲；主题为空时什么也不做。
    pub async fn suggest(&mut self, topic: &str) -> AppResult<Option<String>> {
        let topic = topic.trim();
        if topic.is_empty() || self.suggesting {
            return Ok(None);
        }

        self.suggesting = true;
        let questions = self.client.suggest(topic).await;
        self.suggesting = false;

        if questions.trim().is_empty() {
            warn!("⚠️ 主题 \"{}\" 没有返回推荐题目", topic);
            self.error = Some(SUGGEST_FAILED_MESSAGE.to_string());
            return Ok(None);
        }

        self.error = None;
        self.input = questions.clone();
        self.set_batch_mode(true).await?;
        info!("💡 已推荐 {} 道题", self.detected_count());

        Ok(Some(questions))
    }

    // ========== 历史记录 ==========

    /// 把历史中的某条答案设为当前答案
    pub fn open_answer(&mut self, id: &str) -> Option<&GeneratedAnswer> {
        let answer = self.history.get(id)?.clone();
        self.current = Some(answer);
        self.current.as_ref()
    }

    /// 删除历史记录；如果是当前答案，同时清空当前答案
    pub async fn delete_history_item(&mut self, id: &str) -> AppResult<bool> {
        let deleted = self.history.delete(id).await;
        let removed = self.track(deleted)?.is_some();
        if removed && self.current.as_ref().is_some_and(|a| a.id == id) {
            self.current = None;
        }
        Ok(removed)
    }

    /// "复制全部答案"文本
    pub fn all_solutions_text(&self) -> String {
        self.history.export_all_text()
    }

    // ========== 自定义样式 ==========

    /// 新增自定义样式并选中它
    pub async fn add_custom_style(&mut self, name: &str, instruction: &str) -> AppResult<CustomStyle> {
        let added = self.styles.add(name, instruction).await;
        let style = self.track(added)?;
        self.follow_selection(style.name.clone()).await?;
        Ok(style)
    }

    /// 修改自定义样式；如果当前选中的是它，选择跟随新名称
    pub async fn edit_custom_style(
        &mut self,
        id: &str,
        name: &str,
        instruction: &str,
    ) -> AppResult<CustomStyle> {
        let updated = self.styles.update(id, name, instruction).await;
        let (before, after) = self.track(updated)?;
        if self.settings.style == before.name {
            self.follow_selection(after.name.clone()).await?;
        }
        Ok(after)
    }

    /// 删除自定义样式；如果当前选中的是它，恢复默认样式
    pub async fn delete_custom_style(&mut self, id: &str) -> AppResult<bool> {
        let deleted = self.styles.delete(id).await;
        let Some(removed) = self.track(deleted)? else {
            return Ok(false);
        };
        if self.settings.style == removed.name {
            self.follow_selection(DEFAULT_STYLE.name().to_string()).await?;
        }
        Ok(true)
    }

    // ========== 导出 ==========

    /// 导出答案（默认当前答案）到目录
    pub async fn export(
        &mut self,
        id: Option<&str>,
        format: ExportFormat,
        dir: &Path,
    ) -> AppResult<PathBuf> {
        let answer = match id {
            Some(id) => self
                .history
                .get(id)
                .ok_or_else(|| ExportError::AnswerNotFound { id: id.to_string() }),
            None => self.current.as_ref().ok_or(ExportError::NoAnswerSelected),
        };
        let exported = match answer {
            Ok(answer) => export::export_to_dir(answer, format, dir).await,
            Err(e) => Err(e.into()),
        };
        self.track(exported)
    }

    /// 先写盘，成功后才替换内存中的设置
    async fn replace_settings(&mut self, next: Settings) -> AppResult<()> {
        let saved = self.store.save_settings(&next).await;
        self.track(saved)?;
        self.settings = next;
        Ok(())
    }

    /// 样式列表已经改变：无论写盘是否成功，选择都必须指向存在的样式
    async fn follow_selection(&mut self, style: String) -> AppResult<()> {
        self.settings.style = style;
        let saved = self.store.save_settings(&self.settings).await;
        self.track(saved)
    }

    /// 失败时把提示写入错误消息槽
    fn track<T>(&mut self, result: AppResult<T>) -> AppResult<T> {
        if let Err(e) = &result {
            warn!("⚠️ {}", e);
            self.error = Some(e.user_message());
        }
        result
    }
}
