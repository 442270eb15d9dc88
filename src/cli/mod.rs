//! 命令行入口
//!
//! 只负责解析参数、调用 `App` 并打印结果，不包含业务逻辑。

pub mod commands;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::io::AsyncReadExt;
use tokio_util::sync::CancellationToken;
use tracing::warn;

use crate::config::Config;
use crate::orchestrator::App;
use crate::services::{count_questions, AnswerGenerator, LlmService, QuestionSuggester};
use crate::utils::logging::truncate_text;
use commands::{
    Commands, CountArgs, ExportArgs, GenerateArgs, HistoryCommand, StyleCommand, SuggestArgs,
};

#[derive(Parser, Debug)]
#[command(
    name = "exam-answer",
    version,
    about = "Generate exam-ready model answers with a hosted language model."
)]
pub struct Cli {
    /// TOML 配置文件路径
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// 显示详细日志
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// 分发子命令
    pub async fn run(self, config: Config) -> Result<()> {
        if let Commands::Count(args) = &self.command {
            return run_count(args).await;
        }

        let client = LlmService::new(&config);
        let mut app = App::initialize(&config, client)
            .await
            .context("初始化应用失败")?;

        match self.command {
            Commands::Generate(args) => run_generate(&mut app, args).await,
            Commands::Suggest(args) => run_suggest(&mut app, args).await,
            Commands::History(cmd) => run_history(&mut app, cmd).await,
            Commands::Style(cmd) => run_style(&mut app, cmd).await,
            Commands::Export(args) => run_export(&mut app, args, &config).await,
            Commands::Count(_) => Ok(()),
        }
    }
}

async fn run_count(args: &CountArgs) -> Result<()> {
    let text = read_input(args.text.as_deref()).await?;
    println!("{}", count_questions(&text, args.batch));
    Ok(())
}

async fn run_generate<C>(app: &mut App<C>, args: GenerateArgs) -> Result<()>
where
    C: AnswerGenerator + QuestionSuggester,
{
    if args.batch || args.single {
        app.set_batch_mode(args.batch).await?;
    }
    if let Some(marks) = args.marks {
        app.set_marks(marks).await?;
    }
    if let Some(style) = &args.style {
        app.select_style(style).await?;
    }

    let text = match &args.file {
        Some(path) => tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("无法读取题目文件: {}", path.display()))?,
        None => read_input(args.text.as_deref()).await?,
    };
    app.set_input(text);

    generate_and_print(app).await
}

async fn generate_and_print<C>(app: &mut App<C>) -> Result<()>
where
    C: AnswerGenerator + QuestionSuggester,
{
    let expected = app.detected_count();
    let cancel = CancellationToken::new();
    let ctrl_c = {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("收到中断信号，当前题目完成后停止");
                cancel.cancel();
            }
        })
    };

    let result = app.generate(&cancel).await;
    ctrl_c.abort();

    if let Err(e) = result {
        anyhow::bail!(app.last_error().map(str::to_string).unwrap_or_else(|| e.to_string()));
    }

    let mut batch: Vec<_> = app.history().iter().take(expected.max(1)).collect();
    batch.reverse();
    for answer in batch {
        print_answer(answer);
    }
    Ok(())
}

async fn run_suggest<C>(app: &mut App<C>, args: SuggestArgs) -> Result<()>
where
    C: AnswerGenerator + QuestionSuggester,
{
    match app.suggest(&args.topic).await? {
        Some(questions) => {
            println!("{}", questions);
            println!("\n已识别 {} 道题，批量模式已开启", app.detected_count());
            if args.generate {
                generate_and_print(app).await?;
            }
            Ok(())
        }
        None => anyhow::bail!(app
            .last_error()
            .unwrap_or("主题不能为空")
            .to_string()),
    }
}

async fn run_history<C>(app: &mut App<C>, cmd: HistoryCommand) -> Result<()>
where
    C: AnswerGenerator + QuestionSuggester,
{
    match cmd {
        HistoryCommand::List => {
            if app.history().is_empty() {
                println!("（暂无历史记录）");
            }
            for item in app.history().iter() {
                let time = chrono::DateTime::<chrono::Utc>::from_timestamp_millis(item.timestamp)
                    .map(|t| t.with_timezone(&chrono::Local).format("%Y-%m-%d %H:%M").to_string())
                    .unwrap_or_default();
                println!(
                    "{}  {}  {:>2} 分  {:<18}  {}",
                    item.id,
                    time,
                    item.marks,
                    truncate_text(&item.style, 18),
                    truncate_text(&item.question, 50)
                );
            }
        }
        HistoryCommand::Show { id } => match app.open_answer(&id) {
            Some(answer) => print_answer(answer),
            None => anyhow::bail!("历史记录中找不到答案: {}", id),
        },
        HistoryCommand::Delete { id } => {
            if !app.delete_history_item(&id).await? {
                anyhow::bail!("历史记录中找不到答案: {}", id);
            }
            println!("已删除 {}", id);
        }
        HistoryCommand::CopyAll => print!("{}", app.all_solutions_text()),
    }
    Ok(())
}

async fn run_style<C>(app: &mut App<C>, cmd: StyleCommand) -> Result<()>
where
    C: AnswerGenerator + QuestionSuggester,
{
    match cmd {
        StyleCommand::List => {
            let selected = app.selected_style().to_string();
            for name in app.style_names() {
                let marker = if name == selected { "*" } else { " " };
                match app.custom_styles().iter().find(|s| s.name == name) {
                    Some(custom) => println!("{} {}  [{}]  {}", marker, name, custom.id, custom.instruction),
                    None => println!("{} {}", marker, name),
                }
            }
        }
        StyleCommand::Add { name, instruction } => {
            let style = app.add_custom_style(&name, &instruction).await?;
            println!("已新增并选中样式 {} [{}]", style.name, style.id);
        }
        StyleCommand::Edit {
            id,
            name,
            instruction,
        } => {
            let style = app.edit_custom_style(&id, &name, &instruction).await?;
            println!("已修改样式 {} [{}]", style.name, style.id);
        }
        StyleCommand::Delete { id } => {
            if !app.delete_custom_style(&id).await? {
                anyhow::bail!("找不到自定义样式: {}", id);
            }
            println!("已删除，当前样式: {}", app.selected_style());
        }
        StyleCommand::Select { name } => {
            app.select_style(&name).await?;
            println!("当前样式: {}", name);
        }
    }
    Ok(())
}

async fn run_export<C>(app: &mut App<C>, args: ExportArgs, config: &Config) -> Result<()>
where
    C: AnswerGenerator + QuestionSuggester,
{
    let id = match args.id {
        Some(id) => id,
        None => app
            .history()
            .iter()
            .next()
            .map(|a| a.id.clone())
            .context("暂无可导出的答案")?,
    };
    let dir = args.out.unwrap_or_else(|| config.export_dir.clone());

    let path = app.export(Some(&id), args.format.into(), &dir).await?;
    println!("{}", path.display());
    Ok(())
}

fn print_answer(answer: &crate::models::GeneratedAnswer) {
    println!("{}", "=".repeat(60));
    println!("[{}] {} 分 | {}", answer.id, answer.marks, answer.style);
    println!("Q: {}", answer.question);
    println!("{}", "-".repeat(60));
    println!("{}", answer.answer);
    println!();
}

/// 读取题目文本：参数优先，否则读标准输入
async fn read_input(text: Option<&str>) -> Result<String> {
    match text {
        Some(text) if text != "-" => Ok(text.to_string()),
        _ => {
            let mut buf = String::new();
            tokio::io::stdin()
                .read_to_string(&mut buf)
                .await
                .context("无法读取标准输入")?;
            Ok(buf)
        }
    }
}
