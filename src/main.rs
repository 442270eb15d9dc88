use anyhow::{Context, Result};
use clap::Parser;

use exam_answer_gen::cli::Cli;
use exam_answer_gen::utils::logging;
use exam_answer_gen::Config;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 加载配置
    let config = Config::load(cli.config.as_deref()).context("加载配置失败")?;

    // 初始化日志
    logging::init(cli.verbose || config.verbose_logging);

    cli.run(config).await
}
