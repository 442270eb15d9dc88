/// 日志工具模块
///
/// 提供日志初始化和输出的辅助函数
use tracing::info;
use tracing_subscriber::EnvFilter;

/// 初始化 tracing 日志
///
/// `RUST_LOG` 优先；否则 verbose 时为 debug，默认 info。
/// 日志写到 stderr，stdout 留给答案输出。重复调用不会报错。
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

/// 记录批次开始信息
///
/// # 参数
/// - `total`: 本批题目数量
/// - `marks`: 分值
/// - `style`: 答案样式
pub fn log_batch_start(total: usize, marks: &str, style: &str) {
    info!("{}", "=".repeat(60));
    info!("📦 开始生成: 共 {} 道题 | {} 分 | 样式: {}", total, marks, style);
    info!("{}", "=".repeat(60));
}

/// 记录单题开始信息
pub fn log_question_start(index: usize, total: usize, question: &str) {
    info!("📝 [{}/{}] {}", index, total, truncate_text(question, 60));
}

/// 记录批次完成信息
pub fn log_batch_complete(success: usize, total: usize) {
    info!("{}", "─".repeat(60));
    info!("✓ 批次完成: 成功 {}/{}", success, total);
    info!("{}", "─".repeat(60));
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度（按字符计）
///
/// # 返回
/// 返回截断后的文本，换行被替换为空格
pub fn truncate_text(text: &str, max_len: usize) -> String {
    let flat = text.replace('\n', " ");
    if flat.chars().count() > max_len {
        flat.chars().take(max_len).collect::<String>() + "..."
    } else {
        flat
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_text() {
        assert_eq!(truncate_text("short", 10), "short");
        assert_eq!(truncate_text("abcdefghij", 4), "abcd...");
        assert_eq!(truncate_text("line one\nline two", 100), "line one line two");
    }

    #[test]
    fn test_truncate_counts_chars_not_bytes() {
        assert_eq!(truncate_text("题目一二三四", 2), "题目...");
    }
}
