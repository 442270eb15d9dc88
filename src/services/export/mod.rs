//! 导出服务 - 业务能力层
//!
//! 把单条答案渲染成 PDF 或 Word 文档

pub mod pdf;
pub mod word;

use std::path::{Path, PathBuf};
use tracing::info;

use crate::error::{AppError, AppResult};
use crate::models::GeneratedAnswer;

/// 导出文档的标题
pub const DOCUMENT_TITLE: &str = "SPPU Model Answer";

/// 导出格式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// 分页 PDF
    Pdf,
    /// Word 可打开的富文本（HTML .doc）
    Word,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Pdf => "pdf",
            ExportFormat::Word => "doc",
        }
    }
}

/// 导出文件名：`SPPU_Answer_{id}.pdf` / `SPPU_Answer_{id}.doc`
pub fn export_file_name(answer: &GeneratedAnswer, format: ExportFormat) -> String {
    format!("SPPU_Answer_{}.{}", answer.id, format.extension())
}

/// 渲染为字节流
pub fn render(answer: &GeneratedAnswer, format: ExportFormat) -> AppResult<Vec<u8>> {
    let date = today();
    match format {
        ExportFormat::Pdf => pdf::render_pdf(answer, &date),
        ExportFormat::Word => Ok(word::render_word(answer, &date)),
    }
}

/// 渲染并写入目录，返回文件路径
pub async fn export_to_dir(
    answer: &GeneratedAnswer,
    format: ExportFormat,
    dir: &Path,
) -> AppResult<PathBuf> {
    let bytes = render(answer, format)?;

    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|e| AppError::file_write_failed(dir.display().to_string(), e))?;

    let path = dir.join(export_file_name(answer, format));
    tokio::fs::write(&path, &bytes)
        .await
        .map_err(|e| AppError::file_write_failed(path.display().to_string(), e))?;

    info!("📄 已导出: {} ({} 字节)", path.display(), bytes.len());
    Ok(path)
}

fn today() -> String {
    chrono::Local::now().format("%d/%m/%Y").to_string()
}
