//! Word 导出
//!
//! 生成 Word 可直接打开的 HTML 文档（带 UTF-8 BOM）。
//! 答案中以 `1)` / `a)` 开头的行渲染为带编号的要点，其他行为普通段落。

use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::GeneratedAnswer;
use crate::services::export::DOCUMENT_TITLE;

/// 要点行：编号、标题、分隔符 `**`、正文
static POINT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([0-9]+\)|[a-zA-Z]\))\s*(.*?)(\*\*|$)(.*)$").expect("要点正则必须合法")
});

const STYLE_SHEET: &str = "body { font-family: 'Segoe UI', Arial, sans-serif; line-height: 1.4; color: #000; } \
h1 { color: #312e81; font-size: 18pt; margin-bottom: 5pt; } \
.meta { color: #64748b; font-size: 10pt; margin-bottom: 20pt; border-bottom: 1px solid #e2e8f0; padding-bottom: 10pt; } \
.question { font-weight: bold; font-size: 12pt; margin-bottom: 15pt; background-color: #f8fafc; padding: 10pt; border-left: 4pt solid #312e81; } \
.point { margin-bottom: 4pt; } \
.point-num { font-weight: bold; color: #4338ca; } \
.point-title { font-weight: bold; color: #000; }";

/// 答案中的一行
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnswerLine<'a> {
    /// 编号要点，如 `1) Title** explanation`
    Point {
        label: &'a str,
        title: &'a str,
        separator: &'a str,
        content: &'a str,
    },
    /// 普通段落
    Paragraph(&'a str),
}

/// 对一行答案分类
pub fn classify_line(line: &str) -> AnswerLine<'_> {
    match POINT_RE.captures(line) {
        Some(caps) => AnswerLine::Point {
            label: caps.get(1).map_or("", |m| m.as_str()),
            title: caps.get(2).map_or("", |m| m.as_str()),
            separator: caps.get(3).map_or("", |m| m.as_str()),
            content: caps.get(4).map_or("", |m| m.as_str()),
        },
        None => AnswerLine::Paragraph(line),
    }
}

/// 渲染答案正文，空行被跳过
///
/// 要点标题后只写回实际匹配到的分隔符：`1) Title** text` 保留 `**`，
/// 没有 `**` 的 `a) Title` 不会凭空补上。
pub fn render_content(answer: &str) -> String {
    answer
        .split('\n')
        .filter(|line| !line.trim().is_empty())
        .map(|line| match classify_line(line) {
            AnswerLine::Point {
                label,
                title,
                separator,
                content,
            } => format!(
                "<div class=\"point\"><span class=\"point-num\">{}</span> <span class=\"point-title\">{}{}</span> {}</div>",
                escape_html(label),
                escape_html(title),
                separator,
                escape_html(content)
            ),
            AnswerLine::Paragraph(text) => format!("<p>{}</p>", escape_html(text)),
        })
        .collect()
}

/// 渲染完整的 Word 文档字节流
pub fn render_word(answer: &GeneratedAnswer, date: &str) -> Vec<u8> {
    let html = format!(
        "<html xmlns:o='urn:schemas-microsoft-com:office:office' xmlns:w='urn:schemas-microsoft-com:office:word' xmlns='http://www.w3.org/TR/REC-html40'>\
<head><meta charset='utf-8'><style>{style}</style></head>\
<body><h1>{title}</h1>\
<div class=\"meta\">Date: {date} | Weightage: {marks} Marks | Style: {answer_style}</div>\
<div class=\"question\">Q: {question}</div>\
<div class=\"content\">{content}</div></body></html>",
        style = STYLE_SHEET,
        title = DOCUMENT_TITLE,
        date = escape_html(date),
        marks = answer.marks,
        answer_style = escape_html(&answer.style),
        question = escape_html(&answer.question),
        content = render_content(&answer.answer),
    );

    let mut bytes = "\u{feff}".as_bytes().to_vec();
    bytes.extend_from_slice(html.as_bytes());
    bytes
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MarksWeightage;

    #[test]
    fn test_classify_numbered_point() {
        assert_eq!(
            classify_line("1) Definition** An OS manages hardware."),
            AnswerLine::Point {
                label: "1)",
                title: "Definition",
                separator: "**",
                content: " An OS manages hardware.",
            }
        );
    }

    #[test]
    fn test_classify_lettered_point_without_separator() {
        assert_eq!(
            classify_line("b)   Paging"),
            AnswerLine::Point {
                label: "b)",
                title: "Paging",
                separator: "",
                content: "",
            }
        );
    }

    #[test]
    fn test_classify_paragraphs() {
        // 要点正则与题号正则是两套规则：`1.` 和 `(a)` 都不是要点
        assert_eq!(classify_line("1. Intro"), AnswerLine::Paragraph("1. Intro"));
        assert_eq!(classify_line("(a) part"), AnswerLine::Paragraph("(a) part"));
        assert_eq!(
            classify_line("An operating system is system software."),
            AnswerLine::Paragraph("An operating system is system software.")
        );
    }

    #[test]
    fn test_render_content_skips_blank_lines() {
        let html = render_content("Intro line\n\n1) Kernel** Core part\n   \nConclusion");
        assert_eq!(
            html,
            "<p>Intro line</p>\
<div class=\"point\"><span class=\"point-num\">1)</span> <span class=\"point-title\">Kernel**</span>  Core part</div>\
<p>Conclusion</p>"
        );
    }

    #[test]
    fn test_point_without_separator_gets_none_added() {
        assert_eq!(
            render_content("a) Just a title"),
            "<div class=\"point\"><span class=\"point-num\">a)</span> <span class=\"point-title\">Just a title</span> </div>"
        );
    }

    #[test]
    fn test_render_word_document() {
        let answer = GeneratedAnswer::new(
            "Compare <RAM> & ROM",
            MarksWeightage::Eight,
            "Detailed",
            "1) Volatility** RAM loses data",
        );

        let bytes = render_word(&answer, "16/10/2026");
        assert!(bytes.starts_with("\u{feff}".as_bytes()));

        let html = String::from_utf8(bytes).unwrap();
        assert!(html.contains("<h1>SPPU Model Answer</h1>"));
        assert!(html.contains("Date: 16/10/2026 | Weightage: 8 Marks | Style: Detailed"));
        assert!(html.contains("Q: Compare &lt;RAM&gt; &amp; ROM"));
        assert!(html.contains("<span class=\"point-num\">1)</span>"));
    }
}
