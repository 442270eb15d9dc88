//! PDF 导出
//!
//! A4 页面，20 mm 边距，按内容宽度折行，超出页底自动换页。
//! 排版（[`layout`]）和绘制（[`render_pdf`]）分开，排版结果可以单独测试。

use printpdf::{BuiltinFont, Color, Greyscale, Line, Mm, PdfDocument, Point};

use crate::error::{AppResult, ExportError};
use crate::models::GeneratedAnswer;
use crate::services::export::DOCUMENT_TITLE;

pub const PAGE_WIDTH_MM: f32 = 210.0;
pub const PAGE_HEIGHT_MM: f32 = 297.0;
pub const MARGIN_MM: f32 = 20.0;
/// 正文行距
pub const LINE_HEIGHT_MM: f32 = 5.0;

const TITLE_Y_MM: f32 = 20.0;
const META_Y_MM: f32 = 28.0;
const RULE_Y_MM: f32 = 32.0;
const QUESTION_Y_MM: f32 = 42.0;
const QUESTION_GAP_MM: f32 = 8.0;

/// Helvetica 平均字宽约为字号的一半
const AVG_CHAR_WIDTH_EM: f32 = 0.5;
const PT_TO_MM: f32 = 0.3528;

/// 文本样式
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub size: f32,
    pub bold: bool,
    /// 灰度，0.0 为黑色
    pub grey: f32,
}

const TITLE_STYLE: TextStyle = TextStyle { size: 16.0, bold: true, grey: 0.0 };
const META_STYLE: TextStyle = TextStyle { size: 10.0, bold: false, grey: 0.4 };
const QUESTION_STYLE: TextStyle = TextStyle { size: 11.0, bold: true, grey: 0.0 };
const BODY_STYLE: TextStyle = TextStyle { size: 10.0, bold: false, grey: 0.0 };

/// 排好位置的一行文字
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedLine {
    /// 页码（从 0 开始）
    pub page: usize,
    /// 距页面顶部的距离
    pub y_mm: f32,
    pub text: String,
    pub style: TextStyle,
}

/// 内容区宽度
pub fn content_width_mm() -> f32 {
    PAGE_WIDTH_MM - MARGIN_MM * 2.0
}

/// 指定字号下一行可容纳的字符数
pub fn chars_per_line(font_size: f32) -> usize {
    let char_width_mm = font_size * PT_TO_MM * AVG_CHAR_WIDTH_EM;
    ((content_width_mm() / char_width_mm).floor() as usize).max(1)
}

/// 按宽度折行，保留原有换行和空行
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    text.split('\n')
        .flat_map(|paragraph| {
            let paragraph = paragraph.trim_end_matches('\r');
            if paragraph.trim().is_empty() {
                vec![String::new()]
            } else {
                textwrap::wrap(paragraph, width)
                    .into_iter()
                    .map(|line| line.into_owned())
                    .collect()
            }
        })
        .collect()
}

/// 计算每一行的页码和位置
pub fn layout(answer: &GeneratedAnswer, date: &str) -> Vec<PlacedLine> {
    let mut placed = vec![
        PlacedLine {
            page: 0,
            y_mm: TITLE_Y_MM,
            text: DOCUMENT_TITLE.to_string(),
            style: TITLE_STYLE,
        },
        PlacedLine {
            page: 0,
            y_mm: META_Y_MM,
            text: format!("Generated on: {} • {} Marks", date, answer.marks),
            style: META_STYLE,
        },
    ];

    let mut cursor = Cursor {
        page: 0,
        y_mm: QUESTION_Y_MM,
    };

    let question_lines = wrap_text(
        &format!("Question: {}", answer.question),
        chars_per_line(QUESTION_STYLE.size),
    );
    for text in question_lines {
        placed.push(cursor.place(text, QUESTION_STYLE));
    }

    cursor.y_mm += QUESTION_GAP_MM;

    for text in wrap_text(&answer.answer, chars_per_line(BODY_STYLE.size)) {
        placed.push(cursor.place(text, BODY_STYLE));
    }

    placed
}

struct Cursor {
    page: usize,
    y_mm: f32,
}

impl Cursor {
    fn place(&mut self, text: String, style: TextStyle) -> PlacedLine {
        if self.y_mm > PAGE_HEIGHT_MM - MARGIN_MM {
            self.page += 1;
            self.y_mm = MARGIN_MM;
        }
        let line = PlacedLine {
            page: self.page,
            y_mm: self.y_mm,
            text,
            style,
        };
        self.y_mm += LINE_HEIGHT_MM;
        line
    }
}

/// 渲染 PDF 字节流
pub fn render_pdf(answer: &GeneratedAnswer, date: &str) -> AppResult<Vec<u8>> {
    let lines = layout(answer, date);
    let page_count = lines.iter().map(|l| l.page).max().unwrap_or(0) + 1;

    let (doc, first_page, first_layer) = PdfDocument::new(
        format!("{} {}", DOCUMENT_TITLE, answer.id),
        Mm(PAGE_WIDTH_MM),
        Mm(PAGE_HEIGHT_MM),
        "Page 1".to_string(),
    );

    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(pdf_error)?;
    let regular = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(pdf_error)?;

    let mut layers = vec![doc.get_page(first_page).get_layer(first_layer)];
    for n in 1..page_count {
        let (page, layer) = doc.add_page(
            Mm(PAGE_WIDTH_MM),
            Mm(PAGE_HEIGHT_MM),
            format!("Page {}", n + 1),
        );
        layers.push(doc.get_page(page).get_layer(layer));
    }

    // 标题下的分隔线
    let rule_y = Mm(PAGE_HEIGHT_MM - RULE_Y_MM);
    layers[0].add_line(Line {
        points: vec![
            (Point::new(Mm(MARGIN_MM), rule_y), false),
            (Point::new(Mm(PAGE_WIDTH_MM - MARGIN_MM), rule_y), false),
        ],
        is_closed: false,
    });

    for line in &lines {
        let layer = &layers[line.page];
        let font = if line.style.bold { &bold } else { &regular };
        layer.set_fill_color(Color::Greyscale(Greyscale::new(line.style.grey, None)));
        layer.use_text(
            line.text.clone(),
            line.style.size,
            Mm(MARGIN_MM),
            Mm(PAGE_HEIGHT_MM - line.y_mm),
            font,
        );
    }

    doc.save_to_bytes().map_err(pdf_error)
}

fn pdf_error(e: printpdf::Error) -> crate::error::AppError {
    ExportError::Pdf(e.to_string()).into()
}
