//! 题目切分 - 业务能力层
//!
//! 把一段粘贴的文本切分成有序的题目列表。
//!
//! - 单题模式：整段去掉首尾空白后作为一道题
//! - 批量模式：逐行扫描，遇到题号行且缓冲区已够长时切出上一题
//!
//! 题号判断是独立的纯函数 [`is_question_boundary`]，便于单独测试。

use once_cell::sync::Lazy;
use regex::Regex;

/// 一道题的最小长度阈值：去掉首尾空白后必须超过该字符数
pub const MIN_QUESTION_LEN: usize = 5;

/// 单个批次最多保留的题目数
pub const MAX_BATCH_QUESTIONS: usize = 20;

/// 题号行（字母只认 ASCII）：
/// - `Q1.` / `q2:` / `Q3 `
/// - `1.` / `2)` / `3:` / `4 `
/// - `(a)` / `(1)`
/// - `a)` / `b.` / `c `
static BOUNDARY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:[qQ][0-9]+[.:\s]|[0-9]+[.):\s]|\([a-zA-Z0-9]+\)|[a-zA-Z][.)\s])")
        .expect("题号正则必须合法")
});

/// 判断一行是否以题号开头
///
/// 判断前先去掉首尾空白。
pub fn is_question_boundary(line: &str) -> bool {
    BOUNDARY_RE.is_match(line.trim())
}

/// 把原始文本切分为题目列表
///
/// # 参数
/// - `text`: 原始输入（可包含空行）
/// - `batch_mode`: 是否按批量模式切分
///
/// # 返回
/// 有序题目列表，可能为空；批量模式下最多 [`MAX_BATCH_QUESTIONS`] 道
pub fn parse_questions(text: &str, batch_mode: bool) -> Vec<String> {
    if !batch_mode {
        let question = text.trim();
        return if is_long_enough(question) {
            vec![question.to_string()]
        } else {
            Vec::new()
        };
    }

    let mut questions = Vec::new();
    let mut current = String::new();

    for line in text.split('\n') {
        if is_question_boundary(line) && is_long_enough(current.trim()) {
            questions.push(current.trim().to_string());
            current = line.to_string();
        } else {
            if !current.is_empty() {
                current.push('\n');
            }
            current.push_str(line);
        }
    }

    if is_long_enough(current.trim()) {
        questions.push(current.trim().to_string());
    }

    questions.truncate(MAX_BATCH_QUESTIONS);
    questions
}

/// 输入框下方显示的"检测到 N 道题"
pub fn count_questions(text: &str, batch_mode: bool) -> usize {
    parse_questions(text, batch_mode).len()
}

fn is_long_enough(text: &str) -> bool {
    text.chars().count() > MIN_QUESTION_LEN
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boundary_patterns() {
        for line in [
            "Q1. Define OS",
            "q2: Explain paging",
            "Q10 What is RAID?",
            "1. Define kernel",
            "2) Explain scheduling",
            "3: Write a note",
            "12 Explain deadlock",
            "(a) First part",
            "(1) First part",
            "(iv) Fourth part",
            "a) Option",
            "B. Option",
            "c Something",
            "Q. Why?",
            "   4. indented",
        ] {
            assert!(is_question_boundary(line), "应识别为题号行: {:?}", line);
        }
    }

    #[test]
    fn test_non_boundary_lines() {
        for line in [
            "",
            "   ",
            "Explain the working of a compiler",
            "(a b) spaced",
            "12",
            "Qx1. not numbered",
            "-1. negative",
            "This line continues the previous question",
        ] {
            assert!(!is_question_boundary(line), "不应识别为题号行: {:?}", line);
        }
    }

    #[test]
    fn test_letter_labels_are_ascii_only() {
        // U+017F 和 U+212A 在 Unicode 大小写折叠下等同于 s / k
        for line in ["\u{17f}) long s", "\u{212a}. kelvin", "(\u{17f}) part", "\u{212a}1. x"] {
            assert!(!is_question_boundary(line), "不应识别为题号行: {:?}", line);
        }
        assert!(is_question_boundary("K. kernel"));
        assert!(is_question_boundary("q7: lower case"));
    }

    #[test]
    fn test_single_mode() {
        assert!(parse_questions("", false).is_empty());
        assert!(parse_questions("hi", false).is_empty());
        assert!(parse_questions("  12345  ", false).is_empty());
        assert_eq!(
            parse_questions("  What is a compiler?\n", false),
            vec!["What is a compiler?".to_string()]
        );
    }

    #[test]
    fn test_single_mode_ignores_numbering() {
        let text = "1. Define OS\n2. Define kernel";
        assert_eq!(parse_questions(text, false), vec![text.to_string()]);
    }

    #[test]
    fn test_empty_input_in_batch_mode() {
        assert!(parse_questions("", true).is_empty());
        assert!(parse_questions(" \n\n \t\n", true).is_empty());
    }

    #[test]
    fn test_numbered_batch() {
        let questions = parse_questions("1. Define OS\n2. Define kernel\n3. Explain scheduling", true);
        assert_eq!(
            questions,
            vec!["1. Define OS", "2. Define kernel", "3. Explain scheduling"]
        );
        assert!(!questions[0].contains("2."));
        assert!(!questions[1].contains("3."));
    }

    #[test]
    fn test_continuation_lines_are_kept() {
        let text = "Q1. Explain virtual memory.\nInclude a diagram.\n\nQ2. Explain paging.";
        let questions = parse_questions(text, true);
        assert_eq!(
            questions,
            vec![
                "Q1. Explain virtual memory.\nInclude a diagram.",
                "Q2. Explain paging.",
            ]
        );
    }

    #[test]
    fn test_no_boundaries_collapse_into_one() {
        let text = "Explain the working of a compiler\nwith all its phases";
        assert_eq!(parse_questions(text, true), vec![text.to_string()]);
    }

    #[test]
    fn test_truncates_to_twenty() {
        let text: String = (1..=25)
            .map(|i| format!("{}. Question number {}", i, i))
            .collect::<Vec<_>>()
            .join("\n");

        let questions = parse_questions(&text, true);
        assert_eq!(questions.len(), MAX_BATCH_QUESTIONS);
        assert_eq!(questions[0], "1. Question number 1");
        assert_eq!(questions[19], "20. Question number 20");
    }

    #[test]
    fn test_short_buffer_does_not_flush() {
        // "1." 只有 2 个字符，下一行题号不会切分
        let questions = parse_questions("1.\n2. Define kernel\n3. Explain paging", true);
        assert_eq!(questions, vec!["1.\n2. Define kernel", "3. Explain paging"]);
    }

    #[test]
    fn test_lettered_parts() {
        let text = "a) short\nb) also short\nc) finally long enough text here";
        let questions = parse_questions(text, true);
        assert_eq!(
            questions,
            vec!["a) short", "b) also short", "c) finally long enough text here"]
        );
    }

    #[test]
    fn test_whitespace_does_not_change_count() {
        let compact = "1. Define OS\n2. Define kernel\n3. Explain scheduling";
        let spaced = "1.   Define    OS  \n2. Define\tkernel\n3.  Explain   scheduling   ";
        assert_eq!(count_questions(compact, true), count_questions(spaced, true));
        assert_eq!(count_questions(spaced, true), 3);
    }

    #[test]
    fn test_crlf_input() {
        let questions = parse_questions("1. Define OS\r\n2. Define kernel\r\n", true);
        assert_eq!(questions, vec!["1. Define OS", "2. Define kernel"]);
    }

    #[test]
    fn test_length_counts_characters() {
        // 5 个汉字不够长，6 个才算一道题
        assert_eq!(parse_questions("解释进程调度", false).len(), 1);
        assert!(parse_questions("什么是内核", false).is_empty());
    }
}
