//! WCAG 2.4.7 相关技术目录

use std::sync::LazyLock;

use phf::phf_map;
use regex::Regex;

/// 技术代码 → 说明
pub static TECHNIQUES: phf::Map<&'static str, &'static str> = phf_map! {
    "G165" => "使用平台默认的焦点指示器",
    "G195" => "使用作者提供的可见焦点指示器",
    "C15" => "获得焦点时使用 CSS 改变组件的呈现",
    "C40" => "创建对比度足够的双色焦点指示器",
    "SCR31" => "获得焦点时使用脚本改变背景色或边框",
    "F78" => "失败：样式移除或遮挡了焦点指示器",
};

/// 提示词中列出的顺序
pub const PROMPT_ORDER: [&str; 6] = ["G165", "G195", "C15", "C40", "SCR31", "F78"];

static TECHNIQUE_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*([A-Z]{1,5}\d{1,3})\b").expect("静态正则表达式"));

/// 从 LLM 返回的技术条目中识别出的技术
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Technique {
    pub code: &'static str,
    pub description: &'static str,
}

impl Technique {
    /// 解析形如 `"G165: Using the default focus indicator"` 的条目，未知代码返回 `None`
    pub fn parse(entry: &str) -> Option<Self> {
        let code = TECHNIQUE_CODE.captures(entry)?.get(1)?.as_str();
        TECHNIQUES
            .get_entry(code)
            .map(|(code, description)| Technique {
                code: *code,
                description: *description,
            })
    }

    /// 失败技术（F 开头）
    pub fn is_failure(&self) -> bool {
        self.code.starts_with('F')
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_codes() {
        let technique = Technique::parse("C15: Using CSS to change the presentation").unwrap();
        assert_eq!(technique.code, "C15");
        assert!(!technique.is_failure());

        assert!(Technique::parse("F78").unwrap().is_failure());
    }

    #[test]
    fn unknown_or_free_text_is_none() {
        assert!(Technique::parse("G999: made up").is_none());
        assert!(Technique::parse("blue outline").is_none());
    }

    #[test]
    fn prompt_order_covers_catalog() {
        assert_eq!(PROMPT_ORDER.len(), TECHNIQUES.len());
        assert!(PROMPT_ORDER.iter().all(|code| TECHNIQUES.contains_key(*code)));
    }
}
