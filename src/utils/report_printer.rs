//! 控制台报告
//!
//! 报告写到 stdout，日志走 stderr，两者互不干扰。

use std::fmt::Write as _;

use chrono::{DateTime, Local};

use crate::models::{ComplianceReport, ReportEntry, Technique};

const DEFAULT_RECOMMENDATION: &str = "为该元素添加可见的焦点指示";

/// 打印报告
pub fn print_report(report: &ComplianceReport) {
    print!("{}", render_report(report, Local::now()));
}

/// 把报告渲染为文本
pub fn render_report(report: &ComplianceReport, checked_at: DateTime<Local>) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "{}", "=".repeat(60));
    let _ = writeln!(out, "WCAG 2.4.7 焦点可见性检测报告");
    let _ = writeln!(out, "{}", "=".repeat(60));
    let _ = writeln!(out, "检测页面: {}", report.url());
    let _ = writeln!(out, "检测时间: {}", checked_at.format("%Y-%m-%d %H:%M:%S"));
    let _ = writeln!(out, "检测元素总数: {}", report.total_classified());
    let _ = writeln!(out, "焦点可见: {}", report.visible_count());
    let _ = writeln!(out, "焦点不可见: {}", report.invisible_count());
    let verdict = if report.compliant() {
        "✅ 符合 WCAG 2.4.7"
    } else {
        "❌ 不符合 WCAG 2.4.7"
    };
    let _ = writeln!(out, "结论: {}", verdict);

    if !report.compliant() {
        let _ = writeln!(out, "\n{}", "─".repeat(60));
        let _ = writeln!(out, "焦点不可见的元素:");
        for entry in report.invisible_elements() {
            render_invisible(&mut out, entry);
        }
    }

    if !report.visible_elements().is_empty() {
        let _ = writeln!(out, "\n{}", "─".repeat(60));
        let _ = writeln!(out, "焦点可见的元素:");
        for entry in report.visible_elements() {
            render_visible(&mut out, entry);
        }
    }

    let _ = writeln!(out, "{}", "=".repeat(60));
    out
}

fn render_element(out: &mut String, entry: &ReportEntry) {
    let element = &entry.element;
    let _ = writeln!(out, "\n  [元素 {}] {}", element.index, element.tag);
    let _ = writeln!(out, "    ID: {}", element.id.as_deref().unwrap_or("无"));
    let _ = writeln!(out, "    类名: {}", element.css_classes.as_deref().unwrap_or("无"));
    let text = element.text.trim();
    let _ = writeln!(out, "    文本: {}", if text.is_empty() { "无" } else { text });
}

fn render_invisible(out: &mut String, entry: &ReportEntry) {
    render_element(out, entry);
    let _ = writeln!(out, "    定位路径: {}", entry.element.locator);
    let _ = writeln!(
        out,
        "    分析: {}",
        entry.result.description.as_deref().unwrap_or("无相关信息")
    );
    let _ = writeln!(
        out,
        "    建议: {}",
        entry
            .result
            .recommendation
            .as_deref()
            .unwrap_or(DEFAULT_RECOMMENDATION)
    );
}

fn render_visible(out: &mut String, entry: &ReportEntry) {
    render_element(out, entry);
    let _ = writeln!(
        out,
        "    焦点指示: {}",
        entry.result.description.as_deref().unwrap_or("无相关信息")
    );
    if entry.result.techniques.is_empty() {
        return;
    }
    let _ = writeln!(out, "    使用的技术:");
    for raw in &entry.result.techniques {
        match Technique::parse(raw) {
            Some(technique) if technique.is_failure() => {
                let _ = writeln!(
                    out,
                    "      ⚠️ {} ({}: {})",
                    raw, technique.code, technique.description
                );
            }
            Some(technique) => {
                let _ = writeln!(out, "      - {} ({})", raw, technique.description);
            }
            None => {
                let _ = writeln!(out, "      - {}", raw);
            }
        }
    }
}
