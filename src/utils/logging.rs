/// 日志工具模块
///
/// 提供日志初始化以及格式化输出的辅助函数
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::models::{ComplianceReport, FocusRecord};

/// 初始化日志
///
/// 日志写到 stderr，stdout 只留给报告。`RUST_LOG` 优先于 `verbose`。
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// 记录审计启动信息
///
/// # 参数
/// - `url`: 待测页面
/// - `batch_size`: 每批元素数量
pub fn log_startup(url: &str, batch_size: usize) {
    info!("{}", "=".repeat(60));
    info!("🚀 开始焦点可见性审计 (WCAG 2.4.7)");
    info!("🌐 页面: {}", url);
    info!("📋 每批分析 {} 个元素", batch_size);
    info!("{}", "=".repeat(60));
}

/// 记录遍历结果
pub fn log_traversal_complete(recorded: usize) {
    info!("✓ 焦点遍历完成，共记录 {} 个可聚焦元素", recorded);
}

/// 记录批次开始信息
///
/// # 参数
/// - `batch_num`: 批次编号
/// - `total_batches`: 批次总数
/// - `batch`: 本批的记录
pub fn log_batch_start(batch_num: usize, total_batches: usize, batch: &[FocusRecord]) {
    info!("\n{}", "=".repeat(60));
    info!("📦 开始分析第 {}/{} 批", batch_num, total_batches);
    if let (Some(first), Some(last)) = (batch.first(), batch.last()) {
        info!("📄 本批元素: {}-{}", first.index(), last.index());
    }
    info!("{}", "=".repeat(60));
}

/// 记录批次完成信息
///
/// # 参数
/// - `batch_num`: 批次编号
/// - `decoded`: 成功解码的元素数量
/// - `total`: 本批元素数量
pub fn log_batch_complete(batch_num: usize, decoded: usize, total: usize) {
    info!("\n{}", "─".repeat(60));
    info!("✓ 第 {} 批完成: 解析 {}/{}", batch_num, decoded, total);
    info!("{}", "─".repeat(60));
}

/// 打印最终统计信息
pub fn print_final_stats(report: &ComplianceReport) {
    info!("\n{}", "=".repeat(60));
    info!("📊 审计完成统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("✅ 焦点可见: {}/{}", report.visible_count(), report.total_classified());
    info!("❌ 焦点不可见: {}", report.invisible_count());
    info!("{}", "=".repeat(60));
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度
///
/// # 返回
/// 返回截断后的文本
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}
