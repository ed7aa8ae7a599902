//! 审计执行器 - 编排层
//!
//! ## 职责
//!
//! 1. **资源管理**：启动浏览器会话，遍历结束后立即释放（无论成功与否）
//! 2. **流程调度**：导航 → 焦点遍历 → 分批判定 → 汇总
//! 3. **全局统计**：输出最终的可见/不可见数量
//!
//! 判定阶段不需要浏览器，所以会话在调用视觉模型之前就已关闭。

use tracing::{info, warn};

use crate::browser::BrowserSession;
use crate::config::Config;
use crate::error::Result;
use crate::infrastructure::BrowserControl;
use crate::models::{ComplianceReport, FocusRecord};
use crate::services::{LlmService, VisionClassifier};
use crate::utils::logging::{log_startup, log_traversal_complete, print_final_stats};
use crate::workflow::{aggregate, ClassificationFlow, FocusTraversal, TraversalOptions};

/// 应用主结构
pub struct App {
    config: Config,
}

impl App {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// 审计单个页面
    pub async fn run(&self, url: &str) -> Result<ComplianceReport> {
        log_startup(url, self.config.batch_size);

        let session = BrowserSession::launch(&self.config).await?;
        let traversal = traverse_page(session.driver(), url, &self.config).await;
        session.shutdown().await;
        let records = traversal?;

        let classifier = LlmService::new(&self.config);
        info!("🤖 视觉模型: {}", classifier.model_name());
        let report = classify_records(&classifier, url, &records, &self.config).await;

        print_final_stats(&report);
        Ok(report)
    }
}

/// 打开页面并遍历所有可聚焦元素
pub async fn traverse_page<B>(browser: &B, url: &str, config: &Config) -> Result<Vec<FocusRecord>>
where
    B: BrowserControl + ?Sized,
{
    info!("🌐 正在打开页面: {}", url);
    browser.navigate(url).await?;
    browser.wait_for_ready(config.page_load_timeout()).await?;
    info!("✓ 页面加载完成");

    info!("\n⌨️ 开始焦点遍历...");
    let records = FocusTraversal::new(browser, TraversalOptions::from_config(config))
        .run()
        .await?;
    log_traversal_complete(records.len());

    Ok(records)
}

/// 分批判定并汇总
pub async fn classify_records<C>(
    classifier: &C,
    url: &str,
    records: &[FocusRecord],
    config: &Config,
) -> ComplianceReport
where
    C: VisionClassifier + ?Sized,
{
    if records.is_empty() {
        warn!("⚠️ 页面上没有可聚焦的元素，跳过判定");
        return aggregate(url, &[]);
    }

    let flow = ClassificationFlow::new(classifier, config.batch_size, config.verbose_logging);
    let classified = flow.classify_all(url, records).await;
    aggregate(url, &classified)
}

/// 用给定的浏览器和模型完成一次审计
///
/// 不负责浏览器的生命周期，调用方自行管理
pub async fn audit_page<B, C>(
    browser: &B,
    classifier: &C,
    url: &str,
    config: &Config,
) -> Result<ComplianceReport>
where
    B: BrowserControl + ?Sized,
    C: VisionClassifier + ?Sized,
{
    let records = traverse_page(browser, url, config).await?;
    Ok(classify_records(classifier, url, &records, config).await)
}
