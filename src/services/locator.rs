//! 定位路径服务 - 业务能力层

use tracing::warn;

use crate::infrastructure::BrowserControl;
use crate::models::focus::UNKNOWN_LOCATOR;

/// 计算当前焦点元素的定位路径
///
/// 失败不会中断遍历，返回 [`UNKNOWN_LOCATOR`]
pub async fn resolve(browser: &(impl BrowserControl + ?Sized)) -> String {
    match browser.resolve_locator().await {
        Ok(locator) if !locator.is_empty() => locator,
        Ok(_) => {
            warn!("⚠️ 定位路径为空，使用 {}", UNKNOWN_LOCATOR);
            UNKNOWN_LOCATOR.to_string()
        }
        Err(e) => {
            warn!("⚠️ 无法计算定位路径: {}，使用 {}", e, UNKNOWN_LOCATOR);
            UNKNOWN_LOCATOR.to_string()
        }
    }
}
