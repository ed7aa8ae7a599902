//! 截图服务 - 业务能力层

use tracing::debug;

use crate::error::BrowserResult;
use crate::infrastructure::BrowserControl;
use crate::models::Screenshot;

/// 把浏览器截图封装为 [`Screenshot`]
pub async fn capture(browser: &(impl BrowserControl + ?Sized)) -> BrowserResult<Screenshot> {
    let png = browser.capture_visual().await?;
    let screenshot = Screenshot::from_png(&png);
    debug!("截图完成: {} 字节 (编码后 {})", png.len(), screenshot.encoded_len());
    Ok(screenshot)
}
