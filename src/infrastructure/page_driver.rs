//! 页面驱动 - 基础设施层
//!
//! 持有唯一的 page 资源，通过 CDP 实现 [`BrowserControl`]

use std::time::Duration;

use async_trait::async_trait;
use chromiumoxide::cdp::browser_protocol::input::{DispatchKeyEventParams, DispatchKeyEventType};
use chromiumoxide::cdp::browser_protocol::page::CaptureScreenshotFormat;
use chromiumoxide::page::ScreenshotParams;
use chromiumoxide::Page;
use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;
use tokio::time::{sleep, timeout};
use tracing::debug;

use crate::error::{BrowserError, BrowserResult};
use crate::infrastructure::{BrowserControl, Key};
use crate::models::ElementAttributes;

/// 页面就绪轮询间隔
const READY_POLL_INTERVAL: Duration = Duration::from_millis(100);

const READY_STATE_JS: &str =
    "document.readyState === 'complete' && document.body !== null";

const ACTIVE_ELEMENT_JS: &str = r#"
(() => {
    const el = document.activeElement;
    if (!el) {
        return null;
    }
    return {
        tag: el.tagName || '',
        inputType: typeof el.type === 'string' ? el.type : '',
        id: el.id || '',
        className: typeof el.className === 'string' ? el.className : (el.getAttribute('class') || ''),
        text: el.textContent || '',
        role: el.getAttribute('role') || ''
    };
})()
"#;

/// 生成焦点元素的 XPath：有 id 时用 id，否则按同名兄弟节点序号逐级拼接
const ACTIVE_ELEMENT_XPATH_JS: &str = r#"
(() => {
    function pathTo(element) {
        if (element === document.documentElement) {
            return '/html';
        }
        if (element.id) {
            return '//*[@id="' + element.id + '"]';
        }
        if (element === document.body) {
            return '/html/body';
        }
        if (!element.parentNode) {
            return null;
        }
        let index = 0;
        const siblings = element.parentNode.childNodes;
        for (let i = 0; i < siblings.length; i++) {
            const sibling = siblings[i];
            if (sibling === element) {
                const parent = pathTo(element.parentNode);
                if (parent === null) {
                    return null;
                }
                return parent + '/' + element.tagName.toLowerCase() + '[' + (index + 1) + ']';
            }
            if (sibling.nodeType === 1 && sibling.tagName === element.tagName) {
                index++;
            }
        }
        return null;
    }
    const active = document.activeElement;
    return active ? pathTo(active) : null;
})()
"#;

/// 页面驱动
///
/// 职责：
/// - 持有唯一的 Page 资源
/// - 暴露 eval() 以及按键、截图能力
/// - 不认识 FocusRecord，不处理遍历流程
pub struct PageDriver {
    page: Page,
    full_page_capture: bool,
}

impl PageDriver {
    /// 创建新的页面驱动
    pub fn new(page: Page, full_page_capture: bool) -> Self {
        Self {
            page,
            full_page_capture,
        }
    }

    /// 执行 JS 代码并返回 JSON 结果
    pub async fn eval(&self, js_code: impl Into<String>) -> BrowserResult<JsonValue> {
        let result = self.page.evaluate(js_code.into()).await?;
        let json_value = result.into_value()?;
        Ok(json_value)
    }

    /// 执行 JS 代码并反序列化为指定类型
    pub async fn eval_as<T: DeserializeOwned>(&self, js_code: impl Into<String>) -> BrowserResult<T> {
        let json_value = self.eval(js_code).await?;
        let typed_value = serde_json::from_value(json_value)?;
        Ok(typed_value)
    }

    async fn send_key_event(&self, key: Key, event_type: DispatchKeyEventType) -> BrowserResult<()> {
        let params = DispatchKeyEventParams::builder()
            .r#type(event_type)
            .key(key.name())
            .code(key.code())
            .windows_virtual_key_code(key.virtual_key_code())
            .native_virtual_key_code(key.virtual_key_code())
            .build()
            .map_err(|reason| BrowserError::KeyDispatchFailed {
                key: key.name().to_string(),
                reason,
            })?;

        self.page
            .execute(params)
            .await
            .map_err(|e| BrowserError::KeyDispatchFailed {
                key: key.name().to_string(),
                reason: e.to_string(),
            })?;
        Ok(())
    }
}

#[async_trait]
impl BrowserControl for PageDriver {
    async fn navigate(&self, url: &str) -> BrowserResult<()> {
        debug!("导航到: {}", url);
        self.page
            .goto(url)
            .await
            .map_err(|e| BrowserError::navigation_failed(url, e))?;
        Ok(())
    }

    async fn wait_for_ready(&self, limit: Duration) -> BrowserResult<()> {
        let poll = async {
            loop {
                if let Ok(true) = self.eval_as::<bool>(READY_STATE_JS).await {
                    return;
                }
                sleep(READY_POLL_INTERVAL).await;
            }
        };

        timeout(limit, poll)
            .await
            .map_err(|_| BrowserError::PageNotReady {
                timeout_ms: limit.as_millis() as u64,
            })
    }

    async fn focus_document(&self) -> BrowserResult<()> {
        let body = self.page.find_element("body").await?;
        body.click().await?;
        Ok(())
    }

    async fn dispatch_key(&self, key: Key) -> BrowserResult<()> {
        self.send_key_event(key, DispatchKeyEventType::RawKeyDown).await?;
        self.send_key_event(key, DispatchKeyEventType::KeyUp).await
    }

    async fn read_active_element(&self) -> BrowserResult<ElementAttributes> {
        self.eval_as::<Option<ElementAttributes>>(ACTIVE_ELEMENT_JS)
            .await?
            .ok_or_else(|| BrowserError::ScriptExecutionFailed {
                source: "document.activeElement 为空".into(),
            })
    }

    async fn capture_visual(&self) -> BrowserResult<Vec<u8>> {
        let params = ScreenshotParams::builder()
            .format(CaptureScreenshotFormat::Png)
            .full_page(self.full_page_capture)
            .build();

        self.page
            .screenshot(params)
            .await
            .map_err(BrowserError::capture_failed)
    }

    async fn resolve_locator(&self) -> BrowserResult<String> {
        self.eval_as::<Option<String>>(ACTIVE_ELEMENT_XPATH_JS)
            .await?
            .ok_or_else(|| BrowserError::LocatorFailed {
                reason: "焦点元素不在文档树中".to_string(),
            })
    }
}
