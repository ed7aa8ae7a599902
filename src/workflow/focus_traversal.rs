//! 焦点遍历引擎 - 流程层
//!
//! 从文档开头开始反复按 Tab，记录每次获得焦点的元素以及前后截图。
//!
//! 终止条件：
//! 1. 再次遇到相同签名的元素（焦点顺序已经绕回）
//! 2. 达到最大步数（签名不稳定的页面不会触发循环检测）

use std::collections::HashSet;
use std::time::Duration;

use tokio::time::sleep;
use tracing::{debug, info};

use crate::config::Config;
use crate::error::{Result, TraversalError};
use crate::infrastructure::{BrowserControl, Key};
use crate::models::{ElementMetadata, ElementSignature, FocusRecord};
use crate::services::{capture, locator};

/// 遍历参数
#[derive(Debug, Clone)]
pub struct TraversalOptions {
    /// 最多按 Tab 的次数
    pub max_steps: usize,
    /// 按下 Tab 后等待焦点样式渲染的时间
    pub settle_delay: Duration,
    /// 元素文本最多保留的字符数
    pub text_limit: usize,
}

impl Default for TraversalOptions {
    fn default() -> Self {
        Self {
            max_steps: 100,
            settle_delay: Duration::from_millis(500),
            text_limit: 100,
        }
    }
}

impl TraversalOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            max_steps: config.max_tab_steps,
            settle_delay: config.settle_delay(),
            ..Self::default()
        }
    }
}

/// 焦点遍历
pub struct FocusTraversal<'a, B: BrowserControl + ?Sized> {
    browser: &'a B,
    options: TraversalOptions,
}

impl<'a, B: BrowserControl + ?Sized> FocusTraversal<'a, B> {
    pub fn new(browser: &'a B, options: TraversalOptions) -> Self {
        Self { browser, options }
    }

    /// 执行遍历，返回按焦点顺序排列的记录
    ///
    /// 读取元素属性失败时整个遍历失败，已收集的记录作废
    pub async fn run(&self) -> Result<Vec<FocusRecord>> {
        self.reset_focus().await?;

        let mut seen: HashSet<ElementSignature> = HashSet::new();
        let mut records = Vec::new();
        let mut step = 0;

        while step < self.options.max_steps {
            let before = capture::capture(self.browser).await?;

            self.browser.dispatch_key(Key::Tab).await?;
            sleep(self.options.settle_delay).await;

            let attributes = self
                .browser
                .read_active_element()
                .await
                .map_err(|source| TraversalError::AttributeReadFailed { step, source })?;

            let locator = locator::resolve(self.browser).await;

            if !seen.insert(ElementSignature::new(&attributes, &locator)) {
                info!("🔁 第 {} 步回到了已访问的元素，停止遍历", step);
                break;
            }

            let after = capture::capture(self.browser).await?;
            let metadata = ElementMetadata::from_attributes(
                step,
                &attributes,
                locator,
                self.options.text_limit,
            );

            info!("✓ 已记录元素 {}: {} ({})", step, metadata.tag, metadata.identifier());
            debug!("定位路径: {}", metadata.locator);

            records.push(FocusRecord {
                metadata,
                before,
                after,
            });
            step += 1;
        }

        if step >= self.options.max_steps {
            info!("⚠️ 已达到最大步数 {}，停止遍历", self.options.max_steps);
        }

        Ok(records)
    }

    /// 点击 body 后按 Home，让每次遍历从同一位置开始
    async fn reset_focus(&self) -> Result<()> {
        self.browser.focus_document().await?;
        self.browser.dispatch_key(Key::Home).await?;
        Ok(())
    }
}
