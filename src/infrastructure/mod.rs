//! 基础设施层
//!
//! 持有稀缺资源（Page），只向上层暴露"控制浏览器"的能力

pub mod page_driver;

use std::time::Duration;

use async_trait::async_trait;

use crate::error::BrowserResult;
use crate::models::ElementAttributes;

pub use page_driver::PageDriver;

/// 审查过程中会发送的按键
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Tab,
    Home,
}

impl Key {
    /// DOM `KeyboardEvent.key`
    pub fn name(self) -> &'static str {
        match self {
            Key::Tab => "Tab",
            Key::Home => "Home",
        }
    }

    /// DOM `KeyboardEvent.code`
    pub fn code(self) -> &'static str {
        self.name()
    }

    /// Windows 虚拟键码
    pub fn virtual_key_code(self) -> i64 {
        match self {
            Key::Tab => 9,
            Key::Home => 36,
        }
    }
}

/// 浏览器控制面
///
/// 焦点遍历引擎只依赖这个 trait，不直接接触 chromiumoxide
#[async_trait]
pub trait BrowserControl: Send + Sync {
    /// 导航到指定 URL
    async fn navigate(&self, url: &str) -> BrowserResult<()>;

    /// 等待页面加载完成（`document.readyState == "complete"` 且存在 body）
    async fn wait_for_ready(&self, timeout: Duration) -> BrowserResult<()>;

    /// 点击文档 body，让后续按键从文档开头开始
    async fn focus_document(&self) -> BrowserResult<()>;

    /// 发送一次按键（按下并抬起）
    async fn dispatch_key(&self, key: Key) -> BrowserResult<()>;

    /// 读取当前焦点元素的属性
    async fn read_active_element(&self) -> BrowserResult<ElementAttributes>;

    /// 截取页面，返回 PNG 字节
    async fn capture_visual(&self) -> BrowserResult<Vec<u8>>;

    /// 计算当前焦点元素的结构化定位路径
    async fn resolve_locator(&self) -> BrowserResult<String>;
}
