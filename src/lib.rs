//! # Focus Visible Audit
//!
//! 检测网页是否满足 WCAG 2.4.7（焦点可见）的 Rust 工具
//!
//! ## 架构设计
//!
//! 本系统采用四层架构：
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 持有稀缺资源（Page），只暴露能力
//! - `BrowserControl` - 浏览器操作接口（导航、按键、读取焦点、截图、定位）
//! - `PageDriver` - 基于 chromiumoxide 的实现
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"
//! - `capture` / `locator` - 截图与定位路径
//! - `LlmService` - 视觉模型判定能力
//! - `response_parser` - 从模型回答中解析结构化结果
//!
//! ### ③ 流程层（Workflow）
//! - `FocusTraversal` - 按 Tab 遍历页面
//! - `ClassificationFlow` - 分批判定
//! - `aggregate` - 汇总为合规报告
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/audit_runner` - 管理浏览器会话并串起整个流程
//!
//! ## 模块结构

pub mod browser;
pub mod config;
pub mod error;
pub mod infrastructure;

pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use browser::BrowserSession;
pub use config::Config;
pub use error::{AuditError, Result};
pub use infrastructure::{BrowserControl, Key, PageDriver};
pub use models::{ComplianceReport, FocusRecord, ParsedBatch};
pub use orchestrator::{audit_page, App};
pub use services::{LlmService, VisionClassifier};
