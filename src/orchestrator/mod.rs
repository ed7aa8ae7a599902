//! 编排层（Orchestration Layer）
//!
//! ## 层次关系
//!
//! ```text
//! audit_runner (一个页面的完整审计)
//!     ↓
//! workflow (遍历 / 分批判定 / 汇总)
//!     ↓
//! services (截图 / 定位 / 视觉模型 / 响应解析)
//!     ↓
//! infrastructure (PageDriver)
//! ```
//!
//! 只有编排层持有浏览器会话。

pub mod audit_runner;

pub use audit_runner::{audit_page, classify_records, traverse_page, App};
