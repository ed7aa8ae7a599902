//! 流程层（Workflow Layer）
//!
//! - `focus_traversal` - 按 Tab 遍历页面，收集焦点记录
//! - `batch` - 把记录切成固定大小的批次
//! - `classification_request` - 为一个批次构建视觉判定请求
//! - `classification_flow` - 逐批调用模型并解析，失败的批次跳过
//! - `aggregator` - 汇总为合规报告

pub mod aggregator;
pub mod batch;
pub mod classification_flow;
pub mod classification_request;
pub mod focus_traversal;

pub use aggregator::aggregate;
pub use classification_flow::ClassificationFlow;
pub use focus_traversal::{FocusTraversal, TraversalOptions};
