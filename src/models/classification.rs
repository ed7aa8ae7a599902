//! LLM 判定结果

use serde::Serialize;

use crate::error::LlmError;
use crate::models::focus::ElementMetadata;

/// 多模态请求中的一个片段
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestPart {
    Text(String),
    /// `data:image/png;base64,...`
    ImageUrl(String),
}

/// 发送给视觉模型的一个批次请求
#[derive(Debug, Clone)]
pub struct ClassificationRequest {
    pub url: String,
    pub system_message: String,
    /// 按顺序排列：图片与标签交替，最后是任务说明
    pub parts: Vec<RequestPart>,
    /// 本批元素数量
    pub element_count: usize,
}

impl ClassificationRequest {
    pub fn image_count(&self) -> usize {
        self.parts
            .iter()
            .filter(|part| matches!(part, RequestPart::ImageUrl(_)))
            .count()
    }
}

/// 单个元素的焦点可见性判定
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassificationResult {
    pub index: usize,
    pub visible: bool,
    /// 焦点指示器的描述
    pub description: Option<String>,
    /// 使用的 WCAG 技术，保持 LLM 返回的顺序
    pub techniques: Vec<String>,
    pub recommendation: Option<String>,
}

/// 解码后的单个元素结果
///
/// `verdict` 为 `None` 表示 LLM 返回的这一项缺少判定字段，汇总时会被丢弃
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedElement {
    pub metadata: ElementMetadata,
    pub verdict: Option<ClassificationResult>,
}

/// 响应无法使用的原因
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MalformedReason {
    #[error("响应中没有 JSON 对象")]
    NoJsonObject,
    #[error("JSON 解析失败: {0}")]
    InvalidJson(String),
    #[error("响应缺少 elements 列表")]
    MissingElements,
}

/// 一个批次的处理结果
#[derive(Debug)]
pub enum ParsedBatch {
    /// 成功解码（可能为空列表）
    Classified(Vec<ClassifiedElement>),
    /// 响应无法解析
    Malformed { raw: String, reason: MalformedReason },
    /// 调用 LLM 服务失败
    ServiceError(LlmError),
}
