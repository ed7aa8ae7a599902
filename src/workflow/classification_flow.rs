//! 分批判定流程 - 流程层
//!
//! 按顺序逐批：构建请求 → 调用视觉模型 → 解析响应。
//! 任何一批失败（调用出错、响应无法解析）都只跳过这一批，不影响后续批次。

use tracing::{debug, info, warn};

use crate::models::{ClassifiedElement, FocusRecord, ParsedBatch};
use crate::services::response_parser;
use crate::services::VisionClassifier;
use crate::utils::logging::{log_batch_complete, log_batch_start, truncate_text};
use crate::workflow::batch;
use crate::workflow::classification_request::build_request;

/// 分批判定流程
pub struct ClassificationFlow<'a, C: VisionClassifier + ?Sized> {
    classifier: &'a C,
    batch_size: usize,
    verbose_logging: bool,
}

impl<'a, C: VisionClassifier + ?Sized> ClassificationFlow<'a, C> {
    pub fn new(classifier: &'a C, batch_size: usize, verbose_logging: bool) -> Self {
        Self {
            classifier,
            batch_size,
            verbose_logging,
        }
    }

    /// 判定一个批次
    pub async fn classify_batch(&self, url: &str, batch: &[FocusRecord]) -> ParsedBatch {
        let request = build_request(url, batch);

        info!("🤖 正在请求视觉模型分析 {} 个元素...", batch.len());
        let response = match self.classifier.classify(&request).await {
            Ok(response) => response,
            Err(e) => return ParsedBatch::ServiceError(e),
        };

        if self.verbose_logging {
            debug!("=== 模型原始响应 ===\n{}", response);
            if let Some(json_str) = response_parser::extract_json_object(&response) {
                debug!("=== 提取出的 JSON ===\n{}", json_str);
            }
        }

        match response_parser::parse_response(&response, batch) {
            Ok(elements) => ParsedBatch::Classified(elements),
            Err(reason) => ParsedBatch::Malformed {
                raw: response,
                reason,
            },
        }
    }

    /// 依次判定所有批次，返回所有成功解码的元素
    pub async fn classify_all(&self, url: &str, records: &[FocusRecord]) -> Vec<ClassifiedElement> {
        let batches = batch::partition(records, self.batch_size);
        let total_batches = batches.len();
        let mut collected = Vec::new();

        for (batch_idx, batch) in batches.into_iter().enumerate() {
            let batch_num = batch_idx + 1;
            log_batch_start(batch_num, total_batches, batch);

            match self.classify_batch(url, batch).await {
                ParsedBatch::Classified(elements) if elements.is_empty() => {
                    warn!("⚠️ 第 {} 批没有分析结果，跳过", batch_num);
                }
                ParsedBatch::Classified(elements) => {
                    log_batch_complete(batch_num, elements.len(), batch.len());
                    collected.extend(elements);
                }
                ParsedBatch::Malformed { raw, reason } => {
                    warn!("⚠️ 第 {} 批响应无法解析 ({})，跳过", batch_num, reason);
                    debug!("无法解析的响应: {}", truncate_text(&raw, 500));
                }
                ParsedBatch::ServiceError(e) => {
                    warn!("⚠️ 第 {} 批调用视觉模型失败: {}，跳过", batch_num, e);
                }
            }
        }

        collected
    }
}
