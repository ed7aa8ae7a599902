//! LLM 响应解析
//!
//! 模型返回的是夹在说明文字中的 JSON，且不保证严格符合规范。
//! 解析步骤：
//! 1. 截取第一个 `{` 到最后一个 `}` 之间的文本
//! 2. 先按原样解析，失败后再做引号与换行的归一化重试
//! 3. 要求存在 `elements` 列表，逐项解码；单项损坏只影响该项

use std::collections::HashSet;

use serde::Deserialize;
use serde_json::Value as JsonValue;
use tracing::{debug, warn};

use crate::models::{
    ClassificationResult, ClassifiedElement, ElementMetadata, FocusRecord, MalformedReason,
};

/// 响应中的单个元素（只关心判定相关字段，回显的元数据忽略）
#[derive(Debug, Deserialize)]
struct RawElement {
    #[serde(default)]
    tab_index: Option<usize>,
    #[serde(default)]
    analysis: Option<RawAnalysis>,
}

#[derive(Debug, Deserialize)]
struct RawAnalysis {
    /// 缺失或为 null 时视为不可见
    #[serde(default)]
    focus_visible: Option<bool>,
    #[serde(default)]
    focus_indicator_description: Option<String>,
    #[serde(default)]
    compliance_techniques: Vec<String>,
    #[serde(default)]
    recommendation: Option<String>,
}

/// 截取响应中的 JSON 对象文本
pub fn extract_json_object(response: &str) -> Option<&str> {
    let start = response.find('{')?;
    let end = response.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&response[start..=end])
}

/// 引号与换行归一化：单引号替换为双引号，字面量 `\n` 替换为换行
pub fn normalize_quoting(json_str: &str) -> String {
    json_str.replace('\'', "\"").replace("\\n", "\n").trim().to_string()
}

/// 解析一个批次的响应
///
/// `batch` 用于把结果对应回本批次的元素元数据
pub fn parse_response(
    response: &str,
    batch: &[FocusRecord],
) -> Result<Vec<ClassifiedElement>, MalformedReason> {
    let json_str = extract_json_object(response).ok_or(MalformedReason::NoJsonObject)?;

    let value = match serde_json::from_str::<JsonValue>(json_str) {
        Ok(value) => value,
        Err(first_err) => {
            debug!("原样解析失败 ({})，尝试归一化后解析", first_err);
            let normalized = normalize_quoting(json_str);
            serde_json::from_str::<JsonValue>(&normalized)
                .map_err(|e| MalformedReason::InvalidJson(e.to_string()))?
        }
    };

    let elements = value
        .get("elements")
        .and_then(JsonValue::as_array)
        .ok_or(MalformedReason::MissingElements)?;

    let mut classified = Vec::with_capacity(elements.len());
    let mut consumed: HashSet<usize> = HashSet::new();
    for (position, raw) in elements.iter().enumerate() {
        let decoded = match RawElement::deserialize(raw) {
            Ok(decoded) => decoded,
            Err(e) => {
                warn!("⚠️ 第 {} 项结果格式错误，跳过: {}", position + 1, e);
                continue;
            }
        };

        let Some(metadata) = match_metadata(batch, decoded.tab_index, position, &mut consumed)
        else {
            continue;
        };

        let verdict = decoded.analysis.map(|analysis| ClassificationResult {
            index: metadata.index,
            visible: analysis.focus_visible.unwrap_or(false),
            description: analysis
                .focus_indicator_description
                .filter(|text| !text.trim().is_empty()),
            techniques: analysis.compliance_techniques,
            recommendation: analysis
                .recommendation
                .filter(|text| !text.trim().is_empty()),
        });

        classified.push(ClassifiedElement { metadata, verdict });
    }

    Ok(classified)
}

/// 优先按 `tab_index` 对应，对应不上时按位置对应
///
/// 每条记录最多对应一项结果，已对应过的记录不会再被使用
fn match_metadata(
    batch: &[FocusRecord],
    tab_index: Option<usize>,
    position: usize,
    consumed: &mut HashSet<usize>,
) -> Option<ElementMetadata> {
    if let Some(index) = tab_index {
        if batch.iter().any(|record| record.index() == index) {
            if !consumed.insert(index) {
                warn!("⚠️ 第 {} 项结果重复了 tab_index {}，跳过", position + 1, index);
                return None;
            }
            return batch
                .iter()
                .find(|record| record.index() == index)
                .map(|record| record.metadata.clone());
        }
    }

    match batch.get(position) {
        Some(record) if consumed.insert(record.index()) => Some(record.metadata.clone()),
        _ => {
            warn!(
                "⚠️ 第 {} 项结果 (tab_index: {:?}) 无法对应到本批元素，跳过",
                position + 1,
                tab_index
            );
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ElementAttributes, Screenshot};

    fn record(index: usize, tag: &str) -> FocusRecord {
        let attributes = ElementAttributes {
            tag: tag.to_string(),
            ..Default::default()
        };
        FocusRecord {
            metadata: ElementMetadata::from_attributes(
                index,
                &attributes,
                format!("/html/body/{}[{}]", tag.to_lowercase(), index + 1),
                100,
            ),
            before: Screenshot::from_png(b"before"),
            after: Screenshot::from_png(b"after"),
        }
    }

    #[test]
    fn extracts_json_wrapped_in_prose() {
        let response = "分析如下：\n```json\n{\"elements\": []}\n```\n以上。";
        assert_eq!(extract_json_object(response), Some("{\"elements\": []}"));
        assert_eq!(extract_json_object("没有 JSON"), None);
        assert_eq!(extract_json_object("} 反了 {"), None);
    }

    #[test]
    fn parses_well_formed_response() {
        let batch = vec![record(5, "A"), record(6, "BUTTON")];
        let response = r#"结果：
{
  "elements": [
    {"tab_index": 5, "element_tag": "A", "analysis": {
        "focus_visible": true,
        "focus_indicator_description": "2px 蓝色轮廓",
        "compliance_techniques": ["G165: default", "C15: css", "G165: default"],
        "recommendation": "符合要求"}},
    {"tab_index": 6, "element_tag": "BUTTON", "analysis": {"focus_visible": false}}
  ]
}"#;

        let parsed = parse_response(response, &batch).unwrap();
        assert_eq!(parsed.len(), 2);

        let first = parsed[0].verdict.as_ref().unwrap();
        assert!(first.visible);
        assert_eq!(first.index, 5);
        assert_eq!(first.techniques.len(), 3, "技术列表不去重");
        assert_eq!(parsed[0].metadata.tag, "A");

        let second = parsed[1].verdict.as_ref().unwrap();
        assert!(!second.visible);
        assert_eq!(second.description, None);
    }

    #[test]
    fn single_quoted_json_is_normalized() {
        let batch = vec![record(0, "A")];
        let response = "{'elements': [{'tab_index': 0, 'analysis': {'focus_visible': true}}]}";

        let parsed = parse_response(response, &batch).unwrap();
        assert!(parsed[0].verdict.as_ref().unwrap().visible);
    }

    #[test]
    fn apostrophes_in_valid_json_survive() {
        let batch = vec![record(0, "A")];
        let response = r#"{"elements": [{"tab_index": 0, "analysis": {"focus_visible": false, "recommendation": "Don't remove the outline"}}]}"#;

        let parsed = parse_response(response, &batch).unwrap();
        assert_eq!(
            parsed[0].verdict.as_ref().unwrap().recommendation.as_deref(),
            Some("Don't remove the outline")
        );
    }

    #[test]
    fn missing_analysis_keeps_element_without_verdict() {
        let batch = vec![record(0, "A"), record(1, "INPUT")];
        let response = r#"{"elements": [
            {"tab_index": 0, "analysis": {"focus_visible": true}},
            {"tab_index": 1, "element_tag": "INPUT"}
        ]}"#;

        let parsed = parse_response(response, &batch).unwrap();
        assert_eq!(parsed.len(), 2);
        assert!(parsed[0].verdict.is_some());
        assert!(parsed[1].verdict.is_none());
    }

    #[test]
    fn wrong_typed_element_is_skipped_alone() {
        let batch = vec![record(0, "A"), record(1, "A")];
        let response = r#"{"elements": [
            {"tab_index": 0, "analysis": {"focus_visible": "yes"}},
            {"tab_index": 1, "analysis": {"focus_visible": true}}
        ]}"#;

        let parsed = parse_response(response, &batch).unwrap();
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].metadata.index, 1);
    }

    #[test]
    fn unknown_index_falls_back_to_position() {
        let batch = vec![record(10, "A"), record(11, "BUTTON")];
        let response = r#"{"elements": [
            {"tab_index": 0, "analysis": {"focus_visible": true}},
            {"analysis": {"focus_visible": false}},
            {"tab_index": 99, "analysis": {"focus_visible": false}}
        ]}"#;

        let parsed = parse_response(response, &batch).unwrap();
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0].metadata.index, 10);
        assert_eq!(parsed[1].metadata.tag, "BUTTON");
    }

    #[test]
    fn each_record_is_matched_at_most_once() {
        let batch = vec![record(0, "A"), record(1, "A"), record(2, "INPUT")];
        let response = r#"{"elements": [
            {"tab_index": 0, "analysis": {"focus_visible": true}},
            {"tab_index": 0, "analysis": {"focus_visible": false}},
            {"analysis": {"focus_visible": false}}
        ]}"#;

        let parsed = parse_response(response, &batch).unwrap();
        let indices: Vec<usize> = parsed.iter().map(|e| e.metadata.index).collect();
        assert_eq!(indices, vec![0, 2]);
        assert!(parsed[0].verdict.as_ref().unwrap().visible);
        assert!(!parsed[1].verdict.as_ref().unwrap().visible);
    }

    #[test]
    fn position_fallback_skips_consumed_record() {
        let batch = vec![record(10, "A"), record(11, "BUTTON")];
        let response = r#"{"elements": [
            {"tab_index": 11, "analysis": {"focus_visible": true}},
            {"analysis": {"focus_visible": false}}
        ]}"#;

        let parsed = parse_response(response, &batch).unwrap();
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].metadata.index, 11);
        assert!(parsed[0].verdict.as_ref().unwrap().visible);
    }

    #[test]
    fn null_judgement_counts_as_invisible() {
        let batch = vec![record(0, "A"), record(1, "A")];
        let response = r#"{"elements": [
            {"tab_index": 0, "analysis": {"focus_visible": null}},
            {"tab_index": 1, "analysis": {"focus_indicator_description": "无变化"}}
        ]}"#;

        let parsed = parse_response(response, &batch).unwrap();
        assert_eq!(parsed.len(), 2);
        assert!(parsed.iter().all(|e| !e.verdict.as_ref().unwrap().visible));
    }

    #[test]
    fn malformed_responses_are_reported() {
        let batch = vec![record(0, "A")];
        assert_eq!(
            parse_response("抱歉，我无法分析这些图片。", &batch).unwrap_err(),
            MalformedReason::NoJsonObject
        );
        assert!(matches!(
            parse_response("{\"elements\": [", &batch).unwrap_err(),
            MalformedReason::NoJsonObject | MalformedReason::InvalidJson(_)
        ));
        assert!(matches!(
            parse_response("{\"elements\": [ {\"tab_index\": 0 }", &batch).unwrap_err(),
            MalformedReason::InvalidJson(_)
        ));
        assert_eq!(
            parse_response("{\"results\": []}", &batch).unwrap_err(),
            MalformedReason::MissingElements
        );
    }
}
