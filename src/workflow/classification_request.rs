//! 构建一个批次的视觉判定请求
//!
//! 请求结构：每个元素两张图片（获得焦点前/后）并附带位置标签，
//! 最后是任务说明、输出格式示例和元素元数据 JSON。图片不写入文本部分。

use serde_json::json;

use crate::models::technique::{PROMPT_ORDER, TECHNIQUES};
use crate::models::{ClassificationRequest, ElementMetadata, FocusRecord, RequestPart};

pub const SYSTEM_MESSAGE: &str = "你是一名无障碍测试专家，专注于 WCAG 合规评估，尤其是键盘用户的焦点可见性。";

/// 输出格式示例
const FORMAT_EXAMPLE: &str = r#"{
  "elements": [
    {
      "tab_index": 0,
      "element_tag": "A",
      "element_type": null,
      "element_id": "main-logo",
      "element_class": "navbar-brand",
      "element_text": "Home",
      "element_role": null,
      "element_xpath": "/html/body/header/nav/a[1]",
      "analysis": {
        "focus_visible": true,
        "focus_indicator_description": "元素周围出现 2px 宽的蓝色轮廓",
        "compliance_techniques": [
          "G165: Using the default focus indicator for the platform",
          "C15: Using CSS to change the presentation of a user interface component when it receives focus"
        ],
        "recommendation": "当前实现符合 WCAG 2.4.7"
      }
    }
  ]
}"#;

/// 构建请求
pub fn build_request(url: &str, batch: &[FocusRecord]) -> ClassificationRequest {
    let mut parts = Vec::with_capacity(batch.len() * 4 + 1);

    for (position, record) in batch.iter().enumerate() {
        let meta = &record.metadata;
        parts.push(RequestPart::ImageUrl(record.before.data_url()));
        parts.push(RequestPart::Text(format!(
            "图片 {}: 元素 {} ({}) 获得焦点之前",
            position * 2 + 1,
            meta.index,
            meta.tag
        )));
        parts.push(RequestPart::ImageUrl(record.after.data_url()));
        parts.push(RequestPart::Text(format!(
            "图片 {}: 元素 {} ({}) 获得焦点之后",
            position * 2 + 2,
            meta.index,
            meta.tag
        )));
    }

    parts.push(RequestPart::Text(build_prompt(url, batch)));

    ClassificationRequest {
        url: url.to_string(),
        system_message: SYSTEM_MESSAGE.to_string(),
        parts,
        element_count: batch.len(),
    }
}

/// 元素元数据 JSON（不含截图）
pub fn elements_json(batch: &[FocusRecord]) -> String {
    let elements: Vec<&ElementMetadata> = batch.iter().map(|record| &record.metadata).collect();
    serde_json::to_string_pretty(&json!({ "elements": elements })).unwrap_or_default()
}

fn technique_list() -> String {
    PROMPT_ORDER
        .iter()
        .filter_map(|code| TECHNIQUES.get(*code).map(|desc| format!("   - {}: {}", code, desc)))
        .collect::<Vec<_>>()
        .join("\n")
}

fn build_prompt(url: &str, batch: &[FocusRecord]) -> String {
    format!(
        r#"# 你是专门评估 WCAG 2.4.7 焦点可见性的无障碍测试专家。你的任务是分析元素获得键盘焦点时是否存在可见的焦点指示器。

# WCAG 2.4.7 焦点可见的要求:
任何可通过键盘操作的用户界面都存在一种键盘焦点指示器可见的操作模式。

# 每个元素对应两张图片:
1. 元素获得焦点之前（上一次 Tab 之后）
2. 元素获得焦点之后（本次 Tab）

请比较这两张图片，判断元素获得键盘焦点时是否有可见的焦点指示。

# 常见的焦点指示包括:
- 轮廓线（实线、点线、虚线）
- 背景色变化
- 边框变化
- 阴影
- 文字颜色变化
- 下划线或其他装饰
- 尺寸或形状变化

# 对每个元素请判断:
1. 是否存在可见的焦点指示？(true/false)
2. 如果存在，请描述该焦点指示
3. 指出使用的 WCAG 技术:
{techniques}

# 上面的图片展示了待测元素，请仔细分析每一对"获得焦点之前"与"获得焦点之后"的图片。

# 待测页面: {url}

# 回答格式:
{example}

# 请分析以下元素:
{elements}"#,
        techniques = technique_list(),
        url = url,
        example = FORMAT_EXAMPLE,
        elements = elements_json(batch),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ElementAttributes, Screenshot};

    fn record(index: usize) -> FocusRecord {
        let attributes = ElementAttributes {
            tag: "BUTTON".to_string(),
            id: format!("btn-{}", index),
            ..Default::default()
        };
        FocusRecord {
            metadata: ElementMetadata::from_attributes(
                index,
                &attributes,
                format!("//*[@id=\"btn-{}\"]", index),
                100,
            ),
            before: Screenshot::from_png(format!("before-{}", index).as_bytes()),
            after: Screenshot::from_png(format!("after-{}", index).as_bytes()),
        }
    }

    #[test]
    fn images_are_interleaved_with_labels() {
        let batch = vec![record(5), record(6)];
        let request = build_request("https://example.com", &batch);

        assert_eq!(request.element_count, 2);
        assert_eq!(request.url, "https://example.com");
        assert_eq!(request.image_count(), 4);
        assert_eq!(request.parts.len(), 9);
        assert_eq!(request.parts[0], RequestPart::ImageUrl(batch[0].before.data_url()));
        assert_eq!(request.parts[2], RequestPart::ImageUrl(batch[0].after.data_url()));
        match &request.parts[7] {
            RequestPart::Text(label) => assert!(label.starts_with("图片 4: 元素 6 (BUTTON)")),
            other => panic!("意外的片段: {:?}", other),
        }
    }

    #[test]
    fn prompt_carries_metadata_but_no_images() {
        let batch = vec![record(0)];
        let request = build_request("https://example.com/form", &batch);

        let Some(RequestPart::Text(prompt)) = request.parts.last() else {
            panic!("最后一个片段应为任务说明");
        };
        assert!(prompt.contains("https://example.com/form"));
        assert!(prompt.contains("\"element_id\": \"btn-0\""));
        assert!(prompt.contains("SCR31"));
        assert!(!prompt.contains(batch[0].before.as_base64()));
    }

    #[test]
    fn elements_json_round_trips_metadata() {
        let batch = vec![record(3)];
        let value: serde_json::Value = serde_json::from_str(&elements_json(&batch)).unwrap();
        assert_eq!(value["elements"][0]["tab_index"], 3);
        assert_eq!(value["elements"][0]["element_xpath"], "//*[@id=\"btn-3\"]");
    }
}
