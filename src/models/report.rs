//! 最终的合规报告

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

use crate::models::classification::ClassificationResult;
use crate::models::focus::ElementMetadata;

/// 报告中的一项：元素元数据 × 判定结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportEntry {
    pub element: ElementMetadata,
    pub result: ClassificationResult,
}

/// WCAG 2.4.7 合规报告
///
/// 计数与合规结论均由两个列表推导，不单独存储
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComplianceReport {
    url: String,
    visible_elements: Vec<ReportEntry>,
    invisible_elements: Vec<ReportEntry>,
}

impl ComplianceReport {
    pub fn new(
        url: impl Into<String>,
        visible_elements: Vec<ReportEntry>,
        invisible_elements: Vec<ReportEntry>,
    ) -> Self {
        Self {
            url: url.into(),
            visible_elements,
            invisible_elements,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn visible_elements(&self) -> &[ReportEntry] {
        &self.visible_elements
    }

    pub fn invisible_elements(&self) -> &[ReportEntry] {
        &self.invisible_elements
    }

    pub fn visible_count(&self) -> usize {
        self.visible_elements.len()
    }

    pub fn invisible_count(&self) -> usize {
        self.invisible_elements.len()
    }

    /// 成功判定的元素总数
    pub fn total_classified(&self) -> usize {
        self.visible_count() + self.invisible_count()
    }

    /// 只针对已判定的元素：没有任何焦点不可见的元素即视为合规
    pub fn compliant(&self) -> bool {
        self.invisible_count() == 0
    }
}

impl Serialize for ComplianceReport {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("ComplianceReport", 7)?;
        state.serialize_field("url", &self.url)?;
        state.serialize_field("total_classified", &self.total_classified())?;
        state.serialize_field("visible_count", &self.visible_count())?;
        state.serialize_field("invisible_count", &self.invisible_count())?;
        state.serialize_field("compliant", &self.compliant())?;
        state.serialize_field("visible_elements", &self.visible_elements)?;
        state.serialize_field("invisible_elements", &self.invisible_elements)?;
        state.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(index: usize, visible: bool) -> ReportEntry {
        ReportEntry {
            element: ElementMetadata {
                index,
                tag: "A".to_string(),
                input_type: None,
                id: None,
                css_classes: None,
                text: String::new(),
                role: None,
                locator: "/html/body/a[1]".to_string(),
            },
            result: ClassificationResult {
                index,
                visible,
                description: None,
                techniques: Vec::new(),
                recommendation: None,
            },
        }
    }

    #[test]
    fn empty_report_is_compliant() {
        let report = ComplianceReport::new("https://example.com", vec![], vec![]);
        assert_eq!(report.total_classified(), 0);
        assert!(report.compliant());
    }

    #[test]
    fn json_contains_derived_fields() {
        let report = ComplianceReport::new(
            "https://example.com",
            vec![entry(0, true)],
            vec![entry(1, false)],
        );
        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["total_classified"], 2);
        assert_eq!(value["visible_count"], 1);
        assert_eq!(value["invisible_count"], 1);
        assert_eq!(value["compliant"], false);
        assert_eq!(value["invisible_elements"][0]["element"]["tab_index"], 1);
    }
}
