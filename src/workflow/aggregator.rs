//! 结果汇总
//!
//! 把所有批次解码出的元素合并成一份报告。缺少判定的元素只在这里丢弃，
//! 同一批里完整的元素照常计入。

use tracing::{debug, warn};

use crate::models::{ClassifiedElement, ComplianceReport, ReportEntry};

/// 按焦点是否可见分成两组，组内保持焦点顺序
pub fn aggregate(url: &str, elements: &[ClassifiedElement]) -> ComplianceReport {
    let mut visible = Vec::new();
    let mut invisible = Vec::new();

    for element in elements {
        let Some(result) = &element.verdict else {
            warn!(
                "⚠️ 元素 {} ({}) 缺少判定结果，不计入报告",
                element.metadata.index,
                element.metadata.identifier()
            );
            continue;
        };

        let entry = ReportEntry {
            element: element.metadata.clone(),
            result: result.clone(),
        };
        if result.visible {
            visible.push(entry);
        } else {
            invisible.push(entry);
        }
    }

    debug!(
        "汇总完成: 可见 {} / 不可见 {}",
        visible.len(),
        invisible.len()
    );
    ComplianceReport::new(url, visible, invisible)
}
