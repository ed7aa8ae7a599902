//! 焦点遍历相关的数据结构

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::{Deserialize, Serialize};

/// 定位路径计算失败时使用的占位值
pub const UNKNOWN_LOCATOR: &str = "Unknown";

/// 浏览器读取到的焦点元素原始属性
///
/// 字段与 `document.activeElement` 上读到的值一一对应，空字符串表示缺失
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementAttributes {
    pub tag: String,
    #[serde(default)]
    pub input_type: String,
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub class_name: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub role: String,
}

/// 焦点元素的元数据（不含截图）
///
/// 序列化后的字段名即发送给 LLM 的 JSON 字段名
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementMetadata {
    #[serde(rename = "tab_index")]
    pub index: usize,
    #[serde(rename = "element_tag")]
    pub tag: String,
    #[serde(rename = "element_type")]
    pub input_type: Option<String>,
    #[serde(rename = "element_id")]
    pub id: Option<String>,
    #[serde(rename = "element_class")]
    pub css_classes: Option<String>,
    #[serde(rename = "element_text")]
    pub text: String,
    #[serde(rename = "element_role")]
    pub role: Option<String>,
    #[serde(rename = "element_xpath")]
    pub locator: String,
}

impl ElementMetadata {
    /// 由原始属性构建元数据，文本按字符截断到 `text_limit`
    pub fn from_attributes(
        index: usize,
        attributes: &ElementAttributes,
        locator: String,
        text_limit: usize,
    ) -> Self {
        Self {
            index,
            tag: attributes.tag.clone(),
            input_type: non_empty(&attributes.input_type),
            id: non_empty(&attributes.id),
            css_classes: non_empty(&attributes.class_name),
            text: truncate_chars(&attributes.text, text_limit),
            role: non_empty(&attributes.role),
            locator,
        }
    }

    /// 便于日志阅读的元素标识：id → class → 文本前 50 个字符 → `TAG[index]`
    pub fn identifier(&self) -> String {
        if let Some(id) = &self.id {
            return id.clone();
        }
        if let Some(classes) = &self.css_classes {
            return classes.clone();
        }
        let text = self.text.trim();
        if !text.is_empty() {
            return truncate_chars(text, 50);
        }
        format!("{}[{}]", self.tag, self.index)
    }
}

/// 用于循环检测的元素签名
///
/// 只在遍历过程中使用，不进入最终记录
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ElementSignature {
    tag: String,
    id: String,
    css_classes: String,
    locator: String,
}

impl ElementSignature {
    pub fn new(attributes: &ElementAttributes, locator: &str) -> Self {
        Self {
            tag: attributes.tag.clone(),
            id: attributes.id.clone(),
            css_classes: attributes.class_name.clone(),
            locator: locator.to_string(),
        }
    }
}

/// 编码后的截图（base64 PNG）
#[derive(Clone, PartialEq, Eq)]
pub struct Screenshot {
    base64: String,
}

impl Screenshot {
    pub fn from_png(bytes: &[u8]) -> Self {
        Self {
            base64: STANDARD.encode(bytes),
        }
    }

    pub fn as_base64(&self) -> &str {
        &self.base64
    }

    /// 适合放进多模态消息的 data URL
    pub fn data_url(&self) -> String {
        format!("data:image/png;base64,{}", self.base64)
    }

    /// 编码后的长度（字节）
    pub fn encoded_len(&self) -> usize {
        self.base64.len()
    }
}

impl std::fmt::Debug for Screenshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Screenshot")
            .field("encoded_len", &self.base64.len())
            .finish()
    }
}

/// 一次 Tab 操作的完整记录
#[derive(Debug, Clone)]
pub struct FocusRecord {
    pub metadata: ElementMetadata,
    /// 按下 Tab 之前的页面
    pub before: Screenshot,
    /// 元素获得焦点之后的页面
    pub after: Screenshot,
}

impl FocusRecord {
    pub fn index(&self) -> usize {
        self.metadata.index
    }
}

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// 按字符（而非字节）截断文本，不追加省略号
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => text[..byte_idx].to_string(),
        None => text.to_string(),
    }
}
