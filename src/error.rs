use thiserror::Error;

/// 装箱的底层错误
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AuditError {
    /// 浏览器相关错误
    #[error("浏览器错误: {0}")]
    Browser(#[from] BrowserError),
    /// 焦点遍历错误
    #[error("遍历错误: {0}")]
    Traversal(#[from] TraversalError),
    /// LLM 服务错误
    #[error("LLM错误: {0}")]
    Llm(#[from] LlmError),
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
}

/// 浏览器相关错误
#[derive(Debug, Error)]
pub enum BrowserError {
    /// 启动浏览器失败
    #[error("启动浏览器失败: {source}")]
    LaunchFailed {
        #[source]
        source: BoxError,
    },
    /// 创建临时用户目录失败
    #[error("创建临时用户目录失败: {source}")]
    ProfileDirFailed {
        #[source]
        source: std::io::Error,
    },
    /// 创建页面失败
    #[error("创建页面失败: {source}")]
    PageCreationFailed {
        #[source]
        source: BoxError,
    },
    /// 导航失败
    #[error("导航到 {url} 失败: {source}")]
    NavigationFailed {
        url: String,
        #[source]
        source: BoxError,
    },
    /// 页面在超时时间内未就绪
    #[error("页面在 {timeout_ms}ms 内未加载完成")]
    PageNotReady { timeout_ms: u64 },
    /// 执行脚本失败
    #[error("执行脚本失败: {source}")]
    ScriptExecutionFailed {
        #[source]
        source: BoxError,
    },
    /// 发送按键失败
    #[error("发送按键 {key} 失败: {reason}")]
    KeyDispatchFailed { key: String, reason: String },
    /// 截图失败
    #[error("截图失败: {source}")]
    CaptureFailed {
        #[source]
        source: BoxError,
    },
    /// 无法计算元素定位路径
    #[error("无法计算元素定位路径: {reason}")]
    LocatorFailed { reason: String },
}

/// 焦点遍历错误
#[derive(Debug, Error)]
pub enum TraversalError {
    /// 读取焦点元素属性失败，本次遍历结果不可信
    #[error("第 {step} 步读取焦点元素属性失败: {source}")]
    AttributeReadFailed {
        step: usize,
        #[source]
        source: BrowserError,
    },
}

/// LLM 服务错误
#[derive(Debug, Error)]
pub enum LlmError {
    /// 构建请求失败
    #[error("构建LLM请求失败: {source}")]
    RequestBuildFailed {
        #[source]
        source: BoxError,
    },
    /// API 调用失败
    #[error("LLM API调用失败 (模型: {model}): {source}")]
    ApiCallFailed {
        model: String,
        #[source]
        source: BoxError,
    },
    /// 返回结果为空
    #[error("LLM返回结果为空 (模型: {model})")]
    EmptyResponse { model: String },
    /// 返回内容为空
    #[error("LLM返回内容为空 (模型: {model})")]
    EmptyContent { model: String },
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 环境变量解析失败
    #[error("环境变量 {var_name} 解析失败: 值 '{value}' 无法转换为 {expected_type}")]
    EnvVarParseFailed {
        var_name: String,
        value: String,
        expected_type: String,
    },
    /// 缺少必需的配置项
    #[error("缺少必需的配置项: {name}")]
    MissingValue { name: String },
    /// 配置项取值非法
    #[error("配置项 {name} 取值非法: {reason}")]
    InvalidValue { name: String, reason: String },
    /// 读取配置文件失败
    #[error("读取配置文件失败 ({path}): {source}")]
    FileReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// TOML 解析失败
    #[error("TOML解析失败 ({path}): {source}")]
    TomlParseFailed {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

// ========== 从常见错误类型转换 ==========

impl From<chromiumoxide::error::CdpError> for BrowserError {
    fn from(err: chromiumoxide::error::CdpError) -> Self {
        BrowserError::ScriptExecutionFailed {
            source: Box::new(err),
        }
    }
}

impl From<serde_json::Error> for BrowserError {
    fn from(err: serde_json::Error) -> Self {
        BrowserError::ScriptExecutionFailed {
            source: Box::new(err),
        }
    }
}

// ========== 便捷构造函数 ==========

impl BrowserError {
    /// 创建浏览器启动错误
    pub fn launch_failed(source: impl Into<BoxError>) -> Self {
        BrowserError::LaunchFailed {
            source: source.into(),
        }
    }

    /// 创建导航错误
    pub fn navigation_failed(url: impl Into<String>, source: impl Into<BoxError>) -> Self {
        BrowserError::NavigationFailed {
            url: url.into(),
            source: source.into(),
        }
    }

    /// 创建截图错误
    pub fn capture_failed(source: impl Into<BoxError>) -> Self {
        BrowserError::CaptureFailed {
            source: source.into(),
        }
    }
}

impl LlmError {
    /// 创建 LLM API 调用错误
    pub fn api_failed(model: impl Into<String>, source: impl Into<BoxError>) -> Self {
        LlmError::ApiCallFailed {
            model: model.into(),
            source: source.into(),
        }
    }

    /// 创建请求构建错误
    pub fn request_build_failed(source: impl Into<BoxError>) -> Self {
        LlmError::RequestBuildFailed {
            source: source.into(),
        }
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type Result<T> = std::result::Result<T, AuditError>;

/// 浏览器操作结果类型
pub type BrowserResult<T> = std::result::Result<T, BrowserError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn traversal_error_keeps_browser_source() {
        let err = AuditError::from(TraversalError::AttributeReadFailed {
            step: 3,
            source: BrowserError::LocatorFailed {
                reason: "detached".to_string(),
            },
        });

        let message = err.to_string();
        assert!(message.contains("第 3 步"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn string_sources_can_be_boxed() {
        let err = BrowserError::launch_failed("DevToolsActivePort file doesn't exist");
        assert!(err.to_string().contains("DevToolsActivePort"));
    }
}
