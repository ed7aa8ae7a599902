use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use serde::Deserialize;

use crate::error::ConfigError;
use crate::workflow::batch::DEFAULT_BATCH_SIZE;

/// 程序配置
#[derive(Clone, Debug)]
pub struct Config {
    // --- 浏览器配置 ---
    /// Chrome/Chromium 可执行文件路径，为空时自动探测
    pub chrome_executable: Option<PathBuf>,
    /// 是否以无头模式运行
    pub headless: bool,
    pub window_width: u32,
    pub window_height: u32,
    /// 页面加载等待时间（毫秒）
    pub page_load_timeout_ms: u64,
    /// 是否截取整页（否则只截取视口）
    pub full_page_capture: bool,
    // --- 遍历配置 ---
    /// 每次按下 Tab 后等待焦点样式渲染的时间（毫秒）
    pub settle_delay_ms: u64,
    /// 最多按 Tab 的次数
    pub max_tab_steps: usize,
    /// 每批提交给 LLM 的元素数量
    pub batch_size: usize,
    // --- LLM 配置 ---
    pub llm_api_key: String,
    pub llm_api_base_url: String,
    pub llm_model_name: String,
    pub llm_max_tokens: u32,
    /// 是否显示详细日志（包括 LLM 原始响应）
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            chrome_executable: None,
            headless: true,
            window_width: 1366,
            window_height: 768,
            page_load_timeout_ms: 10_000,
            full_page_capture: true,
            settle_delay_ms: 500,
            max_tab_steps: 100,
            batch_size: DEFAULT_BATCH_SIZE,
            llm_api_key: String::new(),
            llm_api_base_url: "https://api.openai.com/v1".to_string(),
            llm_model_name: "gpt-4o".to_string(),
            llm_max_tokens: 4096,
            verbose_logging: false,
        }
    }
}

/// TOML 配置文件，所有字段可选，缺省时沿用默认值
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    chrome_executable: Option<PathBuf>,
    headless: Option<bool>,
    window_width: Option<u32>,
    window_height: Option<u32>,
    page_load_timeout_ms: Option<u64>,
    full_page_capture: Option<bool>,
    settle_delay_ms: Option<u64>,
    max_tab_steps: Option<usize>,
    batch_size: Option<usize>,
    llm_api_key: Option<String>,
    llm_api_base_url: Option<String>,
    llm_model_name: Option<String>,
    llm_max_tokens: Option<u32>,
    verbose_logging: Option<bool>,
}

impl Config {
    /// 按 默认值 → 配置文件 → 环境变量 的顺序加载配置
    pub fn load(config_file: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Some(path) = config_file {
            config.apply_file(path)?;
        }
        config.apply_env(|name| std::env::var(name).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// 只从环境变量加载
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::load(None)
    }

    fn apply_file(&mut self, path: &Path) -> Result<(), ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| {
            ConfigError::FileReadFailed {
                path: path.display().to_string(),
                source,
            }
        })?;
        self.apply_toml(&content, &path.display().to_string())
    }

    fn apply_toml(&mut self, content: &str, origin: &str) -> Result<(), ConfigError> {
        let file: ConfigFile =
            toml::from_str(content).map_err(|source| ConfigError::TomlParseFailed {
                path: origin.to_string(),
                source,
            })?;

        if file.chrome_executable.is_some() {
            self.chrome_executable = file.chrome_executable;
        }
        overlay(&mut self.headless, file.headless);
        overlay(&mut self.window_width, file.window_width);
        overlay(&mut self.window_height, file.window_height);
        overlay(&mut self.page_load_timeout_ms, file.page_load_timeout_ms);
        overlay(&mut self.full_page_capture, file.full_page_capture);
        overlay(&mut self.settle_delay_ms, file.settle_delay_ms);
        overlay(&mut self.max_tab_steps, file.max_tab_steps);
        overlay(&mut self.batch_size, file.batch_size);
        overlay(&mut self.llm_api_key, file.llm_api_key);
        overlay(&mut self.llm_api_base_url, file.llm_api_base_url);
        overlay(&mut self.llm_model_name, file.llm_model_name);
        overlay(&mut self.llm_max_tokens, file.llm_max_tokens);
        overlay(&mut self.verbose_logging, file.verbose_logging);
        Ok(())
    }

    fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<(), ConfigError> {
        if let Some(path) = lookup("CHROME_BINARY_PATH") {
            self.chrome_executable = Some(PathBuf::from(path));
        }
        overlay(&mut self.headless, parse_env(&lookup, "HEADLESS", "bool")?);
        overlay(&mut self.window_width, parse_env(&lookup, "WINDOW_WIDTH", "u32")?);
        overlay(&mut self.window_height, parse_env(&lookup, "WINDOW_HEIGHT", "u32")?);
        overlay(
            &mut self.page_load_timeout_ms,
            parse_env(&lookup, "PAGE_LOAD_TIMEOUT_MS", "u64")?,
        );
        overlay(
            &mut self.full_page_capture,
            parse_env(&lookup, "FULL_PAGE_CAPTURE", "bool")?,
        );
        overlay(&mut self.settle_delay_ms, parse_env(&lookup, "SETTLE_DELAY_MS", "u64")?);
        overlay(&mut self.max_tab_steps, parse_env(&lookup, "MAX_TAB_STEPS", "usize")?);
        overlay(&mut self.batch_size, parse_env(&lookup, "BATCH_SIZE", "usize")?);
        overlay(&mut self.llm_api_key, lookup("LLM_API_KEY"));
        overlay(&mut self.llm_api_base_url, lookup("LLM_API_BASE_URL"));
        overlay(&mut self.llm_model_name, lookup("LLM_MODEL_NAME"));
        overlay(&mut self.llm_max_tokens, parse_env(&lookup, "LLM_MAX_TOKENS", "u32")?);
        overlay(&mut self.verbose_logging, parse_env(&lookup, "VERBOSE_LOGGING", "bool")?);
        Ok(())
    }

    /// 校验配置
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.llm_api_key.trim().is_empty() {
            return Err(ConfigError::MissingValue {
                name: "LLM_API_KEY".to_string(),
            });
        }
        if self.batch_size == 0 {
            return Err(ConfigError::InvalidValue {
                name: "batch_size".to_string(),
                reason: "必须大于 0".to_string(),
            });
        }
        if self.max_tab_steps == 0 {
            return Err(ConfigError::InvalidValue {
                name: "max_tab_steps".to_string(),
                reason: "必须大于 0".to_string(),
            });
        }
        Ok(())
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    pub fn page_load_timeout(&self) -> Duration {
        Duration::from_millis(self.page_load_timeout_ms)
    }
}

fn overlay<T>(slot: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *slot = value;
    }
}

fn parse_env<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    var_name: &str,
    expected_type: &str,
) -> Result<Option<T>, ConfigError> {
    match lookup(var_name) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| ConfigError::EnvVarParseFailed {
                var_name: var_name.to_string(),
                value: raw,
                expected_type: expected_type.to_string(),
            }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn defaults_match_audit_constants() {
        let config = Config::default();
        assert_eq!(config.batch_size, 5);
        assert_eq!(config.max_tab_steps, 100);
        assert_eq!(config.settle_delay(), Duration::from_millis(500));
        assert_eq!(config.llm_max_tokens, 4096);
        assert_eq!((config.window_width, config.window_height), (1366, 768));
    }

    #[test]
    fn env_overrides_file_values() {
        let mut config = Config::default();
        config
            .apply_toml("batch_size = 3\nllm_model_name = \"from-file\"\n", "test.toml")
            .unwrap();
        config
            .apply_env(env(&[("BATCH_SIZE", "7"), ("LLM_API_KEY", "sk-test")]))
            .unwrap();

        assert_eq!(config.batch_size, 7);
        assert_eq!(config.llm_model_name, "from-file");
        assert_eq!(config.llm_api_key, "sk-test");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn unparseable_env_value_is_an_error() {
        let mut config = Config::default();
        let err = config
            .apply_env(env(&[("MAX_TAB_STEPS", "lots")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::EnvVarParseFailed { ref var_name, .. } if var_name == "MAX_TAB_STEPS"));
    }

    #[test]
    fn unknown_file_keys_are_rejected() {
        let mut config = Config::default();
        let err = config.apply_toml("batch_sise = 3\n", "typo.toml").unwrap_err();
        assert!(matches!(err, ConfigError::TomlParseFailed { .. }));
    }

    #[test]
    fn validate_requires_api_key_and_positive_sizes() {
        let mut config = Config::default();
        assert!(matches!(config.validate(), Err(ConfigError::MissingValue { .. })));

        config.llm_api_key = "sk-test".to_string();
        config.batch_size = 0;
        assert!(matches!(config.validate(), Err(ConfigError::InvalidValue { .. })));
    }
}
