use std::path::Path;
use std::str::FromStr;

use serde::Deserialize;

use crate::error::{AppResult, ConfigError, FileError};

/// 程序配置
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 后端根地址
    pub base_url: String,
    /// token 持久化文件（TOML）
    pub token_file: String,
    /// 单次请求超时（秒）
    pub request_timeout_secs: u64,
    /// 距离底部小于该值时触发翻页
    pub paging_threshold: f64,
    /// 每页条数，后端不返回 totalPages 时用来判断是否还有下一页
    pub page_size: usize,
    /// 是否显示详细日志
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: "https://api.greenroom.dev".to_string(),
            token_file: "greenroom_tokens.toml".to_string(),
            request_timeout_secs: 15,
            paging_threshold: 120.0,
            page_size: 20,
            verbose_logging: false,
        }
    }
}

impl Config {
    /// 默认值 + 环境变量
    pub fn from_env() -> AppResult<Self> {
        Self::default().merge_env()
    }

    /// 从 TOML 文件加载配置，缺省字段使用默认值，再叠加环境变量
    pub fn from_toml_file(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| FileError::ReadFailed {
            path: path.display().to_string(),
            source,
        })?;
        let config: Config = toml::from_str(&content).map_err(|source| FileError::TomlParseFailed {
            path: path.display().to_string(),
            source,
        })?;
        config.merge_env()
    }

    fn merge_env(self) -> AppResult<Self> {
        let config = Self {
            base_url: std::env::var("GREENROOM_BASE_URL").unwrap_or(self.base_url),
            token_file: std::env::var("GREENROOM_TOKEN_FILE").unwrap_or(self.token_file),
            request_timeout_secs: env_or("GREENROOM_REQUEST_TIMEOUT_SECS", self.request_timeout_secs)?,
            paging_threshold: env_or("GREENROOM_PAGING_THRESHOLD", self.paging_threshold)?,
            page_size: env_or("GREENROOM_PAGE_SIZE", self.page_size)?,
            verbose_logging: env_or("VERBOSE_LOGGING", self.verbose_logging)?,
        };
        config.validate()?;
        Ok(config)
    }

    /// 检查取值范围
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |field: &str, reason: &str| ConfigError::InvalidValue {
            field: field.to_string(),
            reason: reason.to_string(),
        };

        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(invalid("base_url", "必须以 http:// 或 https:// 开头"));
        }
        if self.page_size == 0 {
            return Err(invalid("page_size", "必须大于 0"));
        }
        if self.request_timeout_secs == 0 {
            return Err(invalid("request_timeout_secs", "必须大于 0"));
        }
        if self.paging_threshold.is_nan() || self.paging_threshold <= 0.0 {
            return Err(invalid("paging_threshold", "必须大于 0"));
        }
        Ok(())
    }

    /// 测试或本地联调时指定后端地址
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

/// 读取并解析环境变量，未设置时使用 `default`
fn env_or<T: FromStr>(var_name: &str, default: T) -> Result<T, ConfigError> {
    match std::env::var(var_name) {
        Ok(value) => value.trim().parse().map_err(|_| ConfigError::EnvVarParseFailed {
            var_name: var_name.to_string(),
            value,
            expected_type: std::any::type_name::<T>().to_string(),
        }),
        Err(_) => Ok(default),
    }
}
