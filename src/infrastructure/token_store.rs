//! token 存储 - 基础设施层
//!
//! 只负责"把 token 存下来 / 读出来"，不关心刷新流程

use std::path::PathBuf;
use std::sync::Mutex;

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{AppResult, FileError};

/// access token + refresh token
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access_token: SecretString,
    pub refresh_token: SecretString,
}

impl TokenPair {
    pub fn new(access_token: impl Into<String>, refresh_token: impl Into<String>) -> Self {
        Self {
            access_token: SecretString::from(access_token.into()),
            refresh_token: SecretString::from(refresh_token.into()),
        }
    }
}

/// 与后端交换 token 时使用的明文结构（reissue 接口 / TOML 文件）
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPayload {
    pub access_token: String,
    pub refresh_token: String,
}

impl From<&TokenPair> for TokenPayload {
    fn from(pair: &TokenPair) -> Self {
        Self {
            access_token: pair.access_token.expose_secret().to_string(),
            refresh_token: pair.refresh_token.expose_secret().to_string(),
        }
    }
}

impl From<TokenPayload> for TokenPair {
    fn from(payload: TokenPayload) -> Self {
        TokenPair::new(payload.access_token, payload.refresh_token)
    }
}

/// token 持久化能力
pub trait TokenStore: Send + Sync {
    fn load(&self) -> AppResult<Option<TokenPair>>;
    fn save(&self, tokens: &TokenPair) -> AppResult<()>;
    fn clear(&self) -> AppResult<()>;
}

/// 内存存储（测试、临时会话）
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    tokens: Mutex<Option<TokenPair>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tokens(tokens: TokenPair) -> Self {
        Self {
            tokens: Mutex::new(Some(tokens)),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> AppResult<Option<TokenPair>> {
        Ok(self.tokens.lock().unwrap_or_else(|e| e.into_inner()).clone())
    }

    fn save(&self, tokens: &TokenPair) -> AppResult<()> {
        *self.tokens.lock().unwrap_or_else(|e| e.into_inner()) = Some(tokens.clone());
        Ok(())
    }

    fn clear(&self) -> AppResult<()> {
        *self.tokens.lock().unwrap_or_else(|e| e.into_inner()) = None;
        Ok(())
    }
}

/// TOML 文件存储
pub struct TomlTokenStore {
    path: PathBuf,
}

impl TomlTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn path_string(&self) -> String {
        self.path.display().to_string()
    }
}

impl TokenStore for TomlTokenStore {
    fn load(&self) -> AppResult<Option<TokenPair>> {
        if !self.path.exists() {
            debug!("token 文件不存在: {}", self.path_string());
            return Ok(None);
        }

        let content = std::fs::read_to_string(&self.path).map_err(|source| FileError::ReadFailed {
            path: self.path_string(),
            source,
        })?;

        let payload: TokenPayload =
            toml::from_str(&content).map_err(|source| FileError::TomlParseFailed {
                path: self.path_string(),
                source,
            })?;

        Ok(Some(payload.into()))
    }

    fn save(&self, tokens: &TokenPair) -> AppResult<()> {
        let content = toml::to_string(&TokenPayload::from(tokens)).map_err(FileError::from)?;
        std::fs::write(&self.path, content).map_err(|source| FileError::WriteFailed {
            path: self.path_string(),
            source,
        })?;
        debug!("token 已写入: {}", self.path_string());
        Ok(())
    }

    fn clear(&self) -> AppResult<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(FileError::WriteFailed {
                path: self.path_string(),
                source,
            }
            .into()),
        }
    }
}
