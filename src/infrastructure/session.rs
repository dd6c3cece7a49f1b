//! 登录会话 - 基础设施层
//!
//! 持有当前 token，负责刷新与失效。
//! 所有 service 通过 `HttpExecutor` 共享同一个 `Session`，而不是各自去读存储。

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use secrecy::ExposeSecret;
use tokio::sync::{watch, Mutex};
use tracing::{info, warn};

use super::token_store::{TokenPair, TokenStore};
use crate::error::{AppResult, AuthError};

/// 会话状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// 持有 token
    Authenticated,
    /// 从未登录或主动退出
    Unauthenticated,
    /// 刷新失败，需要重新登录
    ReauthenticationRequired,
}

/// 当前使用的 access token 及其版本号
///
/// 版本号用于判断 401 之后是否已有其他请求完成了刷新。
#[derive(Debug, Clone)]
pub struct AccessToken {
    pub token: String,
    pub generation: u64,
}

pub struct Session {
    store: Arc<dyn TokenStore>,
    tokens: RwLock<Option<TokenPair>>,
    generation: AtomicU64,
    refresh_lock: Mutex<()>,
    state: watch::Sender<SessionState>,
}

impl Session {
    /// 从存储中恢复会话
    pub fn restore(store: Arc<dyn TokenStore>) -> AppResult<Self> {
        let tokens = store.load()?;
        let initial = if tokens.is_some() {
            SessionState::Authenticated
        } else {
            SessionState::Unauthenticated
        };
        let (state, _) = watch::channel(initial);

        Ok(Self {
            store,
            tokens: RwLock::new(tokens),
            generation: AtomicU64::new(0),
            refresh_lock: Mutex::new(()),
            state,
        })
    }

    /// 订阅会话状态（界面据此跳转到登录页）
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    pub fn state(&self) -> SessionState {
        *self.state.borrow()
    }

    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    pub fn access_token(&self) -> Option<AccessToken> {
        let guard = self.tokens.read().unwrap_or_else(|e| e.into_inner());
        guard.as_ref().map(|pair| AccessToken {
            token: pair.access_token.expose_secret().to_string(),
            generation: self.generation(),
        })
    }

    /// 登录成功后写入新 token
    pub fn sign_in(&self, tokens: TokenPair) -> AppResult<()> {
        self.replace_tokens(tokens)?;
        info!("✓ 已登录");
        Ok(())
    }

    /// 主动退出
    pub fn sign_out(&self) -> AppResult<()> {
        self.drop_tokens(SessionState::Unauthenticated)
    }

    /// 刷新 token
    ///
    /// `stale_generation` 是收到 401 时所用 token 的版本号。
    /// 多个请求同时 401 时只有第一个真正调用 `reissue`，其余等待后直接复用新 token。
    /// 刷新失败会清空存储并进入 `ReauthenticationRequired`。
    pub async fn refresh_with<F, Fut>(&self, stale_generation: u64, reissue: F) -> AppResult<()>
    where
        F: FnOnce(TokenPair) -> Fut,
        Fut: Future<Output = AppResult<TokenPair>>,
    {
        let _guard = self.refresh_lock.lock().await;

        let current = {
            let guard = self.tokens.read().unwrap_or_else(|e| e.into_inner());
            guard.clone()
        };

        if self.generation() != stale_generation {
            return match current {
                Some(_) => Ok(()),
                None => Err(AuthError::ReauthenticationRequired.into()),
            };
        }

        let Some(current) = current else {
            return Err(AuthError::MissingToken.into());
        };

        match reissue(current).await {
            Ok(tokens) => {
                self.replace_tokens(tokens)?;
                info!("🔑 token 刷新成功");
                Ok(())
            }
            Err(e) => {
                warn!("⚠️ token 刷新失败，需要重新登录: {}", e);
                self.invalidate();
                Err(AuthError::ReauthenticationRequired.into())
            }
        }
    }

    /// 刷新后仍然 401，或刷新失败时调用
    pub fn invalidate(&self) {
        if let Err(e) = self.drop_tokens(SessionState::ReauthenticationRequired) {
            warn!("⚠️ 清除 token 失败: {}", e);
        }
    }

    fn replace_tokens(&self, tokens: TokenPair) -> AppResult<()> {
        self.store.save(&tokens)?;
        *self.tokens.write().unwrap_or_else(|e| e.into_inner()) = Some(tokens);
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.state.send_replace(SessionState::Authenticated);
        Ok(())
    }

    fn drop_tokens(&self, next: SessionState) -> AppResult<()> {
        *self.tokens.write().unwrap_or_else(|e| e.into_inner()) = None;
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.state.send_replace(next);
        self.store.clear()
    }
}
