//! HTTP 执行器 - 基础设施层
//!
//! 持有唯一的 reqwest Client 和会话，只暴露"发请求"的能力

use std::sync::Arc;
use std::time::Duration;

use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use super::session::Session;
use super::token_store::{TokenPair, TokenPayload};
use crate::config::Config;
use crate::error::{ApiError, AppError, AppResult, AuthError};

/// token 刷新接口
pub const REISSUE_PATH: &str = "/api/auth/reissue";

/// HTTP 执行器
///
/// 职责：
/// - 持有唯一的 reqwest Client
/// - 给每个请求加上 Bearer token
/// - 401 时刷新 token 并重试一次
/// - 把传输 / 状态码 / 解析失败统一转换成 `ApiError`
/// - 不认识 Question / Group 等业务类型
pub struct HttpExecutor {
    client: reqwest::Client,
    base_url: String,
    session: Arc<Session>,
}

impl HttpExecutor {
    /// 创建新的 HTTP 执行器
    pub fn new(config: &Config, session: Arc<Session>) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| AppError::api_request_failed("client", e))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            session,
        })
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    /// GET 并解析 JSON
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> AppResult<T> {
        let bytes = self
            .execute::<()>(Method::GET, path, query, None)
            .await?;
        decode(path, &bytes)
    }

    /// 发送 JSON 请求体并解析 JSON 响应
    pub async fn send_json<B: Serialize, T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> AppResult<T> {
        let bytes = self.execute(method, path, &[], Some(body)).await?;
        decode(path, &bytes)
    }

    /// 发送请求，忽略响应内容
    pub async fn send_empty<B: Serialize>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> AppResult<()> {
        self.execute(method, path, &[], body).await.map(|_| ())
    }

    /// 执行请求
    ///
    /// # 参数
    /// - `method`: HTTP 方法
    /// - `path`: 以 `/` 开头的接口路径
    /// - `query`: 查询参数
    /// - `body`: JSON 请求体（可选）
    ///
    /// # 返回
    /// 2xx 时返回响应体
    async fn execute<B: Serialize>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<&B>,
    ) -> AppResult<Vec<u8>> {
        let token = self
            .session
            .access_token()
            .ok_or(AuthError::MissingToken)?;

        debug!("➡️ {} {}", method, path);
        let response = self
            .send_once(method.clone(), path, query, body, &token.token)
            .await?;

        let response = if response.status() == StatusCode::UNAUTHORIZED {
            warn!("🔑 {} {} 返回 401，尝试刷新 token", method, path);
            self.session
                .refresh_with(token.generation, |tokens| self.reissue(tokens))
                .await?;

            let fresh = self
                .session
                .access_token()
                .ok_or(AuthError::ReauthenticationRequired)?;
            let retried = self
                .send_once(method.clone(), path, query, body, &fresh.token)
                .await?;

            if retried.status() == StatusCode::UNAUTHORIZED {
                warn!("⚠️ 刷新后仍然 401，需要重新登录");
                self.session.invalidate();
                return Err(AuthError::ReauthenticationRequired.into());
            }
            retried
        } else {
            response
        };

        let status = response.status();
        if !status.is_success() {
            debug!("⬅️ {} {} 状态码 {}", method, path, status);
            return Err(AppError::bad_status(path, status));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| AppError::api_request_failed(path, e))?;
        debug!("⬅️ {} {} ({} bytes)", method, path, bytes.len());
        Ok(bytes.to_vec())
    }

    async fn send_once<B: Serialize>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<&B>,
        token: &str,
    ) -> AppResult<reqwest::Response> {
        let mut request = self
            .client
            .request(method, self.url(path))
            .bearer_auth(token);
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        request
            .send()
            .await
            .map_err(|e| AppError::api_request_failed(path, e))
    }

    /// 调用 reissue 接口换取新 token（不带 Authorization，不走 401 重试）
    async fn reissue(&self, tokens: TokenPair) -> AppResult<TokenPair> {
        let response = self
            .client
            .post(self.url(REISSUE_PATH))
            .json(&TokenPayload::from(&tokens))
            .send()
            .await
            .map_err(|e| AppError::api_request_failed(REISSUE_PATH, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AuthError::RefreshFailed {
                reason: format!("状态码 {}", status),
            }
            .into());
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| AppError::api_request_failed(REISSUE_PATH, e))?;
        let payload: TokenPayload = decode(REISSUE_PATH, &bytes)?;
        Ok(payload.into())
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

fn decode<T: DeserializeOwned>(path: &str, bytes: &[u8]) -> AppResult<T> {
    serde_json::from_slice(bytes).map_err(|source| {
        ApiError::JsonParseFailed {
            endpoint: path.to_string(),
            source,
        }
        .into()
    })
}
