//! 收藏服务 - 业务能力层

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Method;
use tracing::info;

use crate::error::AppResult;
use crate::infrastructure::HttpExecutor;
use crate::models::{PublicQuestion, ScrapBody, ScrapIdsBody};

const SCRAP_PATH: &str = "/api/green-questions/scrap";

#[async_trait]
pub trait ScrapService: Send + Sync {
    /// 收藏的公开题目
    async fn fetch_all(&self) -> AppResult<Vec<PublicQuestion>>;

    /// 收藏一个题目
    async fn add(&self, id: i64) -> AppResult<()>;

    /// 批量取消收藏
    async fn remove(&self, ids: &[i64]) -> AppResult<()>;
}

pub struct HttpScrapService {
    executor: Arc<HttpExecutor>,
}

impl HttpScrapService {
    pub fn new(executor: Arc<HttpExecutor>) -> Self {
        Self { executor }
    }
}

#[async_trait]
impl ScrapService for HttpScrapService {
    async fn fetch_all(&self) -> AppResult<Vec<PublicQuestion>> {
        self.executor.get_json(SCRAP_PATH, &[]).await
    }

    async fn add(&self, id: i64) -> AppResult<()> {
        self.executor
            .send_empty(Method::POST, SCRAP_PATH, Some(&ScrapBody { id }))
            .await?;
        info!("⭐ 已收藏题目: {}", id);
        Ok(())
    }

    async fn remove(&self, ids: &[i64]) -> AppResult<()> {
        if ids.is_empty() {
            return Ok(());
        }

        // 批量取消和收藏共用同一个 POST 接口，靠 `ids` 字段区分
        let body = ScrapIdsBody { ids: ids.to_vec() };
        self.executor
            .send_empty(Method::POST, SCRAP_PATH, Some(&body))
            .await?;
        info!("已取消收藏 {} 个题目", ids.len());
        Ok(())
    }
}
