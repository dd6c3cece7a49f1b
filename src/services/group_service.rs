//! 分组服务 - 业务能力层

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Method;
use tracing::info;

use super::map_group_error;
use crate::error::AppResult;
use crate::infrastructure::HttpExecutor;
use crate::models::{Category, Group, GroupDetail, UpsertGroup};

const BASE_PATH: &str = "/api/groups";

#[async_trait]
pub trait GroupService: Send + Sync {
    async fn fetch_all(&self) -> AppResult<Vec<Group>>;

    async fn fetch_one(&self, id: i64) -> AppResult<GroupDetail>;

    async fn create(&self, name: &str, category: Category) -> AppResult<()>;

    async fn update(&self, id: i64, name: &str, category: Category) -> AppResult<()>;

    async fn remove(&self, id: i64) -> AppResult<()>;
}

pub struct HttpGroupService {
    executor: Arc<HttpExecutor>,
}

impl HttpGroupService {
    pub fn new(executor: Arc<HttpExecutor>) -> Self {
        Self { executor }
    }
}

#[async_trait]
impl GroupService for HttpGroupService {
    async fn fetch_all(&self) -> AppResult<Vec<Group>> {
        self.executor.get_json(BASE_PATH, &[]).await
    }

    async fn fetch_one(&self, id: i64) -> AppResult<GroupDetail> {
        self.executor
            .get_json(&format!("{}/{}", BASE_PATH, id), &[])
            .await
    }

    async fn create(&self, name: &str, category: Category) -> AppResult<()> {
        let body = UpsertGroup {
            name: name.to_string(),
            category_id: category,
        };
        self.executor
            .send_empty(Method::POST, BASE_PATH, Some(&body))
            .await
            .map_err(map_group_error)?;
        info!("📁 分组已创建: {} ({})", name, category);
        Ok(())
    }

    async fn update(&self, id: i64, name: &str, category: Category) -> AppResult<()> {
        let body = UpsertGroup {
            name: name.to_string(),
            category_id: category,
        };
        self.executor
            .send_empty(Method::PUT, &format!("{}/{}", BASE_PATH, id), Some(&body))
            .await
            .map_err(map_group_error)
    }

    async fn remove(&self, id: i64) -> AppResult<()> {
        self.executor
            .send_empty::<()>(Method::DELETE, &format!("{}/{}", BASE_PATH, id), None)
            .await
    }
}
