//! 公开题目服务 - 业务能力层
//!
//! 对应 `/api/green-questions` 资源

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDateTime;
use reqwest::Method;
use tracing::{debug, info};

use super::map_upload_error;
use crate::error::AppResult;
use crate::infrastructure::HttpExecutor;
use crate::models::{
    Category, MyPublicQuestion, Page, PopularPublicQuestion, PublicQuestion, UploadPublicQuestion,
};
use crate::utils::truncate_text;

const BASE_PATH: &str = "/api/green-questions";

#[async_trait]
pub trait PublicQuestionService: Send + Sync {
    /// 按分类查询公开题目
    async fn fetch_filtered(&self, category: Category) -> AppResult<Vec<PublicQuestion>>;

    /// 按关键词搜索公开题目
    async fn search(&self, keyword: &str) -> AppResult<Vec<PublicQuestion>>;

    /// 最近的公开题目
    async fn fetch_recent(&self) -> AppResult<Vec<PublicQuestion>>;

    /// 人气公开题目
    async fn fetch_popular(&self) -> AppResult<Vec<PopularPublicQuestion>>;

    /// 创建公开题目
    async fn upload(
        &self,
        category: Category,
        question: &str,
        expired_at: NaiveDateTime,
    ) -> AppResult<()>;

    /// 我创建的公开题目（分页，从 0 开始）
    async fn fetch_my_public_questions(&self, page: u32) -> AppResult<Page<MyPublicQuestion>>;
}

pub struct HttpPublicQuestionService {
    executor: Arc<HttpExecutor>,
}

impl HttpPublicQuestionService {
    pub fn new(executor: Arc<HttpExecutor>) -> Self {
        Self { executor }
    }
}

#[async_trait]
impl PublicQuestionService for HttpPublicQuestionService {
    async fn fetch_filtered(&self, category: Category) -> AppResult<Vec<PublicQuestion>> {
        debug!("按分类查询公开题目: {}", category);
        self.executor
            .get_json(BASE_PATH, &[("categoryId", category.id().to_string())])
            .await
    }

    async fn search(&self, keyword: &str) -> AppResult<Vec<PublicQuestion>> {
        debug!("搜索公开题目: {}", keyword);
        self.executor
            .get_json(
                &format!("{}/search", BASE_PATH),
                &[("keyword", keyword.to_string())],
            )
            .await
    }

    async fn fetch_recent(&self) -> AppResult<Vec<PublicQuestion>> {
        self.executor
            .get_json(&format!("{}/recent-questions", BASE_PATH), &[])
            .await
    }

    async fn fetch_popular(&self) -> AppResult<Vec<PopularPublicQuestion>> {
        self.executor
            .get_json(&format!("{}/popular-questions", BASE_PATH), &[])
            .await
    }

    async fn upload(
        &self,
        category: Category,
        question: &str,
        expired_at: NaiveDateTime,
    ) -> AppResult<()> {
        let body = UploadPublicQuestion {
            category_id: category,
            question: question.to_string(),
            expired_at,
        };

        self.executor
            .send_empty(Method::POST, BASE_PATH, Some(&body))
            .await
            .map_err(map_upload_error)?;

        info!("✓ 公开题目创建成功: {}", truncate_text(question, 30));
        Ok(())
    }

    async fn fetch_my_public_questions(&self, page: u32) -> AppResult<Page<MyPublicQuestion>> {
        self.executor
            .get_json(
                &format!("{}/create-questions", BASE_PATH),
                &[("page", page.to_string())],
            )
            .await
    }
}
