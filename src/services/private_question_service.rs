//! 私有题目服务 - 业务能力层
//!
//! 对应 `/api/my-questions` 资源：题目、回答、关键词

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Method;
use tracing::info;

use super::{map_delete_error, map_upload_error};
use crate::error::AppResult;
use crate::infrastructure::HttpExecutor;
use crate::models::{
    AnswerBody, Category, KeywordsBody, PrivateAnswer, PrivateQuestion, UploadPrivateQuestion,
};
use crate::utils::truncate_text;

const BASE_PATH: &str = "/api/my-questions";

#[async_trait]
pub trait PrivateQuestionService: Send + Sync {
    /// 创建私有题目
    async fn upload(&self, category: Category, question: &str) -> AppResult<()>;

    /// 修改私有题目
    async fn update(&self, id: i64, category: Category, question: &str) -> AppResult<()>;

    /// 我写的题目列表
    async fn fetch_all(&self) -> AppResult<Vec<PrivateQuestion>>;

    /// 单个题目的回答和关键词
    async fn fetch_one(&self, id: i64) -> AppResult<PrivateAnswer>;

    /// 修改回答
    async fn update_answer(&self, id: i64, answer: &str) -> AppResult<()>;

    /// 覆盖关键词（增删改都走这一个接口）
    async fn update_keywords(&self, id: i64, keywords: &[String]) -> AppResult<()>;

    /// 删除题目
    async fn remove(&self, id: i64) -> AppResult<()>;
}

pub struct HttpPrivateQuestionService {
    executor: Arc<HttpExecutor>,
}

impl HttpPrivateQuestionService {
    pub fn new(executor: Arc<HttpExecutor>) -> Self {
        Self { executor }
    }
}

#[async_trait]
impl PrivateQuestionService for HttpPrivateQuestionService {
    async fn upload(&self, category: Category, question: &str) -> AppResult<()> {
        let body = UploadPrivateQuestion {
            category_id: category,
            question: question.to_string(),
        };

        self.executor
            .send_empty(Method::POST, BASE_PATH, Some(&body))
            .await
            .map_err(map_upload_error)?;

        info!("✓ 私有题目创建成功: {}", truncate_text(question, 30));
        Ok(())
    }

    async fn update(&self, id: i64, category: Category, question: &str) -> AppResult<()> {
        let body = UploadPrivateQuestion {
            category_id: category,
            question: question.to_string(),
        };

        self.executor
            .send_empty(Method::PUT, &format!("{}/{}", BASE_PATH, id), Some(&body))
            .await
            .map_err(map_upload_error)
    }

    async fn fetch_all(&self) -> AppResult<Vec<PrivateQuestion>> {
        self.executor.get_json(BASE_PATH, &[]).await
    }

    async fn fetch_one(&self, id: i64) -> AppResult<PrivateAnswer> {
        self.executor
            .get_json(&format!("{}/{}", BASE_PATH, id), &[])
            .await
    }

    async fn update_answer(&self, id: i64, answer: &str) -> AppResult<()> {
        let body = AnswerBody {
            answer: answer.to_string(),
        };
        self.executor
            .send_empty(Method::PUT, &format!("{}/answer/{}", BASE_PATH, id), Some(&body))
            .await
    }

    async fn update_keywords(&self, id: i64, keywords: &[String]) -> AppResult<()> {
        let body = KeywordsBody {
            keywords: keywords.to_vec(),
        };
        self.executor
            .send_empty(Method::PUT, &format!("{}/answer/{}", BASE_PATH, id), Some(&body))
            .await
    }

    async fn remove(&self, id: i64) -> AppResult<()> {
        self.executor
            .send_empty::<()>(Method::DELETE, &format!("{}/{}", BASE_PATH, id), None)
            .await
            .map_err(map_delete_error)?;

        info!("🗑️ 私有题目已删除: {}", id);
        Ok(())
    }
}
