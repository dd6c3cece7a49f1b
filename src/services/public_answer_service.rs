//! 公开题目作答服务 - 业务能力层

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Method;
use tracing::info;

use crate::error::AppResult;
use crate::infrastructure::HttpExecutor;
use crate::models::ApplyAnswer;

const ANSWER_PATH: &str = "/api/green-questions/answer";

#[async_trait]
pub trait PublicAnswerService: Send + Sync {
    /// 提交回答；关键词为空时只提交回答文本
    async fn apply(&self, id: i64, answer: &str, keywords: &[String]) -> AppResult<()>;
}

pub struct HttpPublicAnswerService {
    executor: Arc<HttpExecutor>,
}

impl HttpPublicAnswerService {
    pub fn new(executor: Arc<HttpExecutor>) -> Self {
        Self { executor }
    }
}

#[async_trait]
impl PublicAnswerService for HttpPublicAnswerService {
    async fn apply(&self, id: i64, answer: &str, keywords: &[String]) -> AppResult<()> {
        let body = ApplyAnswer {
            id,
            answer: answer.to_string(),
            keywords: keywords.to_vec(),
        };

        self.executor
            .send_empty(Method::POST, ANSWER_PATH, Some(&body))
            .await?;
        info!("✓ 公开题目 {} 作答成功 (关键词 {} 个)", id, keywords.len());
        Ok(())
    }
}
