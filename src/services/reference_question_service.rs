//! 参考题目服务 - 业务能力层
//!
//! 关键词练习里"找题目"页面的分页搜索

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::error::AppResult;
use crate::infrastructure::HttpExecutor;
use crate::models::{Category, Page, ReferenceQuestion};

const REFERENCE_PATH: &str = "/api/questions/reference";

#[async_trait]
pub trait ReferenceQuestionService: Send + Sync {
    /// 分页查询参考题目
    ///
    /// # 参数
    /// - `categories`: 过滤的分类，为空表示全部
    /// - `title`: 标题关键词，为空表示不过滤
    /// - `page`: 页码（从 0 开始）
    async fn fetch_page(
        &self,
        categories: &[Category],
        title: &str,
        page: u32,
    ) -> AppResult<Page<ReferenceQuestion>>;
}

pub struct HttpReferenceQuestionService {
    executor: Arc<HttpExecutor>,
}

impl HttpReferenceQuestionService {
    pub fn new(executor: Arc<HttpExecutor>) -> Self {
        Self { executor }
    }
}

#[async_trait]
impl ReferenceQuestionService for HttpReferenceQuestionService {
    async fn fetch_page(
        &self,
        categories: &[Category],
        title: &str,
        page: u32,
    ) -> AppResult<Page<ReferenceQuestion>> {
        let mut query = vec![("page", page.to_string())];
        if !categories.is_empty() {
            query.push(("categoryId", Category::join_ids(categories)));
        }
        if !title.trim().is_empty() {
            query.push(("title", title.trim().to_string()));
        }

        debug!("查询参考题目: page={} 分类数={}", page, categories.len());
        self.executor.get_json(REFERENCE_PATH, &query).await
    }
}
