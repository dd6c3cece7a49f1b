//! view model 测试用的内存 service
#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDateTime;
use reqwest::StatusCode;
use tokio::sync::{watch, Notify};

use greenroom_client::error::{AppError, AppResult, QuestionError};
use greenroom_client::error::GroupError;
use greenroom_client::models::{
    Category, Group, GroupDetail, MyPublicQuestion, Page, PopularPublicQuestion, PrivateAnswer,
    PrivateQuestion, PublicQuestion,
};
use greenroom_client::services::{
    GroupService, PrivateQuestionService, PublicAnswerService, PublicQuestionService,
    ScrapService,
};
use greenroom_client::viewmodel::Signal;

/// 让假请求停在半路，直到测试放行
#[derive(Clone, Default)]
pub struct Gate {
    notify: Option<Arc<Notify>>,
}

impl Gate {
    pub fn closed() -> Self {
        Self {
            notify: Some(Arc::new(Notify::new())),
        }
    }

    pub fn open(&self) {
        if let Some(notify) = &self.notify {
            notify.notify_one();
        }
    }

    async fn pass(&self) {
        if let Some(notify) = &self.notify {
            notify.notified().await;
        }
    }
}

pub fn public_question(id: i64, question: &str) -> PublicQuestion {
    PublicQuestion {
        id,
        category_name: Category::Common.name().to_string(),
        question: question.to_string(),
        participants: 0,
        expired_at: None,
    }
}

pub fn my_public_question(id: i64) -> MyPublicQuestion {
    MyPublicQuestion {
        id,
        category_name: Category::Common.name().to_string(),
        question: format!("질문 {}", id),
        participants: 0,
        expired_at: None,
    }
}

pub fn private_answer(id: i64, answer: Option<&str>) -> PrivateAnswer {
    PrivateAnswer {
        id,
        group_category_name: None,
        category_name: Category::Common.name().to_string(),
        question: "자기소개를 해주세요".to_string(),
        answer: answer.map(str::to_string),
        keywords: vec!["협업".to_string()],
    }
}

fn upload_error(status: StatusCode) -> AppError {
    QuestionError::from_upload_status(status).into()
}

/// 等待 watch 值满足条件，超时视为失败
pub async fn wait_until<T, F>(rx: &mut watch::Receiver<T>, predicate: F) -> T
where
    T: Clone,
    F: Fn(&T) -> bool,
{
    tokio::time::timeout(Duration::from_secs(2), async {
        loop {
            if predicate(&rx.borrow_and_update()) {
                return rx.borrow().clone();
            }
            rx.changed().await.expect("输出已关闭");
        }
    })
    .await
    .expect("等待输出超时")
}

// ========== 私有题目 ==========

#[derive(Default)]
pub struct FakePrivateQuestions {
    pub upload_calls: AtomicUsize,
    pub answer_calls: AtomicUsize,
    pub remove_calls: AtomicUsize,
    pub uploads: Mutex<Vec<(Category, String)>>,
    pub answer: Mutex<Option<PrivateAnswer>>,
    pub keywords: Mutex<Vec<String>>,
    pub fail_status: Mutex<Option<StatusCode>>,
    pub gate: Gate,
}

impl FakePrivateQuestions {
    pub fn with_answer(answer: PrivateAnswer) -> Self {
        let fake = Self::default();
        *fake.answer.lock().unwrap() = Some(answer);
        fake
    }

    pub fn failing(status: StatusCode) -> Self {
        let fake = Self::default();
        *fake.fail_status.lock().unwrap() = Some(status);
        fake
    }

    pub fn gated(gate: Gate) -> Self {
        Self {
            gate,
            ..Self::default()
        }
    }

    fn failure(&self) -> Option<StatusCode> {
        *self.fail_status.lock().unwrap()
    }
}

#[async_trait]
impl PrivateQuestionService for FakePrivateQuestions {
    async fn upload(&self, category: Category, question: &str) -> AppResult<()> {
        self.upload_calls.fetch_add(1, Ordering::SeqCst);
        self.gate.pass().await;
        if let Some(status) = self.failure() {
            return Err(upload_error(status));
        }
        self.uploads
            .lock()
            .unwrap()
            .push((category, question.to_string()));
        Ok(())
    }

    async fn update(&self, _id: i64, category: Category, question: &str) -> AppResult<()> {
        self.upload(category, question).await
    }

    async fn fetch_all(&self) -> AppResult<Vec<PrivateQuestion>> {
        Ok(Vec::new())
    }

    async fn fetch_one(&self, id: i64) -> AppResult<PrivateAnswer> {
        self.answer
            .lock()
            .unwrap()
            .clone()
            .filter(|answer| answer.id == id)
            .ok_or_else(|| AppError::bad_status("/api/my-questions", StatusCode::NOT_FOUND))
    }

    async fn update_answer(&self, _id: i64, answer: &str) -> AppResult<()> {
        self.answer_calls.fetch_add(1, Ordering::SeqCst);
        self.gate.pass().await;
        if let Some(status) = self.failure() {
            return Err(AppError::bad_status("/api/my-questions/answer", status));
        }
        if let Some(stored) = self.answer.lock().unwrap().as_mut() {
            stored.answer = Some(answer.to_string());
        }
        Ok(())
    }

    async fn update_keywords(&self, _id: i64, keywords: &[String]) -> AppResult<()> {
        *self.keywords.lock().unwrap() = keywords.to_vec();
        Ok(())
    }

    async fn remove(&self, _id: i64) -> AppResult<()> {
        self.remove_calls.fetch_add(1, Ordering::SeqCst);
        match self.failure() {
            Some(status) => Err(QuestionError::from_delete_status(status).into()),
            None => Ok(()),
        }
    }
}

// ========== 公开题目 ==========

#[derive(Default)]
pub struct FakePublicQuestions {
    pub upload_calls: AtomicUsize,
    pub expiries: Mutex<Vec<NaiveDateTime>>,
    pub recent: Vec<PublicQuestion>,
    pub popular: Vec<PopularPublicQuestion>,
    pub filtered: Mutex<Vec<Category>>,
    /// 按页码返回的分页结果
    pub pages: Vec<Page<MyPublicQuestion>>,
    pub requested_pages: Mutex<Vec<u32>>,
    pub fail_status: Mutex<Option<StatusCode>>,
    pub gate: Gate,
}

impl FakePublicQuestions {
    pub fn fail_with(&self, status: StatusCode) {
        *self.fail_status.lock().unwrap() = Some(status);
    }

    fn check(&self, path: &str) -> AppResult<()> {
        match *self.fail_status.lock().unwrap() {
            Some(status) => Err(AppError::bad_status(path, status)),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl PublicQuestionService for FakePublicQuestions {
    async fn fetch_filtered(&self, category: Category) -> AppResult<Vec<PublicQuestion>> {
        self.filtered.lock().unwrap().push(category);
        self.check("/api/green-questions/filter")?;
        Ok(self.recent.clone())
    }

    async fn search(&self, keyword: &str) -> AppResult<Vec<PublicQuestion>> {
        self.check("/api/green-questions/search")?;
        Ok(self
            .recent
            .iter()
            .filter(|q| q.question.contains(keyword))
            .cloned()
            .collect())
    }

    async fn fetch_recent(&self) -> AppResult<Vec<PublicQuestion>> {
        Ok(self.recent.clone())
    }

    async fn fetch_popular(&self) -> AppResult<Vec<PopularPublicQuestion>> {
        Ok(self.popular.clone())
    }

    async fn upload(
        &self,
        _category: Category,
        _question: &str,
        expired_at: NaiveDateTime,
    ) -> AppResult<()> {
        self.upload_calls.fetch_add(1, Ordering::SeqCst);
        self.gate.pass().await;
        if let Some(status) = *self.fail_status.lock().unwrap() {
            return Err(upload_error(status));
        }
        self.expiries.lock().unwrap().push(expired_at);
        Ok(())
    }

    async fn fetch_my_public_questions(&self, page: u32) -> AppResult<Page<MyPublicQuestion>> {
        self.requested_pages.lock().unwrap().push(page);
        self.gate.pass().await;
        if let Some(status) = *self.fail_status.lock().unwrap() {
            return Err(AppError::bad_status("/api/green-questions/create-questions", status));
        }
        self.pages
            .get(page as usize)
            .cloned()
            .ok_or_else(|| AppError::bad_status("/api/green-questions/create-questions", StatusCode::NOT_FOUND))
    }
}

// ========== 收藏 ==========

#[derive(Default)]
pub struct FakeScraps {
    /// 可以被收藏的全部题目
    pub catalog: Vec<PublicQuestion>,
    pub scrapped: Mutex<Vec<i64>>,
    pub remove_calls: AtomicUsize,
    pub fail_status: Mutex<Option<StatusCode>>,
}

impl FakeScraps {
    pub fn new(catalog: Vec<PublicQuestion>, scrapped: Vec<i64>) -> Self {
        Self {
            catalog,
            scrapped: Mutex::new(scrapped),
            ..Self::default()
        }
    }

    pub fn ids(&self) -> Vec<i64> {
        let mut ids = self.scrapped.lock().unwrap().clone();
        ids.sort_unstable();
        ids
    }

    fn check(&self) -> AppResult<()> {
        match *self.fail_status.lock().unwrap() {
            Some(status) => Err(AppError::bad_status("/api/green-questions/scrap", status)),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl ScrapService for FakeScraps {
    async fn fetch_all(&self) -> AppResult<Vec<PublicQuestion>> {
        self.check()?;
        let ids = self.scrapped.lock().unwrap().clone();
        Ok(self
            .catalog
            .iter()
            .filter(|q| ids.contains(&q.id))
            .cloned()
            .collect())
    }

    async fn add(&self, id: i64) -> AppResult<()> {
        self.check()?;
        let mut scrapped = self.scrapped.lock().unwrap();
        if !scrapped.contains(&id) {
            scrapped.push(id);
        }
        Ok(())
    }

    async fn remove(&self, ids: &[i64]) -> AppResult<()> {
        self.remove_calls.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        self.scrapped.lock().unwrap().retain(|id| !ids.contains(id));
        Ok(())
    }
}

// ========== 公开题目作答 ==========

#[derive(Default)]
pub struct FakePublicAnswers {
    pub applied: Mutex<Vec<(i64, String, Vec<String>)>>,
    pub fail_status: Mutex<Option<StatusCode>>,
}

#[async_trait]
impl PublicAnswerService for FakePublicAnswers {
    async fn apply(&self, id: i64, answer: &str, keywords: &[String]) -> AppResult<()> {
        if let Some(status) = *self.fail_status.lock().unwrap() {
            return Err(AppError::bad_status("/api/green-questions/answer", status));
        }
        self.applied
            .lock()
            .unwrap()
            .push((id, answer.to_string(), keywords.to_vec()));
        Ok(())
    }
}

// ========== 分组 ==========

#[derive(Default)]
pub struct FakeGroups {
    pub detail: Option<GroupDetail>,
    pub saves: Mutex<Vec<(Option<i64>, String, Category)>>,
    pub save_calls: AtomicUsize,
    pub fail_status: Mutex<Option<StatusCode>>,
    pub gate: Gate,
}

impl FakeGroups {
    async fn save(&self, id: Option<i64>, name: &str, category: Category) -> AppResult<()> {
        self.save_calls.fetch_add(1, Ordering::SeqCst);
        self.gate.pass().await;
        if let Some(status) = *self.fail_status.lock().unwrap() {
            return Err(GroupError::from_upsert_status(status).into());
        }
        self.saves
            .lock()
            .unwrap()
            .push((id, name.to_string(), category));
        Ok(())
    }
}

#[async_trait]
impl GroupService for FakeGroups {
    async fn fetch_all(&self) -> AppResult<Vec<Group>> {
        Ok(Vec::new())
    }

    async fn fetch_one(&self, id: i64) -> AppResult<GroupDetail> {
        self.detail
            .clone()
            .filter(|detail| detail.id == id)
            .ok_or_else(|| AppError::bad_status("/api/groups", StatusCode::NOT_FOUND))
    }

    async fn create(&self, name: &str, category: Category) -> AppResult<()> {
        self.save(None, name, category).await
    }

    async fn update(&self, id: i64, name: &str, category: Category) -> AppResult<()> {
        self.save(Some(id), name, category).await
    }

    async fn remove(&self, _id: i64) -> AppResult<()> {
        Ok(())
    }
}

/// 等待下一条一次性信号，超时视为失败
pub async fn next_signal<T>(signal: &mut Signal<T>) -> T {
    tokio::time::timeout(Duration::from_secs(2), signal.next())
        .await
        .expect("等待信号超时")
        .expect("信号已关闭")
}

/// 给驱动任务留出处理时间，用于断言"什么都没发生"
pub async fn settle() {
    tokio::time::sleep(Duration::from_millis(50)).await;
}
