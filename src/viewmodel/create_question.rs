//! 创建题目页面（私有题目 / 公开그린룸题目）

use std::sync::Arc;

use chrono::{Duration, Local, NaiveDateTime};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use super::transform::{
    boxed, combine_latest, signal, spawn_action, DisposeBag, FlatMapPolicy, Signal, ViewModel,
};
use crate::error::{AppResult, BusinessError};
use crate::models::Category;
use crate::services::{PrivateQuestionService, PublicQuestionService};
use crate::utils::truncate_text;

/// 输入框占位文字，与空文本一样视为未输入
pub const QUESTION_PLACEHOLDER: &str = "면접자 분들은 나에게 어떤 질문을 줄까요?";
pub const CREATE_SUCCESS_MESSAGE: &str = "질문 작성이 완료되었어요!";
/// 公开题目默认的开放时长（分钟）
pub const DEFAULT_EXPIRY_MINUTES: i64 = 60 * 24;

/// 题目要提交到哪里
#[derive(Clone)]
pub enum QuestionTarget {
    Private(Arc<dyn PrivateQuestionService>),
    Public(Arc<dyn PublicQuestionService>),
}

pub struct CreateQuestionViewModel {
    target: QuestionTarget,
}

pub struct CreateQuestionInput {
    pub question: watch::Receiver<String>,
    pub category: watch::Receiver<Option<Category>>,
    pub submit: Signal<()>,
    /// 公开题目的开放时长（分钟），为 `None` 时使用一天
    pub expiry_minutes: Option<watch::Receiver<i64>>,
}

pub struct CreateQuestionOutput {
    pub is_valid: watch::Receiver<bool>,
    pub success_message: Signal<String>,
    pub fail_message: Signal<String>,
    pub bag: DisposeBag,
}

impl CreateQuestionViewModel {
    pub fn new(target: QuestionTarget) -> Self {
        Self { target }
    }

    /// 文本非空、不是占位文字、且已选分类
    pub fn is_valid(question: &str, category: Option<Category>) -> bool {
        let text = question.trim();
        !text.is_empty() && text != QUESTION_PLACEHOLDER && category.is_some()
    }

    /// 根据开放时长计算过期时间
    pub fn expiry_from_now(minutes: i64) -> NaiveDateTime {
        (Local::now() + Duration::minutes(minutes)).naive_local()
    }
}

impl ViewModel for CreateQuestionViewModel {
    type Input = CreateQuestionInput;
    type Output = CreateQuestionOutput;

    fn transform(self, input: CreateQuestionInput) -> CreateQuestionOutput {
        let mut bag = DisposeBag::new();
        let (success_tx, success_message) = signal();
        let (fail_tx, fail_message) = signal();

        let (is_valid, handle) = combine_latest(
            input.question.clone(),
            input.category.clone(),
            |question: &String, category: &Option<Category>| Self::is_valid(question, *category),
        );
        bag.insert(handle);

        let question = input.question;
        let category = input.category;
        let expiry = input.expiry_minutes;
        let target = self.target;

        let handle = spawn_action(
            input.submit,
            FlatMapPolicy::Exhaust,
            move |_| {
                let text = question.borrow().trim().to_string();
                let selected = *category.borrow();
                let minutes = expiry
                    .as_ref()
                    .map(|rx| *rx.borrow())
                    .unwrap_or(DEFAULT_EXPIRY_MINUTES);
                let target = target.clone();

                boxed(async move {
                    let category = match validate_question(&text, selected) {
                        Ok(category) => category,
                        Err(e) => {
                            debug!("跳过提交: {}", e);
                            return None;
                        }
                    };

                    info!("📤 提交题目 [{}]: {}", category, truncate_text(&text, 30));
                    let result: AppResult<()> = match target {
                        QuestionTarget::Private(service) => service.upload(category, &text).await,
                        QuestionTarget::Public(service) => {
                            service
                                .upload(category, &text, Self::expiry_from_now(minutes))
                                .await
                        }
                    };
                    Some(result)
                })
            },
            move |result| match result {
                Some(Ok(())) => success_tx.emit(CREATE_SUCCESS_MESSAGE.to_string()),
                Some(Err(e)) => {
                    warn!("⚠️ 题目提交失败: {}", e);
                    fail_tx.emit(e.user_message());
                }
                None => {}
            },
        );
        bag.insert(handle);

        CreateQuestionOutput {
            is_valid,
            success_message,
            fail_message,
            bag,
        }
    }
}

/// 提交前的本地校验
pub fn validate_question(question: &str, category: Option<Category>) -> Result<Category, BusinessError> {
    match category {
        Some(category) if CreateQuestionViewModel::is_valid(question, Some(category)) => Ok(category),
        Some(_) => Err(BusinessError::InvalidInput("질문을 입력해주세요.".to_string())),
        None => Err(BusinessError::InvalidInput("카테고리를 선택해주세요.".to_string())),
    }
}
