//! 公开题目作答

use std::sync::Arc;

use futures::future::BoxFuture;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use super::mode::{advance, AnswerEvent, AnswerMode};
use super::transform::{
    boxed, forward, signal, spawn_screen, DisposeBag, ScreenState, Signal, SignalEmitter,
    ViewModel,
};
use crate::error::AppResult;
use crate::models::Answer;
use crate::services::PublicAnswerService;

pub const ANSWER_APPLIED_MESSAGE: &str = "답변이 등록되었어요!";

pub struct PublicAnswerViewModel {
    id: i64,
    is_owner: bool,
    answer: Option<Answer>,
    service: Arc<dyn PublicAnswerService>,
}

pub struct PublicAnswerInput {
    pub start_answering: Signal<()>,
    pub edit: Signal<()>,
    pub text: watch::Receiver<String>,
    pub keywords: watch::Receiver<Vec<String>>,
    pub done: Signal<()>,
}

pub struct PublicAnswerOutput {
    pub mode: watch::Receiver<AnswerMode>,
    /// 已提交的关键词
    pub keywords: watch::Receiver<Vec<String>>,
    pub success_message: Signal<String>,
    pub fail_message: Signal<String>,
    pub bag: DisposeBag,
}

impl PublicAnswerViewModel {
    /// `answer` 为进入页面时已有的回答，没有回答时传 `None`
    pub fn new(
        id: i64,
        is_owner: bool,
        answer: Option<Answer>,
        service: Arc<dyn PublicAnswerService>,
    ) -> Self {
        Self {
            id,
            is_owner,
            answer,
            service,
        }
    }
}

enum Action {
    StartAnswering,
    Edit,
    Done,
}

struct State {
    id: i64,
    is_owner: bool,
    service: Arc<dyn PublicAnswerService>,
    text: watch::Receiver<String>,
    keywords_in: watch::Receiver<Vec<String>>,
    mode: watch::Sender<AnswerMode>,
    keywords: watch::Sender<Vec<String>>,
    success: SignalEmitter<String>,
    fail: SignalEmitter<String>,
}

type Applied = (Answer, AppResult<()>);

impl ScreenState for State {
    type Action = Action;
    type Outcome = Applied;

    fn on_action(&mut self, action: Action, busy: bool) -> Option<BoxFuture<'static, Applied>> {
        match action {
            Action::StartAnswering => {
                advance(&self.mode, AnswerEvent::StartAnswering);
                None
            }
            Action::Edit => {
                if !advance(&self.mode, AnswerEvent::Edit { is_owner: self.is_owner }) {
                    debug!("题目 {} 不可编辑 (owner={})", self.id, self.is_owner);
                }
                None
            }
            Action::Done => {
                if !self.mode.borrow().is_editing() || busy {
                    return None;
                }
                let answer = Answer {
                    answer: self.text.borrow().trim().to_string(),
                    keywords: self.keywords_in.borrow().clone(),
                };
                if answer.answer.is_empty() {
                    self.fail
                        .emit(super::private_answer::EMPTY_ANSWER_MESSAGE.to_string());
                    return None;
                }

                let service = self.service.clone();
                let id = self.id;
                Some(boxed(async move {
                    let result = service.apply(id, &answer.answer, &answer.keywords).await;
                    (answer, result)
                }))
            }
        }
    }

    fn on_outcome(&mut self, (answer, result): Applied) {
        match result {
            Ok(()) => {
                info!("✓ 公开题目 {} 回答已提交", self.id);
                self.keywords.send_replace(answer.keywords);
                advance(&self.mode, AnswerEvent::SubmitSucceeded(answer.answer));
                self.success.emit(ANSWER_APPLIED_MESSAGE.to_string());
            }
            Err(e) => {
                advance(&self.mode, AnswerEvent::SubmitFailed);
                warn!("⚠️ 公开题目 {} 回答提交失败: {}", self.id, e);
                self.fail.emit(e.user_message());
            }
        }
    }
}

impl ViewModel for PublicAnswerViewModel {
    type Input = PublicAnswerInput;
    type Output = PublicAnswerOutput;

    fn transform(self, input: PublicAnswerInput) -> PublicAnswerOutput {
        let mut bag = DisposeBag::new();
        let initial_mode = AnswerMode::from_answer(self.answer.as_ref().map(|a| a.answer.as_str()));
        let initial_keywords = self.answer.map(|a| a.keywords).unwrap_or_default();
        let (mode_tx, mode) = watch::channel(initial_mode);
        let (keywords_tx, keywords) = watch::channel(initial_keywords);
        let (success, success_message) = signal();
        let (fail, fail_message) = signal();

        let (actions_tx, actions) = signal();
        bag.insert(forward(input.start_answering, actions_tx.clone(), |_| {
            Action::StartAnswering
        }));
        bag.insert(forward(input.edit, actions_tx.clone(), |_| Action::Edit));
        bag.insert(forward(input.done, actions_tx, |_| Action::Done));

        let state = State {
            id: self.id,
            is_owner: self.is_owner,
            service: self.service,
            text: input.text,
            keywords_in: input.keywords,
            mode: mode_tx,
            keywords: keywords_tx,
            success,
            fail,
        };
        bag.insert(spawn_screen(state, actions));

        PublicAnswerOutput {
            mode,
            keywords,
            success_message,
            fail_message,
            bag,
        }
    }
}
