//! 我的题目详情：查看、撰写、修改回答，删除题目

use std::sync::Arc;

use futures::future::BoxFuture;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use super::mode::{advance, AnswerEvent, AnswerMode};
use super::transform::{
    boxed, forward, signal, spawn_screen, DisposeBag, ScreenState, Signal, SignalEmitter,
    ViewModel,
};
use crate::error::{AppResult, REQUEST_IN_PROGRESS_MESSAGE};
use crate::models::PrivateAnswer;
use crate::services::PrivateQuestionService;
use crate::utils::truncate_text;

pub const ANSWER_SAVED_MESSAGE: &str = "답변이 저장되었어요!";
pub const EMPTY_ANSWER_MESSAGE: &str = "답변을 입력해주세요.";

pub struct PrivateAnswerViewModel {
    id: i64,
    service: Arc<dyn PrivateQuestionService>,
}

pub struct PrivateAnswerInput {
    pub load: Signal<()>,
    pub start_answering: Signal<()>,
    pub edit: Signal<()>,
    pub text: watch::Receiver<String>,
    pub done: Signal<()>,
    /// 删除确认框的结果，`false` 表示取消
    pub delete: Signal<bool>,
}

pub struct PrivateAnswerOutput {
    pub answer: watch::Receiver<Option<PrivateAnswer>>,
    pub mode: watch::Receiver<AnswerMode>,
    pub success_message: Signal<String>,
    pub fail_message: Signal<String>,
    /// 删除成功，页面应当关闭
    pub dismissed: Signal<()>,
    pub bag: DisposeBag,
}

impl PrivateAnswerViewModel {
    pub fn new(id: i64, service: Arc<dyn PrivateQuestionService>) -> Self {
        Self { id, service }
    }
}

enum Action {
    Load,
    StartAnswering,
    Edit,
    Done,
    Delete(bool),
}

enum Outcome {
    Loaded(AppResult<PrivateAnswer>),
    Submitted(String, AppResult<()>),
    Deleted(AppResult<()>),
}

struct State {
    id: i64,
    service: Arc<dyn PrivateQuestionService>,
    text: watch::Receiver<String>,
    answer: watch::Sender<Option<PrivateAnswer>>,
    mode: watch::Sender<AnswerMode>,
    success: SignalEmitter<String>,
    fail: SignalEmitter<String>,
    dismissed: SignalEmitter<()>,
}

impl ScreenState for State {
    type Action = Action;
    type Outcome = Outcome;

    fn on_action(&mut self, action: Action, busy: bool) -> Option<BoxFuture<'static, Outcome>> {
        let service = self.service.clone();
        let id = self.id;

        match action {
            Action::StartAnswering => {
                advance(&self.mode, AnswerEvent::StartAnswering);
                None
            }
            // 私有题目只有作者本人能看到
            Action::Edit => {
                advance(&self.mode, AnswerEvent::Edit { is_owner: true });
                None
            }
            Action::Load => Some(boxed(async move { Outcome::Loaded(service.fetch_one(id).await) })),
            Action::Done => {
                if !self.mode.borrow().is_editing() {
                    debug!("不在编辑状态，忽略提交");
                    return None;
                }
                let text = self.text.borrow().trim().to_string();
                if text.is_empty() {
                    self.fail.emit(EMPTY_ANSWER_MESSAGE.to_string());
                    return None;
                }
                if busy {
                    return None;
                }
                info!("📝 保存回答 [{}]: {}", id, truncate_text(&text, 30));
                Some(boxed(async move {
                    let result = service.update_answer(id, &text).await;
                    Outcome::Submitted(text, result)
                }))
            }
            Action::Delete(false) => None,
            Action::Delete(true) if busy => {
                warn!("⚠️ 题目 {} 还有请求未完成，删除被拒绝", id);
                self.fail.emit(REQUEST_IN_PROGRESS_MESSAGE.to_string());
                None
            }
            Action::Delete(true) => {
                Some(boxed(async move { Outcome::Deleted(service.remove(id).await) }))
            }
        }
    }

    fn on_outcome(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Loaded(Ok(answer)) => {
                // 编辑中途重新加载不能打断输入
                if !self.mode.borrow().is_editing() {
                    self.mode
                        .send_replace(AnswerMode::from_answer(answer.written_answer()));
                }
                self.answer.send_replace(Some(answer));
            }
            Outcome::Submitted(text, Ok(())) => {
                self.answer.send_modify(|answer| {
                    if let Some(answer) = answer {
                        answer.answer = Some(text.clone());
                    }
                });
                advance(&self.mode, AnswerEvent::SubmitSucceeded(text));
                self.success.emit(ANSWER_SAVED_MESSAGE.to_string());
            }
            Outcome::Submitted(_, Err(e)) => {
                advance(&self.mode, AnswerEvent::SubmitFailed);
                warn!("⚠️ 回答保存失败: {}", e);
                self.fail.emit(e.user_message());
            }
            Outcome::Deleted(Ok(())) => {
                advance(&self.mode, AnswerEvent::DeleteSucceeded);
                info!("🗑️ 题目 {} 已删除", self.id);
                self.dismissed.emit(());
            }
            Outcome::Loaded(Err(e)) | Outcome::Deleted(Err(e)) => {
                warn!("⚠️ 题目 {} 请求失败: {}", self.id, e);
                self.fail.emit(e.user_message());
            }
        }
    }
}

impl ViewModel for PrivateAnswerViewModel {
    type Input = PrivateAnswerInput;
    type Output = PrivateAnswerOutput;

    fn transform(self, input: PrivateAnswerInput) -> PrivateAnswerOutput {
        let mut bag = DisposeBag::new();
        let (answer_tx, answer) = watch::channel(None);
        let (mode_tx, mode) = watch::channel(AnswerMode::Unwritten);
        let (success, success_message) = signal();
        let (fail, fail_message) = signal();
        let (dismissed_tx, dismissed) = signal();

        let (actions_tx, actions) = signal();
        bag.insert(forward(input.load, actions_tx.clone(), |_| Action::Load));
        bag.insert(forward(input.start_answering, actions_tx.clone(), |_| {
            Action::StartAnswering
        }));
        bag.insert(forward(input.edit, actions_tx.clone(), |_| Action::Edit));
        bag.insert(forward(input.done, actions_tx.clone(), |_| Action::Done));
        bag.insert(forward(input.delete, actions_tx, Action::Delete));

        let state = State {
            id: self.id,
            service: self.service,
            text: input.text,
            answer: answer_tx,
            mode: mode_tx,
            success,
            fail,
            dismissed: dismissed_tx,
        };
        bag.insert(spawn_screen(state, actions));

        PrivateAnswerOutput {
            answer,
            mode,
            success_message,
            fail_message,
            dismissed,
            bag,
        }
    }
}
