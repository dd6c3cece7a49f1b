//! 关键词登记
//!
//! 公开题目的关键词只在本地整理，保存时交还给作答页面一起提交；
//! 私有题目的关键词直接保存到服务端。

use std::sync::Arc;

use futures::future::BoxFuture;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use super::transform::{
    boxed, forward, signal, spawn_screen, DisposeBag, ScreenState, Signal, SignalEmitter,
    ViewModel,
};
use crate::error::AppResult;
use crate::models::PrivateAnswer;
use crate::services::PrivateQuestionService;

pub enum KeywordTarget {
    /// 作答页面已有的关键词
    Public(Vec<String>),
    Private {
        id: i64,
        service: Arc<dyn PrivateQuestionService>,
    },
}

pub struct RegisterKeywordViewModel {
    target: KeywordTarget,
}

pub struct RegisterKeywordInput {
    pub load: Signal<()>,
    /// 输入框当前的文字
    pub keyword: watch::Receiver<String>,
    pub add: Signal<()>,
    /// 要移除的关键词下标
    pub remove: Signal<usize>,
    pub save: Signal<()>,
}

pub struct RegisterKeywordOutput {
    pub keywords: watch::Receiver<Vec<String>>,
    /// 保存成功后的关键词列表
    pub saved: Signal<Vec<String>>,
    pub fail_message: Signal<String>,
    pub bag: DisposeBag,
}

impl RegisterKeywordViewModel {
    pub fn new(target: KeywordTarget) -> Self {
        Self { target }
    }
}

/// 把输入追加到关键词列表；空白或重复的输入不会追加
pub fn push_keyword(keywords: &mut Vec<String>, input: &str) -> bool {
    let keyword = input.trim();
    if keyword.is_empty() || keywords.iter().any(|k| k == keyword) {
        return false;
    }
    keywords.push(keyword.to_string());
    true
}

enum Action {
    Load,
    Add,
    Remove(usize),
    Save,
}

enum Outcome {
    Loaded(AppResult<PrivateAnswer>),
    Saved(Vec<String>, AppResult<()>),
}

struct State {
    private: Option<(i64, Arc<dyn PrivateQuestionService>)>,
    input: watch::Receiver<String>,
    keywords: watch::Sender<Vec<String>>,
    saved: SignalEmitter<Vec<String>>,
    fail: SignalEmitter<String>,
}

impl ScreenState for State {
    type Action = Action;
    type Outcome = Outcome;

    fn on_action(&mut self, action: Action, _busy: bool) -> Option<BoxFuture<'static, Outcome>> {
        match action {
            Action::Add => {
                let text = self.input.borrow().clone();
                self.keywords
                    .send_if_modified(|keywords| push_keyword(keywords, &text));
                None
            }
            Action::Remove(index) => {
                self.keywords.send_if_modified(|keywords| {
                    if index < keywords.len() {
                        keywords.remove(index);
                        true
                    } else {
                        debug!("关键词下标越界: {}", index);
                        false
                    }
                });
                None
            }
            Action::Load => {
                let (id, service) = self.private.clone()?;
                Some(boxed(async move { Outcome::Loaded(service.fetch_one(id).await) }))
            }
            Action::Save => {
                let keywords = self.keywords.borrow().clone();
                match self.private.clone() {
                    Some((id, service)) => Some(boxed(async move {
                        let result = service.update_keywords(id, &keywords).await;
                        Outcome::Saved(keywords, result)
                    })),
                    None => {
                        self.saved.emit(keywords);
                        None
                    }
                }
            }
        }
    }

    fn on_outcome(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Loaded(Ok(answer)) => {
                self.keywords.send_replace(answer.keywords);
            }
            Outcome::Saved(keywords, Ok(())) => {
                info!("✓ 关键词已保存 ({} 个)", keywords.len());
                self.saved.emit(keywords);
            }
            Outcome::Loaded(Err(e)) | Outcome::Saved(_, Err(e)) => {
                warn!("⚠️ 关键词请求失败: {}", e);
                self.fail.emit(e.user_message());
            }
        }
    }
}

impl ViewModel for RegisterKeywordViewModel {
    type Input = RegisterKeywordInput;
    type Output = RegisterKeywordOutput;

    fn transform(self, input: RegisterKeywordInput) -> RegisterKeywordOutput {
        let (initial, private) = match self.target {
            KeywordTarget::Public(keywords) => (keywords, None),
            KeywordTarget::Private { id, service } => (Vec::new(), Some((id, service))),
        };

        let mut bag = DisposeBag::new();
        let (keywords_tx, keywords) = watch::channel(initial);
        let (saved_tx, saved) = signal();
        let (fail, fail_message) = signal();

        let (actions_tx, actions) = signal();
        bag.insert(forward(input.load, actions_tx.clone(), |_| Action::Load));
        bag.insert(forward(input.add, actions_tx.clone(), |_| Action::Add));
        bag.insert(forward(input.remove, actions_tx.clone(), Action::Remove));
        bag.insert(forward(input.save, actions_tx, |_| Action::Save));

        let state = State {
            private,
            input: input.keyword,
            keywords: keywords_tx,
            saved: saved_tx,
            fail,
        };
        bag.insert(spawn_screen(state, actions));

        RegisterKeywordOutput {
            keywords,
            saved,
            fail_message,
            bag,
        }
    }
}
