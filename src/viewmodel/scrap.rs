//! 收藏夹
//!
//! 列表里的每个 cell 通过 `QuestionCellDelegate` 把点击和删除交给 view model，
//! 编辑模式下点击是勾选，普通模式下点击是打开详情。

use std::collections::BTreeSet;
use std::sync::Arc;

use futures::future::BoxFuture;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use super::transform::{
    boxed, forward, signal, spawn_screen, DisposeBag, ScreenState, Signal, SignalEmitter,
    ViewModel,
};
use crate::error::{AppResult, REQUEST_IN_PROGRESS_MESSAGE};
use crate::models::PublicQuestion;
use crate::services::ScrapService;

/// 题目 cell 的回调
pub trait QuestionCellDelegate: Send + Sync {
    fn on_select(&self, id: i64);
    fn on_delete(&self, id: i64);
}

pub struct ScrapViewModel {
    service: Arc<dyn ScrapService>,
}

pub struct ScrapInput {
    pub load: Signal<()>,
    pub toggle_edit: Signal<()>,
    pub delete_selected: Signal<()>,
    /// 详情页的收藏按钮：未收藏则收藏，已收藏则取消
    pub toggle_scrap: Signal<i64>,
}

pub struct ScrapOutput {
    pub questions: watch::Receiver<Vec<PublicQuestion>>,
    pub scrapped: watch::Receiver<BTreeSet<i64>>,
    pub is_editing: watch::Receiver<bool>,
    pub selection: watch::Receiver<BTreeSet<i64>>,
    /// 普通模式下点击的题目
    pub opened: Signal<i64>,
    pub fail_message: Signal<String>,
    pub cell_delegate: Arc<dyn QuestionCellDelegate>,
    pub bag: DisposeBag,
}

impl ScrapViewModel {
    pub fn new(service: Arc<dyn ScrapService>) -> Self {
        Self { service }
    }
}

enum Action {
    Load,
    ToggleEdit,
    DeleteSelected,
    ToggleScrap(i64),
    Select(i64),
    Delete(i64),
}

enum Outcome {
    Loaded(AppResult<Vec<PublicQuestion>>),
    Toggled(i64, AppResult<Vec<PublicQuestion>>),
    Removed(Vec<i64>, AppResult<()>),
}

struct CellHandle {
    actions: SignalEmitter<Action>,
}

impl QuestionCellDelegate for CellHandle {
    fn on_select(&self, id: i64) {
        self.actions.emit(Action::Select(id));
    }

    fn on_delete(&self, id: i64) {
        self.actions.emit(Action::Delete(id));
    }
}

struct State {
    service: Arc<dyn ScrapService>,
    /// 收藏列表是否已经从服务端拿到过
    loaded: bool,
    questions: watch::Sender<Vec<PublicQuestion>>,
    scrapped: watch::Sender<BTreeSet<i64>>,
    is_editing: watch::Sender<bool>,
    selection: watch::Sender<BTreeSet<i64>>,
    opened: SignalEmitter<i64>,
    fail: SignalEmitter<String>,
}

impl State {
    fn remove(&self, ids: Vec<i64>) -> BoxFuture<'static, Outcome> {
        let service = self.service.clone();
        boxed(async move {
            let result = service.remove(&ids).await;
            Outcome::Removed(ids, result)
        })
    }

    fn replace_list(&mut self, list: Vec<PublicQuestion>) {
        self.loaded = true;
        self.scrapped
            .send_replace(list.iter().map(|q| q.id).collect());
        self.questions.send_replace(list);
    }
}

impl ScreenState for State {
    type Action = Action;
    type Outcome = Outcome;

    fn on_action(&mut self, action: Action, busy: bool) -> Option<BoxFuture<'static, Outcome>> {
        match action {
            Action::Load => {
                let service = self.service.clone();
                Some(boxed(async move { Outcome::Loaded(service.fetch_all().await) }))
            }
            Action::ToggleEdit => {
                let editing = !*self.is_editing.borrow();
                self.is_editing.send_replace(editing);
                if !editing {
                    self.selection.send_replace(BTreeSet::new());
                }
                None
            }
            Action::Select(id) => {
                if *self.is_editing.borrow() {
                    self.selection.send_modify(|selection| {
                        if !selection.remove(&id) {
                            selection.insert(id);
                        }
                    });
                } else {
                    self.opened.emit(id);
                }
                None
            }
            Action::Delete(_) | Action::DeleteSelected if busy => {
                self.fail.emit(REQUEST_IN_PROGRESS_MESSAGE.to_string());
                None
            }
            Action::Delete(id) => Some(self.remove(vec![id])),
            Action::DeleteSelected => {
                let ids: Vec<i64> = self.selection.borrow().iter().copied().collect();
                if ids.is_empty() {
                    debug!("没有选中的收藏");
                    return None;
                }
                Some(self.remove(ids))
            }
            Action::ToggleScrap(id) => {
                if self.loaded && self.scrapped.borrow().contains(&id) {
                    return Some(self.remove(vec![id]));
                }
                let service = self.service.clone();
                let loaded = self.loaded;
                Some(boxed(async move {
                    Outcome::Toggled(id, toggle_remote(service, id, loaded).await)
                }))
            }
        }
    }

    fn on_outcome(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Loaded(Ok(list)) => self.replace_list(list),
            Outcome::Toggled(id, Ok(list)) => {
                info!("⭐ 题目 {} 收藏状态已切换", id);
                self.replace_list(list);
            }
            Outcome::Removed(ids, Ok(())) => {
                info!("🗑️ 已取消收藏 {:?}", ids);
                self.questions
                    .send_modify(|list| list.retain(|q| !ids.contains(&q.id)));
                self.scrapped.send_modify(|set| {
                    for id in &ids {
                        set.remove(id);
                    }
                });
                self.selection.send_modify(|selection| {
                    for id in &ids {
                        selection.remove(id);
                    }
                });
            }
            Outcome::Loaded(Err(e)) | Outcome::Toggled(_, Err(e)) | Outcome::Removed(_, Err(e)) => {
                warn!("⚠️ 收藏请求失败: {}", e);
                self.fail.emit(e.user_message());
            }
        }
    }
}

/// 切换收藏后重新拉取列表
///
/// 本地列表还没加载时以服务端的收藏状态为准。
async fn toggle_remote(
    service: Arc<dyn ScrapService>,
    id: i64,
    loaded: bool,
) -> AppResult<Vec<PublicQuestion>> {
    let scrapped = if loaded {
        false
    } else {
        service.fetch_all().await?.iter().any(|q| q.id == id)
    };
    if scrapped {
        service.remove(&[id]).await?;
    } else {
        service.add(id).await?;
    }
    service.fetch_all().await
}

impl ViewModel for ScrapViewModel {
    type Input = ScrapInput;
    type Output = ScrapOutput;

    fn transform(self, input: ScrapInput) -> ScrapOutput {
        let mut bag = DisposeBag::new();
        let (questions_tx, questions) = watch::channel(Vec::new());
        let (scrapped_tx, scrapped) = watch::channel(BTreeSet::new());
        let (editing_tx, is_editing) = watch::channel(false);
        let (selection_tx, selection) = watch::channel(BTreeSet::new());
        let (opened_tx, opened) = signal();
        let (fail, fail_message) = signal();

        let (actions_tx, actions) = signal();
        bag.insert(forward(input.load, actions_tx.clone(), |_| Action::Load));
        bag.insert(forward(input.toggle_edit, actions_tx.clone(), |_| {
            Action::ToggleEdit
        }));
        bag.insert(forward(input.delete_selected, actions_tx.clone(), |_| {
            Action::DeleteSelected
        }));
        bag.insert(forward(
            input.toggle_scrap,
            actions_tx.clone(),
            Action::ToggleScrap,
        ));
        let cell_delegate: Arc<dyn QuestionCellDelegate> = Arc::new(CellHandle {
            actions: actions_tx,
        });

        let state = State {
            service: self.service,
            loaded: false,
            questions: questions_tx,
            scrapped: scrapped_tx,
            is_editing: editing_tx,
            selection: selection_tx,
            opened: opened_tx,
            fail,
        };
        bag.insert(spawn_screen(state, actions));

        ScrapOutput {
            questions,
            scrapped,
            is_editing,
            selection,
            opened,
            fail_message,
            cell_delegate,
            bag,
        }
    }
}
