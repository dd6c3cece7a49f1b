//! 创建 / 修改题目分组

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, info, warn};

use super::transform::{
    boxed, combine_latest, signal, spawn_action, DisposeBag, FlatMapPolicy, Signal, ViewModel,
};
use crate::error::AppResult;
use crate::models::{Category, GroupDetail};
use crate::services::GroupService;

pub const GROUP_CREATED_MESSAGE: &str = "그룹이 생성되었어요!";
pub const GROUP_UPDATED_MESSAGE: &str = "그룹이 수정되었어요!";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupEditMode {
    Create,
    Edit(i64),
}

impl GroupEditMode {
    fn success_message(self) -> &'static str {
        match self {
            GroupEditMode::Create => GROUP_CREATED_MESSAGE,
            GroupEditMode::Edit(_) => GROUP_UPDATED_MESSAGE,
        }
    }
}

pub struct GroupEditViewModel {
    mode: GroupEditMode,
    service: Arc<dyn GroupService>,
}

pub struct GroupEditInput {
    /// 修改模式下加载原有分组，创建模式下忽略
    pub load: Signal<()>,
    pub name: watch::Receiver<String>,
    pub category: watch::Receiver<Option<Category>>,
    pub save: Signal<()>,
}

pub struct GroupEditOutput {
    pub group: watch::Receiver<Option<GroupDetail>>,
    pub is_valid: watch::Receiver<bool>,
    pub success_message: Signal<String>,
    pub fail_message: Signal<String>,
    pub bag: DisposeBag,
}

impl GroupEditViewModel {
    pub fn new(mode: GroupEditMode, service: Arc<dyn GroupService>) -> Self {
        Self { mode, service }
    }

    pub fn is_valid(name: &str, category: Option<Category>) -> bool {
        !name.trim().is_empty() && category.is_some()
    }
}

impl ViewModel for GroupEditViewModel {
    type Input = GroupEditInput;
    type Output = GroupEditOutput;

    fn transform(self, input: GroupEditInput) -> GroupEditOutput {
        let mut bag = DisposeBag::new();
        let (group_tx, group) = watch::channel(None);
        let (success_tx, success_message) = signal();
        let (fail_tx, fail_message) = signal();
        let mode = self.mode;

        let (is_valid, handle) = combine_latest(
            input.name.clone(),
            input.category.clone(),
            |name: &String, category: &Option<Category>| Self::is_valid(name, *category),
        );
        bag.insert(handle);

        let service = self.service.clone();
        let load_fail = fail_tx.clone();
        bag.insert(spawn_action(
            input.load,
            FlatMapPolicy::Switch,
            move |_| {
                let service = service.clone();
                boxed(async move {
                    match mode {
                        GroupEditMode::Edit(id) => Some(service.fetch_one(id).await),
                        GroupEditMode::Create => None,
                    }
                })
            },
            move |result| match result {
                Some(Ok(detail)) => {
                    group_tx.send_replace(Some(detail));
                }
                Some(Err(e)) => {
                    warn!("⚠️ 分组加载失败: {}", e);
                    load_fail.emit(e.user_message());
                }
                None => {}
            },
        ));

        let service = self.service;
        let name = input.name;
        let category = input.category;
        bag.insert(spawn_action(
            input.save,
            FlatMapPolicy::Exhaust,
            move |_| {
                let name = name.borrow().trim().to_string();
                let selected = *category.borrow();
                let service = service.clone();
                boxed(async move {
                    let Some(category) = selected.filter(|_| !name.is_empty()) else {
                        debug!("分组名称或分类为空，跳过保存");
                        return None;
                    };
                    let result: AppResult<()> = match mode {
                        GroupEditMode::Create => service.create(&name, category).await,
                        GroupEditMode::Edit(id) => service.update(id, &name, category).await,
                    };
                    Some(result)
                })
            },
            move |result| match result {
                Some(Ok(())) => {
                    info!("✓ 分组已保存 ({:?})", mode);
                    success_tx.emit(mode.success_message().to_string());
                }
                Some(Err(e)) => {
                    warn!("⚠️ 分组保存失败: {}", e);
                    fail_tx.emit(e.user_message());
                }
                None => {}
            },
        ));

        GroupEditOutput {
            group,
            is_valid,
            success_message,
            fail_message,
            bag,
        }
    }
}
