//! 回答的显示/编辑状态机
//!
//! ```text
//! Unwritten ──StartAnswering──▶ Editing ──SubmitSucceeded──▶ Written
//!    │                            ▲  │                          ▲ │
//!    │                            │  └──SubmitFailed (不变)      │ │
//!    │                            └────────Edit{owner}───────────┼─┘
//!    └─────────────SubmitSucceeded（在其他页面写完）──────────────┘
//! 任意状态 ──DeleteSucceeded──▶ Removed（终态）
//! ```

use std::fmt;

use tokio::sync::watch;
use tracing::debug;

use crate::error::BusinessError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnswerMode {
    /// 还没有回答
    Unwritten,
    /// 已有回答
    Written(String),
    /// 正在撰写或修改
    Editing,
    /// 题目已删除，页面应当关闭
    Removed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnswerEvent {
    /// 点击"답변 작성하기"
    StartAnswering,
    /// 点击编辑，只有题目所有者可以编辑已写的回答
    Edit { is_owner: bool },
    /// 提交成功
    SubmitSucceeded(String),
    /// 提交失败
    SubmitFailed,
    /// 确认删除且删除成功
    DeleteSucceeded,
    /// 删除失败
    DeleteFailed,
}

impl AnswerMode {
    /// 根据加载结果得到初始状态：没有回答文本 → Unwritten
    pub fn from_answer(answer: Option<&str>) -> Self {
        match answer {
            Some(text) if !text.trim().is_empty() => AnswerMode::Written(text.to_string()),
            _ => AnswerMode::Unwritten,
        }
    }

    pub fn is_editing(&self) -> bool {
        matches!(self, AnswerMode::Editing)
    }

    pub fn written_text(&self) -> Option<&str> {
        match self {
            AnswerMode::Written(text) => Some(text),
            _ => None,
        }
    }

    /// 纯函数的状态切换，不允许的切换返回错误且不改变当前状态
    pub fn transition(&self, event: &AnswerEvent) -> Result<AnswerMode, BusinessError> {
        use AnswerEvent as E;
        use AnswerMode as M;

        let next = match (self, event) {
            (M::Removed, _) => None,
            (_, E::DeleteSucceeded) => Some(M::Removed),
            (current, E::DeleteFailed) => Some(current.clone()),
            (M::Unwritten, E::StartAnswering) => Some(M::Editing),
            (M::Written(_), E::Edit { is_owner: true }) => Some(M::Editing),
            (M::Unwritten | M::Editing, E::SubmitSucceeded(text)) => {
                Some(M::Written(text.clone()))
            }
            (M::Editing, E::SubmitFailed) => Some(M::Editing),
            _ => None,
        };

        next.ok_or_else(|| BusinessError::InvalidTransition {
            from: self.to_string(),
            event: format!("{:?}", event),
        })
    }
}

/// 在输出的状态上执行一次切换；不允许的切换保持原状态并返回 `false`
pub(crate) fn advance(mode: &watch::Sender<AnswerMode>, event: AnswerEvent) -> bool {
    let mut applied = false;
    mode.send_if_modified(|current| match current.transition(&event) {
        Ok(next) => {
            applied = true;
            let changed = *current != next;
            *current = next;
            changed
        }
        Err(e) => {
            debug!("忽略状态切换: {}", e);
            false
        }
    });
    applied
}

impl fmt::Display for AnswerMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnswerMode::Unwritten => write!(f, "unwritten"),
            AnswerMode::Written(_) => write!(f, "written"),
            AnswerMode::Editing => write!(f, "editing"),
            AnswerMode::Removed => write!(f, "removed"),
        }
    }
}
