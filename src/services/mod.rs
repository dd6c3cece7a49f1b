//! 业务能力层
//!
//! 每个 service 对应一个 REST 资源，只描述"我能做什么"：
//! trait 给 view model 使用，`Http*` 实现走 `HttpExecutor`。

pub mod group_service;
pub mod private_question_service;
pub mod public_answer_service;
pub mod public_question_service;
pub mod reference_question_service;
pub mod scrap_service;

pub use group_service::{GroupService, HttpGroupService};
pub use private_question_service::{HttpPrivateQuestionService, PrivateQuestionService};
pub use public_answer_service::{HttpPublicAnswerService, PublicAnswerService};
pub use public_question_service::{HttpPublicQuestionService, PublicQuestionService};
pub use reference_question_service::{HttpReferenceQuestionService, ReferenceQuestionService};
pub use scrap_service::{HttpScrapService, ScrapService};

use crate::error::{AppError, GroupError, QuestionError};

/// 创建/修改接口：把 400 / 404 转成题目校验错误，其余保持原样
pub(crate) fn map_upload_error(err: AppError) -> AppError {
    match err.status() {
        Some(status) => QuestionError::from_upload_status(status).into(),
        None => err,
    }
}

/// 分组创建/修改接口：400 / 404 转成分组校验错误
pub(crate) fn map_group_error(err: AppError) -> AppError {
    match err.status() {
        Some(status) => GroupError::from_upsert_status(status).into(),
        None => err,
    }
}

/// 删除接口：把 403 转成无权限错误
pub(crate) fn map_delete_error(err: AppError) -> AppError {
    match err.status() {
        Some(status) => QuestionError::from_delete_status(status).into(),
        None => err,
    }
}
