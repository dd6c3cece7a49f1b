//! # GreenRoom Client
//!
//! 面试练习服务 GreenRoom 的客户端核心：REST 接入 + 页面 view model
//!
//! ## 架构设计
//!
//! 本系统采用四层架构：
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 持有稀缺资源（HTTP Client、token），只暴露能力
//! - `HttpExecutor` - 唯一的 Client owner，负责鉴权头和 401 刷新重试
//! - `Session` - 唯一的 token owner，负责刷新和失效
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 每个 REST 资源一个 trait，描述"我能做什么"
//! - `PublicQuestionService` / `PrivateQuestionService` - 公开 / 私有题目
//! - `ScrapService` / `GroupService` - 收藏、分组
//!
//! ### ③ 页面层（ViewModel）
//! - `viewmodel/` - 每个页面一个 `transform(input) -> output`
//! - `AnswerMode` - 回答的显示/编辑状态机
//! - `PagingController` - 滚动分页
//!
//! ### ④ 编排层（App）
//! - `app` - 装配会话、执行器和全部 service
//!
//! ## 模块结构

pub mod app;
pub mod config;
pub mod error;
pub mod infrastructure;
pub mod models;
pub mod services;
pub mod utils;
pub mod viewmodel;

// 重新导出常用类型
pub use app::App;
pub use config::Config;
pub use error::{AppError, AppResult};
pub use infrastructure::{HttpExecutor, Session, SessionState};
pub use models::Category;
pub use viewmodel::{AnswerMode, PagingController, ViewModel};
