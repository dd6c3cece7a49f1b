//! 应用装配 - 编排层
//!
//! 持有会话、HTTP 执行器和全部 service，页面需要的依赖都从这里取。

use std::sync::Arc;

use tracing::{info, warn};

use crate::config::Config;
use crate::error::AppResult;
use crate::infrastructure::{HttpExecutor, Session, SessionState, TokenStore, TomlTokenStore};
use crate::models::{PopularPublicQuestion, PublicQuestion};
use crate::services::{
    GroupService, HttpGroupService, HttpPrivateQuestionService, HttpPublicAnswerService,
    HttpPublicQuestionService, HttpReferenceQuestionService, HttpScrapService,
    PrivateQuestionService, PublicAnswerService, PublicQuestionService, ReferenceQuestionService,
    ScrapService,
};
use crate::utils::logging::log_startup;
use crate::utils::truncate_text;

/// 应用主结构
pub struct App {
    config: Config,
    session: Arc<Session>,
    pub public_questions: Arc<dyn PublicQuestionService>,
    pub private_questions: Arc<dyn PrivateQuestionService>,
    pub public_answers: Arc<dyn PublicAnswerService>,
    pub scraps: Arc<dyn ScrapService>,
    pub groups: Arc<dyn GroupService>,
    pub references: Arc<dyn ReferenceQuestionService>,
}

impl App {
    /// 初始化应用：恢复会话并创建所有 service
    pub async fn initialize(config: Config) -> AppResult<Self> {
        log_startup(&config.base_url);

        let store: Arc<dyn TokenStore> = Arc::new(TomlTokenStore::new(&config.token_file));
        Self::with_store(config, store)
    }

    /// 使用指定的 token 存储装配（测试里传内存存储）
    pub fn with_store(config: Config, store: Arc<dyn TokenStore>) -> AppResult<Self> {
        let session = Arc::new(Session::restore(store)?);
        let executor = Arc::new(HttpExecutor::new(&config, session.clone())?);

        Ok(Self {
            public_questions: Arc::new(HttpPublicQuestionService::new(executor.clone())),
            private_questions: Arc::new(HttpPrivateQuestionService::new(executor.clone())),
            public_answers: Arc::new(HttpPublicAnswerService::new(executor.clone())),
            scraps: Arc::new(HttpScrapService::new(executor.clone())),
            groups: Arc::new(HttpGroupService::new(executor.clone())),
            references: Arc::new(HttpReferenceQuestionService::new(executor)),
            config,
            session,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    /// 运行主逻辑：拉取首页的最新题目和热门题目
    pub async fn run(&self) -> AppResult<()> {
        if self.session.state() != SessionState::Authenticated {
            warn!(
                "⚠️ 没有可用的登录凭证，请先把 token 写入 {}",
                self.config.token_file
            );
            return Ok(());
        }

        let (recent, popular) = futures::join!(
            self.public_questions.fetch_recent(),
            self.public_questions.fetch_popular()
        );

        if self.session.state() == SessionState::ReauthenticationRequired {
            warn!("⚠️ 登录已失效，请重新登录");
        }

        let recent = recent?;
        let popular = popular?;
        print_recent(&recent);
        print_popular(&popular);
        Ok(())
    }
}

// ========== 日志辅助函数 ==========

fn print_recent(questions: &[PublicQuestion]) {
    info!("\n{}", "─".repeat(60));
    info!("🆕 最新题目 ({} 条)", questions.len());
    for question in questions {
        info!(
            "  [{}] {} · 참여 {}명",
            question.category_name,
            truncate_text(&question.question, 40),
            question.participants
        );
    }
}

fn print_popular(questions: &[PopularPublicQuestion]) {
    info!("\n{}", "─".repeat(60));
    info!("🔥 热门题目 ({} 条)", questions.len());
    for question in questions {
        info!(
            "  [{}] {} · 참여 {}명",
            question.category_name,
            truncate_text(&question.question, 40),
            question.participants
        );
    }
    info!("{}", "─".repeat(60));
}
