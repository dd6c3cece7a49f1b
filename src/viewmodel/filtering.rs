//! 公开题目按分类筛选 / 关键词搜索

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, warn};

use super::transform::{boxed, signal, spawn_action, DisposeBag, FlatMapPolicy, Signal, ViewModel};
use crate::error::AppResult;
use crate::models::{Category, PublicQuestion};
use crate::services::PublicQuestionService;

pub const FILTERING_SUBTITLE: &str =
    "관련된 질문리스트를 보여드려요!\n질문에 참여 시 동료들의 모든 답변을 확인할 수 있어요 :)";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterMode {
    Filter(Category),
    Search(String),
}

impl FilterMode {
    pub fn title(&self) -> String {
        match self {
            FilterMode::Filter(category) => category.name().to_string(),
            FilterMode::Search(keyword) => keyword.trim().to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionHeader {
    pub title: String,
    pub subtitle: &'static str,
}

impl SectionHeader {
    pub fn for_mode(mode: &FilterMode) -> Self {
        Self {
            title: mode.title(),
            subtitle: FILTERING_SUBTITLE,
        }
    }
}

pub struct FilteringViewModel {
    service: Arc<dyn PublicQuestionService>,
}

pub struct FilteringInput {
    /// 每次选择分类或提交搜索词时触发
    pub mode: Signal<FilterMode>,
}

pub struct FilteringOutput {
    pub header: watch::Receiver<Option<SectionHeader>>,
    pub questions: watch::Receiver<Vec<PublicQuestion>>,
    pub fail_message: Signal<String>,
    pub bag: DisposeBag,
}

impl FilteringViewModel {
    pub fn new(service: Arc<dyn PublicQuestionService>) -> Self {
        Self { service }
    }
}

impl ViewModel for FilteringViewModel {
    type Input = FilteringInput;
    type Output = FilteringOutput;

    fn transform(self, input: FilteringInput) -> FilteringOutput {
        let (header_tx, header) = watch::channel(None);
        let (questions_tx, questions) = watch::channel(Vec::new());
        let (fail_tx, fail_message) = signal();
        let service = self.service;

        let handle = spawn_action(
            input.mode,
            FlatMapPolicy::Switch,
            move |mode: FilterMode| {
                let service = service.clone();
                boxed(async move {
                    let result: AppResult<Vec<PublicQuestion>> = match &mode {
                        FilterMode::Filter(category) => service.fetch_filtered(*category).await,
                        FilterMode::Search(keyword) if keyword.trim().is_empty() => {
                            debug!("搜索词为空，不发请求");
                            Ok(Vec::new())
                        }
                        FilterMode::Search(keyword) => service.search(keyword.trim()).await,
                    };
                    (mode, result)
                })
            },
            move |(mode, result)| match result {
                Ok(list) => {
                    debug!("{:?} → {} 条", mode, list.len());
                    header_tx.send_replace(Some(SectionHeader::for_mode(&mode)));
                    questions_tx.send_replace(list);
                }
                Err(e) => {
                    warn!("⚠️ 题目列表加载失败 ({:?}): {}", mode, e);
                    fail_tx.emit(e.user_message());
                }
            },
        );

        let mut bag = DisposeBag::new();
        bag.insert(handle);

        FilteringOutput {
            header,
            questions,
            fail_message,
            bag,
        }
    }
}
