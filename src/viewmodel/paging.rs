//! 滚动分页
//!
//! `PagingController` 只管两个标志位：是否正在请求、是否还有下一页。
//! `PagedListViewModel` 把它和一个 `PageSource` 接起来，
//! 刷新时从第 0 页重新开始，滚动到底部附近时请求下一页并追加到列表末尾。

use std::sync::Arc;

use async_trait::async_trait;
use futures::future::BoxFuture;
use tokio::sync::watch;
use tracing::{debug, info, trace, warn};

use super::transform::{boxed, poll_slot, signal, DisposeBag, Signal, ViewModel};
use crate::error::AppResult;
use crate::models::{Category, MyPublicQuestion, Page, ReferenceQuestion};
use crate::services::{PublicQuestionService, ReferenceQuestionService};

/// 列表当前的滚动位置
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollPosition {
    pub content_height: f64,
    pub offset_y: f64,
    pub viewport_height: f64,
}

impl ScrollPosition {
    pub fn new(content_height: f64, offset_y: f64, viewport_height: f64) -> Self {
        Self {
            content_height,
            offset_y,
            viewport_height,
        }
    }

    /// 可视区域底边到内容底部的距离
    pub fn distance_to_bottom(&self) -> f64 {
        self.content_height - (self.offset_y + self.viewport_height)
    }
}

#[derive(Debug, Clone)]
pub struct PagingController {
    threshold: f64,
    page_size: usize,
    is_fetching: bool,
    has_next_page: bool,
    current_page: Option<u32>,
}

impl PagingController {
    pub fn new(threshold: f64, page_size: usize) -> Self {
        Self {
            threshold,
            page_size,
            is_fetching: false,
            has_next_page: true,
            current_page: None,
        }
    }

    pub fn is_fetching(&self) -> bool {
        self.is_fetching
    }

    pub fn has_next_page(&self) -> bool {
        self.has_next_page
    }

    /// 已经成功加载的最后一页
    pub fn current_page(&self) -> Option<u32> {
        self.current_page
    }

    pub fn next_page(&self) -> u32 {
        self.current_page.map_or(0, |page| page + 1)
    }

    /// 距离底部小于阈值，且没有请求在进行、还有下一页
    pub fn should_fetch(&self, position: &ScrollPosition) -> bool {
        position.distance_to_bottom() < self.threshold && !self.is_fetching && self.has_next_page
    }

    /// 占用请求标志并返回要请求的页码；条件不满足时返回 `None`
    pub fn begin(&mut self) -> Option<u32> {
        if self.is_fetching || !self.has_next_page {
            return None;
        }
        self.is_fetching = true;
        Some(self.next_page())
    }

    /// 丢弃已加载的进度，从第 0 页重新开始
    pub fn begin_reset(&mut self) -> u32 {
        self.current_page = None;
        self.has_next_page = true;
        self.is_fetching = true;
        0
    }

    /// 请求成功：记录页码并根据响应更新"还有下一页"
    pub fn finish<T>(&mut self, page: &Page<T>, requested: u32) {
        self.is_fetching = false;
        self.current_page = Some(requested);
        self.has_next_page = page.has_next_page(self.page_size);
    }

    /// 请求失败：只释放标志，页码不变，下次滚动会重试同一页
    pub fn fail(&mut self) {
        self.is_fetching = false;
    }
}

/// 分页数据来源
#[async_trait]
pub trait PageSource: Send + Sync + 'static {
    type Item: Clone + Send + Sync + 'static;

    async fn fetch_page(&self, page: u32) -> AppResult<Page<Self::Item>>;
}

/// 参考题目：按所选分类和标题关键词分页
pub struct ReferenceQuestionsSource {
    service: Arc<dyn ReferenceQuestionService>,
    categories: watch::Receiver<Vec<Category>>,
    title: watch::Receiver<String>,
}

impl ReferenceQuestionsSource {
    pub fn new(
        service: Arc<dyn ReferenceQuestionService>,
        categories: watch::Receiver<Vec<Category>>,
        title: watch::Receiver<String>,
    ) -> Self {
        Self {
            service,
            categories,
            title,
        }
    }
}

#[async_trait]
impl PageSource for ReferenceQuestionsSource {
    type Item = ReferenceQuestion;

    async fn fetch_page(&self, page: u32) -> AppResult<Page<ReferenceQuestion>> {
        let categories = self.categories.borrow().clone();
        let title = self.title.borrow().clone();
        self.service.fetch_page(&categories, &title, page).await
    }
}

/// 我发布的公开题目
pub struct MyPublicQuestionsSource {
    service: Arc<dyn PublicQuestionService>,
}

impl MyPublicQuestionsSource {
    pub fn new(service: Arc<dyn PublicQuestionService>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl PageSource for MyPublicQuestionsSource {
    type Item = MyPublicQuestion;

    async fn fetch_page(&self, page: u32) -> AppResult<Page<MyPublicQuestion>> {
        self.service.fetch_my_public_questions(page).await
    }
}

pub struct PagedListViewModel<S: PageSource> {
    source: Arc<S>,
    controller: PagingController,
}

pub struct PagedListInput {
    /// 从第 0 页重新加载（首次进入页面、下拉刷新、过滤条件变化）
    pub refresh: Signal<()>,
    pub scroll: Signal<ScrollPosition>,
}

pub struct PagedListOutput<T> {
    pub items: watch::Receiver<Vec<T>>,
    pub has_next_page: watch::Receiver<bool>,
    pub is_fetching: watch::Receiver<bool>,
    pub fail_message: Signal<String>,
    pub bag: DisposeBag,
}

type PageResult<T> = (u32, AppResult<Page<T>>);

impl<S: PageSource> PagedListViewModel<S> {
    pub fn new(source: Arc<S>, threshold: f64, page_size: usize) -> Self {
        Self {
            source,
            controller: PagingController::new(threshold, page_size),
        }
    }

    fn fetch(source: &Arc<S>, page: u32) -> BoxFuture<'static, PageResult<S::Item>> {
        let source = source.clone();
        boxed(async move { (page, source.fetch_page(page).await) })
    }
}

impl<S: PageSource> ViewModel for PagedListViewModel<S> {
    type Input = PagedListInput;
    type Output = PagedListOutput<S::Item>;

    fn transform(self, input: PagedListInput) -> PagedListOutput<S::Item> {
        let (items_tx, items) = watch::channel(Vec::new());
        let (has_next_tx, has_next_page) = watch::channel(true);
        let (fetching_tx, is_fetching) = watch::channel(false);
        let (fail_tx, fail_message) = signal();

        let PagedListInput {
            mut refresh,
            mut scroll,
        } = input;
        let source = self.source;
        let mut controller = self.controller;

        let handle = tokio::spawn(async move {
            let mut in_flight: Option<BoxFuture<'static, PageResult<S::Item>>> = None;
            // 当前请求是否会替换整个列表
            let mut replacing = false;
            let mut refresh_open = true;
            let mut scroll_open = true;

            loop {
                if !refresh_open && !scroll_open && in_flight.is_none() {
                    break;
                }

                tokio::select! {
                    biased;

                    (page, result) = poll_slot(&mut in_flight), if in_flight.is_some() => {
                        in_flight = None;
                        match result {
                            Ok(response) => {
                                controller.finish(&response, page);
                                let count = response.items.len();
                                if replacing {
                                    items_tx.send_replace(response.items);
                                } else {
                                    items_tx.send_modify(|items| items.extend(response.items));
                                }
                                info!("✓ 第 {} 页加载完成 ({} 条)", page, count);
                            }
                            Err(e) => {
                                controller.fail();
                                warn!("⚠️ 第 {} 页加载失败: {}", page, e);
                                fail_tx.emit(e.user_message());
                            }
                        }
                        has_next_tx.send_replace(controller.has_next_page());
                        fetching_tx.send_replace(controller.is_fetching());
                    }
                    next = refresh.next(), if refresh_open => match next {
                        Some(()) => {
                            if in_flight.is_some() {
                                debug!("刷新取代进行中的分页请求");
                            }
                            let page = controller.begin_reset();
                            replacing = true;
                            in_flight = Some(Self::fetch(&source, page));
                            has_next_tx.send_replace(true);
                            fetching_tx.send_replace(true);
                        }
                        None => refresh_open = false,
                    },
                    next = scroll.next(), if scroll_open => match next {
                        Some(position) => {
                            if !controller.should_fetch(&position) {
                                trace!("距离底部 {:.1}，不请求", position.distance_to_bottom());
                                continue;
                            }
                            if let Some(page) = controller.begin() {
                                debug!("滚动到底部，请求第 {} 页", page);
                                replacing = page == 0;
                                in_flight = Some(Self::fetch(&source, page));
                                fetching_tx.send_replace(true);
                            }
                        }
                        None => scroll_open = false,
                    },
                }
            }
        });

        let mut bag = DisposeBag::new();
        bag.insert(handle);

        PagedListOutput {
            items,
            has_next_page,
            is_fetching,
            fail_message,
            bag,
        }
    }
}
