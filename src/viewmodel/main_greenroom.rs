//! 그린룸 首页：最新题目 + 热门题目

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{info, warn};

use super::transform::{boxed, signal, spawn_action, DisposeBag, FlatMapPolicy, Signal, ViewModel};
use crate::models::{PopularPublicQuestion, PublicQuestion};
use crate::services::PublicQuestionService;

pub struct MainGreenRoomViewModel {
    service: Arc<dyn PublicQuestionService>,
}

pub struct MainGreenRoomInput {
    /// 页面出现时触发
    pub refresh: Signal<()>,
}

pub struct MainGreenRoomOutput {
    pub recent: watch::Receiver<Vec<PublicQuestion>>,
    pub popular: watch::Receiver<Vec<PopularPublicQuestion>>,
    pub fail_message: Signal<String>,
    pub bag: DisposeBag,
}

impl MainGreenRoomViewModel {
    pub fn new(service: Arc<dyn PublicQuestionService>) -> Self {
        Self { service }
    }
}

impl ViewModel for MainGreenRoomViewModel {
    type Input = MainGreenRoomInput;
    type Output = MainGreenRoomOutput;

    fn transform(self, input: MainGreenRoomInput) -> MainGreenRoomOutput {
        let (recent_tx, recent) = watch::channel(Vec::new());
        let (popular_tx, popular) = watch::channel(Vec::new());
        let (fail_tx, fail_message) = signal();
        let service = self.service;

        let handle = spawn_action(
            input.refresh,
            FlatMapPolicy::Switch,
            move |_| {
                let service = service.clone();
                boxed(async move {
                    futures::join!(service.fetch_recent(), service.fetch_popular())
                })
            },
            // 两个列表各自更新，一个失败不影响另一个
            move |(recent, popular)| {
                match recent {
                    Ok(list) => {
                        info!("✓ 最新题目 {} 条", list.len());
                        recent_tx.send_replace(list);
                    }
                    Err(e) => {
                        warn!("⚠️ 最新题目加载失败: {}", e);
                        fail_tx.emit(e.user_message());
                    }
                }
                match popular {
                    Ok(list) => {
                        info!("✓ 热门题目 {} 条", list.len());
                        popular_tx.send_replace(list);
                    }
                    Err(e) => {
                        warn!("⚠️ 热门题目加载失败: {}", e);
                        fail_tx.emit(e.user_message());
                    }
                }
            },
        );

        let mut bag = DisposeBag::new();
        bag.insert(handle);

        MainGreenRoomOutput {
            recent,
            popular,
            fail_message,
            bag,
        }
    }
}
