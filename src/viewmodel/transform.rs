//! Input → Output 转换约定
//!
//! 每个页面的 view model 只有一个入口 `transform(input)`：
//! - `Input` 是界面事件流（触发器用 `Signal`，持续值用 `watch::Receiver`）
//! - `Output` 是界面要渲染的状态（`watch::Receiver`）和一次性提示（`Signal`）
//! - 所有网络调用都只在输入事件到来后发起，构造时不会发请求
//! - 失败只会推到提示信号里，不会结束任何输出流
//!
//! `transform` 会 spawn 驱动任务，必须在 tokio runtime 内调用。

use std::future::Future;

use futures::future::BoxFuture;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::debug;

/// 页面 view model
///
/// `transform` 按值消费 view model，保证每个页面实例只转换一次。
pub trait ViewModel {
    type Input;
    type Output;

    fn transform(self, input: Self::Input) -> Self::Output;
}

/// 一次性信号的接收端
///
/// 每条消息只会被一个观察者取走，也不会重放给之后才开始监听的人。
#[derive(Debug)]
pub struct Signal<T> {
    rx: mpsc::UnboundedReceiver<T>,
}

impl<T> Signal<T> {
    /// 等待下一条消息；发送端全部释放后返回 `None`
    pub async fn next(&mut self) -> Option<T> {
        self.rx.recv().await
    }

    /// 不等待，取出已经到达的消息
    pub fn try_next(&mut self) -> Option<T> {
        self.rx.try_recv().ok()
    }

    /// 取出当前积压的全部消息
    pub fn drain(&mut self) -> Vec<T> {
        let mut items = Vec::new();
        while let Ok(item) = self.rx.try_recv() {
            items.push(item);
        }
        items
    }
}

/// 一次性信号的发送端
#[derive(Debug)]
pub struct SignalEmitter<T> {
    tx: mpsc::UnboundedSender<T>,
}

impl<T> Clone for SignalEmitter<T> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
        }
    }
}

impl<T> SignalEmitter<T> {
    /// 发送一条消息；页面已经销毁时静默丢弃
    pub fn emit(&self, value: T) {
        if self.tx.send(value).is_err() {
            debug!("信号没有观察者，已丢弃");
        }
    }
}

/// 创建一对信号端
pub fn signal<T>() -> (SignalEmitter<T>, Signal<T>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (SignalEmitter { tx }, Signal { rx })
}

/// 页面订阅集合
///
/// 持有 `transform` 启动的驱动任务；释放时全部中止，
/// 已经发出的网络请求即使之后返回也不会再更新任何输出。
#[derive(Debug, Default)]
pub struct DisposeBag {
    handles: Vec<JoinHandle<()>>,
}

impl DisposeBag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, handle: JoinHandle<()>) {
        self.handles.push(handle);
    }

    /// 所有驱动任务是否都已结束
    pub fn is_finished(&self) -> bool {
        self.handles.iter().all(|h| h.is_finished())
    }
}

impl Drop for DisposeBag {
    fn drop(&mut self) {
        for handle in &self.handles {
            handle.abort();
        }
    }
}

/// 触发器到来时已有请求在进行中的处理方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlatMapPolicy {
    /// 忽略新的触发，等进行中的请求完成（用于提交、删除等写操作）
    Exhaust,
    /// 丢弃进行中的请求，以最新的触发为准（用于查询）
    Switch,
}

/// 等待槽位里的请求完成；槽位为空时永远挂起
pub(crate) async fn poll_slot<R>(slot: &mut Option<BoxFuture<'static, R>>) -> R {
    match slot {
        Some(fut) => fut.await,
        None => std::future::pending().await,
    }
}

/// 启动一个"触发器 → 请求 → 结果"的驱动任务
///
/// 同一时刻最多只有一个请求在进行：
/// - `Exhaust`：进行中时到来的触发被吸收
/// - `Switch`：新的触发丢弃旧请求，旧结果不会到达 `deliver`
///
/// 触发器关闭后会等进行中的请求完成再退出。
pub fn spawn_action<T, R, F, D>(
    mut triggers: Signal<T>,
    policy: FlatMapPolicy,
    call: F,
    mut deliver: D,
) -> JoinHandle<()>
where
    T: Send + 'static,
    R: Send + 'static,
    F: Fn(T) -> BoxFuture<'static, R> + Send + 'static,
    D: FnMut(R) + Send + 'static,
{
    tokio::spawn(async move {
        let mut in_flight: Option<BoxFuture<'static, R>> = None;

        loop {
            tokio::select! {
                biased;

                result = poll_slot(&mut in_flight), if in_flight.is_some() => {
                    in_flight = None;
                    deliver(result);
                }
                next = triggers.next() => match next {
                    Some(value) => match (policy, in_flight.is_some()) {
                        (FlatMapPolicy::Exhaust, true) => {
                            debug!("上一次请求尚未完成，忽略本次触发");
                        }
                        (FlatMapPolicy::Switch, true) => {
                            debug!("新的触发取代进行中的请求");
                            in_flight = Some(call(value));
                        }
                        (_, false) => {
                            in_flight = Some(call(value));
                        }
                    },
                    None => {
                        if let Some(fut) = in_flight.take() {
                            deliver(fut.await);
                        }
                        break;
                    }
                },
            }
        }
    })
}

/// 把一个触发器转发到合并后的动作流里
///
/// 输入关闭时转发任务结束并释放自己的发送端，
/// 所有输入都关闭后合并流随之关闭。
pub fn forward<T, U, F>(mut source: Signal<T>, target: SignalEmitter<U>, map: F) -> JoinHandle<()>
where
    T: Send + 'static,
    U: Send + 'static,
    F: Fn(T) -> U + Send + 'static,
{
    tokio::spawn(async move {
        while let Some(value) = source.next().await {
            target.emit(map(value));
        }
    })
}

/// 带状态的页面逻辑
///
/// 本地动作（切换模式、选择）随时处理；网络请求同一时刻只有一个，
/// 由实现方根据 `busy` 决定是否发起。
pub trait ScreenState: Send + 'static {
    type Action: Send + 'static;
    type Outcome: Send + 'static;

    /// 处理一个动作，需要请求时返回请求 future
    fn on_action(
        &mut self,
        action: Self::Action,
        busy: bool,
    ) -> Option<BoxFuture<'static, Self::Outcome>>;

    /// 请求完成
    fn on_outcome(&mut self, outcome: Self::Outcome);
}

/// 驱动一个 `ScreenState`，动作流关闭后等进行中的请求完成再退出
pub fn spawn_screen<S: ScreenState>(mut state: S, mut actions: Signal<S::Action>) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut in_flight: Option<BoxFuture<'static, S::Outcome>> = None;

        loop {
            tokio::select! {
                biased;

                outcome = poll_slot(&mut in_flight), if in_flight.is_some() => {
                    in_flight = None;
                    state.on_outcome(outcome);
                }
                next = actions.next() => match next {
                    Some(action) => {
                        let busy = in_flight.is_some();
                        if let Some(fut) = state.on_action(action, busy) {
                            if busy {
                                debug!("上一次请求尚未完成，忽略本次请求");
                            } else {
                                in_flight = Some(fut);
                            }
                        }
                    }
                    None => {
                        if let Some(fut) = in_flight.take() {
                            state.on_outcome(fut.await);
                        }
                        break;
                    }
                },
            }
        }
    })
}

/// 两个持续值任意一个变化时重新计算输出（combineLatest）
pub fn combine_latest<A, B, O, F>(
    mut a: watch::Receiver<A>,
    mut b: watch::Receiver<B>,
    f: F,
) -> (watch::Receiver<O>, JoinHandle<()>)
where
    A: Send + Sync + 'static,
    B: Send + Sync + 'static,
    O: Send + Sync + 'static,
    F: Fn(&A, &B) -> O + Send + 'static,
{
    let initial = f(&a.borrow_and_update(), &b.borrow_and_update());
    let (tx, rx) = watch::channel(initial);

    let handle = tokio::spawn(async move {
        loop {
            tokio::select! {
                changed = a.changed() => if changed.is_err() { break },
                changed = b.changed() => if changed.is_err() { break },
            }
            let value = f(&a.borrow_and_update(), &b.borrow_and_update());
            tx.send_replace(value);
        }
    });

    (rx, handle)
}

/// 把一个异步结果装箱，方便传给 `spawn_action`
pub fn boxed<R, Fut>(fut: Fut) -> BoxFuture<'static, R>
where
    Fut: Future<Output = R> + Send + 'static,
{
    Box::pin(fut)
}
