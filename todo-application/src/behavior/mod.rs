//! 横切行为（Behavior）
//!
//! 行为是无状态的中间件单元，按装配时确定的顺序包裹处理器。每个行为拿到
//! 调用上下文与 `Next` 延续：可先只读检查请求信封，再调用 `next.run()`
//! 继续执行；提前返回即短路后续行为与处理器。后置逻辑只能只读观察 `Outcome`。
//!
//! 默认顺序（外层在前）：日志 → 性能 → 授权 → 校验 → 处理器。
//!
mod authorization;
mod logging;
mod performance;
mod validation;

pub use authorization::{AuthorizationBehavior, AuthorizationPolicy};
pub use logging::LoggingBehavior;
pub use performance::PerformanceBehavior;
pub use validation::ValidationBehavior;

use crate::{
    context::AppContext,
    error::AppResult,
    handler::Handled,
    registry::{BoxAnySend, HandlerFn},
    request::Envelope,
};
use async_trait::async_trait;
use futures_util::future::BoxFuture;
use std::any::Any;
use std::sync::Arc;
use std::time::Duration;
use todo_domain::domain_event::EventRecord;

#[async_trait]
pub trait Behavior: Send + Sync {
    /// 行为名称（用于日志）
    fn name(&self) -> &'static str;

    async fn handle(&self, ctx: &AppContext, next: Next<'_>) -> AppResult<Outcome>;
}

/// 处理器成功后的结果：擦除后的响应值 + 待投递事件
#[derive(Debug)]
pub struct Outcome {
    value: BoxAnySend,
    events: Vec<EventRecord>,
}

impl Outcome {
    pub fn is<T: Any>(&self) -> bool {
        self.value.is::<T>()
    }

    pub fn events(&self) -> &[EventRecord] {
        &self.events
    }

    pub(crate) fn into_parts(self) -> (BoxAnySend, Vec<EventRecord>) {
        (self.value, self.events)
    }
}

impl From<Handled<BoxAnySend>> for Outcome {
    fn from(handled: Handled<BoxAnySend>) -> Self {
        let (value, events) = handled.into_parts();
        Self { value, events }
    }
}

/// 行为链剩余部分的延续
pub struct Next<'a> {
    ctx: &'a AppContext,
    envelope: Envelope,
    chain: &'a [Arc<dyn Behavior>],
    handler: HandlerFn,
}

impl<'a> Next<'a> {
    pub(crate) fn new(
        ctx: &'a AppContext,
        envelope: Envelope,
        chain: &'a [Arc<dyn Behavior>],
        handler: HandlerFn,
    ) -> Self {
        Self {
            ctx,
            envelope,
            chain,
            handler,
        }
    }

    /// 当前请求信封（只读）
    pub fn request(&self) -> &Envelope {
        &self.envelope
    }

    /// 执行剩余的行为与处理器
    pub fn run(self) -> BoxFuture<'a, AppResult<Outcome>> {
        let Next {
            ctx,
            envelope,
            chain,
            handler,
        } = self;

        match chain.split_first() {
            Some((head, rest)) => head.handle(ctx, Next::new(ctx, envelope, rest, handler)),
            None => Box::pin(async move { Ok(Outcome::from((handler)(envelope, ctx).await?)) }),
        }
    }
}

/// 按默认顺序装配行为链
pub fn default_chain(
    policy: AuthorizationPolicy,
    validation: ValidationBehavior,
    slow_request_threshold: Duration,
) -> Vec<Arc<dyn Behavior>> {
    vec![
        Arc::new(LoggingBehavior),
        Arc::new(PerformanceBehavior::new(slow_request_threshold)),
        Arc::new(AuthorizationBehavior::new(policy)),
        Arc::new(validation),
    ]
}
