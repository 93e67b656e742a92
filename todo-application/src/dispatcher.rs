//! 调度器（Dispatcher）
//!
//! 单次调度的流程：
//! 1. 按请求类型取出处理器，未注册时返回 `HandlerNotFound`；
//! 2. 依次执行行为链与处理器，panic 在此统一捕获为 `Unexpected`；
//! 3. 与取消令牌、可选超时竞速；
//! 4. 处理成功（事务已提交）后取出出箱事件交给 `EventFanout` 投递，
//!    投递结果不影响调度结果；
//! 5. 还原响应类型。
//!
use crate::{
    behavior::{Behavior, Next, Outcome},
    context::AppContext,
    error::{AppError, AppResult},
    registry::HandlerRegistry,
    request::{Envelope, Request},
};
use bon::Builder;
use futures_util::FutureExt;
use std::any::{Any, type_name};
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;
use todo_domain::eventing::EventFanout;

/// 调度配置（事件投递模式见 `EventFanoutConfig`）
#[derive(Clone, Copy, Debug, Default)]
pub struct DispatcherConfig {
    /// 单次调度的超时；`None` 表示不限
    pub timeout: Option<Duration>,
}

#[derive(Builder)]
pub struct Dispatcher {
    #[builder(into)]
    registry: Arc<HandlerRegistry>,
    #[builder(default)]
    behaviors: Vec<Arc<dyn Behavior>>,
    fanout: Option<EventFanout>,
    #[builder(default)]
    config: DispatcherConfig,
}

impl Dispatcher {
    pub fn registry(&self) -> &HandlerRegistry {
        &self.registry
    }

    /// 调度请求到其唯一的处理器
    pub async fn dispatch<R: Request>(&self, ctx: &AppContext, request: R) -> AppResult<R::Response> {
        let Some(handler) = self.registry.invoker(std::any::TypeId::of::<R>()) else {
            tracing::error!(request = R::NAME, "no handler registered");
            return Err(AppError::HandlerNotFound(R::NAME));
        };

        let next = Next::new(ctx, Envelope::new(request), &self.behaviors, handler);
        let outcome = self.run_guarded(ctx, R::NAME, next).await?;

        let (value, events) = outcome.into_parts();
        if !events.is_empty() {
            match &self.fanout {
                Some(fanout) => {
                    let report = fanout.deliver(events).await;
                    tracing::debug!(
                        request = R::NAME,
                        delivered = report.delivered,
                        failed = report.failed,
                        detached = report.detached,
                        "events fanned out"
                    );
                }
                None => tracing::debug!(
                    request = R::NAME,
                    events = events.len(),
                    "no event fan-out configured, events dropped"
                ),
            }
        }

        value
            .downcast::<R::Response>()
            .map(|v| *v)
            .map_err(|_| AppError::TypeMismatch {
                expected: type_name::<R::Response>(),
                found: R::NAME,
            })
    }

    async fn run_guarded(
        &self,
        ctx: &AppContext,
        request: &'static str,
        next: Next<'_>,
    ) -> AppResult<Outcome> {
        let chain = async {
            match AssertUnwindSafe(next.run()).catch_unwind().await {
                Ok(result) => result,
                Err(panic) => {
                    tracing::error!(
                        request,
                        correlation_id = %ctx.correlation_id,
                        panic = panic_message(panic.as_ref()),
                        "request handler panicked"
                    );
                    Err(AppError::unexpected("request handler panicked"))
                }
            }
        };

        let bounded = async {
            match self.config.timeout {
                Some(limit) => tokio::time::timeout(limit, chain).await.unwrap_or_else(|_| {
                    tracing::warn!(request, timeout_ms = limit.as_millis() as u64, "request timed out");
                    Err(AppError::unexpected("request timed out"))
                }),
                None => chain.await,
            }
        };

        tokio::select! {
            biased;
            _ = ctx.cancellation.cancelled() => {
                tracing::warn!(request, correlation_id = %ctx.correlation_id, "request cancelled");
                Err(AppError::unexpected("request cancelled"))
            }
            result = bounded => result,
        }
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> &str {
    if let Some(s) = panic.downcast_ref::<&'static str>() {
        s
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.as_str()
    } else {
        "non-string panic payload"
    }
}
