use super::{Behavior, Next, Outcome};
use crate::{context::AppContext, error::AppError, error::AppResult};
use async_trait::async_trait;

/// 记录请求名称、调用主体与结果
#[derive(Clone, Copy, Debug, Default)]
pub struct LoggingBehavior;

#[async_trait]
impl Behavior for LoggingBehavior {
    fn name(&self) -> &'static str {
        "logging"
    }

    async fn handle(&self, ctx: &AppContext, next: Next<'_>) -> AppResult<Outcome> {
        let request = next.request().name();
        let subject = ctx.actor_id().unwrap_or("anonymous");

        tracing::debug!(
            request,
            subject,
            correlation_id = %ctx.correlation_id,
            payload = ?next.request(),
            "handling request"
        );

        let result = next.run().await;

        match &result {
            Ok(outcome) => tracing::info!(
                request,
                subject,
                correlation_id = %ctx.correlation_id,
                events = outcome.events().len(),
                "request handled"
            ),
            Err(err @ (AppError::Unexpected(_) | AppError::TypeMismatch { .. })) => {
                tracing::error!(
                    request,
                    subject,
                    correlation_id = %ctx.correlation_id,
                    error = %err,
                    "request failed"
                )
            }
            Err(err) => tracing::warn!(
                request,
                subject,
                correlation_id = %ctx.correlation_id,
                error = %err,
                "request rejected"
            ),
        }

        result
    }
}
