use super::{Behavior, Next, Outcome};
use crate::{context::AppContext, error::AppResult};
use async_trait::async_trait;
use std::time::{Duration, Instant};

/// 请求耗时超过阈值时告警
#[derive(Clone, Copy, Debug)]
pub struct PerformanceBehavior {
    threshold: Duration,
}

impl PerformanceBehavior {
    pub const DEFAULT_THRESHOLD: Duration = Duration::from_millis(500);

    pub fn new(threshold: Duration) -> Self {
        Self { threshold }
    }
}

impl Default for PerformanceBehavior {
    fn default() -> Self {
        Self::new(Self::DEFAULT_THRESHOLD)
    }
}

#[async_trait]
impl Behavior for PerformanceBehavior {
    fn name(&self) -> &'static str {
        "performance"
    }

    async fn handle(&self, ctx: &AppContext, next: Next<'_>) -> AppResult<Outcome> {
        let request = next.request().name();
        let started = Instant::now();

        let result = next.run().await;

        let elapsed = started.elapsed();
        if elapsed > self.threshold {
            tracing::warn!(
                request,
                elapsed_ms = elapsed.as_millis() as u64,
                threshold_ms = self.threshold.as_millis() as u64,
                subject = ctx.actor_id().unwrap_or("anonymous"),
                "long running request"
            );
        }

        result
    }
}
