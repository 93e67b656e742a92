//! 事件扇出（EventFanout）
//!
//! 每条事件记录独立地投递给所有匹配的订阅方：
//! - 按 `HandledEventType` 建立类型索引，`All` 订阅方接收全部事件；
//! - 以有限并发执行，订阅方返回错误或 panic 时记录日志并计入失败；
//! - `Inline` 模式等待全部投递完成，`Detached` 模式在 tokio 上后台执行。
//!
use super::{EventSubscriber, HandledEventType};
use crate::domain_event::EventRecord;
use futures_util::{FutureExt, StreamExt, future::BoxFuture, stream};
use std::{collections::HashMap, panic::AssertUnwindSafe, sync::Arc};

/// 投递模式
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DeliveryMode {
    /// 在返回响应前等待投递完成
    #[default]
    Inline,
    /// 后台投递，调用方不等待
    Detached,
}

impl std::str::FromStr for DeliveryMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "inline" => Ok(DeliveryMode::Inline),
            "detached" => Ok(DeliveryMode::Detached),
            other => Err(format!("unknown delivery mode: {other}")),
        }
    }
}

/// 扇出配置
#[derive(Clone, Copy, Debug)]
pub struct EventFanoutConfig {
    /// 同时执行的订阅方调用上限
    pub subscriber_concurrency: usize,
    pub delivery_mode: DeliveryMode,
}

impl Default for EventFanoutConfig {
    fn default() -> Self {
        Self {
            subscriber_concurrency: 8,
            delivery_mode: DeliveryMode::Inline,
        }
    }
}

/// 投递结果统计
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DeliveryReport {
    /// 成功的订阅方调用数
    pub delivered: usize,
    /// 失败（错误或 panic）的订阅方调用数
    pub failed: usize,
    /// 转入后台投递的事件数
    pub detached: usize,
}

#[derive(Clone)]
pub struct EventFanout {
    registry: Arc<SubscriberRegistry>,
    config: EventFanoutConfig,
}

impl EventFanout {
    pub fn new(subscribers: Vec<Arc<dyn EventSubscriber>>) -> Self {
        Self::with_config(subscribers, EventFanoutConfig::default())
    }

    pub fn with_config(
        subscribers: Vec<Arc<dyn EventSubscriber>>,
        config: EventFanoutConfig,
    ) -> Self {
        Self {
            registry: Arc::new(SubscriberRegistry::new(subscribers)),
            config,
        }
    }

    pub fn config(&self) -> &EventFanoutConfig {
        &self.config
    }

    /// 按配置的模式投递
    pub async fn deliver(&self, records: Vec<EventRecord>) -> DeliveryReport {
        if records.is_empty() {
            return DeliveryReport::default();
        }

        match self.config.delivery_mode {
            DeliveryMode::Inline => self.deliver_inline(records).await,
            DeliveryMode::Detached => {
                let detached = records.len();
                let fanout = self.clone();
                tokio::spawn(async move {
                    let report = fanout.deliver_inline(records).await;
                    tracing::debug!(
                        delivered = report.delivered,
                        failed = report.failed,
                        "detached event delivery finished"
                    );
                });
                DeliveryReport {
                    detached,
                    ..DeliveryReport::default()
                }
            }
        }
    }

    /// 等待全部订阅方处理完成
    pub async fn deliver_inline(&self, records: Vec<EventRecord>) -> DeliveryReport {
        let calls: Vec<(Arc<dyn EventSubscriber>, Arc<EventRecord>)> = records
            .into_iter()
            .flat_map(|record| {
                let record = Arc::new(record);
                self.registry
                    .matching(record.event_type())
                    .into_iter()
                    .map(move |s| (s, record.clone()))
            })
            .collect();

        if calls.is_empty() {
            return DeliveryReport::default();
        }

        let concurrency = self.config.subscriber_concurrency.max(1);

        let deliveries: Vec<BoxFuture<'static, bool>> = calls
            .into_iter()
            .map(|(subscriber, record)| deliver_one(subscriber, record).boxed())
            .collect();

        stream::iter(deliveries)
            .buffer_unordered(concurrency)
            .fold(DeliveryReport::default(), |mut report, ok| async move {
                if ok {
                    report.delivered += 1;
                } else {
                    report.failed += 1;
                }
                report
            })
            .await
    }
}

/// 单个订阅方处理单条事件；错误与 panic 均记为失败
async fn deliver_one(subscriber: Arc<dyn EventSubscriber>, record: Arc<EventRecord>) -> bool {
    let outcome = AssertUnwindSafe(subscriber.handle(&record))
        .catch_unwind()
        .await;
    match outcome {
        Ok(Ok(())) => true,
        Ok(Err(err)) => {
            tracing::warn!(
                subscriber = subscriber.subscriber_name(),
                event_type = record.event_type(),
                event_id = record.event_id(),
                error = %err,
                "event subscriber failed"
            );
            false
        }
        Err(_) => {
            tracing::error!(
                subscriber = subscriber.subscriber_name(),
                event_type = record.event_type(),
                event_id = record.event_id(),
                "event subscriber panicked"
            );
            false
        }
    }
}

#[derive(Default)]
struct SubscriberRegistry {
    by_type: HashMap<String, Vec<Arc<dyn EventSubscriber>>>,
    all: Vec<Arc<dyn EventSubscriber>>,
}

impl SubscriberRegistry {
    fn new(subscribers: Vec<Arc<dyn EventSubscriber>>) -> Self {
        let mut by_type: HashMap<String, Vec<Arc<dyn EventSubscriber>>> = HashMap::new();
        let mut all: Vec<Arc<dyn EventSubscriber>> = Vec::new();

        for s in subscribers {
            match s.handled_event_type() {
                HandledEventType::All => all.push(s),
                HandledEventType::One(t) => {
                    by_type.entry(t).or_default().push(s);
                }
                HandledEventType::Many(ts) => {
                    for t in ts {
                        by_type.entry(t).or_default().push(s.clone());
                    }
                }
            }
        }

        Self { by_type, all }
    }

    fn matching(&self, event_type: &str) -> Vec<Arc<dyn EventSubscriber>> {
        let mut merged: Vec<Arc<dyn EventSubscriber>> = Vec::new();
        if let Some(list) = self.by_type.get(event_type) {
            merged.extend(list.iter().cloned());
        }
        merged.extend(self.all.iter().cloned());
        merged
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    fn record(event_type: &str) -> EventRecord {
        EventRecord::builder()
            .event_id(crate::domain_event::new_event_id())
            .event_type(event_type)
            .aggregate_id("1")
            .aggregate_type("Test")
            .build()
    }

    struct Counting {
        name: &'static str,
        handled: HandledEventType,
        seen: Arc<Mutex<Vec<String>>>,
    }

    #[async_trait]
    impl EventSubscriber for Counting {
        fn subscriber_name(&self) -> &str {
            self.name
        }
        fn handled_event_type(&self) -> HandledEventType {
            self.handled.clone()
        }
        async fn handle(&self, event: &EventRecord) -> anyhow::Result<()> {
            self.seen
                .lock()
                .unwrap()
                .push(format!("{}:{}", self.name, event.event_type()));
            Ok(())
        }
    }

    struct Failing;

    #[async_trait]
    impl EventSubscriber for Failing {
        fn subscriber_name(&self) -> &str {
            "failing"
        }
        fn handled_event_type(&self) -> HandledEventType {
            HandledEventType::All
        }
        async fn handle(&self, _event: &EventRecord) -> anyhow::Result<()> {
            anyhow::bail!("boom")
        }
    }

    struct Panicking;

    #[async_trait]
    impl EventSubscriber for Panicking {
        fn subscriber_name(&self) -> &str {
            "panicking"
        }
        fn handled_event_type(&self) -> HandledEventType {
            HandledEventType::One("A".into())
        }
        async fn handle(&self, _event: &EventRecord) -> anyhow::Result<()> {
            panic!("subscriber exploded")
        }
    }

    #[tokio::test]
    async fn routes_by_type_and_all() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let fanout = EventFanout::new(vec![
            Arc::new(Counting {
                name: "one",
                handled: HandledEventType::One("A".into()),
                seen: seen.clone(),
            }),
            Arc::new(Counting {
                name: "many",
                handled: HandledEventType::many(&["A", "B"]),
                seen: seen.clone(),
            }),
            Arc::new(Counting {
                name: "all",
                handled: HandledEventType::All,
                seen: seen.clone(),
            }),
        ]);

        let report = fanout
            .deliver(vec![record("A"), record("B"), record("C")])
            .await;

        assert_eq!(report.delivered, 6);
        assert_eq!(report.failed, 0);

        let mut got = seen.lock().unwrap().clone();
        got.sort();
        assert_eq!(
            got,
            vec!["all:A", "all:B", "all:C", "many:A", "many:B", "one:A"]
        );
    }

    #[tokio::test]
    async fn failures_and_panics_are_isolated() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let fanout = EventFanout::new(vec![
            Arc::new(Failing),
            Arc::new(Panicking),
            Arc::new(Counting {
                name: "ok",
                handled: HandledEventType::One("A".into()),
                seen: seen.clone(),
            }),
        ]);

        let report = fanout.deliver(vec![record("A")]).await;

        assert_eq!(report.delivered, 1);
        assert_eq!(report.failed, 2);
        assert_eq!(seen.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn no_records_means_no_calls() {
        let fanout = EventFanout::new(vec![Arc::new(Failing)]);
        assert_eq!(fanout.deliver(Vec::new()).await, DeliveryReport::default());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn detached_delivery_runs_in_background() {
        struct Tick(Arc<AtomicUsize>);

        #[async_trait]
        impl EventSubscriber for Tick {
            fn subscriber_name(&self) -> &str {
                "tick"
            }
            fn handled_event_type(&self) -> HandledEventType {
                HandledEventType::All
            }
            async fn handle(&self, _event: &EventRecord) -> anyhow::Result<()> {
                self.0.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }
        }

        let ticks = Arc::new(AtomicUsize::new(0));
        let fanout = EventFanout::with_config(
            vec![Arc::new(Tick(ticks.clone()))],
            EventFanoutConfig {
                subscriber_concurrency: 2,
                delivery_mode: DeliveryMode::Detached,
            },
        );

        let report = fanout.deliver(vec![record("A"), record("B")]).await;
        assert_eq!(report.detached, 2);
        assert_eq!(report.delivered, 0);

        for _ in 0..50 {
            if ticks.load(Ordering::SeqCst) == 2 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert_eq!(ticks.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn inline_delivery_can_run_on_a_spawned_task() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let fanout = EventFanout::with_config(
            vec![
                Arc::new(Failing),
                Arc::new(Counting {
                    name: "all",
                    handled: HandledEventType::All,
                    seen: seen.clone(),
                }),
            ],
            EventFanoutConfig {
                subscriber_concurrency: 1,
                delivery_mode: DeliveryMode::Inline,
            },
        );

        let report = tokio::spawn(async move {
            fanout
                .deliver_inline(vec![record("A"), record("B"), record("C")])
                .await
        })
        .await
        .unwrap();

        assert_eq!(report.delivered, 3);
        assert_eq!(report.failed, 3);
        assert_eq!(seen.lock().unwrap().len(), 3);
    }

    #[test]
    fn parses_delivery_mode() {
        assert_eq!("inline".parse::<DeliveryMode>(), Ok(DeliveryMode::Inline));
        assert_eq!(" Detached ".parse::<DeliveryMode>(), Ok(DeliveryMode::Detached));
        assert!("later".parse::<DeliveryMode>().is_err());
    }
}
