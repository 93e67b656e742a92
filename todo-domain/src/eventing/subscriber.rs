//! 事件订阅方（EventSubscriber）
//!
//! 定义消费某类/多类/全部事件的处理逻辑与元信息（名称、订阅类型）。
//!
use crate::domain_event::EventRecord;
use async_trait::async_trait;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HandledEventType {
    One(String),
    Many(Vec<String>),
    All,
}

impl HandledEventType {
    /// 便于由 `EVENT_TYPES` 常量构造
    pub fn many(types: &[&str]) -> Self {
        HandledEventType::Many(types.iter().map(|t| t.to_string()).collect())
    }
}

/// 事件订阅方：处理已提交的事件
#[async_trait]
pub trait EventSubscriber: Send + Sync {
    /// 订阅方名称（用于日志）
    fn subscriber_name(&self) -> &str;
    /// 返回该订阅方关心的事件类型
    fn handled_event_type(&self) -> HandledEventType;
    /// 处理事件
    async fn handle(&self, event: &EventRecord) -> anyhow::Result<()>;
}
