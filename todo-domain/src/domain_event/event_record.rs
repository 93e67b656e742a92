//! 事件记录（EventRecord）
//!
//! 处理器在事务内排队的事件，以序列化后的形态返回给调度器，
//! 提交成功后由 `EventFanout` 投递给订阅方。
//!
use super::{DomainEvent, EventContext};
use crate::error::DomainResult;
use bon::Builder;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Builder, Serialize, Deserialize)]
pub struct EventRecord {
    /// 事件唯一标识符
    #[builder(into)]
    event_id: String,
    /// 事件类型，订阅方据此匹配
    #[builder(into)]
    event_type: String,
    /// 事件载荷版本
    #[builder(default = 1)]
    event_version: usize,
    /// 事件所属实体的 ID
    #[builder(into)]
    aggregate_id: String,
    /// 事件所属实体的类型
    #[builder(into)]
    aggregate_type: String,
    /// 关联 ID，用于将多个事件关联到同一个请求
    correlation_id: Option<String>,
    /// 触发事件的主体 ID
    actor_id: Option<String>,
    /// 事件发生时间
    #[builder(default = Utc::now())]
    occurred_at: DateTime<Utc>,
    /// 事件负载
    #[builder(default)]
    payload: Value,
}

impl EventRecord {
    /// 由领域事件与上下文构造事件记录
    pub fn from_event<E>(
        aggregate_type: &str,
        aggregate_id: impl ToString,
        event: &E,
        context: &EventContext,
    ) -> DomainResult<Self>
    where
        E: DomainEvent,
    {
        Ok(EventRecord {
            event_id: event.event_id().to_string(),
            event_type: event.event_type().to_string(),
            event_version: event.event_version(),
            aggregate_id: aggregate_id.to_string(),
            aggregate_type: aggregate_type.to_string(),
            correlation_id: context.correlation_id().map(str::to_string),
            actor_id: context.actor_id().map(str::to_string),
            occurred_at: Utc::now(),
            payload: serde_json::to_value(event)?,
        })
    }

    /// 将负载还原为领域事件
    pub fn decode<E>(&self) -> DomainResult<E>
    where
        E: DomainEvent,
    {
        Ok(serde_json::from_value(self.payload.clone())?)
    }

    pub fn event_id(&self) -> &str {
        &self.event_id
    }

    pub fn event_type(&self) -> &str {
        &self.event_type
    }

    pub fn event_version(&self) -> usize {
        self.event_version
    }

    pub fn aggregate_id(&self) -> &str {
        &self.aggregate_id
    }

    pub fn aggregate_type(&self) -> &str {
        &self.aggregate_type
    }

    pub fn correlation_id(&self) -> Option<&str> {
        self.correlation_id.as_deref()
    }

    pub fn actor_id(&self) -> Option<&str> {
        self.actor_id.as_deref()
    }

    pub fn occurred_at(&self) -> DateTime<Utc> {
        self.occurred_at
    }

    pub fn payload(&self) -> &Value {
        &self.payload
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain_event::new_event_id;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    enum PingEvent {
        Pinged { id: String, times: u32 },
    }

    impl DomainEvent for PingEvent {
        fn event_id(&self) -> &str {
            match self {
                PingEvent::Pinged { id, .. } => id,
            }
        }

        fn event_type(&self) -> &str {
            "PingEvent.Pinged"
        }

        fn event_version(&self) -> usize {
            2
        }
    }

    #[test]
    fn from_event_copies_metadata_and_context() {
        let event = PingEvent::Pinged {
            id: new_event_id(),
            times: 3,
        };
        let ctx = EventContext::builder()
            .correlation_id("corr-1".to_string())
            .actor_id("user-7".to_string())
            .build();

        let record = EventRecord::from_event("Ping", 42, &event, &ctx).unwrap();

        assert_eq!(record.event_id(), event.event_id());
        assert_eq!(record.event_type(), "PingEvent.Pinged");
        assert_eq!(record.event_version(), 2);
        assert_eq!(record.aggregate_type(), "Ping");
        assert_eq!(record.aggregate_id(), "42");
        assert_eq!(record.correlation_id(), Some("corr-1"));
        assert_eq!(record.actor_id(), Some("user-7"));

        let decoded: PingEvent = record.decode().unwrap();
        assert_eq!(decoded, event);
    }

    #[test]
    fn builder_defaults_version_and_payload() {
        let record = EventRecord::builder()
            .event_id("e-1")
            .event_type("Any.Thing")
            .aggregate_id("1")
            .aggregate_type("Any")
            .build();

        assert_eq!(record.event_version(), 1);
        assert!(record.payload().is_null());
        assert!(record.correlation_id().is_none());
    }
}
