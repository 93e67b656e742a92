//! 领域事件（Domain Event）
//!
//! 定义事件载荷需要实现的最小接口（`DomainEvent`），事件产生时的上下文
//! （`EventContext`），以及在出箱（outbox）与订阅方之间流转的序列化形态
//! `EventRecord`。

mod domain_event_trait;
mod event_context;
mod event_record;

pub use domain_event_trait::{DomainEvent, new_event_id};
pub use event_context::EventContext;
pub use event_record::EventRecord;
