use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fmt;

/// 领域事件载荷需要满足的通用能力边界
pub trait DomainEvent:
    Clone + PartialEq + fmt::Debug + Serialize + DeserializeOwned + Send + Sync
{
    /// 事件唯一标识
    fn event_id(&self) -> &str;

    /// 事件类型（形如 `TodoItemEvent.Created` 或自定义类型名）
    fn event_type(&self) -> &str;

    /// 事件载荷版本
    fn event_version(&self) -> usize;
}

/// 生成新的事件标识
pub fn new_event_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
