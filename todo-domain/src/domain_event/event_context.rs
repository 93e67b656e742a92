use bon::Builder;
use serde::{Deserialize, Serialize};

/// 事件产生时的业务上下文
#[derive(Builder, Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventContext {
    /// 关联ID（同一次请求产生的事件共享）
    correlation_id: Option<String>,
    /// 触发事件的主体ID
    actor_id: Option<String>,
}

impl EventContext {
    pub fn correlation_id(&self) -> Option<&str> {
        self.correlation_id.as_deref()
    }

    pub fn actor_id(&self) -> Option<&str> {
        self.actor_id.as_deref()
    }
}
