use super::TodoItemEvent;
use crate::domain_event::EventRecord;
use crate::eventing::{EventSubscriber, HandledEventType};
use async_trait::async_trait;

/// 记录待办事项事件的订阅方
#[derive(Clone, Debug, Default)]
pub struct TodoItemEventLogger;

#[async_trait]
impl EventSubscriber for TodoItemEventLogger {
    fn subscriber_name(&self) -> &str {
        "todo-item-event-logger"
    }

    fn handled_event_type(&self) -> HandledEventType {
        HandledEventType::many(TodoItemEvent::EVENT_TYPES)
    }

    async fn handle(&self, event: &EventRecord) -> anyhow::Result<()> {
        let payload: TodoItemEvent = event.decode()?;
        tracing::info!(
            event_type = event.event_type(),
            event_id = event.event_id(),
            item_id = %payload.item_id(),
            correlation_id = event.correlation_id().unwrap_or_default(),
            "todo item event"
        );
        Ok(())
    }
}
