use crate::{context::AppContext, error::AppResult, request::Request};
use async_trait::async_trait;
use todo_domain::domain_event::EventRecord;

/// 处理结果：响应值 + 事务内排队的事件（出箱）
///
/// 调度器仅在处理成功后取出事件并投递；处理失败时出箱随错误一并丢弃。
#[derive(Debug)]
pub struct Handled<T> {
    value: T,
    events: Vec<EventRecord>,
}

impl<T> Handled<T> {
    pub fn new(value: T) -> Self {
        Self {
            value,
            events: Vec::new(),
        }
    }

    pub fn with_events(value: T, events: Vec<EventRecord>) -> Self {
        Self { value, events }
    }

    pub fn push_event(&mut self, record: EventRecord) {
        self.events.push(record);
    }

    pub fn value(&self) -> &T {
        &self.value
    }

    pub fn events(&self) -> &[EventRecord] {
        &self.events
    }

    pub fn into_parts(self) -> (T, Vec<EventRecord>) {
        (self.value, self.events)
    }
}

#[async_trait]
pub trait RequestHandler<R>: Send + Sync
where
    R: Request,
{
    async fn handle(&self, ctx: &AppContext, request: R) -> AppResult<Handled<R::Response>>;
}
