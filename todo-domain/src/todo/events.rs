use super::{ItemId, ListId, TodoItem};
use crate::domain_event::new_event_id;
use crate::entity::Entity;
use todo_macros::domain_event;

/// 待办事项生命周期事件
#[domain_event(version = 1)]
pub enum TodoItemEvent {
    Created {
        item_id: ItemId,
        list_id: ListId,
        title: String,
    },
    Completed {
        item_id: ItemId,
        list_id: ListId,
        title: String,
    },
    Deleted {
        item_id: ItemId,
        list_id: ListId,
        title: String,
    },
}

impl TodoItemEvent {
    /// 事件所属实体类型
    pub const AGGREGATE_TYPE: &'static str = "TodoItem";

    pub fn created(item: &TodoItem) -> Self {
        TodoItemEvent::Created {
            id: new_event_id(),
            item_id: *item.id(),
            list_id: item.list_id,
            title: item.title.clone(),
        }
    }

    pub fn completed(item: &TodoItem) -> Self {
        TodoItemEvent::Completed {
            id: new_event_id(),
            item_id: *item.id(),
            list_id: item.list_id,
            title: item.title.clone(),
        }
    }

    pub fn deleted(item: &TodoItem) -> Self {
        TodoItemEvent::Deleted {
            id: new_event_id(),
            item_id: *item.id(),
            list_id: item.list_id,
            title: item.title.clone(),
        }
    }

    pub fn item_id(&self) -> ItemId {
        match self {
            TodoItemEvent::Created { item_id, .. }
            | TodoItemEvent::Completed { item_id, .. }
            | TodoItemEvent::Deleted { item_id, .. } => *item_id,
        }
    }
}
