use super::{ItemId, ListId, PriorityLevel};
use todo_macros::entity;

/// 待办事项
#[entity(id = ItemId)]
pub struct TodoItem {
    pub list_id: ListId,
    pub title: String,
    pub note: Option<String>,
    #[serde(default)]
    pub priority: PriorityLevel,
    #[serde(default)]
    done: bool,
}

impl TodoItem {
    pub fn new(list_id: ListId, title: impl Into<String>) -> Self {
        Self {
            id: ItemId::default(),
            list_id,
            title: title.into(),
            note: None,
            priority: PriorityLevel::None,
            done: false,
        }
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    /// 设置完成状态；仅在 false → true 时返回 true（调用方据此排队完成事件）
    pub fn set_done(&mut self, done: bool) -> bool {
        let completed = done && !self.done;
        self.done = done;
        completed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::Entity;

    #[test]
    fn completing_reports_transition_once() {
        let mut item = TodoItem::new(ListId::new(1), "Buy milk");
        assert!(!item.is_done());
        assert!(item.set_done(true));
        assert!(!item.set_done(true));
        assert!(!item.set_done(false));
        assert!(item.set_done(true));
    }

    #[test]
    fn new_item_is_unassigned() {
        let item = TodoItem::new(ListId::new(1), "x");
        assert!(!item.id().is_assigned());
        assert_eq!(item.priority, PriorityLevel::None);
    }
}
