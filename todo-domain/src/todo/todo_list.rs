use super::{Colour, ListId};
use todo_macros::entity;

/// 待办清单
#[entity(id = ListId)]
pub struct TodoList {
    pub title: String,
    #[serde(default)]
    pub colour: Colour,
}

impl TodoList {
    /// 新建尚未持久化的清单（标识由存储分配）
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: ListId::default(),
            title: title.into(),
            colour: Colour::default(),
        }
    }
}
