use crate::dto::Dto;
use serde::Serialize;
use todo_domain::todo::TodoItem;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoItemBriefDto {
    pub id: i64,
    pub list_id: i64,
    pub title: String,
    pub done: bool,
}

impl Dto for TodoItemBriefDto {}

impl From<TodoItem> for TodoItemBriefDto {
    fn from(item: TodoItem) -> Self {
        Self {
            id: *item.id.value(),
            list_id: *item.list_id.value(),
            done: item.is_done(),
            title: item.title,
        }
    }
}
