use crate::dto::{Dto, LookupDto};
use serde::Serialize;
use todo_domain::todo::{TodoItem, TodoList};

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TodosVm {
    pub priority_levels: Vec<LookupDto>,
    pub lists: Vec<TodoListDto>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoListDto {
    pub id: i64,
    pub title: String,
    pub colour: String,
    pub items: Vec<TodoItemDto>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoItemDto {
    pub id: i64,
    pub list_id: i64,
    pub title: String,
    pub done: bool,
    pub priority: i32,
    pub note: Option<String>,
}

impl Dto for TodosVm {}
impl Dto for TodoListDto {}
impl Dto for TodoItemDto {}

impl TodoListDto {
    pub fn from_list(list: TodoList, items: Vec<TodoItem>) -> Self {
        Self {
            id: *list.id.value(),
            title: list.title,
            colour: list.colour.code().to_string(),
            items: items.into_iter().map(TodoItemDto::from).collect(),
        }
    }
}

impl From<TodoItem> for TodoItemDto {
    fn from(item: TodoItem) -> Self {
        Self {
            id: *item.id.value(),
            list_id: *item.list_id.value(),
            done: item.is_done(),
            priority: item.priority.value(),
            title: item.title,
            note: item.note,
        }
    }
}
