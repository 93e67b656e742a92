//! 待办清单用例
//!
mod create_todo_list;
mod delete_todo_list;
mod dtos;
mod get_todo;
mod get_todos;
mod purge_todo_lists;
mod update_todo_list;

pub use create_todo_list::{CreateTodoList, CreateTodoListHandler, CreateTodoListValidator};
pub use delete_todo_list::{DeleteTodoList, DeleteTodoListHandler};
pub use dtos::{TodoItemDto, TodoListDto, TodosVm};
pub use get_todo::{GetTodo, GetTodoHandler};
pub use get_todos::{GetTodos, GetTodosHandler};
pub use purge_todo_lists::{PurgeTodoLists, PurgeTodoListsHandler};
pub use update_todo_list::{UpdateTodoList, UpdateTodoListHandler, UpdateTodoListValidator};
