//! 待办事项用例
//!
//! 写操作在同一事务内排队 `TodoItemEvent`，随处理结果返回给调度器。
//!
mod create_todo_item;
mod delete_todo_item;
mod dtos;
mod get_todo_items_with_pagination;
mod update_todo_item;
mod update_todo_item_detail;

pub use create_todo_item::{CreateTodoItem, CreateTodoItemHandler, CreateTodoItemValidator};
pub use delete_todo_item::{DeleteTodoItem, DeleteTodoItemHandler};
pub use dtos::TodoItemBriefDto;
pub use get_todo_items_with_pagination::{
    GetTodoItemsWithPagination, GetTodoItemsWithPaginationHandler,
    GetTodoItemsWithPaginationValidator,
};
pub use update_todo_item::{UpdateTodoItem, UpdateTodoItemHandler, UpdateTodoItemValidator};
pub use update_todo_item_detail::{UpdateTodoItemDetail, UpdateTodoItemDetailHandler};

use crate::{context::AppContext, error::AppResult};
use todo_domain::domain_event::EventRecord;
use todo_domain::todo::TodoItemEvent;

fn record(ctx: &AppContext, event: &TodoItemEvent) -> AppResult<EventRecord> {
    Ok(EventRecord::from_event(
        TodoItemEvent::AGGREGATE_TYPE,
        event.item_id(),
        event,
        &ctx.event_context(),
    )?)
}
