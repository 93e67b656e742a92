use super::record;
use crate::{
    context::AppContext,
    error::{AppError, AppResult},
    handler::{Handled, RequestHandler},
};
use async_trait::async_trait;
use std::sync::Arc;
use todo_domain::persist::TodoStore;
use todo_domain::todo::{ItemId, TodoItemEvent};
use todo_macros::request;

#[request(name = "DeleteTodoItem")]
pub struct DeleteTodoItem {
    pub id: ItemId,
}

pub struct DeleteTodoItemHandler {
    store: Arc<dyn TodoStore>,
}

impl DeleteTodoItemHandler {
    pub fn new(store: Arc<dyn TodoStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl RequestHandler<DeleteTodoItem> for DeleteTodoItemHandler {
    async fn handle(&self, ctx: &AppContext, request: DeleteTodoItem) -> AppResult<Handled<()>> {
        let mut tx = self.store.begin().await?;

        let Some(item) = tx.find_item(&request.id).await? else {
            return Err(AppError::not_found("TodoItem", request.id));
        };

        let event = record(ctx, &TodoItemEvent::deleted(&item))?;
        tx.remove_item(&request.id).await?;
        tx.commit().await?;

        Ok(Handled::with_events((), vec![event]))
    }
}
