use super::record;
use crate::{
    context::AppContext,
    error::AppResult,
    handler::{Handled, RequestHandler},
    validation::{ValidationErrors, Validator, check_title},
};
use async_trait::async_trait;
use std::sync::Arc;
use todo_domain::persist::TodoStore;
use todo_domain::todo::{ItemId, ListId, TodoItem, TodoItemEvent};
use todo_macros::request;

/// 新建事项；不校验清单是否存在
#[request(name = "CreateTodoItem", response = ItemId)]
pub struct CreateTodoItem {
    pub list_id: ListId,
    pub title: String,
}

pub struct CreateTodoItemValidator;

impl Validator<CreateTodoItem> for CreateTodoItemValidator {
    fn validate(&self, request: &CreateTodoItem, errors: &mut ValidationErrors) {
        check_title(errors, "title", &request.title);
    }
}

pub struct CreateTodoItemHandler {
    store: Arc<dyn TodoStore>,
}

impl CreateTodoItemHandler {
    pub fn new(store: Arc<dyn TodoStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl RequestHandler<CreateTodoItem> for CreateTodoItemHandler {
    async fn handle(&self, ctx: &AppContext, request: CreateTodoItem) -> AppResult<Handled<ItemId>> {
        let mut tx = self.store.begin().await?;

        let mut item = TodoItem::new(request.list_id, request.title);
        item.id = tx.add_item(item.clone()).await?;
        let event = record(ctx, &TodoItemEvent::created(&item))?;

        tx.commit().await?;

        Ok(Handled::with_events(item.id, vec![event]))
    }
}
