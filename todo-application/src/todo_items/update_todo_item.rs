use super::record;
use crate::{
    context::AppContext,
    error::{AppError, AppResult},
    handler::{Handled, RequestHandler},
    validation::{ValidationErrors, Validator, check_title},
};
use async_trait::async_trait;
use std::sync::Arc;
use todo_domain::persist::TodoStore;
use todo_domain::todo::{ItemId, TodoItemEvent};
use todo_macros::request;

#[request(name = "UpdateTodoItem")]
pub struct UpdateTodoItem {
    pub id: ItemId,
    pub title: String,
    pub done: bool,
}

pub struct UpdateTodoItemValidator;

impl Validator<UpdateTodoItem> for UpdateTodoItemValidator {
    fn validate(&self, request: &UpdateTodoItem, errors: &mut ValidationErrors) {
        check_title(errors, "title", &request.title);
    }
}

pub struct UpdateTodoItemHandler {
    store: Arc<dyn TodoStore>,
}

impl UpdateTodoItemHandler {
    pub fn new(store: Arc<dyn TodoStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl RequestHandler<UpdateTodoItem> for UpdateTodoItemHandler {
    async fn handle(&self, ctx: &AppContext, request: UpdateTodoItem) -> AppResult<Handled<()>> {
        let mut tx = self.store.begin().await?;

        let Some(mut item) = tx.find_item(&request.id).await? else {
            return Err(AppError::not_found("TodoItem", request.id));
        };

        item.title = request.title;
        let mut handled = Handled::new(());
        if item.set_done(request.done) {
            handled.push_event(record(ctx, &TodoItemEvent::completed(&item))?);
        }

        tx.update_item(item).await?;
        tx.commit().await?;

        Ok(handled)
    }
}
