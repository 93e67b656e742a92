use super::dtos::TodoListDto;
use crate::{
    context::AppContext,
    error::{AppError, AppResult},
    handler::{Handled, RequestHandler},
};
use async_trait::async_trait;
use std::sync::Arc;
use todo_domain::persist::TodoStore;
use todo_domain::todo::ListId;
use todo_macros::request;

#[request(name = "GetTodo", response = TodoListDto)]
pub struct GetTodo {
    pub id: ListId,
}

pub struct GetTodoHandler {
    store: Arc<dyn TodoStore>,
}

impl GetTodoHandler {
    pub fn new(store: Arc<dyn TodoStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl RequestHandler<GetTodo> for GetTodoHandler {
    async fn handle(&self, _ctx: &AppContext, request: GetTodo) -> AppResult<Handled<TodoListDto>> {
        let tx = self.store.begin().await?;

        let Some(list) = tx.find_list(&request.id).await? else {
            return Err(AppError::not_found("TodoList", request.id));
        };
        let items = tx.items_of(&list.id).await?;

        Ok(Handled::new(TodoListDto::from_list(list, items)))
    }
}
