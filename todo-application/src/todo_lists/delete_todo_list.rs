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

/// 删除清单及其全部事项
#[request(name = "DeleteTodoList")]
pub struct DeleteTodoList {
    pub id: ListId,
}

pub struct DeleteTodoListHandler {
    store: Arc<dyn TodoStore>,
}

impl DeleteTodoListHandler {
    pub fn new(store: Arc<dyn TodoStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl RequestHandler<DeleteTodoList> for DeleteTodoListHandler {
    async fn handle(&self, _ctx: &AppContext, request: DeleteTodoList) -> AppResult<Handled<()>> {
        let mut tx = self.store.begin().await?;

        if tx.find_list(&request.id).await?.is_none() {
            return Err(AppError::not_found("TodoList", request.id));
        }

        tx.remove_list(&request.id).await?;
        tx.commit().await?;

        Ok(Handled::new(()))
    }
}
