use crate::{
    context::AppContext,
    error::{AppError, AppResult},
    handler::{Handled, RequestHandler},
};
use async_trait::async_trait;
use std::sync::Arc;
use todo_domain::persist::TodoStore;
use todo_domain::todo::{ItemId, ListId, PriorityLevel};
use todo_macros::request;

/// 更新事项所属清单、优先级与备注
#[request(name = "UpdateTodoItemDetail")]
pub struct UpdateTodoItemDetail {
    pub id: ItemId,
    pub list_id: ListId,
    pub priority: PriorityLevel,
    pub note: Option<String>,
}

pub struct UpdateTodoItemDetailHandler {
    store: Arc<dyn TodoStore>,
}

impl UpdateTodoItemDetailHandler {
    pub fn new(store: Arc<dyn TodoStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl RequestHandler<UpdateTodoItemDetail> for UpdateTodoItemDetailHandler {
    async fn handle(
        &self,
        _ctx: &AppContext,
        request: UpdateTodoItemDetail,
    ) -> AppResult<Handled<()>> {
        let mut tx = self.store.begin().await?;

        let Some(mut item) = tx.find_item(&request.id).await? else {
            return Err(AppError::not_found("TodoItem", request.id));
        };

        item.list_id = request.list_id;
        item.priority = request.priority;
        item.note = request.note;

        tx.update_item(item).await?;
        tx.commit().await?;

        Ok(Handled::new(()))
    }
}
