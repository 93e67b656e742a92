use crate::{
    context::AppContext,
    error::AppResult,
    handler::{Handled, RequestHandler},
};
use async_trait::async_trait;
use std::sync::Arc;
use todo_domain::persist::TodoStore;
use todo_macros::request;

/// 清空全部清单；仅管理员可调用
#[request(name = "PurgeTodoLists")]
#[derive(Default)]
pub struct PurgeTodoLists;

impl PurgeTodoLists {
    pub const REQUIRED_ROLE: &'static str = "Administrator";
}

pub struct PurgeTodoListsHandler {
    store: Arc<dyn TodoStore>,
}

impl PurgeTodoListsHandler {
    pub fn new(store: Arc<dyn TodoStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl RequestHandler<PurgeTodoLists> for PurgeTodoListsHandler {
    async fn handle(&self, ctx: &AppContext, _request: PurgeTodoLists) -> AppResult<Handled<()>> {
        let mut tx = self.store.begin().await?;
        tx.remove_all_lists().await?;
        tx.commit().await?;

        tracing::info!(subject = ctx.actor_id().unwrap_or_default(), "todo lists purged");
        Ok(Handled::new(()))
    }
}
