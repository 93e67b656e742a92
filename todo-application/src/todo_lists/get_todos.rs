use super::dtos::{TodoListDto, TodosVm};
use crate::{
    context::AppContext,
    dto::LookupDto,
    error::AppResult,
    handler::{Handled, RequestHandler},
};
use async_trait::async_trait;
use std::sync::Arc;
use todo_domain::persist::TodoStore;
use todo_domain::todo::PriorityLevel;
use todo_macros::request;

/// 全部清单（含事项）与优先级列表
#[request(name = "GetTodos", response = TodosVm)]
#[derive(Default)]
pub struct GetTodos;

pub struct GetTodosHandler {
    store: Arc<dyn TodoStore>,
}

impl GetTodosHandler {
    pub fn new(store: Arc<dyn TodoStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl RequestHandler<GetTodos> for GetTodosHandler {
    async fn handle(&self, _ctx: &AppContext, _request: GetTodos) -> AppResult<Handled<TodosVm>> {
        let tx = self.store.begin().await?;

        let mut lists = Vec::new();
        for list in tx.lists().await? {
            let items = tx.items_of(&list.id).await?;
            lists.push(TodoListDto::from_list(list, items));
        }

        let priority_levels = PriorityLevel::ALL
            .into_iter()
            .map(|p| LookupDto {
                id: p.value(),
                title: p.name().to_string(),
            })
            .collect();

        Ok(Handled::new(TodosVm {
            priority_levels,
            lists,
        }))
    }
}
