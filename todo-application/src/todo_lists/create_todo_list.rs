use crate::{
    context::AppContext,
    error::{AppError, AppResult},
    handler::{Handled, RequestHandler},
    validation::{ValidationErrors, Validator, check_title},
};
use async_trait::async_trait;
use std::sync::Arc;
use todo_domain::persist::TodoStore;
use todo_domain::todo::{ListId, TodoList};
use todo_macros::request;

#[request(name = "CreateTodoList", response = ListId)]
pub struct CreateTodoList {
    pub title: String,
}

pub struct CreateTodoListValidator;

impl Validator<CreateTodoList> for CreateTodoListValidator {
    fn validate(&self, request: &CreateTodoList, errors: &mut ValidationErrors) {
        check_title(errors, "title", &request.title);
    }
}

pub struct CreateTodoListHandler {
    store: Arc<dyn TodoStore>,
}

impl CreateTodoListHandler {
    pub fn new(store: Arc<dyn TodoStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl RequestHandler<CreateTodoList> for CreateTodoListHandler {
    async fn handle(&self, _ctx: &AppContext, request: CreateTodoList) -> AppResult<Handled<ListId>> {
        let mut tx = self.store.begin().await?;

        // 唯一性依赖存储状态，在事务内检查
        if tx.list_title_exists(&request.title, None).await? {
            return Err(AppError::invalid("title", "The specified title already exists."));
        }

        let id = tx.add_list(TodoList::new(request.title)).await?;
        tx.commit().await?;

        Ok(Handled::new(id))
    }
}
