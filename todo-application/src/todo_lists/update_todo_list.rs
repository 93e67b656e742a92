use crate::{
    context::AppContext,
    error::{AppError, AppResult},
    handler::{Handled, RequestHandler},
    validation::{ValidationErrors, Validator, check_title},
};
use async_trait::async_trait;
use std::sync::Arc;
use todo_domain::persist::TodoStore;
use todo_domain::todo::ListId;
use todo_macros::request;

#[request(name = "UpdateTodoList")]
pub struct UpdateTodoList {
    pub id: ListId,
    pub title: String,
}

pub struct UpdateTodoListValidator;

impl Validator<UpdateTodoList> for UpdateTodoListValidator {
    fn validate(&self, request: &UpdateTodoList, errors: &mut ValidationErrors) {
        check_title(errors, "title", &request.title);
    }
}

pub struct UpdateTodoListHandler {
    store: Arc<dyn TodoStore>,
}

impl UpdateTodoListHandler {
    pub fn new(store: Arc<dyn TodoStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl RequestHandler<UpdateTodoList> for UpdateTodoListHandler {
    async fn handle(&self, _ctx: &AppContext, request: UpdateTodoList) -> AppResult<Handled<()>> {
        let mut tx = self.store.begin().await?;

        let Some(mut list) = tx.find_list(&request.id).await? else {
            return Err(AppError::not_found("TodoList", request.id));
        };

        if tx.list_title_exists(&request.title, Some(&request.id)).await? {
            return Err(AppError::invalid("title", "The specified title already exists."));
        }

        list.title = request.title;
        tx.update_list(list).await?;
        tx.commit().await?;

        Ok(Handled::new(()))
    }
}
