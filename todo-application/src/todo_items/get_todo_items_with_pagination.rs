use super::dtos::TodoItemBriefDto;
use crate::{
    context::AppContext,
    dto::PaginatedList,
    error::AppResult,
    handler::{Handled, RequestHandler},
    validation::{ValidationErrors, Validator},
};
use async_trait::async_trait;
use std::sync::Arc;
use todo_domain::persist::TodoStore;
use todo_domain::todo::ListId;
use todo_macros::request;

#[request(
    name = "GetTodoItemsWithPagination",
    response = PaginatedList<TodoItemBriefDto>
)]
pub struct GetTodoItemsWithPagination {
    pub list_id: ListId,
    pub page_number: u32,
    pub page_size: u32,
}

pub struct GetTodoItemsWithPaginationValidator;

impl Validator<GetTodoItemsWithPagination> for GetTodoItemsWithPaginationValidator {
    fn validate(&self, request: &GetTodoItemsWithPagination, errors: &mut ValidationErrors) {
        errors.ensure(
            request.list_id.is_assigned(),
            "listId",
            "ListId is required.",
        );
        errors.ensure(
            request.page_number >= 1,
            "pageNumber",
            "PageNumber at least greater than or equal to 1.",
        );
        errors.ensure(
            request.page_size >= 1,
            "pageSize",
            "PageSize at least greater than or equal to 1.",
        );
    }
}

pub struct GetTodoItemsWithPaginationHandler {
    store: Arc<dyn TodoStore>,
}

impl GetTodoItemsWithPaginationHandler {
    pub fn new(store: Arc<dyn TodoStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl RequestHandler<GetTodoItemsWithPagination> for GetTodoItemsWithPaginationHandler {
    async fn handle(
        &self,
        _ctx: &AppContext,
        request: GetTodoItemsWithPagination,
    ) -> AppResult<Handled<PaginatedList<TodoItemBriefDto>>> {
        let tx = self.store.begin().await?;

        let items = tx
            .items_of(&request.list_id)
            .await?
            .into_iter()
            .map(TodoItemBriefDto::from)
            .collect();

        Ok(Handled::new(PaginatedList::paginate(
            items,
            request.page_number,
            request.page_size,
        )))
    }
}
