//! 待办用例装配
//!
//! 启动期构建注册表、校验器与授权策略；任何装配错误都以 `?` 立即返回。
//!
use crate::{
    behavior::{AuthorizationPolicy, PerformanceBehavior, ValidationBehavior, default_chain},
    dispatcher::{Dispatcher, DispatcherConfig},
    error::AppResult,
    registry::HandlerRegistry,
    todo_items::*,
    todo_lists::*,
};
use std::sync::Arc;
use std::time::Duration;
use todo_domain::eventing::EventFanout;
use todo_domain::persist::TodoStore;

/// 注册全部待办处理器
pub fn todo_registry(store: Arc<dyn TodoStore>) -> AppResult<HandlerRegistry> {
    HandlerRegistry::new()
        .with::<GetTodos, _>(GetTodosHandler::new(store.clone()))?
        .with::<GetTodo, _>(GetTodoHandler::new(store.clone()))?
        .with::<CreateTodoList, _>(CreateTodoListHandler::new(store.clone()))?
        .with::<UpdateTodoList, _>(UpdateTodoListHandler::new(store.clone()))?
        .with::<DeleteTodoList, _>(DeleteTodoListHandler::new(store.clone()))?
        .with::<PurgeTodoLists, _>(PurgeTodoListsHandler::new(store.clone()))?
        .with::<GetTodoItemsWithPagination, _>(GetTodoItemsWithPaginationHandler::new(
            store.clone(),
        ))?
        .with::<CreateTodoItem, _>(CreateTodoItemHandler::new(store.clone()))?
        .with::<UpdateTodoItem, _>(UpdateTodoItemHandler::new(store.clone()))?
        .with::<UpdateTodoItemDetail, _>(UpdateTodoItemDetailHandler::new(store.clone()))?
        .with::<DeleteTodoItem, _>(DeleteTodoItemHandler::new(store))
}

pub fn todo_validation() -> ValidationBehavior {
    ValidationBehavior::new()
        .validator::<CreateTodoList, _>(CreateTodoListValidator)
        .validator::<UpdateTodoList, _>(UpdateTodoListValidator)
        .validator::<GetTodoItemsWithPagination, _>(GetTodoItemsWithPaginationValidator)
        .validator::<CreateTodoItem, _>(CreateTodoItemValidator)
        .validator::<UpdateTodoItem, _>(UpdateTodoItemValidator)
}

/// 写操作要求已认证主体，清空操作另需管理员角色
pub fn todo_authorization() -> AuthorizationPolicy {
    AuthorizationPolicy::new()
        .protect::<CreateTodoList>()
        .protect::<UpdateTodoList>()
        .protect::<DeleteTodoList>()
        .require_role::<PurgeTodoLists>(PurgeTodoLists::REQUIRED_ROLE)
        .protect::<CreateTodoItem>()
        .protect::<UpdateTodoItem>()
        .protect::<UpdateTodoItemDetail>()
        .protect::<DeleteTodoItem>()
}

/// 调度器装配参数
#[derive(Clone, Debug)]
pub struct TodoSetup {
    pub dispatcher: DispatcherConfig,
    pub slow_request_threshold: Duration,
}

impl Default for TodoSetup {
    fn default() -> Self {
        Self {
            dispatcher: DispatcherConfig::default(),
            slow_request_threshold: PerformanceBehavior::DEFAULT_THRESHOLD,
        }
    }
}

/// 以默认行为链装配待办调度器
pub fn todo_dispatcher(
    store: Arc<dyn TodoStore>,
    fanout: Option<EventFanout>,
    setup: TodoSetup,
) -> AppResult<Dispatcher> {
    let registry = todo_registry(store)?;
    tracing::info!(handlers = ?registry.registered(), "todo handlers registered");

    Ok(Dispatcher::builder()
        .registry(registry)
        .behaviors(default_chain(
            todo_authorization(),
            todo_validation(),
            setup.slow_request_threshold,
        ))
        .maybe_fanout(fanout)
        .config(setup.dispatcher)
        .build())
}
