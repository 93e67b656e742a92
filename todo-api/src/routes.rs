//! HTTP 路由：`/api` 前缀
//!
//! 每个处理函数只做适配：提取路径/查询/请求体与调用上下文，
//! 构造请求并交给调度器，结果按统一映射表返回。
//!
use axum::{
    Json, Router,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    middleware,
    response::Response,
    routing::{get, put},
};
use serde::Deserialize;
use todo_application::{
    error::AppError,
    todo_items::{
        CreateTodoItem, DeleteTodoItem, GetTodoItemsWithPagination, UpdateTodoItem,
        UpdateTodoItemDetail,
    },
    todo_lists::{
        CreateTodoList, DeleteTodoList, GetTodo, GetTodos, PurgeTodoLists, UpdateTodoList,
    },
};
use todo_domain::todo::{ItemId, ListId, PriorityLevel};
use tower_http::trace::TraceLayer;

use crate::{
    auth,
    state::AppState,
    transport::{ApiResult, CallContext, send},
};

pub fn app_router(state: AppState) -> Router {
    let todo = Router::new()
        .route(
            "/todolists",
            get(get_todos).post(create_todo_list).delete(purge_todo_lists),
        )
        .route(
            "/todolists/{id}",
            get(get_todo).put(update_todo_list).delete(delete_todo_list),
        )
        .route(
            "/todolists/{id}/items",
            get(get_todo_items).post(create_todo_item),
        )
        .route(
            "/todoitems/{id}",
            put(update_todo_item).delete(delete_todo_item),
        )
        .route("/todoitems/{id}/detail", put(update_todo_item_detail))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_subject,
        ));

    let api = Router::new().route("/health", get(health)).merge(todo);

    Router::new()
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

// 路径、查询与请求体的解析失败同样按校验错误返回 400

fn path<T>(segment: Result<Path<T>, PathRejection>) -> ApiResult<T> {
    segment
        .map(|Path(value)| value)
        .map_err(|rejection| AppError::invalid("id", rejection.body_text()).into())
}

fn query<T>(params: Result<Query<T>, QueryRejection>) -> ApiResult<T> {
    params
        .map(|Query(value)| value)
        .map_err(|rejection| AppError::invalid("query", rejection.body_text()).into())
}

fn body<T>(payload: Result<Json<T>, JsonRejection>) -> ApiResult<T> {
    payload
        .map(|Json(value)| value)
        .map_err(|rejection| AppError::invalid("body", rejection.body_text()).into())
}

// ---- lists ----

async fn get_todos(State(state): State<AppState>, call: CallContext) -> ApiResult<Response> {
    send(&state, &call, GetTodos).await
}

async fn get_todo(
    State(state): State<AppState>,
    call: CallContext,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<Response> {
    let id = path(id)?;
    send(&state, &call, GetTodo { id: ListId::new(id) }).await
}

#[derive(Deserialize)]
struct CreateTodoListBody {
    #[serde(default)]
    title: String,
}

async fn create_todo_list(
    State(state): State<AppState>,
    call: CallContext,
    payload: Result<Json<CreateTodoListBody>, JsonRejection>,
) -> ApiResult<Response> {
    let payload = body(payload)?;
    send(&state, &call, CreateTodoList { title: payload.title }).await
}

#[derive(Deserialize)]
struct UpdateTodoListBody {
    id: Option<i64>,
    #[serde(default)]
    title: String,
}

async fn update_todo_list(
    State(state): State<AppState>,
    call: CallContext,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<UpdateTodoListBody>, JsonRejection>,
) -> ApiResult<Response> {
    let id = path(id)?;
    let payload = body(payload)?;
    ensure_same_id(id, payload.id)?;
    let request = UpdateTodoList {
        id: ListId::new(id),
        title: payload.title,
    };
    send(&state, &call, request).await
}

async fn delete_todo_list(
    State(state): State<AppState>,
    call: CallContext,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<Response> {
    let id = path(id)?;
    send(&state, &call, DeleteTodoList { id: ListId::new(id) }).await
}

async fn purge_todo_lists(State(state): State<AppState>, call: CallContext) -> ApiResult<Response> {
    send(&state, &call, PurgeTodoLists).await
}

// ---- items ----

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PageQuery {
    #[serde(default = "first_page")]
    page_number: u32,
    #[serde(default = "default_page_size")]
    page_size: u32,
}

fn first_page() -> u32 {
    1
}

fn default_page_size() -> u32 {
    10
}

async fn get_todo_items(
    State(state): State<AppState>,
    call: CallContext,
    list_id: Result<Path<i64>, PathRejection>,
    page: Result<Query<PageQuery>, QueryRejection>,
) -> ApiResult<Response> {
    let list_id = path(list_id)?;
    let page = query(page)?;
    let request = GetTodoItemsWithPagination {
        list_id: ListId::new(list_id),
        page_number: page.page_number,
        page_size: page.page_size,
    };
    send(&state, &call, request).await
}

#[derive(Deserialize)]
struct CreateTodoItemBody {
    #[serde(default)]
    title: String,
}

async fn create_todo_item(
    State(state): State<AppState>,
    call: CallContext,
    list_id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<CreateTodoItemBody>, JsonRejection>,
) -> ApiResult<Response> {
    let list_id = path(list_id)?;
    let payload = body(payload)?;
    let request = CreateTodoItem {
        list_id: ListId::new(list_id),
        title: payload.title,
    };
    send(&state, &call, request).await
}

#[derive(Deserialize)]
struct UpdateTodoItemBody {
    id: Option<i64>,
    #[serde(default)]
    title: String,
    #[serde(default)]
    done: bool,
}

async fn update_todo_item(
    State(state): State<AppState>,
    call: CallContext,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<UpdateTodoItemBody>, JsonRejection>,
) -> ApiResult<Response> {
    let id = path(id)?;
    let payload = body(payload)?;
    ensure_same_id(id, payload.id)?;
    let request = UpdateTodoItem {
        id: ItemId::new(id),
        title: payload.title,
        done: payload.done,
    };
    send(&state, &call, request).await
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateTodoItemDetailBody {
    id: Option<i64>,
    list_id: i64,
    #[serde(default)]
    priority: i32,
    note: Option<String>,
}

async fn update_todo_item_detail(
    State(state): State<AppState>,
    call: CallContext,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<UpdateTodoItemDetailBody>, JsonRejection>,
) -> ApiResult<Response> {
    let id = path(id)?;
    let payload = body(payload)?;
    ensure_same_id(id, payload.id)?;
    let priority = PriorityLevel::try_from(payload.priority)
        .map_err(|_| AppError::invalid("priority", "Priority must be between 0 and 3."))?;
    let request = UpdateTodoItemDetail {
        id: ItemId::new(id),
        list_id: ListId::new(payload.list_id),
        priority,
        note: payload.note,
    };
    send(&state, &call, request).await
}

async fn delete_todo_item(
    State(state): State<AppState>,
    call: CallContext,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<Response> {
    let id = path(id)?;
    send(&state, &call, DeleteTodoItem { id: ItemId::new(id) }).await
}

/// 请求体若带 id，必须与路径一致
fn ensure_same_id(path_id: i64, body_id: Option<i64>) -> ApiResult<()> {
    match body_id {
        Some(body_id) if body_id != path_id => {
            Err(AppError::invalid("id", "The id in the body does not match the route.").into())
        }
        _ => Ok(()),
    }
}
