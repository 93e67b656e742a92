//! 待办服务的过程宏（todo-macros）
//!
//! - `#[entity]`：为实体追加 `id` 字段并实现 `Entity`
//! - `#[entity_id]`：为 tuple struct 形式的标识类型生成常用实现
//! - `#[value_object]`：为值对象合并常用派生
//! - `#[domain_event]`：为事件枚举追加事件标识并实现 `DomainEvent`
//! - `#[request]`：为请求信封实现 `Request`（名称与响应类型）
//!
use proc_macro::TokenStream;

mod domain_event;
mod entity;
mod entity_id;
mod request;
mod utils;
mod value_object;

/// 实体宏
/// - 追加字段：`pub id: IdType`（若缺失）并置于字段最前
/// - 实现 `::todo_domain::entity::Entity`
/// - 参数：`#[entity(id = IdType, debug = true|false)]`
#[proc_macro_attribute]
pub fn entity(attr: TokenStream, item: TokenStream) -> TokenStream {
    entity::expand(attr, item)
}

/// 实体 ID 宏
/// 用于 `struct ItemId(i64);` 这类单字段 tuple struct：
/// - `Display` / `FromStr` 委托给内部类型（便于从路由参数解析）
/// - 序列化为内部值（`#[serde(transparent)]`）
#[proc_macro_attribute]
pub fn entity_id(attr: TokenStream, item: TokenStream) -> TokenStream {
    entity_id::expand(attr, item)
}

/// 值对象宏
/// - 参数：`#[value_object(debug = true|false, default = true|false)]`
#[proc_macro_attribute]
pub fn value_object(attr: TokenStream, item: TokenStream) -> TokenStream {
    value_object::expand(attr, item)
}

/// 领域事件宏
///
/// ```ignore
/// #[domain_event(version = 1)]
/// enum TodoItemEvent {
///     Created { item_id: ItemId, title: String },
///     #[event(event_type = "todo.item.completed", event_version = 2)]
///     Completed { item_id: ItemId },
/// }
/// ```
#[proc_macro_attribute]
pub fn domain_event(attr: TokenStream, item: TokenStream) -> TokenStream {
    domain_event::expand(attr, item)
}

/// 请求信封宏
///
/// ```ignore
/// #[request(response = ItemId)]
/// pub struct CreateTodoItem {
///     pub list_id: ListId,
///     pub title: String,
/// }
/// ```
#[proc_macro_attribute]
pub fn request(attr: TokenStream, item: TokenStream) -> TokenStream {
    request::expand(attr, item)
}
