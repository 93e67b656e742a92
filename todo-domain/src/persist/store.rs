use crate::error::DomainResult;
use crate::todo::{ItemId, ListId, TodoItem, TodoList};
use async_trait::async_trait;
use std::sync::Arc;

/// 待办存储：每个处理器调用开启一个事务
#[async_trait]
pub trait TodoStore: Send + Sync {
    async fn begin(&self) -> DomainResult<Box<dyn TodoTransaction>>;
}

#[async_trait]
impl<T> TodoStore for Arc<T>
where
    T: TodoStore + ?Sized,
{
    async fn begin(&self) -> DomainResult<Box<dyn TodoTransaction>> {
        (**self).begin().await
    }
}

/// 存储事务
///
/// 事务内的读取可见本事务已暂存的写入；未调用 `commit` 即丢弃时写入不生效。
#[async_trait]
pub trait TodoTransaction: Send + Sync {
    // --- 清单 ---
    async fn find_list(&self, id: &ListId) -> DomainResult<Option<TodoList>>;

    /// 全部清单，按标题排序
    async fn lists(&self) -> DomainResult<Vec<TodoList>>;

    /// 是否存在同名清单（`except` 排除自身，用于更新）
    async fn list_title_exists(&self, title: &str, except: Option<&ListId>) -> DomainResult<bool>;

    /// 新增清单并返回分配的标识
    async fn add_list(&mut self, list: TodoList) -> DomainResult<ListId>;

    /// 更新已存在的清单；不存在时返回 `NotFound`
    async fn update_list(&mut self, list: TodoList) -> DomainResult<()>;

    /// 删除清单及其全部事项；不存在时返回 `NotFound`
    async fn remove_list(&mut self, id: &ListId) -> DomainResult<()>;

    /// 删除全部清单与事项
    async fn remove_all_lists(&mut self) -> DomainResult<()>;

    // --- 事项 ---
    async fn find_item(&self, id: &ItemId) -> DomainResult<Option<TodoItem>>;

    /// 指定清单下的事项，按标题排序
    async fn items_of(&self, list_id: &ListId) -> DomainResult<Vec<TodoItem>>;

    async fn add_item(&mut self, item: TodoItem) -> DomainResult<ItemId>;

    async fn update_item(&mut self, item: TodoItem) -> DomainResult<()>;

    async fn remove_item(&mut self, id: &ItemId) -> DomainResult<()>;

    /// 提交暂存写入
    async fn commit(self: Box<Self>) -> DomainResult<()>;
}
