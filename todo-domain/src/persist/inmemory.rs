//! 内存存储实现
//!
//! 事务开启时复制当前状态作为工作副本，写操作同时记录到暂存日志；
//! 提交时在互斥锁下按顺序回放日志，保证单个事务的写入整体可见。
//!
//! 乐观并发：状态带全局版本号，每次写提交加一。带写入的事务提交时
//! 若版本已不同于开启时，说明期间有其他事务提交，本次提交以
//! `CommitFailed` 拒绝，工作副本上做过的存在性与唯一性判断不会失效。
//!
use super::{TodoStore, TodoTransaction};
use crate::error::{DomainError, DomainResult};
use crate::todo::{ItemId, ListId, TodoItem, TodoList};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Clone, Default)]
struct State {
    version: u64,
    lists: BTreeMap<ListId, TodoList>,
    items: BTreeMap<ItemId, TodoItem>,
}

impl State {
    fn apply(&mut self, op: StagedOp) {
        match op {
            StagedOp::PutList(list) => {
                self.lists.insert(list.id, list);
            }
            StagedOp::RemoveList(id) => {
                self.lists.remove(&id);
                self.items.retain(|_, item| item.list_id != id);
            }
            StagedOp::ClearLists => {
                self.lists.clear();
                self.items.clear();
            }
            StagedOp::PutItem(item) => {
                self.items.insert(item.id, item);
            }
            StagedOp::RemoveItem(id) => {
                self.items.remove(&id);
            }
        }
    }
}

#[derive(Clone)]
enum StagedOp {
    PutList(TodoList),
    RemoveList(ListId),
    ClearLists,
    PutItem(TodoItem),
    RemoveItem(ItemId),
}

struct Shared {
    state: Mutex<State>,
    next_list_id: AtomicI64,
    next_item_id: AtomicI64,
    fail_next_commit: AtomicBool,
    commits: AtomicUsize,
}

impl Shared {
    fn lock(&self) -> DomainResult<MutexGuard<'_, State>> {
        self.state
            .lock()
            .map_err(|_| DomainError::repository("in-memory store lock poisoned"))
    }
}

/// 内存待办存储
#[derive(Clone)]
pub struct InMemoryTodoStore {
    shared: Arc<Shared>,
}

impl Default for InMemoryTodoStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryTodoStore {
    pub fn new() -> Self {
        Self {
            shared: Arc::new(Shared {
                state: Mutex::new(State::default()),
                next_list_id: AtomicI64::new(1),
                next_item_id: AtomicI64::new(1),
                fail_next_commit: AtomicBool::new(false),
                commits: AtomicUsize::new(0),
            }),
        }
    }

    /// 下一次提交失败（一次性）
    pub fn fail_next_commit(&self) {
        self.shared.fail_next_commit.store(true, Ordering::SeqCst);
    }

    /// 成功提交的事务数
    pub fn commit_count(&self) -> usize {
        self.shared.commits.load(Ordering::SeqCst)
    }

    pub fn list_count(&self) -> DomainResult<usize> {
        Ok(self.shared.lock()?.lists.len())
    }

    pub fn item_count(&self) -> DomainResult<usize> {
        Ok(self.shared.lock()?.items.len())
    }
}

#[async_trait]
impl TodoStore for InMemoryTodoStore {
    async fn begin(&self) -> DomainResult<Box<dyn TodoTransaction>> {
        let snapshot = self.shared.lock()?.clone();
        Ok(Box::new(InMemoryTransaction {
            shared: self.shared.clone(),
            working: snapshot,
            staged: Vec::new(),
        }))
    }
}

struct InMemoryTransaction {
    shared: Arc<Shared>,
    working: State,
    staged: Vec<StagedOp>,
}

impl InMemoryTransaction {
    fn stage(&mut self, op: StagedOp) {
        self.working.apply(op.clone());
        self.staged.push(op);
    }
}

fn sorted_by_title<T>(mut values: Vec<T>, title: impl Fn(&T) -> &str) -> Vec<T> {
    values.sort_by(|a, b| title(a).cmp(title(b)));
    values
}

#[async_trait]
impl TodoTransaction for InMemoryTransaction {
    async fn find_list(&self, id: &ListId) -> DomainResult<Option<TodoList>> {
        Ok(self.working.lists.get(id).cloned())
    }

    async fn lists(&self) -> DomainResult<Vec<TodoList>> {
        let lists = self.working.lists.values().cloned().collect();
        Ok(sorted_by_title(lists, |l: &TodoList| l.title.as_str()))
    }

    async fn list_title_exists(&self, title: &str, except: Option<&ListId>) -> DomainResult<bool> {
        Ok(self
            .working
            .lists
            .values()
            .any(|l| l.title == title && Some(&l.id) != except))
    }

    async fn add_list(&mut self, mut list: TodoList) -> DomainResult<ListId> {
        list.id = ListId::new(self.shared.next_list_id.fetch_add(1, Ordering::SeqCst));
        let id = list.id;
        self.stage(StagedOp::PutList(list));
        Ok(id)
    }

    async fn update_list(&mut self, list: TodoList) -> DomainResult<()> {
        if !self.working.lists.contains_key(&list.id) {
            return Err(DomainError::not_found(format!("TodoList ({})", list.id)));
        }
        self.stage(StagedOp::PutList(list));
        Ok(())
    }

    async fn remove_list(&mut self, id: &ListId) -> DomainResult<()> {
        if !self.working.lists.contains_key(id) {
            return Err(DomainError::not_found(format!("TodoList ({id})")));
        }
        self.stage(StagedOp::RemoveList(*id));
        Ok(())
    }

    async fn remove_all_lists(&mut self) -> DomainResult<()> {
        self.stage(StagedOp::ClearLists);
        Ok(())
    }

    async fn find_item(&self, id: &ItemId) -> DomainResult<Option<TodoItem>> {
        Ok(self.working.items.get(id).cloned())
    }

    async fn items_of(&self, list_id: &ListId) -> DomainResult<Vec<TodoItem>> {
        let items = self
            .working
            .items
            .values()
            .filter(|i| &i.list_id == list_id)
            .cloned()
            .collect();
        Ok(sorted_by_title(items, |i: &TodoItem| i.title.as_str()))
    }

    async fn add_item(&mut self, mut item: TodoItem) -> DomainResult<ItemId> {
        item.id = ItemId::new(self.shared.next_item_id.fetch_add(1, Ordering::SeqCst));
        let id = item.id;
        self.stage(StagedOp::PutItem(item));
        Ok(id)
    }

    async fn update_item(&mut self, item: TodoItem) -> DomainResult<()> {
        if !self.working.items.contains_key(&item.id) {
            return Err(DomainError::not_found(format!("TodoItem ({})", item.id)));
        }
        self.stage(StagedOp::PutItem(item));
        Ok(())
    }

    async fn remove_item(&mut self, id: &ItemId) -> DomainResult<()> {
        if !self.working.items.contains_key(id) {
            return Err(DomainError::not_found(format!("TodoItem ({id})")));
        }
        self.stage(StagedOp::RemoveItem(*id));
        Ok(())
    }

    async fn commit(self: Box<Self>) -> DomainResult<()> {
        if self.shared.fail_next_commit.swap(false, Ordering::SeqCst) {
            return Err(DomainError::CommitFailed {
                reason: "injected commit failure".to_string(),
            });
        }

        let InMemoryTransaction {
            shared,
            working,
            staged,
        } = *self;
        if !staged.is_empty() {
            let mut state = shared.lock()?;
            if state.version != working.version {
                return Err(DomainError::CommitFailed {
                    reason: format!(
                        "concurrent modification: began at version {}, store is at {}",
                        working.version, state.version
                    ),
                });
            }
            for op in staged {
                state.apply(op);
            }
            state.version += 1;
        }
        shared.commits.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn writes_are_invisible_until_commit() {
        let store = InMemoryTodoStore::new();

        let mut tx = store.begin().await.unwrap();
        let id = tx.add_list(TodoList::new("Groceries")).await.unwrap();
        assert!(id.is_assigned());
        assert!(tx.find_list(&id).await.unwrap().is_some());
        assert_eq!(store.list_count().unwrap(), 0);

        tx.commit().await.unwrap();
        assert_eq!(store.list_count().unwrap(), 1);
        assert_eq!(store.commit_count(), 1);
    }

    #[tokio::test]
    async fn dropped_transaction_discards_writes() {
        let store = InMemoryTodoStore::new();
        {
            let mut tx = store.begin().await.unwrap();
            tx.add_list(TodoList::new("Temp")).await.unwrap();
        }
        assert_eq!(store.list_count().unwrap(), 0);
    }

    #[tokio::test]
    async fn injected_commit_failure_discards_writes_once() {
        let store = InMemoryTodoStore::new();
        store.fail_next_commit();

        let mut tx = store.begin().await.unwrap();
        tx.add_list(TodoList::new("A")).await.unwrap();
        let err = tx.commit().await.unwrap_err();
        assert!(matches!(err, DomainError::CommitFailed { .. }));
        assert_eq!(store.list_count().unwrap(), 0);

        let mut tx = store.begin().await.unwrap();
        tx.add_list(TodoList::new("A")).await.unwrap();
        tx.commit().await.unwrap();
        assert_eq!(store.list_count().unwrap(), 1);
    }

    #[tokio::test]
    async fn stale_writer_is_rejected_after_a_concurrent_delete() {
        let store = InMemoryTodoStore::new();
        let mut tx = store.begin().await.unwrap();
        let list_id = tx.add_list(TodoList::new("Work")).await.unwrap();
        let item_id = tx.add_item(TodoItem::new(list_id, "Ship")).await.unwrap();
        tx.commit().await.unwrap();

        let mut deleting = store.begin().await.unwrap();
        let mut updating = store.begin().await.unwrap();

        deleting.remove_item(&item_id).await.unwrap();
        let mut item = updating.find_item(&item_id).await.unwrap().unwrap();
        item.title = "Ship it".into();
        updating.update_item(item).await.unwrap();

        deleting.commit().await.unwrap();
        let err = updating.commit().await.unwrap_err();
        assert!(matches!(err, DomainError::CommitFailed { .. }));
        assert_eq!(store.item_count().unwrap(), 0);
    }

    #[tokio::test]
    async fn concurrent_deletes_commit_once() {
        let store = InMemoryTodoStore::new();
        let mut tx = store.begin().await.unwrap();
        let item_id = tx.add_item(TodoItem::new(ListId::new(1), "x")).await.unwrap();
        tx.commit().await.unwrap();

        let mut a = store.begin().await.unwrap();
        let mut b = store.begin().await.unwrap();
        a.remove_item(&item_id).await.unwrap();
        b.remove_item(&item_id).await.unwrap();

        assert!(a.commit().await.is_ok());
        assert!(matches!(
            b.commit().await.unwrap_err(),
            DomainError::CommitFailed { .. }
        ));
    }

    #[tokio::test]
    async fn concurrent_creates_cannot_duplicate_a_title() {
        let store = InMemoryTodoStore::new();
        let mut a = store.begin().await.unwrap();
        let mut b = store.begin().await.unwrap();

        for tx in [&mut a, &mut b] {
            assert!(!tx.list_title_exists("Dup", None).await.unwrap());
            tx.add_list(TodoList::new("Dup")).await.unwrap();
        }

        a.commit().await.unwrap();
        assert!(b.commit().await.is_err());
        assert_eq!(store.list_count().unwrap(), 1);
    }

    #[tokio::test]
    async fn read_only_transactions_never_conflict() {
        let store = InMemoryTodoStore::new();
        let reader = store.begin().await.unwrap();

        let mut writer = store.begin().await.unwrap();
        writer.add_list(TodoList::new("A")).await.unwrap();
        writer.commit().await.unwrap();

        assert!(reader.lists().await.unwrap().is_empty());
        reader.commit().await.unwrap();
        assert_eq!(store.commit_count(), 2);
    }

    #[tokio::test]
    async fn removing_a_list_cascades_to_items() {
        let store = InMemoryTodoStore::new();
        let mut tx = store.begin().await.unwrap();
        let list_id = tx.add_list(TodoList::new("Work")).await.unwrap();
        tx.add_item(TodoItem::new(list_id, "b")).await.unwrap();
        tx.add_item(TodoItem::new(list_id, "a")).await.unwrap();
        tx.commit().await.unwrap();

        let tx = store.begin().await.unwrap();
        let titles: Vec<String> = tx
            .items_of(&list_id)
            .await
            .unwrap()
            .into_iter()
            .map(|i| i.title)
            .collect();
        assert_eq!(titles, vec!["a", "b"]);
        drop(tx);

        let mut tx = store.begin().await.unwrap();
        tx.remove_list(&list_id).await.unwrap();
        tx.commit().await.unwrap();
        assert_eq!(store.item_count().unwrap(), 0);
    }

    #[tokio::test]
    async fn missing_rows_are_not_found() {
        let store = InMemoryTodoStore::new();
        let mut tx = store.begin().await.unwrap();
        let err = tx.remove_item(&ItemId::new(999)).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));

        let mut item = TodoItem::new(ListId::new(1), "x");
        item.id = ItemId::new(5);
        assert!(matches!(
            tx.update_item(item).await.unwrap_err(),
            DomainError::NotFound { .. }
        ));
    }

    #[tokio::test]
    async fn title_uniqueness_check_can_exclude_self() {
        let store = InMemoryTodoStore::new();
        let mut tx = store.begin().await.unwrap();
        let id = tx.add_list(TodoList::new("Home")).await.unwrap();

        assert!(tx.list_title_exists("Home", None).await.unwrap());
        assert!(!tx.list_title_exists("Home", Some(&id)).await.unwrap());
        assert!(!tx.list_title_exists("Office", None).await.unwrap());
    }
}
