//! 存储（persist）
//!
//! 以事务为边界的待办存储协议：
//! - `TodoStore`：开启事务；
//! - `TodoTransaction`：事务内按集合（清单、事项）查找/新增/更新/删除，提交后生效；
//! - `InMemoryTodoStore`：内存实现，提交时在互斥锁下原子地应用暂存写入，
//!   并支持注入提交失败以便测试。
//!
//! 关系型后端由上层实现并注入。
//!
mod inmemory;
mod store;

pub use inmemory::InMemoryTodoStore;
pub use store::{TodoStore, TodoTransaction};
