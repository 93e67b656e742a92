//! 待办领域层（todo-domain）
//!
//! 提供待办服务的领域模型与领域层协议：
//! - 实体（`entity`）与值对象（`value_object`），以及待办模型（`todo`）
//! - 领域事件（`domain_event`）：事件载荷协议与序列化后的 `EventRecord`
//! - 事件分发（`eventing`）：按事件类型将已提交的事件扇出给订阅者
//! - 存储（`persist`）：以事务为边界的存储接口与内存实现
//!
//! 本 crate 不依赖任何传输层实现；应用层通过 `persist::TodoStore` 注入存储，
//! 通过 `eventing::EventFanout` 投递事件。
//!
pub mod domain_event;
pub mod entity;
pub mod error;
#[cfg(feature = "eventing")]
pub mod eventing;
pub mod persist;
pub mod todo;
pub mod value_object;

// 允许在本 crate 内部通过 ::todo_domain 进行自引用，
// 以便过程宏生成的路径在本 crate 内同样可解析。
extern crate self as todo_domain;
