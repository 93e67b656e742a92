//! 待办应用层（todo-application）
//!
//! 请求调度与中间件管线：
//! - `request`：请求信封协议（稳定名称 + 响应类型）；
//! - `registry`：按请求类型注册唯一处理器；
//! - `behavior`：日志、性能、授权、校验等横切行为，按固定顺序包裹处理器；
//! - `dispatcher`：执行行为链，提交成功后扇出领域事件；
//! - `todo_lists` / `todo_items`：待办用例。
//!
pub mod behavior;
pub mod context;
pub mod dispatcher;
pub mod dto;
pub mod error;
pub mod handler;
pub mod registry;
pub mod request;
pub mod setup;
pub mod todo_items;
pub mod todo_lists;
pub mod validation;

pub use dispatcher::{Dispatcher, DispatcherConfig};
pub use registry::HandlerRegistry;
pub use setup::{TodoSetup, todo_dispatcher};

// 允许 #[request] 宏生成的 ::todo_application 路径在本 crate 内解析
extern crate self as todo_application;
