//! 待办服务 HTTP 入口（todo-api）
//!
//! - `config`：环境变量配置
//! - `telemetry`：tracing 初始化
//! - `auth`：Bearer/JWT 认证中间件
//! - `transport`：调用上下文适配与统一的错误映射
//! - `routes`：`/api` 路由
//!
pub mod auth;
pub mod config;
pub mod routes;
pub mod state;
pub mod telemetry;
pub mod transport;

pub use routes::app_router;
pub use state::{AppState, build_in_memory_state, build_state};
