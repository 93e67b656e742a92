//! 事件子系统（eventing）
//!
//! 事务提交后，将处理器排队的 `EventRecord` 扇出给订阅方：
//! - `EventSubscriber`：消费某类/多类/全部事件；
//! - `EventFanout`：按事件类型匹配订阅方并发投递，失败与 panic 仅记录日志，
//!   不影响调用方结果。
//!
pub mod fanout;
pub mod subscriber;

pub use fanout::{DeliveryMode, DeliveryReport, EventFanout, EventFanoutConfig};
pub use subscriber::{EventSubscriber, HandledEventType};
