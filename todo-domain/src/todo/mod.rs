//! 待办模型
//!
//! 待办清单（`TodoList`）、待办事项（`TodoItem`）及其标识、颜色、优先级，
//! 以及事项生命周期内产生的领域事件。
//!
mod colour;
mod events;
mod ids;
mod priority_level;
#[cfg(feature = "eventing")]
mod subscribers;
mod todo_item;
mod todo_list;

pub use colour::Colour;
pub use events::TodoItemEvent;
pub use ids::{ItemId, ListId};
pub use priority_level::PriorityLevel;
#[cfg(feature = "eventing")]
pub use subscribers::TodoItemEventLogger;
pub use todo_item::TodoItem;
pub use todo_list::TodoList;
