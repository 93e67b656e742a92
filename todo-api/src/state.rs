use std::sync::Arc;

use todo_application::{Dispatcher, DispatcherConfig, TodoSetup, todo_dispatcher};
use todo_domain::{
    eventing::{EventFanout, EventFanoutConfig, EventSubscriber},
    persist::{InMemoryTodoStore, TodoStore},
    todo::TodoItemEventLogger,
};

use crate::{
    auth::{JwtVerifier, TokenVerifier},
    config::Config,
};

/// 路由共享状态
#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Arc<Dispatcher>,
    pub verifier: Arc<dyn TokenVerifier>,
}

impl AppState {
    pub fn new(dispatcher: Dispatcher, verifier: Arc<dyn TokenVerifier>) -> Self {
        Self {
            dispatcher: Arc::new(dispatcher),
            verifier,
        }
    }
}

/// 按配置装配存储、事件扇出与调度器
pub fn build_state(config: &Config, store: Arc<dyn TodoStore>) -> anyhow::Result<AppState> {
    let subscribers: Vec<Arc<dyn EventSubscriber>> = vec![Arc::new(TodoItemEventLogger)];
    let fanout = EventFanout::with_config(
        subscribers,
        EventFanoutConfig {
            delivery_mode: config.event_delivery,
            ..EventFanoutConfig::default()
        },
    );

    let setup = TodoSetup {
        dispatcher: DispatcherConfig {
            timeout: Some(config.request_timeout),
        },
        slow_request_threshold: config.slow_request_threshold,
    };
    let dispatcher = todo_dispatcher(store, Some(fanout), setup)?;

    Ok(AppState::new(dispatcher, Arc::new(JwtVerifier::new(&config.jwt))))
}

/// 以内存存储装配
pub fn build_in_memory_state(config: &Config) -> anyhow::Result<AppState> {
    build_state(config, Arc::new(InMemoryTodoStore::new()))
}
