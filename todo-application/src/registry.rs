//! 处理器注册表（HandlerRegistry）
//!
//! 以请求的 `TypeId` 为键，每个请求类型恰好绑定一个处理器。
//! 启动期完成注册后交给 `Dispatcher` 冻结为只读，调度期间无需加锁。
//!
use crate::{
    context::AppContext,
    error::{AppError, AppResult},
    handler::{Handled, RequestHandler},
    request::{Envelope, Request},
};
use futures_util::future::BoxFuture;
use std::any::{Any, TypeId, type_name};
use std::collections::HashMap;
use std::sync::Arc;

pub(crate) type BoxAnySend = Box<dyn Any + Send>;

pub(crate) type HandlerFuture<'a> = BoxFuture<'a, AppResult<Handled<BoxAnySend>>>;

pub(crate) type HandlerFn =
    Arc<dyn for<'a> Fn(Envelope, &'a AppContext) -> HandlerFuture<'a> + Send + Sync>;

struct Registration {
    name: &'static str,
    // 保存 Arc<dyn RequestHandler<R>>，resolve 时还原
    handler: Box<dyn Any + Send + Sync>,
    invoke: HandlerFn,
}

#[derive(Default)]
pub struct HandlerRegistry {
    handlers: HashMap<TypeId, Registration>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册请求处理器；同一请求类型重复注册返回 `AlreadyRegistered`
    pub fn register<R, H>(&mut self, handler: Arc<H>) -> AppResult<()>
    where
        R: Request,
        H: RequestHandler<R> + 'static,
    {
        let key = TypeId::of::<R>();
        if self.handlers.contains_key(&key) {
            return Err(AppError::AlreadyRegistered { request: R::NAME });
        }

        let typed: Arc<dyn RequestHandler<R>> = handler;

        let invoke: HandlerFn = {
            let handler = typed.clone();

            Arc::new(move |envelope, ctx| {
                let handler = handler.clone();

                Box::pin(async move {
                    let request = envelope.into_request::<R>()?;
                    let (value, events) = handler.handle(ctx, request).await?.into_parts();
                    Ok(Handled::with_events(Box::new(value) as BoxAnySend, events))
                })
            })
        };

        self.handlers.insert(
            key,
            Registration {
                name: R::NAME,
                handler: Box::new(typed),
                invoke,
            },
        );

        Ok(())
    }

    /// 链式注册，便于启动期装配时以 `?` 快速失败
    pub fn with<R, H>(mut self, handler: H) -> AppResult<Self>
    where
        R: Request,
        H: RequestHandler<R> + 'static,
    {
        self.register::<R, H>(Arc::new(handler))?;
        Ok(self)
    }

    /// 获取请求类型绑定的处理器实例
    pub fn resolve<R: Request>(&self) -> AppResult<Arc<dyn RequestHandler<R>>> {
        let Some(registration) = self.handlers.get(&TypeId::of::<R>()) else {
            return Err(AppError::HandlerNotFound(R::NAME));
        };

        registration
            .handler
            .downcast_ref::<Arc<dyn RequestHandler<R>>>()
            .cloned()
            .ok_or(AppError::TypeMismatch {
                expected: type_name::<Arc<dyn RequestHandler<R>>>(),
                found: registration.name,
            })
    }

    pub(crate) fn invoker(&self, type_id: TypeId) -> Option<HandlerFn> {
        self.handlers.get(&type_id).map(|r| r.invoke.clone())
    }

    pub fn contains<R: Request>(&self) -> bool {
        self.handlers.contains_key(&TypeId::of::<R>())
    }

    /// 已注册的请求名称（按名称排序）
    pub fn registered(&self) -> Vec<&'static str> {
        let mut names: Vec<&'static str> = self.handlers.values().map(|r| r.name).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}
