//! 请求信封（Request Envelope）
//!
//! 每个请求类型声明稳定名称（用于日志与追踪，避免依赖 `type_name`）
//! 与响应类型；调度时被擦除为 `Envelope` 在行为链中传递。
//!
use crate::error::{AppError, AppResult};
use std::any::{Any, TypeId, type_name};
use std::fmt;

pub trait Request: fmt::Debug + Send + Sync + 'static {
    /// 请求的稳定名称
    const NAME: &'static str;

    /// 处理成功时的响应类型
    type Response: Send + 'static;
}

trait ErasedRequest: Any + Send + Sync + fmt::Debug {
    fn as_any(&self) -> &dyn Any;
    fn into_any(self: Box<Self>) -> Box<dyn Any + Send>;
}

impl<T> ErasedRequest for T
where
    T: Any + Send + Sync + fmt::Debug,
{
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any + Send> {
        self
    }
}

/// 类型擦除后的请求，行为可只读检查
pub struct Envelope {
    name: &'static str,
    type_id: TypeId,
    type_name: &'static str,
    payload: Box<dyn ErasedRequest>,
}

impl Envelope {
    pub fn new<R: Request>(request: R) -> Self {
        Self {
            name: R::NAME,
            type_id: TypeId::of::<R>(),
            type_name: type_name::<R>(),
            payload: Box::new(request),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    pub fn is<R: Request>(&self) -> bool {
        self.type_id == TypeId::of::<R>()
    }

    pub fn downcast_ref<R: Request>(&self) -> Option<&R> {
        (*self.payload).as_any().downcast_ref::<R>()
    }

    pub(crate) fn payload_any(&self) -> &dyn Any {
        (*self.payload).as_any()
    }

    pub(crate) fn into_request<R: Request>(self) -> AppResult<R> {
        let found = self.type_name;
        self.payload
            .into_any()
            .downcast::<R>()
            .map(|r| *r)
            .map_err(|_| AppError::TypeMismatch {
                expected: type_name::<R>(),
                found,
            })
    }
}

impl fmt::Debug for Envelope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Envelope")
            .field("name", &self.name)
            .field("payload", &self.payload)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Ping(u8);

    impl Request for Ping {
        const NAME: &'static str = "Ping";
        type Response = ();
    }

    #[derive(Debug)]
    struct Pong;

    impl Request for Pong {
        const NAME: &'static str = "Pong";
        type Response = ();
    }

    #[test]
    fn envelope_exposes_name_and_payload() {
        let env = Envelope::new(Ping(7));
        assert_eq!(env.name(), "Ping");
        assert!(env.is::<Ping>());
        assert!(!env.is::<Pong>());
        assert_eq!(env.downcast_ref::<Ping>(), Some(&Ping(7)));
        assert!(env.downcast_ref::<Pong>().is_none());
        assert_eq!(env.into_request::<Ping>().unwrap(), Ping(7));
    }

    #[test]
    fn wrong_downcast_is_type_mismatch() {
        let err = Envelope::new(Ping(1)).into_request::<Pong>().unwrap_err();
        match err {
            AppError::TypeMismatch { expected, found } => {
                assert!(expected.contains("Pong"));
                assert!(found.contains("Ping"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
